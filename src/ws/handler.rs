//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use rand::Rng;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::{RoomEvent, COLOR_PALETTE};
use crate::util::rate_limit::ConnectionRateLimiter;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Generate the default placeholder display name
fn generate_name() -> String {
    format!("Player-{}", rand::thread_rng().gen_range(1000..10000))
}

/// Pick a color uniformly from the fixed palette
fn pick_color() -> String {
    COLOR_PALETTE[rand::thread_rng().gen_range(0..COLOR_PALETTE.len())].to_string()
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let id = Uuid::new_v4();
    let name = generate_name();
    let color = pick_color();

    info!(participant_id = %id, name = %name, "New WebSocket connection");

    let (mut ws_sink, ws_stream) = socket.split();

    // Subscribe before joining so no snapshot containing us is missed
    let snapshot_rx = state.room.snapshot_tx.subscribe();

    let join = RoomEvent::Join {
        id,
        name: name.clone(),
        color: color.clone(),
    };
    if state.room.event_tx.send(join).await.is_err() {
        error!(participant_id = %id, "Room task is gone, dropping connection");
        return;
    }

    let welcome = ServerMsg::Welcome { id, name, color };
    if let Err(e) = send_msg(&mut ws_sink, &welcome).await {
        error!(participant_id = %id, error = %e, "Failed to send welcome");
        let _ = state.room.event_tx.send(RoomEvent::Leave { id }).await;
        return;
    }

    run_session(id, ws_sink, ws_stream, &state, snapshot_rx).await;

    // Cleanup on disconnect
    let _ = state.room.event_tx.send(RoomEvent::Leave { id }).await;

    info!(participant_id = %id, "WebSocket connection closed");
}

/// Run the WebSocket session with read/write split
async fn run_session(
    id: Uuid,
    mut ws_sink: futures::stream::SplitSink<WebSocket, Message>,
    mut ws_stream: futures::stream::SplitStream<WebSocket>,
    state: &AppState,
    mut snapshot_rx: broadcast::Receiver<ServerMsg>,
) {
    let rate_limiter = ConnectionRateLimiter::new();

    // Writer task: state broadcasts -> WebSocket
    let writer_id = id;
    let writer_handle = tokio::spawn(async move {
        loop {
            match snapshot_rx.recv().await {
                Ok(msg) => {
                    if let Err(e) = send_msg(&mut ws_sink, &msg).await {
                        debug!(participant_id = %writer_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(
                        participant_id = %writer_id,
                        lagged_count = n,
                        "Client lagged, skipping {} snapshots", n
                    );
                    // Continue - don't disconnect for lag
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(participant_id = %writer_id, "Snapshot channel closed");
                    break;
                }
            }
        }
    });

    // Reader loop: WebSocket -> room task
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check_message() {
                    warn!(participant_id = %id, "Rate limited inbound message");
                    continue;
                }

                // Malformed or unknown messages are dropped; the connection
                // and everyone else's state are unaffected
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(msg) => {
                        if state
                            .room
                            .event_tx
                            .send(RoomEvent::Message { id, msg })
                            .await
                            .is_err()
                        {
                            debug!(participant_id = %id, "Room channel closed");
                            break;
                        }
                    }
                    Err(e) => {
                        debug!(participant_id = %id, error = %e, "Ignoring malformed message");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                debug!(participant_id = %id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!(participant_id = %id, "Client initiated close");
                break;
            }
            Err(e) => {
                debug!(participant_id = %id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    writer_handle.abort();
}

/// Send a message over WebSocket
async fn send_msg(
    sink: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMsg,
) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}
