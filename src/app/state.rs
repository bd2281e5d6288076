//! Application state shared across routes

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::Config;
use crate::game::{Room, RoomHandle};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Handle into the room actor (events in, snapshots out)
    pub room: RoomHandle,
    /// Dev live-reload notifications for the /events stream
    pub reload_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Build the state and the room actor; the caller spawns the room task.
    pub fn new(config: Config) -> (Self, Room) {
        let config = Arc::new(config);
        let (room, room_handle) = Room::new();
        let (reload_tx, _) = broadcast::channel(16);

        (
            Self {
                config,
                room: room_handle,
                reload_tx,
            },
            room,
        )
    }
}
