//! State snapshot building for broadcast

use std::collections::HashMap;

use uuid::Uuid;

use crate::game::room::Participant;
use crate::ws::protocol::{PlayerRow, ServerMsg};

/// Build the per-tick `state` message from the full registry. The same
/// message instance is fanned out to every open connection.
pub fn build_state(participants: &HashMap<Uuid, Participant>) -> ServerMsg {
    let players: Vec<PlayerRow> = participants
        .values()
        .map(|p| PlayerRow {
            id: p.id,
            name: p.name.clone(),
            color: p.color.clone(),
            x: p.x,
            y: p.y,
            z: p.z,
            yaw: p.yaw,
            pitch: p.pitch,
        })
        .collect();

    ServerMsg::State { players }
}
