//! Room simulation modules

pub mod input;
pub mod movement;
pub mod room;
pub mod snapshot;

pub use room::{Participant, Room, RoomHandle};

use uuid::Uuid;

use crate::ws::protocol::ClientMsg;

/// Fixed palette a participant's color is drawn from at connect time
pub const COLOR_PALETTE: [&str; 6] = [
    "#7bdff2", "#f2b5d4", "#b8f2e6", "#f4d35e", "#ee6c4d", "#9b5de5",
];

/// Connection lifecycle and protocol events delivered to the room task
#[derive(Debug, Clone)]
pub enum RoomEvent {
    /// A connection opened; register a fresh participant
    Join {
        id: Uuid,
        name: String,
        color: String,
    },
    /// A decoded message from an open connection
    Message { id: Uuid, msg: ClientMsg },
    /// The connection closed; deregister the participant
    Leave { id: Uuid },
}
