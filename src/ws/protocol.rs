//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Messages sent from client to server
///
/// Numeric sub-fields are decoded leniently: a non-numeric value coerces to
/// zero instead of failing the whole message. Messages that are not valid
/// JSON or carry an unknown `type` fail to decode and are dropped by the
/// connection handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Set the participant's display name
    Identify {
        name: String,
    },

    /// Teleport back to the world origin (orientation untouched)
    Reset,

    /// Update the participant's input sample; every field is optional and
    /// absent fields leave the stored value unchanged
    Input {
        /// Movement intent; when present all three axes are replaced
        #[serde(default, rename = "move")]
        movement: Option<MoveWire>,
        /// Speed multiplier; ignored entirely when not a number
        #[serde(default, deserialize_with = "lenient_opt_f32")]
        speed: Option<f32>,
        /// Desired view angles
        #[serde(default)]
        view: Option<ViewWire>,
    },
}

/// Movement axes as they appear on the wire (unclamped)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MoveWire {
    #[serde(default, deserialize_with = "lenient_f32")]
    pub forward: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub right: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub up: f32,
}

/// View angles as they appear on the wire (unclamped)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ViewWire {
    #[serde(default, deserialize_with = "lenient_f32")]
    pub yaw: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub pitch: f32,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Sent once immediately after the connection opens so the client can
    /// identify its own entry in subsequent state broadcasts
    Welcome {
        id: Uuid,
        name: String,
        color: String,
    },

    /// Full-registry snapshot, pushed to every open connection each tick
    State {
        players: Vec<PlayerRow>,
    },
}

/// One participant's public state in a `state` broadcast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRow {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub yaw: f32,
    pub pitch: f32,
}

/// Coerce any JSON value to f32, non-numeric values become 0
fn lenient_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or(0.0) as f32)
}

/// Like [`lenient_f32`] but non-numeric values yield `None` so the stored
/// value is kept, matching the speed-field semantics
fn lenient_opt_f32<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().map(|n| n as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_input_message() {
        let msg: ClientMsg = serde_json::from_str(
            r#"{"type":"input","move":{"forward":1,"right":-0.5,"up":0.25},"speed":1.5,"view":{"yaw":3.1,"pitch":0.2}}"#,
        )
        .unwrap();

        match msg {
            ClientMsg::Input {
                movement,
                speed,
                view,
            } => {
                let movement = movement.unwrap();
                assert_eq!(movement.forward, 1.0);
                assert_eq!(movement.right, -0.5);
                assert_eq!(movement.up, 0.25);
                assert_eq!(speed, Some(1.5));
                let view = view.unwrap();
                assert_eq!(view.yaw, 3.1);
                assert_eq!(view.pitch, 0.2);
            }
            other => panic!("expected input, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_axes_coerce_to_zero() {
        let msg: ClientMsg = serde_json::from_str(
            r#"{"type":"input","move":{"forward":"fast","right":true,"up":null}}"#,
        )
        .unwrap();

        match msg {
            ClientMsg::Input { movement, .. } => {
                let movement = movement.unwrap();
                assert_eq!(movement.forward, 0.0);
                assert_eq!(movement.right, 0.0);
                assert_eq!(movement.up, 0.0);
            }
            other => panic!("expected input, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_speed_is_ignored_not_zeroed() {
        let msg: ClientMsg = serde_json::from_str(r#"{"type":"input","speed":"turbo"}"#).unwrap();

        match msg {
            ClientMsg::Input { speed, .. } => assert_eq!(speed, None),
            other => panic!("expected input, got {:?}", other),
        }
    }

    #[test]
    fn absent_fields_stay_absent() {
        let msg: ClientMsg = serde_json::from_str(r#"{"type":"input"}"#).unwrap();

        match msg {
            ClientMsg::Input {
                movement,
                speed,
                view,
            } => {
                assert!(movement.is_none());
                assert!(speed.is_none());
                assert!(view.is_none());
            }
            other => panic!("expected input, got {:?}", other),
        }
    }

    #[test]
    fn missing_axis_coerces_to_zero_when_move_is_present() {
        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"input","move":{"forward":1}}"#).unwrap();

        match msg {
            ClientMsg::Input { movement, .. } => {
                let movement = movement.unwrap();
                assert_eq!(movement.forward, 1.0);
                assert_eq!(movement.right, 0.0);
                assert_eq!(movement.up, 0.0);
            }
            other => panic!("expected input, got {:?}", other),
        }
    }

    #[test]
    fn unknown_message_types_fail_to_decode() {
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"explode"}"#).is_err());
        assert!(serde_json::from_str::<ClientMsg>("not json at all").is_err());
        assert!(serde_json::from_str::<ClientMsg>(r#"{"no":"discriminant"}"#).is_err());
    }

    #[test]
    fn identify_requires_a_string_name() {
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"identify","name":42}"#).is_err());
        let msg: ClientMsg = serde_json::from_str(r#"{"type":"identify","name":"Ada"}"#).unwrap();
        match msg {
            ClientMsg::Identify { name } => assert_eq!(name, "Ada"),
            other => panic!("expected identify, got {:?}", other),
        }
    }

    #[test]
    fn server_messages_carry_snake_case_type_tags() {
        let welcome = ServerMsg::Welcome {
            id: Uuid::nil(),
            name: "Player-1000".to_string(),
            color: "#7bdff2".to_string(),
        };
        let json = serde_json::to_string(&welcome).unwrap();
        assert!(json.contains(r#""type":"welcome""#));

        let state = ServerMsg::State { players: vec![] };
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains(r#""type":"state""#));
        assert!(json.contains(r#""players":[]"#));
    }
}
