use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::seat::SeatState;
use crate::domain::snapshot::{RoomSnapshot, SeatView};

pub const PROTOCOL_VERSION: i32 = 1;

/// Commands a client may address to the room its socket is attached to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello { protocol: i32 },
    Join { display_name: String },
    Leave,
    Ready,
    Bet { amount: u32 },
    Hit,
    Stand,
    DoubleDown,
    NextRound,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    HelloAck {
        protocol: i32,
        client_id: Uuid,
    },

    Ack {
        message: &'static str,
    },

    /// Full room state, pushed to every observer after each accepted
    /// mutation.
    RoomState {
        room: RoomSnapshot,
    },

    SeatStatus {
        seat_id: Uuid,
        state: SeatState,
    },

    PlayerJoined {
        seat: SeatView,
    },

    PlayerLeft {
        seat_id: Uuid,
    },

    Notification {
        message: String,
    },

    Error {
        code: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_commands_deserialize_from_tagged_json() {
        let msg: ClientMsg = serde_json::from_str(r#"{"type":"bet","amount":250}"#).unwrap();
        assert!(matches!(msg, ClientMsg::Bet { amount: 250 }));

        let msg: ClientMsg = serde_json::from_str(r#"{"type":"double_down"}"#).unwrap();
        assert!(matches!(msg, ClientMsg::DoubleDown));

        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"join","display_name":"Ada"}"#).unwrap();
        assert!(matches!(msg, ClientMsg::Join { .. }));
    }

    #[test]
    fn server_errors_serialize_with_code_and_message() {
        let json = serde_json::to_string(&ServerMsg::Error {
            code: "OUT_OF_TURN".to_string(),
            message: "it is not your turn".to_string(),
        })
        .unwrap();
        assert!(json.contains(r#""type":"error""#));
        assert!(json.contains("OUT_OF_TURN"));
    }
}
