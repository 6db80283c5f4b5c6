//! WebSocket protocol messages for the board server.

use crate::layout::BoardLayout;
use catan_board::Board;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Deal a new board; `options` holds `randomize_production` and
    /// `randomize_ports`
    Generate { options: serde_json::Value },

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned session ID
    Welcome { session_id: Uuid },

    /// A freshly dealt board and where to draw it
    BoardGenerated {
        board: Board,
        layout: BoardLayout,
        attempts: u64,
    },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

impl ServerMessage {
    pub fn error(message: impl ToString) -> Self {
        ServerMessage::Error {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_messages_parse() {
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "Generate",
            "payload": { "options": { "randomize_production": true, "randomize_ports": false } }
        }))
        .unwrap();
        match msg {
            ClientMessage::Generate { options } => {
                assert_eq!(options["randomize_production"], json!(true));
                assert_eq!(options["randomize_ports"], json!(false));
            }
            other => panic!("unexpected message {other:?}"),
        }

        let ping: ClientMessage = serde_json::from_str(r#"{"type":"Ping"}"#).unwrap();
        assert!(matches!(ping, ClientMessage::Ping));
    }

    #[test]
    fn test_unknown_message_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"JoinRoom"}"#).is_err());
    }

    #[test]
    fn test_server_messages_are_tagged() {
        let value = serde_json::to_value(ServerMessage::error("bad option")).unwrap();
        assert_eq!(
            value,
            json!({ "type": "Error", "payload": { "message": "bad option" } })
        );

        let value = serde_json::to_value(ServerMessage::Pong).unwrap();
        assert_eq!(value, json!({ "type": "Pong" }));
    }
}
