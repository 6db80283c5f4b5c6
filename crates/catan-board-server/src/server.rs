//! WebSocket server and connection handling.

use crate::config::ServerConfig;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::Session;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    pub config: ServerConfig,
    /// All open sessions
    pub sessions: DashMap<Uuid, Session>,
    /// Mapping from session ID to its message sender
    pub senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
    /// Sessions opened so far, used to offset the configured seed
    opened: AtomicU64,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            sessions: DashMap::new(),
            senders: DashMap::new(),
            opened: AtomicU64::new(0),
        }
    }

    /// Register a new session and return its ID.
    ///
    /// With `BOARD_SEED` set, the n-th session is seeded with `seed + n`.
    pub fn open_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        let index = self.opened.fetch_add(1, Ordering::Relaxed);
        let seed = self.config.seed.map(|seed| seed.wrapping_add(index));
        self.sessions.insert(id, Session::new(id, seed));
        id
    }

    pub fn close_session(&self, session_id: Uuid) {
        if let Some((_, session)) = self.sessions.remove(&session_id) {
            debug!(
                "Session {} closed after {} board(s)",
                session_id,
                session.boards_generated()
            );
        }
        self.senders.remove(&session_id);
    }

    /// Send a message to a specific session.
    pub fn send_to(&self, session_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&session_id) {
            let _ = sender.send(msg);
        }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

/// Run the WebSocket server.
pub async fn run_server(state: Arc<ServerState>) -> anyhow::Result<()> {
    let addr = state.config.addr;
    let listener = TcpListener::bind(addr).await?;
    info!("Board server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let session_id = state.open_session();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.senders.insert(session_id, tx);

    let welcome = ServerMessage::Welcome { session_id };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text)).await?;

    // Forward queued messages to the socket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(text) => {
                    if ws_sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(e) => error!("Failed to encode message: {}", e),
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(session_id, client_msg, &state),
                Err(e) => {
                    warn!("Invalid message from {}: {}", session_id, text);
                    state.send_to(session_id, ServerMessage::error(format!("Invalid message: {e}")));
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", session_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to(session_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", session_id, e);
                break;
            }
            _ => {}
        }
    }

    state.close_session(session_id);
    send_task.abort();

    info!("Connection closed for {}", session_id);
    Ok(())
}

/// Handle a client message.
fn handle_message(session_id: Uuid, msg: ClientMessage, state: &ServerState) {
    match msg {
        ClientMessage::Generate { options } => {
            let reply = match state.sessions.get_mut(&session_id) {
                Some(mut session) => session
                    .generate(&options, state.config.tile_spacing)
                    .unwrap_or_else(|e| {
                        warn!("Rejected options from {}: {}", session_id, e);
                        ServerMessage::error(e)
                    }),
                None => ServerMessage::error("Session not found"),
            };
            state.send_to(session_id, reply);
        }

        ClientMessage::Ping => {
            state.send_to(session_id, ServerMessage::Pong);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded_state(seed: u64) -> ServerState {
        ServerState::new(ServerConfig {
            seed: Some(seed),
            ..ServerConfig::default()
        })
    }

    fn connect(state: &ServerState) -> (Uuid, mpsc::UnboundedReceiver<ServerMessage>) {
        let id = state.open_session();
        let (tx, rx) = mpsc::unbounded_channel();
        state.senders.insert(id, tx);
        (id, rx)
    }

    #[test]
    fn test_generate_replies_with_board() {
        let state = seeded_state(5);
        let (id, mut rx) = connect(&state);

        let options = json!({ "randomize_production": true, "randomize_ports": false });
        handle_message(id, ClientMessage::Generate { options }, &state);

        match rx.try_recv().unwrap() {
            ServerMessage::BoardGenerated { board, layout, .. } => {
                assert_eq!(board.tiles().len(), 19);
                assert_eq!(layout.ports.len(), 9);
            }
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[test]
    fn test_bad_options_reply_with_error() {
        let state = seeded_state(5);
        let (id, mut rx) = connect(&state);

        let options = json!({ "randomize_ports": false });
        handle_message(id, ClientMessage::Generate { options }, &state);

        match rx.try_recv().unwrap() {
            ServerMessage::Error { message } => {
                assert_eq!(message, "Missing board option `randomize_production`");
            }
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[test]
    fn test_ping_pong() {
        let state = ServerState::default();
        let (id, mut rx) = connect(&state);
        handle_message(id, ClientMessage::Ping, &state);
        assert!(matches!(rx.try_recv().unwrap(), ServerMessage::Pong));
    }

    #[test]
    fn test_seeded_sessions_differ_but_repeat() {
        let options = json!({ "randomize_production": true, "randomize_ports": true });
        let boards = |state: &ServerState| -> Vec<serde_json::Value> {
            (0..2)
                .map(|_| {
                    let (id, mut rx) = connect(state);
                    handle_message(id, ClientMessage::Generate { options: options.clone() }, state);
                    serde_json::to_value(rx.try_recv().unwrap()).unwrap()
                })
                .collect()
        };

        let first = boards(&seeded_state(11));
        let second = boards(&seeded_state(11));
        assert_eq!(first, second);
        assert_ne!(first[0]["payload"]["board"], first[1]["payload"]["board"]);
    }

    #[test]
    fn test_close_session_forgets_it() {
        let state = ServerState::default();
        let (id, _rx) = connect(&state);
        state.close_session(id);
        assert!(state.sessions.get(&id).is_none());
        assert!(state.senders.get(&id).is_none());
    }
}
