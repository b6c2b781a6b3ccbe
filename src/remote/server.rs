//! WebSocket remote-control server.
//!
//! A phone or control desk connects over the LAN, receives live
//! [`RemoteStatus`] snapshots, and sends JSON commands that map 1:1 onto
//! the player's control handlers via the typed event bus. The server never
//! touches editor or playback state directly.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio_tungstenite::{accept_async, tungstenite::Message};

use crate::core::events::{EventBus, RemoteEvent};

/// Default port the remote server listens on.
pub const REMOTE_PORT: u16 = 8766;

/// A command sent by a remote client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCommand {
    #[serde(rename = "type")]
    pub command_type: String,
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub timestamp: i64,
}

/// Playback status pushed to every connected client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteStatus {
    pub is_playing: bool,
    pub current_speed: f64,
    pub current_segment: Option<usize>,
    pub total_segments: usize,
    pub project_name: String,
    pub timestamp: i64,
    pub connected_clients: usize,
}

impl Default for RemoteStatus {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_speed: 1.0,
            current_segment: None,
            total_segments: 0,
            project_name: "Untitled Project".to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            connected_clients: 0,
        }
    }
}

pub struct ServerState {
    pub status: RemoteStatus,
    pub broadcast_tx: tokio::sync::broadcast::Sender<String>,
}

pub type SharedState = Arc<RwLock<ServerState>>;

/// The advertised connection URL, preferring a private LAN address.
pub fn connection_url(port: u16) -> String {
    let ip = local_ip_address::list_afinet_netifas()
        .ok()
        .and_then(|ips| {
            ips.iter()
                .map(|(_, ip)| *ip)
                .find(|ip| {
                    let text = ip.to_string();
                    (text.starts_with("192.168.")
                        || text.starts_with("10.")
                        || text.starts_with("172."))
                        && !text.starts_with("127.")
                })
        })
        .or_else(|| local_ip_address::local_ip().ok())
        .unwrap_or(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST));
    format!("ws://{}:{}", ip, port)
}

/// Push a fresh status snapshot to all connected clients.
pub async fn update_status(state: SharedState, mut status: RemoteStatus) {
    let mut guard = state.write().await;
    // The server owns the accurate client count.
    status.connected_clients = guard.status.connected_clients;
    status.timestamp = chrono::Utc::now().timestamp_millis();
    guard.status = status;
    if let Ok(json) = serde_json::to_string(&guard.status) {
        let _ = guard.broadcast_tx.send(json);
    }
}

pub struct RemoteServer {
    port: u16,
    state: SharedState,
    bus: EventBus,
}

impl RemoteServer {
    pub fn new(bus: EventBus, port: u16) -> Self {
        let (broadcast_tx, _) = tokio::sync::broadcast::channel(32);
        let state = Arc::new(RwLock::new(ServerState {
            status: RemoteStatus::default(),
            broadcast_tx,
        }));
        Self { port, state, bus }
    }

    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// Accept loop. Runs until the task owning it is dropped.
    pub async fn start(&self) -> Result<(), String> {
        let addr: SocketAddr = format!("0.0.0.0:{}", self.port)
            .parse()
            .map_err(|err| format!("Invalid address: {}", err))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| format!("Failed to bind remote server to port {}: {}", self.port, err))?;

        log::info!("Remote control server listening on port {}", self.port);

        loop {
            match listener.accept().await {
                Ok((stream, peer_addr)) => {
                    log::info!("Remote connected: {}", peer_addr);
                    {
                        let mut guard = self.state.write().await;
                        guard.status.connected_clients += 1;
                    }
                    let state = self.state.clone();
                    let bus = self.bus.clone();
                    tokio::spawn(async move {
                        if let Err(err) = handle_connection(stream, state.clone(), bus, peer_addr).await
                        {
                            log::warn!("Remote connection {} failed: {}", peer_addr, err);
                        }
                        let mut guard = state.write().await;
                        guard.status.connected_clients =
                            guard.status.connected_clients.saturating_sub(1);
                        log::info!(
                            "Remote disconnected: {} ({} still connected)",
                            peer_addr,
                            guard.status.connected_clients
                        );
                    });
                }
                Err(err) => {
                    log::warn!("Failed to accept remote connection: {}", err);
                }
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    state: SharedState,
    bus: EventBus,
    peer_addr: SocketAddr,
) -> Result<(), String> {
    let ws_stream = accept_async(stream)
        .await
        .map_err(|err| format!("WebSocket handshake failed: {}", err))?;
    let (mut write_half, mut read_half) = ws_stream.split();
    let (tx, mut rx_local) = tokio::sync::mpsc::unbounded_channel::<Message>();

    let mut rx_broadcast = {
        let guard = state.read().await;
        guard.broadcast_tx.subscribe()
    };

    // One task pushes everything (replies + broadcasts) to this client.
    let writer_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(msg) = rx_local.recv() => {
                    if write_half.send(msg).await.is_err() {
                        break;
                    }
                }
                Ok(json) = rx_broadcast.recv() => {
                    if write_half.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                else => break,
            }
        }
    });

    // Send the current status immediately so the client can render.
    {
        let guard = state.read().await;
        if let Ok(json) = serde_json::to_string(&guard.status) {
            let _ = tx.send(Message::Text(json));
        }
    }

    while let Some(msg) = read_half.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<RemoteCommand>(&text) {
                Ok(command) => {
                    dispatch_command(&command, &bus);
                    let guard = state.read().await;
                    if let Ok(json) = serde_json::to_string(&guard.status) {
                        let _ = tx.send(Message::Text(json));
                    }
                }
                Err(err) => {
                    log::warn!("Unparseable remote message from {}: {} ({})", peer_addr, text, err);
                }
            },
            Ok(Message::Ping(data)) => {
                let _ = tx.send(Message::Pong(data));
            }
            Ok(Message::Close(_)) => break,
            Err(err) => {
                log::warn!("WebSocket error from {}: {}", peer_addr, err);
                break;
            }
            _ => {}
        }
    }

    writer_task.abort();
    Ok(())
}

fn dispatch_command(command: &RemoteCommand, bus: &EventBus) {
    log::debug!("Remote command: {}", command.command_type);
    let event = match command.command_type.as_str() {
        "play" => RemoteEvent::Play,
        "pause" => RemoteEvent::Pause,
        "stop" => RemoteEvent::Stop,
        "next_segment" => RemoteEvent::NextSegment,
        "prev_segment" => RemoteEvent::PrevSegment,
        "reset_position" => RemoteEvent::ResetPosition,
        "set_speed" => {
            let Some(speed) = command.value.as_ref().and_then(|v| v.as_f64()) else {
                log::warn!("set_speed command without a numeric value");
                return;
            };
            RemoteEvent::SetSpeed(speed.clamp(0.5, 2.0))
        }
        "seek" => {
            let Some(position) = command.value.as_ref().and_then(|v| v.as_f64()) else {
                log::warn!("seek command without a numeric value");
                return;
            };
            RemoteEvent::Seek(position.max(0.0))
        }
        other => {
            log::warn!("Unknown remote command: {}", other);
            return;
        }
    };
    bus.emit_remote(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_maps_commands() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_remote();

        let command = RemoteCommand {
            command_type: "next_segment".to_string(),
            value: None,
            timestamp: 0,
        };
        dispatch_command(&command, &bus);
        assert_eq!(rx.try_recv().unwrap(), RemoteEvent::NextSegment);

        let command = RemoteCommand {
            command_type: "set_speed".to_string(),
            value: Some(serde_json::json!(5.0)),
            timestamp: 0,
        };
        dispatch_command(&command, &bus);
        // Speed clamps to the protocol bounds.
        assert_eq!(rx.try_recv().unwrap(), RemoteEvent::SetSpeed(2.0));
    }

    #[test]
    fn test_dispatch_ignores_unknown() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_remote();
        let command = RemoteCommand {
            command_type: "self_destruct".to_string(),
            value: None,
            timestamp: 0,
        };
        dispatch_command(&command, &bus);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_command_json_shape() {
        let json = r#"{"type": "seek", "value": 12.5}"#;
        let command: RemoteCommand = serde_json::from_str(json).unwrap();
        assert_eq!(command.command_type, "seek");
        assert_eq!(command.value.unwrap().as_f64().unwrap(), 12.5);
    }
}
