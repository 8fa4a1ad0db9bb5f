//! Server network layer: WebSocket connections and the event loop that owns
//! the game.

use crate::client_manager::{ClientManager, Outbound, OUTBOUND_CAPACITY};
use crate::game::GameSession;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{ClientMessage, GameStatus, MoveRequest, ServerMessage, Setup, UnitKind};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio::time::interval;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Events sent from connection tasks to the main server loop
#[derive(Debug)]
pub enum ServerEvent {
    /// A WebSocket handshake completed. The loop answers on `reply` with the
    /// assigned client id, or `None` if the connection is refused.
    ClientConnected {
        addr: SocketAddr,
        sender: Outbound,
        reply: oneshot::Sender<Option<u32>>,
    },
    MessageReceived {
        client_id: u32,
        text: String,
    },
    ClientDisconnected {
        client_id: u32,
    },
}

/// The game server.
///
/// Connection tasks only parse frames and forward them; every event is
/// handled here, one at a time, so the session never sees two requests
/// interleaved.
pub struct Server {
    listener: Option<TcpListener>,
    local_addr: SocketAddr,
    clients: ClientManager,
    session: GameSession,

    event_tx: mpsc::UnboundedSender<ServerEvent>,
    event_rx: mpsc::UnboundedReceiver<ServerEvent>,
}

impl Server {
    pub async fn new(addr: &str, max_clients: usize) -> Result<Self, BoxError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Server listening on {}", local_addr);

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener: Some(listener),
            local_addr,
            clients: ClientManager::new(max_clients),
            session: GameSession::new(),
            event_tx,
            event_rx,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn clients(&self) -> &ClientManager {
        &self.clients
    }

    /// Spawns the task that accepts TCP connections
    fn spawn_listener(&mut self) -> Result<(), BoxError> {
        let listener = self.listener.take().ok_or("server is already running")?;
        let events = self.event_tx.clone();

        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, addr)) => {
                        debug!("Accepted TCP connection from {}", addr);
                        tokio::spawn(handle_connection(stream, addr, events.clone()));
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });

        Ok(())
    }

    fn handle_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::ClientConnected {
                addr,
                sender,
                reply,
            } => {
                let client_id = self.clients.add_client(addr, sender);
                match client_id {
                    Some(client_id) => {
                        self.reply(client_id, &ServerMessage::Connected { client_id });
                        let snapshot = ServerMessage::state_update(self.session.state());
                        self.reply(client_id, &snapshot);
                    }
                    None => warn!("Refusing connection from {}: server full", addr),
                }
                if reply.send(client_id).is_err() {
                    debug!("Connection task for {} went away during handshake", addr);
                    if let Some(client_id) = client_id {
                        self.clients.remove_client(&client_id);
                    }
                }
            }

            ServerEvent::MessageReceived { client_id, text } => {
                self.handle_message(client_id, &text);
            }

            ServerEvent::ClientDisconnected { client_id } => {
                self.clients.remove_client(&client_id);
            }
        }
    }

    fn handle_message(&mut self, client_id: u32, text: &str) {
        match ClientMessage::from_json(text) {
            Ok(ClientMessage::InitializeGame {
                player_a_setup,
                player_b_setup,
            }) => self.handle_initialize(client_id, player_a_setup, player_b_setup),
            Ok(ClientMessage::MakeMove(request)) => self.handle_move(client_id, &request),
            Err(e) => {
                debug!("Malformed message from client {}: {}", client_id, e);
                self.reply(
                    client_id,
                    &ServerMessage::ProtocolError {
                        reason: e.to_string(),
                    },
                );
            }
        }
    }

    fn handle_initialize(
        &mut self,
        client_id: u32,
        player_a_setup: Option<Vec<UnitKind>>,
        player_b_setup: Option<Vec<UnitKind>>,
    ) {
        let result = Setup::from_optional(player_a_setup, player_b_setup)
            .and_then(|setup| self.session.initialize(&setup).map(|_| ()));

        match result {
            Ok(()) => {
                info!("Client {} started a new game", client_id);
                let update = ServerMessage::state_update(self.session.state());
                self.broadcast(&update);
            }
            Err(e) => {
                debug!("Rejected setup from client {}: {}", client_id, e);
                self.reply(client_id, &ServerMessage::invalid_setup(e));
            }
        }
    }

    fn handle_move(&mut self, client_id: u32, request: &MoveRequest) {
        match self.session.apply_move(request) {
            Ok(outcome) => {
                let update = ServerMessage::state_update(self.session.state());
                self.broadcast(&update);
                if let GameStatus::Won(winner) = outcome.status {
                    self.broadcast(&ServerMessage::GameOver { winner });
                }
            }
            Err(reason) => {
                debug!(
                    "Rejected move from client {} ({:?} {} {}): {}",
                    client_id, request.unit, request.acting_player, request.direction, reason
                );
                self.reply(client_id, &ServerMessage::InvalidMove { reason });
            }
        }
    }

    fn reply(&mut self, client_id: u32, message: &ServerMessage) {
        if let Err(e) = self.clients.send_to(client_id, message) {
            debug!("Could not reply to client {}: {}", client_id, e);
        }
    }

    fn broadcast(&mut self, message: &ServerMessage) {
        match self.clients.broadcast(message) {
            Ok(dropped) if !dropped.is_empty() => {
                debug!("Broadcast skipped {} closed connection(s)", dropped.len());
            }
            Ok(_) => {}
            Err(e) => error!("Failed to broadcast: {}", e),
        }
    }

    /// Main server loop. Runs until the task is cancelled.
    pub async fn run(&mut self) -> Result<(), BoxError> {
        self.spawn_listener()?;

        let mut housekeeping = interval(Duration::from_secs(1));

        info!("Server started successfully");

        loop {
            tokio::select! {
                event = self.event_rx.recv() => {
                    match event {
                        Some(event) => self.handle_event(event),
                        None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },

                _ = housekeeping.tick() => {
                    let closed = self.clients.prune_closed();
                    if !closed.is_empty() {
                        debug!("Pruned closed clients {:?}", closed);
                    }
                },
            }
        }

        Ok(())
    }
}

/// Drives one WebSocket connection until either side closes it.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    events: mpsc::UnboundedSender<ServerEvent>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake with {} failed: {}", addr, e);
            return;
        }
    };
    let (mut write, mut read) = ws_stream.split();

    let (out_tx, mut out_rx) = mpsc::channel::<String>(OUTBOUND_CAPACITY);
    let (reply_tx, reply_rx) = oneshot::channel();
    let connected = ServerEvent::ClientConnected {
        addr,
        sender: out_tx,
        reply: reply_tx,
    };
    if events.send(connected).is_err() {
        return;
    }

    let client_id = match reply_rx.await {
        Ok(Some(client_id)) => client_id,
        Ok(None) | Err(_) => {
            let refusal = ServerMessage::Disconnected {
                reason: "Server full".to_string(),
            };
            if let Ok(text) = refusal.to_json() {
                let _ = write.send(Message::Text(text)).await;
            }
            let _ = write.close().await;
            return;
        }
    };

    // Ends when the event loop drops this client's sender.
    tokio::spawn(async move {
        while let Some(text) = out_rx.recv().await {
            if let Err(e) = write.send(Message::Text(text)).await {
                debug!("Write to {} failed: {}", addr, e);
                break;
            }
        }
        let _ = write.close().await;
    });

    while let Some(frame) = read.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if events
                    .send(ServerEvent::MessageReceived { client_id, text })
                    .is_err()
                {
                    break;
                }
            }
            Ok(Message::Binary(_)) => {
                warn!("Ignoring binary frame from client {}", client_id);
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("Read from client {} failed: {}", client_id, e);
                break;
            }
        }
    }

    let _ = events.send(ServerEvent::ClientDisconnected { client_id });
}
