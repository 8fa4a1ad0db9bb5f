//! Connected clients and state fan-out.
//!
//! This module tracks every open connection and delivers server messages to
//! them, including:
//! - Connection bookkeeping (id assignment, capacity limit, removal)
//! - Sending to one client, used for replies and rejections
//! - Broadcasting one encoded copy of a message to every client
//!
//! Each client is reached through the sending half of a bounded channel
//! whose receiving half is drained by that connection's writer task. A send
//! never waits on the network, so a slow or dead peer cannot hold up the
//! others. A send into a closed or full channel means the connection is gone
//! or has stopped reading; that client is dropped from the set and delivery
//! to the rest carries on.

use log::{info, warn};
use shared::ServerMessage;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::mpsc;

/// Sending half of a connection's outbound queue of encoded messages.
pub type Outbound = mpsc::Sender<String>;

/// Messages a connection may have queued before it is treated as dead.
pub const OUTBOUND_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("client {client_id} is not connected")]
    Unavailable { client_id: u32 },
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A connected client.
#[derive(Debug)]
pub struct Client {
    /// Unique client identifier assigned by the server
    pub id: u32,
    /// Peer address, for logging
    pub addr: SocketAddr,
    pub connected_at: Instant,
    sender: Outbound,
}

impl Client {
    pub fn new(id: u32, addr: SocketAddr, sender: Outbound) -> Self {
        Self {
            id,
            addr,
            connected_at: Instant::now(),
            sender,
        }
    }

    /// Queues an encoded message for this client's writer task.
    ///
    /// Fails if the writer task is gone or its queue is full.
    pub fn send(&self, text: String) -> Result<(), TransportError> {
        self.sender
            .try_send(text)
            .map_err(|_| TransportError::Unavailable { client_id: self.id })
    }

    /// Returns false once the writer task has dropped its receiver
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// The broadcast set.
pub struct ClientManager {
    /// Connected clients indexed by their unique ID
    clients: HashMap<u32, Client>,
    /// Next available client ID for new connections
    next_client_id: u32,
    /// Maximum number of concurrent clients allowed
    max_clients: usize,
}

impl ClientManager {
    /// Creates an empty manager admitting at most `max_clients` connections
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashMap::new(),
            next_client_id: 1,
            max_clients,
        }
    }

    /// Registers a new connection.
    ///
    /// Returns the assigned client id, or `None` if the server is at capacity.
    pub fn add_client(&mut self, addr: SocketAddr, sender: Outbound) -> Option<u32> {
        if self.clients.len() >= self.max_clients {
            return None;
        }

        let client_id = self.next_client_id;
        self.next_client_id += 1;

        info!("Client {} connected from {}", client_id, addr);
        self.clients
            .insert(client_id, Client::new(client_id, addr, sender));

        Some(client_id)
    }

    /// Returns true if the client was found and removed.
    pub fn remove_client(&mut self, client_id: &u32) -> bool {
        if let Some(client) = self.clients.remove(client_id) {
            info!(
                "Client {} ({}) disconnected after {:.1}s",
                client.id,
                client.addr,
                client.connected_at.elapsed().as_secs_f32()
            );
            true
        } else {
            false
        }
    }

    /// Sends a message to one client.
    ///
    /// A client whose connection has closed is removed and reported as
    /// [`TransportError::Unavailable`].
    pub fn send_to(&mut self, client_id: u32, message: &ServerMessage) -> Result<(), TransportError> {
        let text = message.to_json()?;
        let client = self
            .clients
            .get(&client_id)
            .ok_or(TransportError::Unavailable { client_id })?;

        if let Err(e) = client.send(text) {
            warn!("Dropping client {}: {}", client_id, e);
            self.remove_client(&client_id);
            return Err(e);
        }
        Ok(())
    }

    /// Sends the same message to every connected client.
    ///
    /// Clients that can no longer be reached are removed; their ids are
    /// returned. Delivery to the remaining clients is unaffected.
    pub fn broadcast(&mut self, message: &ServerMessage) -> Result<Vec<u32>, TransportError> {
        let text = message.to_json()?;

        let mut dropped = Vec::new();
        for client in self.clients.values() {
            if client.send(text.clone()).is_err() {
                dropped.push(client.id);
            }
        }
        dropped.sort_unstable();

        for client_id in &dropped {
            warn!("Dropping client {}: connection closed", client_id);
            self.remove_client(client_id);
        }

        Ok(dropped)
    }

    /// Removes clients whose writer task has already gone away.
    ///
    /// Returns the removed ids.
    pub fn prune_closed(&mut self) -> Vec<u32> {
        let closed: Vec<u32> = self
            .clients
            .values()
            .filter(|client| !client.is_open())
            .map(|client| client.id)
            .collect();

        for client_id in &closed {
            self.remove_client(client_id);
        }
        closed
    }

    /// Checks if a client with the given id is connected
    pub fn contains(&self, client_id: u32) -> bool {
        self.clients.contains_key(&client_id)
    }

    /// Connected client ids in ascending order.
    pub fn client_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.clients.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the number of currently connected clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns true if no clients are connected
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
