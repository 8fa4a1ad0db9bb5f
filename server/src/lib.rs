//! # Grid Duel Server Library
//!
//! The authoritative server for a two-player, turn-based duel on a 5x5 grid.
//! It owns the only copy of the game, validates every move clients submit and
//! pushes the resulting state to everyone connected.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Rules
//! Clients only ever send requests. Turn order, movement patterns, bounds,
//! friendly blocking, captures and the win condition are all decided here.
//! A rejected request leaves the game exactly as it was and is answered only
//! to the client that sent it.
//!
//! ### Client Management
//! Tracks open WebSocket connections, assigns client ids, enforces the
//! connection limit and drops clients whose connection has gone away.
//!
//! ### State Broadcasting
//! After every accepted setup or move the full board, the player to move and
//! the game status are sent to every connected client.
//!
//! ## Architecture Design
//!
//! ### Single Serialization Point
//! Connection tasks read frames and forward them over a channel to one event
//! loop. That loop owns the [`game::GameSession`] and the
//! [`client_manager::ClientManager`] outright, so requests are applied one at
//! a time without locks and a move is never observed half-applied.
//!
//! ### WebSocket Transport
//! Messages are JSON text frames tagged by a `type` field. Each connection has
//! its own writer task fed by an unbounded queue, so a slow peer never stalls
//! delivery to the others.
//!
//! ## Module Organization
//!
//! - `client_manager`: connection bookkeeping, replies and broadcast
//! - `game`: the session wrapping the current game and its lifecycle
//! - `network`: listener, per-connection tasks and the event loop
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     // Bind to the address and accept at most 16 clients
//!     let mut server = Server::new("127.0.0.1:8080", 16).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod game;
pub mod network;
