//! Scripted client for poking at a running server by hand.
//!
//! Connects, starts a game with the sample rosters, plays one legal move and
//! one out-of-turn move, and prints everything the server sends back.

use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use log::{info, warn};
use shared::{
    ClientMessage, MoveRequest, Player, ServerMessage, UnitRef, SAMPLE_ROSTER_A, SAMPLE_ROSTER_B,
};
use std::time::Duration;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket URL of the server
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8080")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Connecting to {}", args.server);

    let (ws_stream, _) = connect_async(args.server.as_str()).await?;
    let (mut write, mut read) = ws_stream.split();

    let script = [
        ClientMessage::initialize(&SAMPLE_ROSTER_A, &SAMPLE_ROSTER_B),
        ClientMessage::MakeMove(MoveRequest::new(
            Player::A,
            UnitRef::At { row: 0, col: 0 },
            "Backward",
        )),
        // Still B's turn, so this one is rejected.
        ClientMessage::MakeMove(MoveRequest::new(
            Player::A,
            UnitRef::At { row: 1, col: 0 },
            "Backward",
        )),
    ];

    for message in &script {
        let text = message.to_json()?;
        println!(">> {}", text);
        write.send(Message::Text(text)).await?;
    }

    // Print replies until the server goes quiet.
    loop {
        match timeout(Duration::from_secs(1), read.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => match ServerMessage::from_json(&text) {
                Ok(ServerMessage::GameStateUpdate {
                    board,
                    current_turn,
                    status,
                }) => println!(
                    "<< state: {} units, {} to move, {:?}",
                    board.len(),
                    current_turn,
                    status
                ),
                Ok(other) => println!("<< {:?}", other),
                Err(e) => warn!("Unreadable message {}: {}", text, e),
            },
            Ok(Some(Ok(Message::Close(_)))) | Ok(None) => {
                info!("Server closed the connection");
                break;
            }
            Ok(Some(Ok(_))) => {}
            Ok(Some(Err(e))) => return Err(e.into()),
            Err(_) => break,
        }
    }

    let _ = write.close().await;
    Ok(())
}
