//! Simple interactive client for a stim server.
//!
//! Run with: cargo run --example stim_client -- <host> <port>
//!
//! Opens a remote session, sends a few commands, and prints the replies.

use std::env;

use stimsock::{Command, RemoteSession, DEFAULT_STIM_PORT, STIM_INET_ADDRESS};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let host = args.get(1).cloned().unwrap_or_else(|| STIM_INET_ADDRESS.to_string());
    let port: u16 = match args.get(2) {
        Some(p) => p.parse()?,
        None => DEFAULT_STIM_PORT,
    };

    println!("=== Stim Test Client ===");
    println!("Connecting to {}:{}", host, port);

    let mut session = RemoteSession::connect(&host, port)?;

    println!("Test 1: PING");
    let reply = session.send("PING")?;
    println!("Reply: {}\n", reply);

    println!("Test 2: built command");
    let cmd = Command::new("stimulate").arg(3).arg("left");
    let reply = session.send_command(&cmd)?;
    println!("Reply: {}\n", reply);

    println!("Test 3: status query");
    let reply = session.send("status")?;
    println!("Reply: {}\n", reply);

    session.close();
    println!("=== Done ===");
    Ok(())
}
