//! Integration tests for the stim client.
//!
//! These tests start a real TCP peer on a background thread and talk to
//! it through the public session API to verify end-to-end behavior.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use stimsock::{
    send_once, ClientError, Command, ProtocolErrorKind, RemoteSession, Settings, StreamSession,
};

/// Test peer that answers line commands until the client disconnects.
struct TestPeer {
    port: u16,
    handle: Option<thread::JoinHandle<()>>,
}

impl TestPeer {
    /// Start a peer that handles one connection with the given handler.
    fn start<F>(handler: F) -> Self
    where
        F: FnOnce(TcpStream) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test peer");
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                handler(stream);
            }
        });
        Self {
            port,
            handle: Some(handle),
        }
    }

    /// Start a peer that echoes every line back with a ":ack" suffix,
    /// except "PING" which gets "PONG".
    fn start_echo() -> Self {
        Self::start(|stream| {
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut stream = stream;
            let mut line = String::new();
            loop {
                line.clear();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => return,
                    Ok(_) => {}
                }
                let request = line.trim_end_matches('\n');
                let reply = if request == "PING" {
                    "PONG".to_string()
                } else {
                    format!("{}:ack", request)
                };
                if stream.write_all(format!("{}\n", reply).as_bytes()).is_err() {
                    return;
                }
            }
        })
    }

    fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
    }
}

fn session_settings(port: u16, reply_timeout_seconds: u64) -> Settings {
    let mut settings = Settings::default();
    settings.endpoint.host = "127.0.0.1".to_string();
    settings.endpoint.port = port;
    settings.limits.reply_timeout_seconds = reply_timeout_seconds;
    settings
}

#[test]
fn test_ping_pong() {
    let peer = TestPeer::start_echo();
    let mut session = RemoteSession::connect("127.0.0.1", peer.port).unwrap();
    assert!(session.is_connected());

    let reply = session.send("PING").unwrap();
    assert_eq!(reply, "PONG");

    session.close();
    assert!(!session.is_connected());
    peer.join();
}

#[test]
fn test_sequential_sends_get_matching_replies() {
    let peer = TestPeer::start_echo();
    let mut session = RemoteSession::connect("127.0.0.1", peer.port).unwrap();

    for i in 0..20 {
        let request = format!("cmd-{}", i);
        let reply = session.send(&request).unwrap();
        assert_eq!(reply, format!("cmd-{}:ack", i));
    }

    session.close();
    peer.join();
}

#[test]
fn test_command_builder_send() {
    let peer = TestPeer::start_echo();
    let mut session = RemoteSession::connect("127.0.0.1", peer.port).unwrap();

    let cmd = Command::new("stimulate").arg(3).arg("left");
    let reply = session.send_command(&cmd).unwrap();
    assert_eq!(reply, "stimulate 3 left:ack");

    session.close();
    peer.join();
}

#[test]
fn test_send_after_close_fails_not_initialized() {
    let peer = TestPeer::start_echo();
    let mut session = RemoteSession::connect("127.0.0.1", peer.port).unwrap();
    assert_eq!(session.send("PING").unwrap(), "PONG");

    session.close();
    let result = session.send("PING");
    assert!(matches!(result, Err(ClientError::NotInitialized)));
    peer.join();
}

#[test]
fn test_close_is_idempotent() {
    let peer = TestPeer::start_echo();
    let mut session = RemoteSession::connect("127.0.0.1", peer.port).unwrap();
    session.close();
    session.close();
    session.close();
    assert!(!session.is_connected());
    peer.join();
}

#[test]
fn test_timeout_on_hung_peer_then_close_succeeds() {
    // Peer reads the request but never replies, holding the connection
    // open past the client's 1s reply timeout.
    let peer = TestPeer::start(|stream| {
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        let _ = reader.read_line(&mut line);
        thread::sleep(Duration::from_secs(2));
    });

    let mut session = RemoteSession::connect_with(session_settings(peer.port, 1)).unwrap();

    let start = Instant::now();
    let result = session.send("hang");
    let elapsed = start.elapsed();

    assert!(matches!(result, Err(ClientError::Timeout { millis: 1000 })));
    // Within the configured bound plus scheduling slack.
    assert!(elapsed >= Duration::from_millis(900));
    assert!(elapsed < Duration::from_secs(3));

    // The timed-out connection is poisoned and already torn down.
    assert!(!session.is_connected());
    assert!(matches!(session.send("next"), Err(ClientError::NotInitialized)));
    session.close();
    peer.join();
}

#[test]
fn test_peer_disconnect_poisons_session() {
    let peer = TestPeer::start(|stream| {
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        let _ = reader.read_line(&mut line);
        // Drop without replying.
    });

    let mut session = RemoteSession::connect_with(session_settings(peer.port, 5)).unwrap();
    let result = session.send("anyone there");
    assert!(matches!(
        result,
        Err(ClientError::Protocol {
            kind: ProtocolErrorKind::ConnectionClosed
        })
    ));
    assert!(!session.is_connected());
    peer.join();
}

#[test]
fn test_oversize_send_fails_without_poisoning() {
    let peer = TestPeer::start_echo();
    let mut session = RemoteSession::connect("127.0.0.1", peer.port).unwrap();

    let oversize = "x".repeat(20000);
    let result = session.send(&oversize);
    assert!(matches!(
        result,
        Err(ClientError::Protocol {
            kind: ProtocolErrorKind::MessageTooLarge { .. }
        })
    ));

    // Nothing was written, so the session is still usable.
    assert!(session.is_connected());
    assert_eq!(session.send("PING").unwrap(), "PONG");

    session.close();
    peer.join();
}

#[test]
fn test_oversize_reply_poisons_session() {
    // Peer floods the first request with unterminated bytes, then would
    // answer a second request normally.
    let peer = TestPeer::start(|mut stream| {
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        let _ = reader.read_line(&mut line);
        // The client may close before draining the flood; a write error
        // here is expected, not a test failure.
        let _ = stream.write_all(&vec![b'x'; 20000]);

        line.clear();
        if reader.read_line(&mut line).unwrap_or(0) > 0 {
            let _ = stream.write_all(b"PONG\n");
        }
    });

    let mut session = RemoteSession::connect("127.0.0.1", peer.port).unwrap();
    let result = session.send("PING");
    assert!(matches!(
        result,
        Err(ClientError::Protocol {
            kind: ProtocolErrorKind::ReplyTooLarge { .. }
        })
    ));

    // The request went out and garbage remains in flight: the link must
    // be torn down rather than left wedged on stale decoder state.
    assert!(!session.is_connected());
    assert!(matches!(session.send("PING"), Err(ClientError::NotInitialized)));
    session.close();
    peer.join();
}

#[test]
fn test_one_shot_send() {
    let peer = TestPeer::start_echo();
    let reply = send_once("127.0.0.1", peer.port, "PING").unwrap();
    assert_eq!(reply, "PONG");
    peer.join();
}

#[test]
fn test_one_shot_send_connect_failure() {
    // Bind and drop to get a port nothing listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let result = send_once("127.0.0.1", port, "PING");
    assert!(matches!(result, Err(ClientError::Connect { .. })));
}

#[test]
fn test_stream_session_against_local_peer() {
    let peer = TestPeer::start_echo();
    let mut settings = Settings::default();
    settings.endpoint.host = "127.0.0.1".to_string();
    settings.endpoint.port = peer.port;

    let mut session = StreamSession::connect_with(settings).unwrap();
    assert_eq!(session.send("PING").unwrap(), "PONG");
    session.close();
    session.close();
    assert!(!session.is_connected());
    peer.join();
}

#[test]
fn test_empty_reply_is_distinguishable() {
    // Peer answers with a bare terminator: a successful empty reply.
    let peer = TestPeer::start(|mut stream| {
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        let _ = reader.read_line(&mut line);
        stream.write_all(b"\n").unwrap();
    });

    let mut session = RemoteSession::connect("127.0.0.1", peer.port).unwrap();
    let reply = session.send("query").unwrap();
    assert_eq!(reply, "");
    session.close();
    peer.join();
}
