//! The top-level event loop: one `mio::Poll` instance driving every accepted
//! connection from a single thread via level-triggered readiness
//! notification. The listen socket and every client socket are non-blocking;
//! there are no background threads, no async tasks, no timers — exactly one
//! suspension point, the poll wait at the top of the loop.
//!
//! `bind` and `serve` are split so tests can bind an ephemeral port (`0`)
//! and discover the assigned address before handing the listener to the
//! loop — `run` is the production entry point used by `bin/ircserv.rs`.

use std::io::{self, ErrorKind, Read};
use std::net::SocketAddr;

use log::{error, info, warn};
use mio::net::TcpListener;
use mio::{Events, Interest, Poll, Token};

use crate::connection::Connection;
use crate::dispatcher::dispatch;
use crate::errors::ServerError;
use crate::message::parse_message;
use crate::server::Server;

const LISTENER: Token = Token(0);

/// Per-`read()` transient buffer size. Larger inbound lines still arrive
/// whole — the framer just needs several reads to assemble them.
const READ_CHUNK: usize = 512;

/// Binds the listen socket on `0.0.0.0` with the OS's maximal backlog.
/// `mio::net::TcpListener::bind` already sets the socket non-blocking.
/// Returns the bound address (useful when `port` is `0` and the OS assigns
/// one) alongside the listener.
pub fn bind(port: u16) -> Result<(TcpListener, SocketAddr), ServerError> {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let listener = TcpListener::bind(addr).map_err(|e| ServerError::Bind(addr, e))?;
    let local_addr = listener.local_addr().map_err(|e| ServerError::Bind(addr, e))?;
    Ok((listener, local_addr))
}

/// Binds and runs forever — the production entry point for `ircserv <port>
/// <password>`. Runs until killed.
pub fn run(port: u16, password: String) -> Result<(), ServerError> {
    let (listener, addr) = bind(port)?;
    info!("listening on {addr}");
    serve(listener, password)
}

/// Drives `listener` forever: one blocking `poll.poll(&mut events, None)`
/// per iteration — the one suspension point in the whole loop — then
/// synchronous handling of each ready event in the order `mio::Events`
/// yields them, preserving per-peer message ordering.
pub fn serve(mut listener: TcpListener, password: String) -> Result<(), ServerError> {
    let mut poll = Poll::new().map_err(ServerError::Poll)?;
    poll.registry()
        .register(&mut listener, LISTENER, Interest::READABLE)
        .map_err(ServerError::Poll)?;

    let mut server = Server::new(password);
    let mut events = Events::with_capacity(1024);
    let mut next_token = 1usize;

    loop {
        if let Err(e) = poll.poll(&mut events, None) {
            if e.kind() == ErrorKind::Interrupted {
                continue;
            }
            return Err(ServerError::Poll(e));
        }

        for event in events.iter() {
            if event.token() == LISTENER {
                accept_all(&listener, poll.registry(), &mut server, &mut next_token);
                continue;
            }

            let token = event.token();
            if event.is_readable() {
                handle_readable(&mut server, poll.registry(), token);
            }
            if !server.connections.contains_key(&token) {
                // Torn down while handling readability above (peer closed,
                // QUIT, or a fatal read error) — nothing left to flush.
                continue;
            }
            if event.is_writable() {
                flush_outbound(&mut server, poll.registry(), token);
            }
        }

        // A handler invoked above can queue output onto connections other
        // than the one whose readiness fired this iteration — a channel
        // broadcast, a PRIVMSG/NOTICE to another nick, an INVITE delivery —
        // via `Server::send_to_nick`/`broadcast_channel`. Those connections
        // only carry READABLE interest until something registers WRITABLE
        // for them, so sweep every connection with pending output once per
        // iteration rather than only the token that was actually polled.
        flush_pending_connections(&mut server, poll.registry());
    }
}

/// Attempts an immediate best-effort write for every connection with
/// queued output, then registers/deregisters writable interest for
/// whatever remains — covers fan-out targets that never had their own
/// readiness event this iteration.
fn flush_pending_connections(server: &mut Server, registry: &mio::Registry) {
    let pending: Vec<Token> = server
        .connections
        .iter()
        .filter(|(_, conn)| conn.has_pending_output())
        .map(|(&token, _)| token)
        .collect();
    for token in pending {
        let Some(conn) = server.connections.get_mut(&token) else {
            continue;
        };
        if let Err(e) = conn.flush() {
            warn!("write error on {token:?}: {e}");
            teardown(server, registry, token, "Write error");
            continue;
        }
        toggle_write_interest(server, registry, token);
    }
}

/// Drains every pending connection off the listen socket (level-triggered
/// readiness can report more than one backlog entry per wakeup). Each
/// accepted socket is set non-blocking by `mio` itself, given an empty
/// framer and a placeholder unauthenticated `User`, and registered for
/// readability.
fn accept_all(listener: &TcpListener, registry: &mio::Registry, server: &mut Server, next_token: &mut usize) {
    loop {
        match listener.accept() {
            Ok((mut stream, peer)) => {
                if server.at_user_capacity() {
                    warn!("refusing connection from {peer}: at user capacity");
                    drop(stream);
                    continue;
                }
                let token = Token(*next_token);
                *next_token += 1;
                if let Err(e) = registry.register(&mut stream, token, Interest::READABLE) {
                    error!("failed to register accepted connection from {peer}: {e}");
                    continue;
                }
                info!("accepted connection {token:?} from {peer}");
                server.connections.insert(token, Connection::new(stream));
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => break,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                error!("accept() failed: {e}");
                break;
            }
        }
    }
}

/// Reads whatever is available from one client socket, feeds it to that
/// connection's framer, and dispatches every complete message it yields
/// A zero-length read or a fatal error tears the connection down; a
/// `WouldBlock` simply means no data is available yet — not an error,
/// nothing to do until the next wakeup.
fn handle_readable(server: &mut Server, registry: &mio::Registry, token: Token) {
    let mut buf = [0u8; READ_CHUNK];
    loop {
        let Some(conn) = server.connections.get_mut(&token) else {
            return;
        };
        match conn.stream.read(&mut buf) {
            Ok(0) => {
                teardown(server, registry, token, "Connection closed");
                return;
            }
            Ok(n) => {
                conn.framer.feed(&buf[..n]);
                let messages = conn.framer.drain_messages();
                for raw in messages {
                    let Ok(line) = std::str::from_utf8(&raw) else {
                        server.send_to_token(token, "Error: Invalid command.");
                        continue;
                    };
                    match parse_message(line) {
                        Some(msg) => {
                            if let Some(mut closed) = dispatch(server, token, msg) {
                                deregister(registry, &mut closed);
                            }
                            if !server.connections.contains_key(&token) {
                                return;
                            }
                        }
                        None => {
                            server.send_to_token(token, "Error: Invalid command.");
                        }
                    }
                }
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => return,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("read error on {token:?}: {e}");
                teardown(server, registry, token, "Read error");
                return;
            }
        }
        toggle_write_interest(server, registry, token);
    }
}

/// Flushes a connection's queued outbound bytes when the socket signals
/// writable — the buffered variant for a slow peer: bytes queue up and
/// drain only once POLLOUT fires, so a slow peer never stalls the others.
fn flush_outbound(server: &mut Server, registry: &mio::Registry, token: Token) {
    let Some(conn) = server.connections.get_mut(&token) else {
        return;
    };
    if let Err(e) = conn.flush() {
        warn!("write error on {token:?}: {e}");
        teardown(server, registry, token, "Write error");
        return;
    }
    toggle_write_interest(server, registry, token);
}

/// Registers/deregisters writable interest as a connection's outbound queue
/// fills and drains, so idle peers aren't woken for writability they don't
/// need.
fn toggle_write_interest(server: &mut Server, registry: &mio::Registry, token: Token) {
    let Some(conn) = server.connections.get_mut(&token) else {
        return;
    };
    let wants_write = conn.has_pending_output();
    if wants_write == conn.write_interest {
        return;
    }
    let interest = if wants_write {
        Interest::READABLE | Interest::WRITABLE
    } else {
        Interest::READABLE
    };
    if registry.reregister(&mut conn.stream, token, interest).is_ok() {
        conn.write_interest = wants_write;
    }
}

/// Tears a connection down and deregisters its socket from the poller.
fn teardown(server: &mut Server, registry: &mio::Registry, token: Token, reason: &str) {
    if let Some(mut conn) = server.teardown(token, reason) {
        deregister(registry, &mut conn);
    }
}

fn deregister(registry: &mio::Registry, conn: &mut Connection) {
    if let Err(e) = registry.deregister(&mut conn.stream) {
        warn!("failed to deregister socket: {e}");
    }
}
