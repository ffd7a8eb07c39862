//! PING/PONG keepalive and QUIT.

use mio::Token;

use crate::connection::Connection;
use crate::constants::SERVER_NAME;
use crate::message::ParsedMessage;
use crate::server::Server;

/// The server never initiates a ping — there are no timers; it only
/// answers one, echoing the client's token back in a PONG.
pub fn handle_ping(server: &mut Server, token: Token, msg: &ParsedMessage) {
    let payload = msg.get(0).unwrap_or(SERVER_NAME);
    let line = format!(":{SERVER_NAME} PONG {SERVER_NAME} :{payload}");
    server.send_to_token(token, &line);
}

/// A client PONG answers a ping this server never sends; nothing to do.
pub fn handle_pong(_server: &mut Server, _token: Token, _msg: &ParsedMessage) {}

/// Tears the connection down, broadcasting `QUIT :<reason>` to every
/// channel it was a member of. Returns the removed `Connection` so the
/// multiplexer can deregister its socket.
pub fn handle_quit(server: &mut Server, token: Token, msg: &ParsedMessage) -> Option<Connection> {
    let reason = msg.get(0).unwrap_or("Client Quit");
    server.teardown(token, reason)
}
