//! Routes a parsed request to its handler and enforces the two
//! meta-preconditions that gate every command: authentication for
//! everything but PASS/CAP/QUIT, and full registration for the
//! channel/messaging commands.

use mio::Token;

use crate::connection::Connection;
use crate::constants::ERR_NOTREGISTERED;
use crate::errors::CommandError;
use crate::handlers::{channels, display_nick, messages, misc, registration};
use crate::message::ParsedMessage;
use crate::replies::IrcReply;
use crate::server::Server;

/// Commands that additionally require full registration, not just an
/// accepted PASS.
const REGISTERED_ONLY: &[&str] = &[
    "JOIN", "PART", "PRIVMSG", "NOTICE", "KICK", "INVITE", "TOPIC", "MODE",
];

/// Dispatches one already-parsed message against `server`'s state for the
/// connection at `token`. Returns the torn-down `Connection` when this
/// dispatch was a QUIT, so the multiplexer can deregister its socket.
pub fn dispatch(server: &mut Server, token: Token, msg: ParsedMessage) -> Option<Connection> {
    if !msg.is_known() {
        let nick = display_nick(server, token);
        server.send_to_token(
            token,
            &IrcReply::ErrUnknownCommand {
                nick: &nick,
                command: &msg.command,
            }
            .format(),
        );
        return None;
    }

    let (authenticated, registered) = match server.connections.get(&token) {
        Some(conn) => (conn.user.authenticated, conn.user.registered),
        None => return None,
    };
    let command = msg.command.as_str();

    if !matches!(command, "PASS" | "CAP" | "QUIT") && !authenticated {
        reject(server, token, not_registered());
        return None;
    }
    if REGISTERED_ONLY.contains(&command) && !registered {
        reject(server, token, not_registered());
        return None;
    }

    match command {
        "PASS" => {
            registration::handle_pass(server, token, &msg);
            None
        }
        "NICK" => {
            registration::handle_nick(server, token, &msg);
            None
        }
        "USER" => {
            registration::handle_user(server, token, &msg);
            None
        }
        "CAP" => {
            registration::handle_cap(server, token, &msg);
            None
        }
        "PING" => {
            misc::handle_ping(server, token, &msg);
            None
        }
        "PONG" => {
            misc::handle_pong(server, token, &msg);
            None
        }
        "QUIT" => misc::handle_quit(server, token, &msg),
        "JOIN" => {
            channels::handle_join(server, token, &msg);
            None
        }
        "PART" => {
            channels::handle_part(server, token, &msg);
            None
        }
        "PRIVMSG" => {
            messages::handle_privmsg(server, token, &msg);
            None
        }
        "NOTICE" => {
            messages::handle_notice(server, token, &msg);
            None
        }
        "KICK" => {
            channels::handle_kick(server, token, &msg);
            None
        }
        "INVITE" => {
            channels::handle_invite(server, token, &msg);
            None
        }
        "TOPIC" => {
            channels::handle_topic(server, token, &msg);
            None
        }
        "MODE" => {
            channels::handle_mode(server, token, &msg);
            None
        }
        _ => unreachable!("ParsedMessage::is_known() guarantees one of the arms above"),
    }
}

fn not_registered() -> CommandError {
    CommandError::policy(ERR_NOTREGISTERED, "You have not registered")
}

fn reject(server: &mut Server, token: Token, err: CommandError) {
    match err {
        CommandError::ParseError => {
            server.send_to_token(token, "Error: Invalid command.");
        }
        CommandError::Policy(code, text) => {
            let nick = display_nick(server, token);
            server.send_to_token(token, &format!(":{} {code:03} {nick} {text}", crate::constants::SERVER_NAME));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Connection;
    use mio::net::TcpListener;

    /// A `Connection` needs a real (unconnected-but-valid) socket handle
    /// for these unit tests; a loopback listener gives us one without
    /// touching the network. `dispatch` never actually performs I/O on it
    /// — output is queued into `Connection`'s in-memory `outbound` buffer,
    /// inspected here directly rather than round-tripped over TCP (that is
    /// what `tests/scenarios.rs` does, end to end).
    fn stub_connection() -> Connection {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let stream = mio::net::TcpStream::connect(addr).expect("connect to local listener");
        Connection::new(stream)
    }

    #[test]
    fn unregistered_command_before_pass_gets_451() {
        let mut server = Server::new("secret".to_string());
        let token = Token(1);
        server.connections.insert(token, stub_connection());

        let msg = ParsedMessage {
            prefix: None,
            command: "JOIN".to_string(),
            params: vec!["#dev".to_string()],
        };
        dispatch(&mut server, token, msg);

        let conn = server.connections.get(&token).unwrap();
        assert!(conn.has_pending_output());
    }

    #[test]
    fn unknown_command_gets_421() {
        let mut server = Server::new("secret".to_string());
        let token = Token(1);
        server.connections.insert(token, stub_connection());
        server.connections.get_mut(&token).unwrap().user.authenticated = true;

        let msg = ParsedMessage {
            prefix: None,
            command: "FROBNICATE".to_string(),
            params: vec![],
        };
        dispatch(&mut server, token, msg);
        assert!(server.connections.get(&token).unwrap().has_pending_output());
    }
}
