//! PASS / NICK / USER / CAP — the registration handshake.

use mio::Token;

use crate::handlers::display_nick;
use crate::message::ParsedMessage;
use crate::registration::parse_user_params;
use crate::replies::{IrcReply, cap_ls_reply};
use crate::server::Server;
use crate::user::{is_valid_nickname, is_valid_realname, is_valid_username};

pub fn handle_pass(server: &mut Server, token: Token, msg: &ParsedMessage) {
    let nick = display_nick(server, token);
    let already_authenticated = server
        .connections
        .get(&token)
        .is_some_and(|c| c.user.authenticated);
    if already_authenticated {
        server.send_to_token(token, &IrcReply::ErrAlreadyRegistered { nick: &nick }.format());
        return;
    }
    let Some(password) = msg.get(0) else {
        server.send_to_token(
            token,
            &IrcReply::ErrNeedMoreParams {
                nick: &nick,
                command: "PASS",
            }
            .format(),
        );
        return;
    };
    if password == server.password {
        if let Some(conn) = server.connections.get_mut(&token) {
            conn.user.authenticated = true;
        }
    } else {
        server.send_to_token(token, &IrcReply::ErrPasswdMismatch { nick: &nick }.format());
    }
}

pub fn handle_nick(server: &mut Server, token: Token, msg: &ParsedMessage) {
    let nick_display = display_nick(server, token);
    let registered = server
        .connections
        .get(&token)
        .is_some_and(|c| c.user.registered);
    if registered {
        server.send_to_token(
            token,
            &IrcReply::ErrAlreadyRegistered { nick: &nick_display }.format(),
        );
        return;
    }
    let Some(candidate) = msg.get(0).filter(|n| !n.is_empty()) else {
        server.send_to_token(
            token,
            &IrcReply::ErrNoNicknameGiven { nick: &nick_display }.format(),
        );
        return;
    };
    if !is_valid_nickname(candidate) {
        server.send_to_token(
            token,
            &IrcReply::ErrErroneusNickname {
                nick: &nick_display,
                attempted: candidate,
            }
            .format(),
        );
        return;
    }
    if server.nick_taken(candidate) {
        server.send_to_token(
            token,
            &IrcReply::ErrNicknameInUse {
                nick: &nick_display,
                attempted: candidate,
            }
            .format(),
        );
        return;
    }
    server.set_nick(token, candidate);
    let burst = {
        let Some(conn) = server.connections.get_mut(&token) else {
            return;
        };
        conn.user.nickname = candidate.to_string();
        conn.user.check_registration()
    };
    if let Some(lines) = burst {
        for line in lines {
            server.send_to_token(token, &line);
        }
    }
}

pub fn handle_user(server: &mut Server, token: Token, msg: &ParsedMessage) {
    let nick = display_nick(server, token);
    let registered = server
        .connections
        .get(&token)
        .is_some_and(|c| c.user.registered);
    if registered {
        server.send_to_token(token, &IrcReply::ErrAlreadyRegistered { nick: &nick }.format());
        return;
    }
    if msg.params.len() < 4 {
        server.send_to_token(
            token,
            &IrcReply::ErrNeedMoreParams {
                nick: &nick,
                command: "USER",
            }
            .format(),
        );
        return;
    }
    let username = msg.params[0].as_str();
    let realname = msg.params[3].as_str();
    if parse_user_params(username, &msg.params[1], realname).is_none()
        || !is_valid_username(username)
        || !is_valid_realname(realname)
    {
        server.send_to_token(token, &IrcReply::ErrInvalidUsername { nick: &nick }.format());
        return;
    }
    let burst = {
        let Some(conn) = server.connections.get_mut(&token) else {
            return;
        };
        conn.user.username = username.to_string();
        conn.user.realname = realname.to_string();
        conn.user.check_registration()
    };
    if let Some(lines) = burst {
        for line in lines {
            server.send_to_token(token, &line);
        }
    }
}

/// `CAP LS`/`CAP LIST` gets an empty capability list back so modern clients
/// that probe for capabilities before registering don't stall waiting for a
/// reply this server will never send otherwise. `CAP REQ`/`CAP END` and
/// anything else are silently ignored: no capability was ever on offer to
/// request or end negotiation over.
pub fn handle_cap(server: &mut Server, token: Token, msg: &ParsedMessage) {
    let nick = display_nick(server, token);
    if matches!(
        msg.get(0).map(str::to_ascii_uppercase).as_deref(),
        Some("LS") | Some("LIST") | None
    ) {
        server.send_to_token(token, &cap_ls_reply(&nick));
    }
}
