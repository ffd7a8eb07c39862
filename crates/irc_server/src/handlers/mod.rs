//! One handler module per command family: `registration` (PASS/NICK/USER/
//! CAP), `channels` (JOIN/PART/KICK/INVITE/TOPIC/MODE), `messages`
//! (PRIVMSG/NOTICE), and `misc` (PING/PONG/QUIT).

pub mod channels;
pub mod messages;
pub mod misc;
pub mod registration;

use mio::Token;

use crate::server::Server;

/// Nickname to use as the numeric-reply target: the assigned nickname once
/// one exists, `*` before registration.
pub(crate) fn display_nick(server: &Server, token: Token) -> String {
    server
        .connections
        .get(&token)
        .map(|c| c.user.display_nick().to_string())
        .unwrap_or_else(|| "*".to_string())
}

pub(crate) fn source_prefix(server: &Server, token: Token) -> String {
    server
        .connections
        .get(&token)
        .map(|c| c.user.prefix())
        .unwrap_or_default()
}
