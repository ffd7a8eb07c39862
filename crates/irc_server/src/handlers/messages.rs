//! PRIVMSG / NOTICE, implemented against
//! `Server::broadcast_channel`/`send_to_nick`.

use mio::Token;

use crate::handlers::{display_nick, source_prefix};
use crate::message::ParsedMessage;
use crate::replies::IrcReply;
use crate::server::Server;

pub fn handle_privmsg(server: &mut Server, token: Token, msg: &ParsedMessage) {
    let nick = display_nick(server, token);
    let (Some(target), Some(text)) = (msg.get(0), msg.get(1)) else {
        server.send_to_token(
            token,
            &IrcReply::ErrNeedMoreParams {
                nick: &nick,
                command: "PRIVMSG",
            }
            .format(),
        );
        return;
    };
    deliver(server, token, &nick, target, text, "PRIVMSG", true);
}

/// NOTICE never elicits a numeric reply, even on error — it is silent
/// on all errors, unlike PRIVMSG.
pub fn handle_notice(server: &mut Server, token: Token, msg: &ParsedMessage) {
    let nick = display_nick(server, token);
    let (Some(target), Some(text)) = (msg.get(0), msg.get(1)) else {
        return;
    };
    deliver(server, token, &nick, target, text, "NOTICE", false);
}

fn deliver(
    server: &mut Server,
    token: Token,
    nick: &str,
    target: &str,
    text: &str,
    verb: &str,
    report_errors: bool,
) {
    let prefix = source_prefix(server, token);
    let line = format!(":{prefix} {verb} {target} :{text}");

    if target.starts_with('#') || target.starts_with('&') {
        let Some(chan) = server.channels.get(target) else {
            if report_errors {
                server.send_to_token(
                    token,
                    &IrcReply::ErrNoSuchChannel { nick, channel: target }.format(),
                );
            }
            return;
        };
        if !chan.is_member(nick) {
            if report_errors {
                server.send_to_token(
                    token,
                    &IrcReply::ErrCannotSendToChan { nick, channel: target }.format(),
                );
            }
            return;
        }
        server.broadcast_channel(target, &line, Some(nick));
        return;
    }

    if !server.send_to_nick(target, &line) && report_errors {
        server.send_to_token(token, &IrcReply::ErrNoSuchNick { nick, target }.format());
    }
}
