//! JOIN / PART / KICK / INVITE / TOPIC / MODE, implemented against the
//! `Channel` model in `channel.rs` and `channel_ops.rs`'s MODE-flag
//! grammar.

use mio::Token;

use crate::channel::{JoinError, is_valid_channel_name};
use crate::channel_ops::parse_mode_flags;
use crate::constants::{RPL_CHANNELMODEIS, SERVER_NAME};
use crate::handlers::{display_nick, source_prefix};
use crate::message::ParsedMessage;
use crate::replies::IrcReply;
use crate::server::Server;

pub fn handle_join(server: &mut Server, token: Token, msg: &ParsedMessage) {
    let nick = display_nick(server, token);
    let Some(chan_list) = msg.get(0) else {
        server.send_to_token(
            token,
            &IrcReply::ErrNeedMoreParams {
                nick: &nick,
                command: "JOIN",
            }
            .format(),
        );
        return;
    };
    let channels: Vec<&str> = chan_list.split(',').collect();
    let keys: Vec<&str> = msg.get(1).map(|k| k.split(',').collect()).unwrap_or_default();

    for (idx, chan_name) in channels.into_iter().enumerate() {
        let key = keys.get(idx).copied();
        join_one_channel(server, token, &nick, chan_name, key);
    }
}

fn join_one_channel(server: &mut Server, token: Token, nick: &str, chan_name: &str, key: Option<&str>) {
    if !is_valid_channel_name(chan_name) {
        server.send_to_token(
            token,
            &IrcReply::ErrBadChanMask {
                nick,
                channel: chan_name,
            }
            .format(),
        );
        return;
    }
    if server.channels.get(chan_name).is_some_and(|c| c.is_member(nick)) {
        server.send_to_token(
            token,
            &IrcReply::ErrUserOnChannel {
                nick,
                target: nick,
                channel: chan_name,
            }
            .format(),
        );
        return;
    }
    if server.at_per_user_channel_capacity(nick) {
        server.send_to_token(
            token,
            &IrcReply::ErrChannelIsFull {
                nick,
                channel: chan_name,
            }
            .format(),
        );
        return;
    }
    let Some(chan) = server.get_or_create_channel(chan_name) else {
        server.send_to_token(
            token,
            &IrcReply::ErrChannelIsFull {
                nick,
                channel: chan_name,
            }
            .format(),
        );
        return;
    };
    if let Err(err) = chan.add_member(nick, key) {
        let reply = match err {
            JoinError::InviteOnly => IrcReply::ErrInviteOnlyChan {
                nick,
                channel: chan_name,
            },
            JoinError::BadKey => IrcReply::ErrBadChannelKey {
                nick,
                channel: chan_name,
            },
            JoinError::Full => IrcReply::ErrChannelIsFull {
                nick,
                channel: chan_name,
            },
        };
        server.send_to_token(token, &reply.format());
        server.reap_if_empty(chan_name);
        return;
    }

    let prefix = source_prefix(server, token);
    let join_line = format!(":{prefix} JOIN {chan_name}");
    server.broadcast_channel(chan_name, &join_line, None);

    let chan = server.channels.get(chan_name).unwrap();
    if chan.topic.is_empty() {
        server.send_to_token(token, &IrcReply::NoTopic { nick, channel: chan_name }.format());
    } else {
        let topic = chan.topic.clone();
        server.send_to_token(
            token,
            &IrcReply::Topic {
                nick,
                channel: chan_name,
                topic: &topic,
            }
            .format(),
        );
    }
    let names = server.channels.get(chan_name).unwrap().names();
    server.send_to_token(
        token,
        &IrcReply::NamReply {
            nick,
            channel: chan_name,
            names,
        }
        .format(),
    );
    server.send_to_token(token, &IrcReply::EndOfNames { nick, channel: chan_name }.format());
}

pub fn handle_part(server: &mut Server, token: Token, msg: &ParsedMessage) {
    let nick = display_nick(server, token);
    let Some(chan_list) = msg.get(0) else {
        server.send_to_token(
            token,
            &IrcReply::ErrNeedMoreParams {
                nick: &nick,
                command: "PART",
            }
            .format(),
        );
        return;
    };
    let reason = msg.get(1).unwrap_or("Leaving").to_string();
    for chan_name in chan_list.split(',') {
        part_one_channel(server, token, &nick, chan_name, &reason);
    }
}

fn part_one_channel(server: &mut Server, token: Token, nick: &str, chan_name: &str, reason: &str) {
    let Some(chan) = server.channels.get(chan_name) else {
        server.send_to_token(
            token,
            &IrcReply::ErrNoSuchChannel {
                nick,
                channel: chan_name,
            }
            .format(),
        );
        return;
    };
    if !chan.is_member(nick) {
        server.send_to_token(
            token,
            &IrcReply::ErrNotOnChannel {
                nick,
                channel: chan_name,
            }
            .format(),
        );
        return;
    }
    let prefix = source_prefix(server, token);
    let line = format!(":{prefix} PART {chan_name} :{reason}");
    server.broadcast_channel(chan_name, &line, None);
    if let Some(chan) = server.channels.get_mut(chan_name) {
        chan.remove_member(nick);
    }
    server.reap_if_empty(chan_name);
}

pub fn handle_kick(server: &mut Server, token: Token, msg: &ParsedMessage) {
    let nick = display_nick(server, token);
    let (Some(chan_name), Some(target)) = (msg.get(0), msg.get(1)) else {
        server.send_to_token(
            token,
            &IrcReply::ErrNeedMoreParams {
                nick: &nick,
                command: "KICK",
            }
            .format(),
        );
        return;
    };
    let target = target.to_string();
    let Some(chan) = server.channels.get(chan_name) else {
        server.send_to_token(
            token,
            &IrcReply::ErrNoSuchChannel {
                nick: &nick,
                channel: chan_name,
            }
            .format(),
        );
        return;
    };
    if !chan.is_operator(&nick) {
        server.send_to_token(
            token,
            &IrcReply::ErrChanOPrivsNeeded {
                nick: &nick,
                channel: chan_name,
            }
            .format(),
        );
        return;
    }
    if !chan.is_member(&target) {
        // A kick naming a non-member is a silent no-op rather than
        // inventing an unlisted numeric.
        return;
    }
    let reason = msg.get(2).unwrap_or(&nick).to_string();
    let prefix = source_prefix(server, token);
    let line = format!(":{prefix} KICK {chan_name} {target} :{reason}");
    server.broadcast_channel(chan_name, &line, None);
    if let Some(chan) = server.channels.get_mut(chan_name) {
        chan.remove_member(&target);
    }
    server.reap_if_empty(chan_name);
}

pub fn handle_invite(server: &mut Server, token: Token, msg: &ParsedMessage) {
    let nick = display_nick(server, token);
    let (Some(target), Some(chan_name)) = (msg.get(0), msg.get(1)) else {
        server.send_to_token(
            token,
            &IrcReply::ErrNeedMoreParams {
                nick: &nick,
                command: "INVITE",
            }
            .format(),
        );
        return;
    };
    let target = target.to_string();
    let Some(chan) = server.channels.get(chan_name) else {
        server.send_to_token(
            token,
            &IrcReply::ErrNoSuchChannel {
                nick: &nick,
                channel: chan_name,
            }
            .format(),
        );
        return;
    };
    if !chan.is_operator(&nick) {
        server.send_to_token(
            token,
            &IrcReply::ErrChanOPrivsNeeded {
                nick: &nick,
                channel: chan_name,
            }
            .format(),
        );
        return;
    }
    if !server.nick_taken(&target) {
        server.send_to_token(
            token,
            &IrcReply::ErrNoSuchNick {
                nick: &nick,
                target: &target,
            }
            .format(),
        );
        return;
    }
    server.channels.get_mut(chan_name).unwrap().invite(&nick, &target);
    server.send_to_token(
        token,
        &IrcReply::Inviting {
            nick: &nick,
            target: &target,
            channel: chan_name,
        }
        .format(),
    );
    let prefix = source_prefix(server, token);
    let invite_line = format!(":{prefix} INVITE {target} {chan_name}");
    server.send_to_nick(&target, &invite_line);
}

pub fn handle_topic(server: &mut Server, token: Token, msg: &ParsedMessage) {
    let nick = display_nick(server, token);
    let Some(chan_name) = msg.get(0) else {
        server.send_to_token(
            token,
            &IrcReply::ErrNeedMoreParams {
                nick: &nick,
                command: "TOPIC",
            }
            .format(),
        );
        return;
    };
    if server.channels.get(chan_name).is_none() {
        server.send_to_token(
            token,
            &IrcReply::ErrNoSuchChannel {
                nick: &nick,
                channel: chan_name,
            }
            .format(),
        );
        return;
    }

    match msg.get(1) {
        None => {
            let chan = server.channels.get(chan_name).unwrap();
            if chan.topic.is_empty() {
                server.send_to_token(token, &IrcReply::NoTopic { nick: &nick, channel: chan_name }.format());
            } else {
                let topic = chan.topic.clone();
                server.send_to_token(
                    token,
                    &IrcReply::Topic {
                        nick: &nick,
                        channel: chan_name,
                        topic: &topic,
                    }
                    .format(),
                );
            }
        }
        Some(text) => {
            let changed = server
                .channels
                .get_mut(chan_name)
                .unwrap()
                .set_topic(&nick, text);
            if changed {
                let prefix = source_prefix(server, token);
                let line = format!(":{prefix} TOPIC {chan_name} :{text}");
                server.broadcast_channel(chan_name, &line, None);
            }
        }
    }
}

pub fn handle_mode(server: &mut Server, token: Token, msg: &ParsedMessage) {
    let nick = display_nick(server, token);
    let Some(chan_name) = msg.get(0) else {
        server.send_to_token(
            token,
            &IrcReply::ErrNeedMoreParams {
                nick: &nick,
                command: "MODE",
            }
            .format(),
        );
        return;
    };
    if server.channels.get(chan_name).is_none() {
        server.send_to_token(
            token,
            &IrcReply::ErrNoSuchChannel {
                nick: &nick,
                channel: chan_name,
            }
            .format(),
        );
        return;
    }

    let Some(flags) = msg.get(1) else {
        let (flag_str, args) = server.channels.get(chan_name).unwrap().mode_string();
        let mut text = flag_str;
        for arg in args {
            text.push(' ');
            text.push_str(&arg);
        }
        let line = format!(":{SERVER_NAME} {RPL_CHANNELMODEIS:03} {nick} {chan_name} {text}");
        server.send_to_token(token, &line);
        return;
    };

    if !server.channels.get(chan_name).unwrap().is_operator(&nick) {
        server.send_to_token(
            token,
            &IrcReply::ErrChanOPrivsNeeded {
                nick: &nick,
                channel: chan_name,
            }
            .format(),
        );
        return;
    }

    let Some(toggles) = parse_mode_flags(flags) else {
        server.send_to_token(
            token,
            &IrcReply::ErrNeedMoreParams {
                nick: &nick,
                command: "MODE",
            }
            .format(),
        );
        return;
    };

    let mut positional = msg.params[2..].iter();
    let mut applied: Vec<(bool, char, Option<String>)> = Vec::new();
    for (enable, letter) in toggles {
        let needs_arg = match letter {
            'k' | 'l' => enable,
            'o' => true,
            _ => false,
        };
        let arg = if needs_arg {
            positional.next().map(String::as_str)
        } else {
            None
        };
        let changed = server
            .channels
            .get_mut(chan_name)
            .unwrap()
            .set_mode(letter, enable, arg);
        if changed {
            applied.push((enable, letter, arg.map(str::to_string)));
        }
    }

    if applied.is_empty() {
        return;
    }

    let prefix = source_prefix(server, token);
    let mut flag_text = String::new();
    let mut arg_text = String::new();
    let mut last_sign = None;
    for (enable, letter, arg) in &applied {
        let sign = if *enable { '+' } else { '-' };
        if last_sign != Some(sign) {
            flag_text.push(sign);
            last_sign = Some(sign);
        }
        flag_text.push(*letter);
        if let Some(a) = arg {
            arg_text.push(' ');
            arg_text.push_str(a);
        }
    }
    let line = format!(":{prefix} MODE {chan_name} {flag_text}{arg_text}");
    server.broadcast_channel(chan_name, &line, None);
}
