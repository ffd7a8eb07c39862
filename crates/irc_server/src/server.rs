//! The `Server` object: exclusive owner of every `Connection` and every
//! `Channel`, held in plain `HashMap`s with no `Arc`/`DashMap` — the
//! multiplexer is single-threaded, so there is exactly one mutator at a
//! time and no need for a concurrent map.
//!
//! A `Channel` stores member nicknames only (see `channel.rs`); resolving a
//! nickname to a live `Connection` for fan-out delivery is this module's
//! job, via `nick_tokens`.

use std::collections::HashMap;

use log::{info, warn};
use mio::Token;

use crate::channel::Channel;
use crate::connection::Connection;
use crate::constants::{MAX_CHANNELS, MAX_CHANNELS_PER_USER, MAX_USERS};

pub struct Server {
    pub password: String,
    pub connections: HashMap<Token, Connection>,
    pub channels: HashMap<String, Channel>,
    /// Reverse index from nickname to the owning connection's token,
    /// maintained alongside `connections` so nick-uniqueness checks and
    /// nick-to-connection resolution don't require a linear scan of every
    /// connection per lookup — nicknames are unique across all users at
    /// any instant, so this map has at most one entry per live user.
    nick_tokens: HashMap<String, Token>,
}

impl Server {
    pub fn new(password: String) -> Self {
        Server {
            password,
            connections: HashMap::new(),
            channels: HashMap::new(),
            nick_tokens: HashMap::new(),
        }
    }

    pub fn at_user_capacity(&self) -> bool {
        self.connections.len() >= MAX_USERS
    }

    pub fn at_channel_capacity(&self) -> bool {
        self.channels.len() >= MAX_CHANNELS
    }

    pub fn channels_for(&self, nick: &str) -> usize {
        self.channels
            .values()
            .filter(|c| c.is_member(nick))
            .count()
    }

    pub fn at_per_user_channel_capacity(&self, nick: &str) -> bool {
        self.channels_for(nick) >= MAX_CHANNELS_PER_USER
    }

    pub fn nick_taken(&self, nick: &str) -> bool {
        self.nick_tokens.contains_key(nick)
    }

    /// Records `nick` as belonging to `token`, replacing any prior nickname
    /// that connection held (a nickname change during registration, e.g.
    /// `NICK` sent twice before `USER`).
    pub fn set_nick(&mut self, token: Token, nick: &str) {
        if let Some(conn) = self.connections.get(&token) {
            if !conn.user.nickname.is_empty() {
                self.nick_tokens.remove(&conn.user.nickname);
            }
        }
        self.nick_tokens.insert(nick.to_string(), token);
    }

    pub fn token_for_nick(&self, nick: &str) -> Option<Token> {
        self.nick_tokens.get(nick).copied()
    }

    /// Queues `line` for delivery to `nick`, returning `false` if no such
    /// registered user exists (the caller replies 401 in that case).
    pub fn send_to_nick(&mut self, nick: &str, line: &str) -> bool {
        match self.token_for_nick(nick) {
            Some(token) => {
                if let Some(conn) = self.connections.get_mut(&token) {
                    conn.queue_line(line);
                    return true;
                }
                false
            }
            None => false,
        }
    }

    pub fn send_to_token(&mut self, token: Token, line: &str) {
        if let Some(conn) = self.connections.get_mut(&token) {
            conn.queue_line(line);
        }
    }

    /// Delivers `line` to every member of `channel`, optionally skipping
    /// one nickname (typically the originator of a PRIVMSG/NOTICE).
    /// Members whose connection has since vanished are silently skipped —
    /// this can only happen transiently mid-teardown, never as steady
    /// state.
    pub fn broadcast_channel(&mut self, channel: &str, line: &str, except: Option<&str>) {
        let Some(chan) = self.channels.get(channel) else {
            return;
        };
        let targets: Vec<String> = chan
            .members
            .iter()
            .filter(|nick| Some(nick.as_str()) != except)
            .cloned()
            .collect();
        for nick in targets {
            self.send_to_nick(&nick, line);
        }
    }

    /// Every channel name the nickname currently belongs to.
    pub fn channels_of(&self, nick: &str) -> Vec<String> {
        self.channels
            .values()
            .filter(|c| c.is_member(nick))
            .map(|c| c.name.clone())
            .collect()
    }

    /// Removes an empty channel from the table. Called after any mutation
    /// that can empty a channel's membership.
    pub fn reap_if_empty(&mut self, channel: &str) {
        if self.channels.get(channel).is_some_and(|c| c.members.is_empty()) {
            self.channels.remove(channel);
            info!("channel {channel} reaped: no members left");
        }
    }

    /// Teardown: called on socket close, read error, or QUIT. Broadcasts `QUIT :<reason>` to every channel the connection's
    /// user was a member of, strips the nickname out of every
    /// members/operators/invited set, reaps emptied channels, and removes
    /// the connection from the table. Returns the removed `Connection` so
    /// the multiplexer can deregister its socket from the poller.
    pub fn teardown(&mut self, token: Token, reason: &str) -> Option<Connection> {
        let conn = self.connections.remove(&token)?;
        let nick = conn.user.nickname.clone();
        if !nick.is_empty() {
            self.nick_tokens.remove(&nick);
            let prefix = conn.user.prefix();
            let line = format!(":{prefix} QUIT :{reason}");
            let member_channels: Vec<String> = self
                .channels
                .iter()
                .filter(|(_, c)| c.is_member(&nick))
                .map(|(name, _)| name.clone())
                .collect();
            for chan_name in &member_channels {
                self.broadcast_channel(chan_name, &line, Some(&nick));
                if let Some(chan) = self.channels.get_mut(chan_name) {
                    chan.remove_member(&nick);
                }
                self.reap_if_empty(chan_name);
            }
        }
        info!("connection {token:?} ({nick}) torn down: {reason}");
        Some(conn)
    }

    /// Fetches or creates a channel, rejecting creation once the
    /// server-wide cap is reached.
    pub fn get_or_create_channel(&mut self, name: &str) -> Option<&mut Channel> {
        if !self.channels.contains_key(name) {
            if self.at_channel_capacity() {
                warn!("refusing to create channel {name}: at capacity");
                return None;
            }
            self.channels.insert(name.to_string(), Channel::new(name));
        }
        self.channels.get_mut(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nick_uniqueness_tracked_by_token() {
        let mut server = Server::new("pw".to_string());
        let t1 = Token(1);
        server.set_nick(t1, "alice");
        assert!(server.nick_taken("alice"));
        assert_eq!(server.token_for_nick("alice"), Some(t1));
    }

    #[test]
    fn reap_removes_empty_channel() {
        let mut server = Server::new("pw".to_string());
        server.channels.insert("#dev".to_string(), Channel::new("#dev"));
        server.reap_if_empty("#dev");
        assert!(server.channels.contains_key("#dev"));
        server.channels.get_mut("#dev").unwrap().members.insert("alice".to_string());
        server.channels.get_mut("#dev").unwrap().members.remove("alice");
        server.reap_if_empty("#dev");
        assert!(!server.channels.contains_key("#dev"));
    }
}
