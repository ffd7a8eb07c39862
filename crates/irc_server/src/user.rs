//! The per-connection identity record: nickname, username, realname, and
//! the authenticated/registered flags. One `Connection` owns exactly one
//! `User` outright (see `multiplexer.rs`) — the multiplexer is
//! single-threaded, so plain owned fields are enough; there is no
//! concurrent writer to guard against.

use chrono::Utc;

use crate::constants::{RPL_CREATED, RPL_MYINFO, RPL_WELCOME, RPL_YOURHOST};
use crate::replies::IrcReply;

#[derive(Debug, Default, Clone)]
pub struct User {
    pub nickname: String,
    pub username: String,
    pub realname: String,
    pub authenticated: bool,
    pub registered: bool,
}

impl User {
    pub fn new() -> Self {
        Self::default()
    }

    /// `nick!user@host` mask used as the source prefix on broadcasts.
    /// Hostname is always `localhost`: this server does no reverse DNS and
    /// has no TLS/remote-peer identity to report.
    pub fn prefix(&self) -> String {
        format!("{}!{}@localhost", self.nickname, self.username)
    }

    /// Displayed target for numerics before a nickname is assigned:
    /// `*` prior to nick assignment.
    pub fn display_nick(&self) -> &str {
        if self.nickname.is_empty() {
            "*"
        } else {
            &self.nickname
        }
    }

    /// Transitions `registered` to true once authenticated with both a
    /// nickname and username set, and returns the welcome burst (numerics
    /// 001-004) to send — `None` if the conditions aren't met yet, or the
    /// user was already registered.
    pub fn check_registration(&mut self) -> Option<Vec<String>> {
        if self.registered {
            return None;
        }
        if !self.authenticated || self.nickname.is_empty() || self.username.is_empty() {
            return None;
        }
        self.registered = true;
        let nick = self.nickname.clone();
        let user = self.username.clone();
        let date = Utc::now().to_rfc2822();
        Some(vec![
            IrcReply::Welcome {
                nick: &nick,
                user: &user,
                host: "localhost",
            }
            .format(),
            IrcReply::YourHost { nick: &nick }.format(),
            IrcReply::Created {
                nick: &nick,
                date: &date,
            }
            .format(),
            IrcReply::MyInfo { nick: &nick }.format(),
        ])
    }
}

/// non-empty, first char not digit nor `-`, length <= 9, each char
/// alphanumeric or from `[]\_^{}-`. The first-char check and the per-char
/// alphabet check are deliberately separate: collapsing them into one
/// condition is a classic off-by-one that silently accepts a leading digit.
pub fn is_valid_nickname(nick: &str) -> bool {
    if nick.is_empty() || nick.len() > 9 {
        return false;
    }
    let mut chars = nick.chars();
    let first = chars.next().unwrap();
    if first.is_ascii_digit() || first == '-' {
        return false;
    }
    if !is_nick_char(first) {
        return false;
    }
    chars.all(is_nick_char)
}

fn is_nick_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "[]\\_^{}-".contains(c)
}

/// non-empty, each char alphanumeric or `_`.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty() && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// non-empty, printable: letters, digits, spaces, `.`, `-`, `_`; reject
/// control bytes. Matches what mainstream clients actually send for a
/// real name, not a stricter alpha-only rule.
pub fn is_valid_realname(realname: &str) -> bool {
    !realname.is_empty()
        && realname
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '.' || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nickname_rules() {
        assert!(is_valid_nickname("alice"));
        assert!(is_valid_nickname("a"));
        assert!(is_valid_nickname("[bot]"));
        assert!(!is_valid_nickname(""));
        assert!(!is_valid_nickname("1abc"));
        assert!(!is_valid_nickname("-abc"));
        assert!(!is_valid_nickname("toolongnickname"));
        assert!(!is_valid_nickname("a b"));
    }

    #[test]
    fn username_rules() {
        assert!(is_valid_username("alice_1"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("a b"));
        assert!(!is_valid_username("a@b"));
    }

    #[test]
    fn realname_rules() {
        assert!(is_valid_realname("Alice A."));
        assert!(is_valid_realname("Ronnie_Reagan-2"));
        assert!(!is_valid_realname(""));
        assert!(!is_valid_realname("bad\u{0007}name"));
    }

    #[test]
    fn registration_requires_auth_nick_and_user() {
        let mut user = User::new();
        assert!(user.check_registration().is_none());
        user.authenticated = true;
        assert!(user.check_registration().is_none());
        user.nickname = "alice".to_string();
        assert!(user.check_registration().is_none());
        user.username = "alice".to_string();
        let burst = user.check_registration().unwrap();
        assert_eq!(burst.len(), 4);
        assert!(user.registered);
        // Re-registering yields nothing further.
        assert!(user.check_registration().is_none());
    }
}
