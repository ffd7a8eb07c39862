//! The channel model: membership, operators, invited set, topic, mode
//! flags, and the admission policy that gates joining. One thread drives
//! the whole server, so `Channel` is owned outright by the `Server`'s
//! channel table and mutated through `&mut self` — no interior mutability
//! needed.
//!
//! A `Channel` never holds a `Connection` or `User` reference — only
//! nicknames. Resolving a nickname to a live connection for broadcast
//! delivery is the `Server`'s job (`server.rs`).

use std::collections::HashSet;

/// Admission/reject outcomes for [`Channel::add_member`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinError {
    InviteOnly,
    BadKey,
    Full,
}

pub struct Channel {
    pub name: String,
    pub topic: String,
    pub members: HashSet<String>,
    pub operators: HashSet<String>,
    pub invited: HashSet<String>,
    pub invite_only: bool,
    pub topic_restricted: bool,
    pub key: Option<String>,
    pub limit: Option<usize>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Channel {
            name: name.into(),
            topic: String::new(),
            members: HashSet::new(),
            operators: HashSet::new(),
            invited: HashSet::new(),
            invite_only: false,
            topic_restricted: false,
            key: None,
            limit: None,
        }
    }

    pub fn is_member(&self, nick: &str) -> bool {
        self.members.contains(nick)
    }

    pub fn is_operator(&self, nick: &str) -> bool {
        self.operators.contains(nick)
    }

    /// Admission policy, checked in order: invite-only gate, key gate,
    /// user-limit gate. On success the nickname is inserted into
    /// `members`, consumed from `invited`, and the first member of a
    /// fresh channel is made an operator.
    pub fn add_member(&mut self, nick: &str, key: Option<&str>) -> Result<(), JoinError> {
        if self.invite_only && !self.invited.contains(nick) {
            return Err(JoinError::InviteOnly);
        }
        if let Some(ref required) = self.key {
            if key != Some(required.as_str()) {
                return Err(JoinError::BadKey);
            }
        }
        if let Some(limit) = self.limit {
            if self.members.len() >= limit {
                return Err(JoinError::Full);
            }
        }
        let was_empty = self.members.is_empty();
        self.members.insert(nick.to_string());
        self.invited.remove(nick);
        if was_empty {
            self.operators.insert(nick.to_string());
        }
        Ok(())
    }

    /// Erases `nick` from members/operators/invited. Returns `true` if the
    /// channel is now empty and eligible for reaping.
    pub fn remove_member(&mut self, nick: &str) -> bool {
        self.members.remove(nick);
        self.operators.remove(nick);
        self.invited.remove(nick);
        self.members.is_empty()
    }

    /// No-op on a non-member.
    pub fn add_operator(&mut self, nick: &str) {
        if self.members.contains(nick) {
            self.operators.insert(nick.to_string());
        }
    }

    pub fn remove_operator(&mut self, nick: &str) {
        self.operators.remove(nick);
    }

    /// Ignored (no state change, no broadcast) if `topic_restricted` and
    /// `setter` is not an operator.
    pub fn set_topic(&mut self, setter: &str, text: impl Into<String>) -> bool {
        if self.topic_restricted && !self.is_operator(setter) {
            return false;
        }
        self.topic = text.into();
        true
    }

    /// Operator-only; a non-operator caller is rejected by the handler
    /// before this is called, but the guard is repeated here so the
    /// invariant holds even if a future caller forgets the precondition.
    pub fn invite(&mut self, by_setter: &str, target: &str) -> bool {
        if !self.is_operator(by_setter) {
            return false;
        }
        self.invited.insert(target.to_string());
        true
    }

    /// Applies one `(enable, letter)` toggle from a parsed MODE flag run.
    /// `arg` is the next positional MODE argument, consumed only by
    /// `k`/`l`/`o`. Unknown letters are ignored. Returns whether the flag
    /// actually changed channel state (used by the handler to decide
    /// whether to echo this toggle back in the broadcast).
    pub fn set_mode(&mut self, letter: char, enable: bool, arg: Option<&str>) -> bool {
        match letter {
            'i' => {
                let changed = self.invite_only != enable;
                self.invite_only = enable;
                changed
            }
            't' => {
                let changed = self.topic_restricted != enable;
                self.topic_restricted = enable;
                changed
            }
            'k' => {
                if enable {
                    match arg {
                        Some(key) if !key.is_empty() => {
                            let changed = self.key.as_deref() != Some(key);
                            self.key = Some(key.to_string());
                            changed
                        }
                        _ => false,
                    }
                } else {
                    let changed = self.key.is_some();
                    self.key = None;
                    changed
                }
            }
            'l' => {
                if enable {
                    match arg.and_then(|a| a.parse::<usize>().ok()) {
                        Some(limit) => {
                            let changed = self.limit != Some(limit);
                            self.limit = Some(limit);
                            changed
                        }
                        None => false,
                    }
                } else {
                    let changed = self.limit.is_some();
                    self.limit = None;
                    changed
                }
            }
            'o' => match arg {
                Some(target) if self.members.contains(target) => {
                    if enable {
                        self.operators.insert(target.to_string())
                    } else {
                        self.operators.remove(target)
                    }
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Current channel mode string and its arguments, in the order a
    /// `MODE #chan` (no-arg) query or a 324 reply would list them.
    pub fn mode_string(&self) -> (String, Vec<String>) {
        let mut flags = String::from("+");
        let mut args = Vec::new();
        if self.invite_only {
            flags.push('i');
        }
        if self.topic_restricted {
            flags.push('t');
        }
        if let Some(ref key) = self.key {
            flags.push('k');
            args.push(key.clone());
        }
        if let Some(limit) = self.limit {
            flags.push('l');
            args.push(limit.to_string());
        }
        (flags, args)
    }

    /// Names-reply body: operators prefixed with `@`, members
    /// space-separated, no stable order guaranteed.
    pub fn names(&self) -> String {
        let mut names: Vec<String> = self
            .members
            .iter()
            .map(|nick| {
                if self.operators.contains(nick) {
                    format!("@{nick}")
                } else {
                    nick.clone()
                }
            })
            .collect();
        names.sort();
        names.join(" ")
    }
}

/// `name` begins with `#` or `&`, length <= 50, no space/comma/control
/// bytes.
pub fn is_valid_channel_name(name: &str) -> bool {
    if name.len() > 50 || name.is_empty() {
        return false;
    }
    if !name.starts_with('#') && !name.starts_with('&') {
        return false;
    }
    name.bytes().all(|b| b > 0x20 && b != b',' && b != 0x7f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_joiner_becomes_operator() {
        let mut c = Channel::new("#dev");
        c.add_member("alice", None).unwrap();
        assert!(c.is_operator("alice"));
    }

    #[test]
    fn invite_only_rejects_uninvited() {
        let mut c = Channel::new("#dev");
        c.add_member("alice", None).unwrap();
        c.invite_only = true;
        assert_eq!(c.add_member("bob", None), Err(JoinError::InviteOnly));
        c.invited.insert("bob".to_string());
        assert!(c.add_member("bob", None).is_ok());
        assert!(!c.invited.contains("bob"));
    }

    #[test]
    fn key_gate() {
        let mut c = Channel::new("#dev");
        c.add_member("alice", None).unwrap();
        c.key = Some("letmein".to_string());
        assert_eq!(c.add_member("bob", None), Err(JoinError::BadKey));
        assert_eq!(c.add_member("bob", Some("wrong")), Err(JoinError::BadKey));
        assert!(c.add_member("bob", Some("letmein")).is_ok());
    }

    #[test]
    fn user_limit_gate() {
        let mut c = Channel::new("#dev");
        c.add_member("alice", None).unwrap();
        c.limit = Some(1);
        assert_eq!(c.add_member("bob", None), Err(JoinError::Full));
    }

    #[test]
    fn removing_last_member_signals_empty() {
        let mut c = Channel::new("#dev");
        c.add_member("alice", None).unwrap();
        assert!(c.remove_member("alice"));
        assert!(c.members.is_empty());
    }

    #[test]
    fn operators_are_subset_of_members() {
        let mut c = Channel::new("#dev");
        c.add_operator("nobody");
        assert!(c.operators.is_empty());
        c.add_member("alice", None).unwrap();
        c.add_operator("alice");
        assert!(c.operators.is_subset(&c.members));
    }

    #[test]
    fn topic_restricted_blocks_non_operator() {
        let mut c = Channel::new("#dev");
        c.add_member("alice", None).unwrap();
        c.add_member("bob", None).unwrap();
        c.topic_restricted = true;
        assert!(!c.set_topic("bob", "new topic"));
        assert_eq!(c.topic, "");
        assert!(c.set_topic("alice", "new topic"));
        assert_eq!(c.topic, "new topic");
    }

    #[test]
    fn mode_round_trip_returns_to_initial_value() {
        let mut c = Channel::new("#dev");
        let initial = c.invite_only;
        c.set_mode('i', true, None);
        c.set_mode('i', false, None);
        assert_eq!(c.invite_only, initial);
    }

    #[test]
    fn names_prefixes_operators() {
        let mut c = Channel::new("#dev");
        c.add_member("alice", None).unwrap();
        c.add_member("bob", None).unwrap();
        assert_eq!(c.names(), "@alice bob");
    }

    #[test]
    fn channel_name_validation() {
        assert!(is_valid_channel_name("#dev"));
        assert!(is_valid_channel_name("&local"));
        assert!(!is_valid_channel_name("dev"));
        assert!(!is_valid_channel_name("#has space"));
        assert!(!is_valid_channel_name("#has,comma"));
        assert!(!is_valid_channel_name(&format!("#{}", "a".repeat(60))));
    }
}
