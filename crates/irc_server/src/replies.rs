//! Numeric and textual server replies: an `IrcReply` enum with one variant
//! per numeric, each rendered by `format()`.
//!
//! Every numeric reply has the wire form `:<server> <code> <target> <text>`
//! (`target` is `*` before a nickname is assigned).

use crate::constants::*;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum IrcReply<'a> {
    Welcome {
        nick: &'a str,
        user: &'a str,
        host: &'a str,
    },
    YourHost {
        nick: &'a str,
    },
    Created {
        nick: &'a str,
        date: &'a str,
    },
    MyInfo {
        nick: &'a str,
    },

    NoTopic {
        nick: &'a str,
        channel: &'a str,
    },
    Topic {
        nick: &'a str,
        channel: &'a str,
        topic: &'a str,
    },
    Inviting {
        nick: &'a str,
        target: &'a str,
        channel: &'a str,
    },
    NamReply {
        nick: &'a str,
        channel: &'a str,
        names: String,
    },
    EndOfNames {
        nick: &'a str,
        channel: &'a str,
    },

    ErrNoSuchNick {
        nick: &'a str,
        target: &'a str,
    },
    ErrNoSuchChannel {
        nick: &'a str,
        channel: &'a str,
    },
    ErrCannotSendToChan {
        nick: &'a str,
        channel: &'a str,
    },
    ErrUnknownCommand {
        nick: &'a str,
        command: &'a str,
    },
    ErrNoNicknameGiven {
        nick: &'a str,
    },
    ErrErroneusNickname {
        nick: &'a str,
        attempted: &'a str,
    },
    ErrNicknameInUse {
        nick: &'a str,
        attempted: &'a str,
    },
    ErrNotOnChannel {
        nick: &'a str,
        channel: &'a str,
    },
    ErrUserOnChannel {
        nick: &'a str,
        target: &'a str,
        channel: &'a str,
    },
    ErrNotRegistered {
        nick: &'a str,
    },
    ErrNeedMoreParams {
        nick: &'a str,
        command: &'a str,
    },
    ErrAlreadyRegistered {
        nick: &'a str,
    },
    ErrPasswdMismatch {
        nick: &'a str,
    },
    ErrInvalidUsername {
        nick: &'a str,
    },
    ErrChannelIsFull {
        nick: &'a str,
        channel: &'a str,
    },
    ErrInviteOnlyChan {
        nick: &'a str,
        channel: &'a str,
    },
    ErrBadChannelKey {
        nick: &'a str,
        channel: &'a str,
    },
    ErrBadChanMask {
        nick: &'a str,
        channel: &'a str,
    },
    ErrChanOPrivsNeeded {
        nick: &'a str,
        channel: &'a str,
    },
}

impl<'a> IrcReply<'a> {
    pub fn format(&self) -> String {
        match self {
            IrcReply::Welcome { nick, user, host } => format!(
                ":{SERVER_NAME} {RPL_WELCOME:03} {nick} :Welcome to the Internet Relay Network {nick}!{user}@{host}"
            ),
            IrcReply::YourHost { nick } => format!(
                ":{SERVER_NAME} {RPL_YOURHOST:03} {nick} :Your host is {SERVER_NAME}, running version {SERVER_VERSION}"
            ),
            IrcReply::Created { nick, date } => {
                format!(":{SERVER_NAME} {RPL_CREATED:03} {nick} :This server was created {date}")
            }
            IrcReply::MyInfo { nick } => format!(
                ":{SERVER_NAME} {RPL_MYINFO:03} {nick} {SERVER_NAME} {SERVER_VERSION} {USER_MODES} {CHANNEL_MODES}"
            ),

            IrcReply::NoTopic { nick, channel } => {
                format!(":{SERVER_NAME} {RPL_NOTOPIC:03} {nick} {channel} :No topic is set")
            }
            IrcReply::Topic {
                nick,
                channel,
                topic,
            } => format!(":{SERVER_NAME} {RPL_TOPIC:03} {nick} {channel} :{topic}"),
            IrcReply::Inviting {
                nick,
                target,
                channel,
            } => format!(":{SERVER_NAME} {RPL_INVITING:03} {nick} {target} {channel}"),
            IrcReply::NamReply {
                nick,
                channel,
                names,
            } => format!(":{SERVER_NAME} {RPL_NAMREPLY:03} {nick} = {channel} :{names}"),
            IrcReply::EndOfNames { nick, channel } => format!(
                ":{SERVER_NAME} {RPL_ENDOFNAMES:03} {nick} {channel} :End of /NAMES list"
            ),

            IrcReply::ErrNoSuchNick { nick, target } => {
                format!(":{SERVER_NAME} {ERR_NOSUCHNICK:03} {nick} {target} :No such nick/channel")
            }
            IrcReply::ErrNoSuchChannel { nick, channel } => format!(
                ":{SERVER_NAME} {ERR_NOSUCHCHANNEL:03} {nick} {channel} :No such channel"
            ),
            IrcReply::ErrCannotSendToChan { nick, channel } => format!(
                ":{SERVER_NAME} {ERR_CANNOTSENDTOCHAN:03} {nick} {channel} :Cannot send to channel"
            ),
            IrcReply::ErrUnknownCommand { nick, command } => format!(
                ":{SERVER_NAME} {ERR_UNKNOWNCOMMAND_NB:03} {nick} {command} :{ERR_UNKNOWNCOMMAND_STR}"
            ),
            IrcReply::ErrNoNicknameGiven { nick } => format!(
                ":{SERVER_NAME} {ERR_NONICKNAMEGIVEN:03} {nick} :No nickname given"
            ),
            IrcReply::ErrErroneusNickname { nick, attempted } => format!(
                ":{SERVER_NAME} {ERR_ERRONEUSNICKNAME:03} {nick} {attempted} :Erroneous nickname"
            ),
            IrcReply::ErrNicknameInUse { nick, attempted } => format!(
                ":{SERVER_NAME} {ERR_NICKNAMEINUSE:03} {nick} {attempted} :Nickname is already in use"
            ),
            IrcReply::ErrNotOnChannel { nick, channel } => format!(
                ":{SERVER_NAME} {ERR_NOTONCHANNEL:03} {nick} {channel} :You're not on that channel"
            ),
            IrcReply::ErrUserOnChannel {
                nick,
                target,
                channel,
            } => format!(
                ":{SERVER_NAME} {ERR_USERONCHANNEL:03} {nick} {target} {channel} :is already on channel"
            ),
            IrcReply::ErrNotRegistered { nick } => format!(
                ":{SERVER_NAME} {ERR_NOTREGISTERED:03} {nick} :You have not registered"
            ),
            IrcReply::ErrNeedMoreParams { nick, command } => format!(
                ":{SERVER_NAME} {ERR_NEEDMOREPARAMS_NB:03} {nick} {command} :{ERR_NEEDMOREPARAMS_STR}"
            ),
            IrcReply::ErrAlreadyRegistered { nick } => format!(
                ":{SERVER_NAME} {ERR_ALREADYREGISTERED:03} {nick} :You may not reregister"
            ),
            IrcReply::ErrPasswdMismatch { nick } => format!(
                ":{SERVER_NAME} {ERR_PASSWDMISMATCH:03} {nick} :Password incorrect"
            ),
            IrcReply::ErrInvalidUsername { nick } => format!(
                ":{SERVER_NAME} {ERR_INVALIDUSERNAME:03} {nick} :Invalid username/realname"
            ),
            IrcReply::ErrChannelIsFull { nick, channel } => format!(
                ":{SERVER_NAME} {ERR_CHANNELISFULL:03} {nick} {channel} :Cannot join channel (+l)"
            ),
            IrcReply::ErrInviteOnlyChan { nick, channel } => format!(
                ":{SERVER_NAME} {ERR_INVITEONLYCHAN:03} {nick} {channel} :Cannot join channel (+i)"
            ),
            IrcReply::ErrBadChannelKey { nick, channel } => format!(
                ":{SERVER_NAME} {ERR_BADCHANNELKEY:03} {nick} {channel} :Cannot join channel (+k)"
            ),
            IrcReply::ErrBadChanMask { nick, channel } => format!(
                ":{SERVER_NAME} {ERR_BADCHANMASK:03} {nick} {channel} :Bad channel mask"
            ),
            IrcReply::ErrChanOPrivsNeeded { nick, channel } => format!(
                ":{SERVER_NAME} {ERR_CHANOPRIVSNEEDED:03} {nick} {channel} :You're not channel operator"
            ),
        }
    }
}

/// Empty-capability-list reply for `CAP LS`.
pub fn cap_ls_reply(nick: &str) -> String {
    format!(":{SERVER_NAME} CAP {nick} LS :")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_includes_full_prefix() {
        let reply = IrcReply::Welcome {
            nick: "alice",
            user: "alice",
            host: "localhost",
        }
        .format();
        assert!(reply.contains("alice!alice@localhost"));
        assert!(reply.starts_with(":ircserv 001 alice"));
    }

    #[test]
    fn nam_reply_has_equals_sigil() {
        let reply = IrcReply::NamReply {
            nick: "alice",
            channel: "#dev",
            names: "@alice bob".to_string(),
        }
        .format();
        assert_eq!(reply, ":ircserv 353 alice = #dev :@alice bob");
    }

    #[test]
    fn cap_ls_is_empty() {
        assert_eq!(cap_ls_reply("alice"), ":ircserv CAP alice LS :");
    }
}
