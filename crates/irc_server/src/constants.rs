//! Numeric reply codes, RFC 1459 / RFC 2812.
//!
//! Only the numerics mainstream clients need to complete registration and
//! channel operations are defined here — a strict subset of RFC 2812's
//! full numeric space.

pub const SERVER_NAME: &str = "ircserv";
pub const SERVER_VERSION: &str = "1.0.0";
pub const USER_MODES: &str = "";
pub const CHANNEL_MODES: &str = "itklo";

pub const RPL_WELCOME: u16 = 1;
pub const RPL_YOURHOST: u16 = 2;
pub const RPL_CREATED: u16 = 3;
pub const RPL_MYINFO: u16 = 4;

pub const RPL_CHANNELMODEIS: u16 = 324;
pub const RPL_NOTOPIC: u16 = 331;
pub const RPL_TOPIC: u16 = 332;
pub const RPL_INVITING: u16 = 341;
pub const RPL_NAMREPLY: u16 = 353;
pub const RPL_ENDOFNAMES: u16 = 366;

pub const ERR_NOSUCHNICK: u16 = 401;
pub const ERR_NOSUCHCHANNEL: u16 = 403;
pub const ERR_CANNOTSENDTOCHAN: u16 = 404;

//    421    ERR_UNKNOWNCOMMAND
//           "<command> :Unknown command"
pub const ERR_UNKNOWNCOMMAND_NB: u16 = 421;
pub const ERR_UNKNOWNCOMMAND_STR: &str = "Unknown command";

pub const ERR_NONICKNAMEGIVEN: u16 = 431;
pub const ERR_ERRONEUSNICKNAME: u16 = 432;
pub const ERR_NICKNAMEINUSE: u16 = 433;
pub const ERR_NOTONCHANNEL: u16 = 442;
pub const ERR_USERONCHANNEL: u16 = 443;
pub const ERR_NOTREGISTERED: u16 = 451;

// 461    ERR_NEEDMOREPARAMS
//               "<command> :Not enough parameters"
//
//          - Returned by the server by numerous commands to
//            indicate to the client that it didn't supply enough
//            parameters.
pub const ERR_NEEDMOREPARAMS_NB: u16 = 461;
pub const ERR_NEEDMOREPARAMS_STR: &str = "Not enough parameters";

pub const ERR_ALREADYREGISTERED: u16 = 462;
pub const ERR_PASSWDMISMATCH: u16 = 464;
pub const ERR_INVALIDUSERNAME: u16 = 468;
pub const ERR_CHANNELISFULL: u16 = 471;
pub const ERR_INVITEONLYCHAN: u16 = 473;
pub const ERR_BADCHANNELKEY: u16 = 475;
pub const ERR_BADCHANMASK: u16 = 476;
pub const ERR_CHANOPRIVSNEEDED: u16 = 482;

/// Maximum message length, including the CR-LF terminator.
pub const MAX_MESSAGE_LEN: usize = 512;
/// Maximum number of parsed parameters per message.
pub const MAX_PARAMS: usize = 15;

pub const MAX_USERS: usize = 1000;
pub const MAX_CHANNELS: usize = 50;
pub const MAX_CHANNELS_PER_USER: usize = 10;
