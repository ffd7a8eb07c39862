//! Argument-shape grammar for channel MODE strings (RFC 2812 §3.2.3/§4.2.3),
//! run against the already-split parameter list `crate::message::parse_message`
//! produced. JOIN/PART/TOPIC/INVITE/KICK need no grammar beyond what
//! `channel::is_valid_channel_name` and a plain comma split already give
//! each handler — a bad entry in a JOIN list must not invalidate the rest,
//! which a whole-string nom grammar over the comma list would do; MODE's
//! flag run is the one argument shape that genuinely needs its own parser.

use nom::{
    Parser,
    branch::alt,
    character::complete::{char, satisfy},
    multi::many1,
    sequence::pair,
};

/// `MODE`'s `( "-" / "+" ) *<modes>` run, repeated. Shared by the channel
/// MODE handler. Channel mode letters this server recognizes: `i t k l o`;
/// others are accepted here (so a well-formed but-irrelevant flag set
/// doesn't fail to parse) and ignored by the handler.
fn is_channel_mode_letter(c: char) -> bool {
    matches!(c, 'i' | 't' | 'k' | 'l' | 'o')
}

/// Parses a full MODE flag string, e.g. `+i`, `-k`, `+o-o`, `+tl`.
pub fn parse_mode_flags(input: &str) -> Option<Vec<(bool, char)>> {
    let mut parser = many1(pair(
        alt((char('+'), char('-'))),
        many1(satisfy(is_channel_mode_letter)),
    ));
    let (rem, groups): (&str, Vec<(char, Vec<char>)>) = parser.parse(input).ok()?;
    if !rem.is_empty() {
        return None;
    }
    let mut flags = Vec::new();
    for (sign, letters) in groups {
        let enable = sign == '+';
        for letter in letters {
            flags.push((enable, letter));
        }
    }
    Some(flags)
}
