//! Argument-shape grammars for the registration commands (PASS, NICK, USER,
//! QUIT) — RFC 2812 §3.1. These run *after* [`crate::message::parse_message`]
//! has already split prefix/command/params; each parser here re-validates
//! the joined parameter string against the verb's own grammar, the way the
//! handlers in `handlers/registration.rs` expect it.

use nom::{IResult, Parser, bytes::complete::take_while1, combinator::recognize};

use crate::parsers::{hostname_parser, user_parser};

/// `<mode>` bitmask from `USER <user> <mode> <unused> :<realname>` — only
/// bits 2 (`w`) and 3 (`i`) are meaningful per RFC 2812, but the server
/// does not act on them (no user modes beyond registration flags); it is
/// parsed and discarded so a well-formed USER line is accepted.
fn user_mode_parser(input: &str) -> IResult<&str, u8> {
    let (rem, digits) = recognize(take_while1(|c: char| c.is_ascii_digit())).parse(input)?;
    let mode = digits
        .parse()
        .map_err(|_| nom::Err::Failure(nom::error::Error::new(digits, nom::error::ErrorKind::Digit)))?;
    Ok((rem, mode))
}

/// Validates `<username> <mode> <unused> :<realname>` (the joined-params
/// tail of a USER command, mode/hostname already stripped of the verb
/// itself). Accepts both the RFC 2812 numeric-mode form and the RFC 1459
/// hostname/servername form for `<mode>`'s slot, matching real clients that
/// still send the older shape.
pub fn parse_user_params(username: &str, mode_field: &str, realname: &str) -> Option<(String, u8)> {
    user_parser(username).ok()?;
    let mode = match user_mode_parser(mode_field) {
        Ok((rem, mode)) if rem.is_empty() => mode,
        _ => {
            // RFC 1459 form: <hostname> <servername>, neither used server-side.
            hostname_parser(mode_field).ok()?;
            0
        }
    };
    if realname.is_empty() {
        return None;
    }
    Some((username.to_string(), mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_rfc2812_user_params() {
        let (user, mode) = parse_user_params("guest", "0", "Ronnie Reagan").unwrap();
        assert_eq!(user, "guest");
        assert_eq!(mode, 0);
    }

    #[test]
    fn accepts_rfc1459_hostname_form() {
        let (user, mode) = parse_user_params("guest", "localhost", "Ronnie Reagan").unwrap();
        assert_eq!(user, "guest");
        assert_eq!(mode, 0);
    }

    #[test]
    fn rejects_empty_realname() {
        assert!(parse_user_params("guest", "0", "").is_none());
    }

    #[test]
    fn rejects_bad_username_char() {
        assert!(parse_user_params("gu est", "0", "Real Name").is_none());
    }
}
