//! RFC 2812 §2.3.1 argument-shape grammars for the two productions the
//! registration handler still needs after `crate::message::parse_message`
//! has split prefix/command/params: `hostname` (the RFC 1459 fallback shape
//! for USER's mode/hostname slot) and `user` (the username itself).

use nom::{IResult, Parser, bytes::complete::take_while1, character::complete::satisfy, combinator::{recognize, verify}, multi::many0, sequence::preceded};
use nom::bytes::complete::tag;

// 06.  hostname   =  shortname *( "." shortname )
pub fn hostname_parser(input: &str) -> IResult<&str, &str> {
    let mut parser = verify(
        recognize((
            shortname_parser,
            many0(preceded(tag("."), shortname_parser)),
        )),
        |s: &str| s.len() <= 63,
    );
    parser.parse(input)
}

// 07.  shortname  =  ( letter / digit ) *( letter / digit / "-" )
//                 *( letter / digit )
//                   ; as specified in RFC 1123 [HNAME]
pub fn shortname_parser(input: &str) -> IResult<&str, &str> {
    let mut parser = recognize((
        satisfy(|c| c.is_ascii_alphanumeric()), // first char
        many0(satisfy(|c| c.is_ascii_alphanumeric() || c == '-')),
        satisfy(|c| c.is_ascii_alphanumeric()), // last char
    ));
    parser.parse(input)
}

// 15.  user       =  1*( %x01-09 / %x0B-0C / %x0E-1F / %x21-3F / %x41-FF )
//                   ; any octet except NUL, CR, LF, " " and "@"
fn is_user_char(c: char) -> bool {
    if !c.is_ascii() {
        return false;
    }

    let b = c as u8;

    matches!(b,
        0x01..=0x09 |  // exclude NUL and LF
        0x0B..=0x0C |
        0x0E..=0x1F |
        0x21..=0x3F |  // excludes SPACE (0x20) and '@' (0x40)
        0x41..=0x7F    // ASCII 0x41+ (but UTF-8 never produces >0x7F as 1 byte)
    )
}

/// Parses "user" according to the ABNF rule.
pub fn user_parser(input: &str) -> IResult<&str, &str> {
    take_while1(is_user_char).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_hostnames() {
        for case in ["localhost", "irc.example.com", "a-1.b"] {
            let (rest, out) = hostname_parser(case).unwrap();
            assert_eq!(rest, "");
            assert_eq!(out, case);
        }
    }

    #[test]
    fn hostname_rejects_leading_dash_label() {
        assert!(hostname_parser("-bad.com").is_err());
    }

    #[test]
    fn valid_users() {
        let cases = [
            "a",
            "abc123",
            "hello.world",
            "user-name",
            "test!#$%&'()*+,-./0123",
            "AZaz09",     // plain alnum
            "\x01abc",    // lowest allowed control
            "\x1Ftest",   // high control range
            "\x21hello",  // ASCII printable except space/@
            "foo\x7Fbar", // DEL is allowed (%x41-FF but ASCII only goes to 0x7F)
        ];

        for &case in &cases {
            let (rest, out) =
                user_parser(case).unwrap_or_else(|_| panic!("should parse: {case:?}"));
            assert_eq!(rest, "");
            assert_eq!(out, case);
        }
    }

    #[test]
    fn invalid_starting_character() {
        let cases = [
            "",      // empty is invalid (needs 1+)
            "\0abc", // NUL
            " abc",  // space
            "@name", // '@'
            "\nabc", // LF
            "\rabc", // CR
        ];

        for &case in &cases {
            assert!(user_parser(case).is_err(), "should fail at start: {case:?}");
        }
    }

    #[test]
    fn stops_on_invalid_middle() {
        let (rest, out) = user_parser("foo bar").unwrap();
        assert_eq!(out, "foo");
        assert_eq!(rest, " bar");
    }

    #[test]
    fn rejects_utf8_multibyte() {
        // snowman = 0xE2 98 83 (multi-byte UTF-8)
        assert!(user_parser("☃test").is_err());

        // multi-byte anywhere stops parsing
        let (rest, out) = user_parser("abc☃def")
            .unwrap_or_else(|_| panic!("should partially parse ASCII prefix"));
        assert_eq!(out, "abc");
        assert_eq!(rest, "☃def");
    }

    #[test]
    fn control_character_edge_cases() {
        // Check boundaries explicitly
        assert!(user_parser("\x01").is_ok());
        assert!(user_parser("\x09").is_ok());
        assert!(user_parser("\x0A").is_err()); // LF
        assert!(user_parser("\x0B").is_ok());
        assert!(user_parser("\x0C").is_ok());
        assert!(user_parser("\x0D").is_err()); // CR
        assert!(user_parser("\x0E").is_ok());
        assert!(user_parser("\x1F").is_ok());
        assert!(user_parser("\x20").is_err()); // space
        assert!(user_parser("\x40").is_err()); // '@'
    }
}
