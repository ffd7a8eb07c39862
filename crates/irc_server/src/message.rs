//! The generic message grammar: `[ ":" prefix SPACE ] command [ params ] crlf`
//! (RFC 2812 §2.3.1).
//!
//! This is deliberately a single generic parser rather than one `nom`
//! parser per verb (see `registration.rs` / `channel_ops.rs`): the parsed
//! request is command-agnostic, and per-verb argument shapes are
//! validated afterwards by the parsers in those two modules. The
//! individual grammar productions below (`prefix`, `command`, `middle`,
//! `trailing`) are each a small named `nom` combinator, the way
//! `parsers.rs`/`channel_ops.rs` build theirs; `parse_params` is the plain
//! Rust loop gluing them together, since the trailing-vs-middle branching
//! and the parameter-count cap are easier to read as an explicit loop than
//! folded into one combinator chain.

use nom::{
    IResult, Parser,
    bytes::complete::take_till1,
    character::complete::char,
    combinator::{rest, verify},
    sequence::preceded,
};

use crate::constants::{MAX_MESSAGE_LEN, MAX_PARAMS};

/// One parsed line, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
}

/// The verbs the dispatcher recognizes. Anything else parses structurally
/// fine but is tagged `Unknown` so the dispatcher can reply 421.
pub const KNOWN_COMMANDS: &[&str] = &[
    "PASS", "NICK", "USER", "CAP", "PING", "PONG", "QUIT", "JOIN", "PART", "PRIVMSG", "NOTICE",
    "KICK", "INVITE", "TOPIC", "MODE",
];

/// A run of non-space characters — the shape shared by the prefix content,
/// the command verb, and a middle (non-trailing) parameter.
fn non_space_run(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == ' ').parse(input)
}

/// `SPACE` — exactly one.
fn space_parser(input: &str) -> IResult<&str, char> {
    char(' ').parse(input)
}

/// servername / ( nickname [ [ "!" user ] "@" host ] ) — accept any
/// printable run with no embedded whitespace or control bytes; the
/// stricter nickname/hostname grammars in `parsers.rs` constrain what a
/// server actually assigns as a prefix, this just rejects garbage.
fn is_valid_prefix(s: &str) -> bool {
    s.bytes().all(|b| b > 0x20 && b != 0x7f)
}

/// `":" prefix SPACE` — the optional source indicator at the head of a
/// line. Only called once the caller has already seen a leading `:`.
fn prefix_parser(input: &str) -> IResult<&str, &str> {
    let (after_prefix, prefix) =
        preceded(char(':'), verify(non_space_run, is_valid_prefix)).parse(input)?;
    let (after_space, _) = space_parser(after_prefix)?;
    Ok((after_space, prefix))
}

/// The command token: a run of non-space characters up to the next space
/// or end of line. Relaxed from RFC 2812's strict `1*letter / 3digit` to
/// "any non-space run" — real clients send mixed-case verbs; case is
/// normalized by the caller.
fn command_parser(input: &str) -> IResult<&str, &str> {
    non_space_run(input)
}

/// `middle = nospcrlfcl *( ":" / nospcrlfcl )`, relaxed to "non-space run":
/// this parser never sees a raw CR/LF since the framer already stripped
/// the line terminator before this module runs.
fn middle_parser(input: &str) -> IResult<&str, &str> {
    non_space_run(input)
}

/// `":" trailing` — the rest of the line verbatim, including further spaces.
fn trailing_parser(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), rest).parse(input)
}

/// Parses one already-framed line (terminator already stripped by the
/// framer) into a [`ParsedMessage`].
///
/// Returns `None` on every rejection case: empty input, oversized input,
/// leading whitespace, a bad prefix, a double space between parameters, or
/// more than 15 non-trailing parameters.
pub fn parse_message(line: &str) -> Option<ParsedMessage> {
    // +2 accounts for the CR-LF the framer already stripped off; the 512
    // byte ceiling is inclusive of the terminator.
    if line.is_empty() || line.len() + 2 > MAX_MESSAGE_LEN {
        return None;
    }
    if line.starts_with(' ') {
        return None;
    }

    let (rest, prefix) = if line.starts_with(':') {
        let (rest, prefix) = prefix_parser(line).ok()?;
        // "double-space is a protocol error": the char right after the
        // single consumed separator must not itself be a space.
        if rest.starts_with(' ') {
            return None;
        }
        (rest, Some(prefix.to_string()))
    } else {
        (line, None)
    };

    if rest.is_empty() {
        return None;
    }

    let (after_command, command) = command_parser(rest).ok()?;
    if command.is_empty() {
        return None;
    }
    let command = command.to_ascii_uppercase();

    let params = parse_params(after_command)?;

    Some(ParsedMessage {
        prefix,
        command,
        params,
    })
}

/// `params = *14( SPACE middle ) [ SPACE ":" trailing ]`
/// `       =/ 14( SPACE middle ) [ SPACE [ ":" ] trailing ]`
fn parse_params(mut input: &str) -> Option<Vec<String>> {
    let mut params = Vec::new();

    while !input.is_empty() {
        let Ok((after_space, _)) = space_parser(input) else {
            // shouldn't happen: every iteration below consumes a leading space.
            return None;
        };
        if after_space.is_empty() {
            // trailing space with nothing after it: no additional parameter.
            break;
        }
        if after_space.starts_with(' ') {
            // double space between parameters is a protocol error.
            return None;
        }

        if let Ok((_, trailing)) = trailing_parser(after_space) {
            params.push(trailing.to_string());
            break;
        }

        if params.len() >= MAX_PARAMS {
            return None;
        }

        let (after_param, middle) = middle_parser(after_space).ok()?;
        params.push(middle.to_string());
        input = after_param;
    }

    Some(params)
}

impl ParsedMessage {
    pub fn is_known(&self) -> bool {
        KNOWN_COMMANDS.contains(&self.command.as_str())
    }

    /// Parameter at `idx`, or `None` if the caller's command supplied fewer.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.params.get(idx).map(String::as_str)
    }
}
