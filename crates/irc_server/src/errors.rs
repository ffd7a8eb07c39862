use thiserror::Error;

/// Fatal errors: surfaced at startup, the process exits non-zero.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("could not bind {0}: {1}")]
    Bind(std::net::SocketAddr, std::io::Error),

    #[error("could not register listener with the poller: {0}")]
    Poll(std::io::Error),
}

/// Per-message errors. Never fatal: at worst the connection that produced
/// one is torn down on a transient I/O failure; every other variant leaves
/// the connection open and reports a numeric or a parse error text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The line could not be parsed at all. The peer receives
    /// "Error: Invalid command." verbatim, not a numeric.
    #[error("parse error")]
    ParseError,

    /// A precondition the dispatcher checks before a handler runs failed
    /// (not authenticated, not registered, not an operator, ...). Carries
    /// the numeric and formatted text the handler should send back.
    #[error("policy error {0}")]
    Policy(u16, String),
}

impl CommandError {
    pub fn policy(code: u16, text: impl Into<String>) -> Self {
        CommandError::Policy(code, text.into())
    }
}
