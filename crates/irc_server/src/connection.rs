//! A single accepted TCP peer: the socket, its inbound [`Framer`], an
//! outbound byte queue, and the [`User`] identity attached to it. Owned
//! exclusively by the `Server`'s connection table (`multiplexer.rs`), keyed
//! by `mio::Token` — no shared pointers, no cycles.

use std::collections::VecDeque;
use std::io::{self, Write};

use mio::net::TcpStream;

use crate::framer::Framer;
use crate::user::User;

pub struct Connection {
    pub stream: TcpStream,
    pub framer: Framer,
    pub user: User,
    /// Outbound bytes not yet written to the socket. Drained opportunistically
    /// on every poll tick and whenever the socket signals writable.
    outbound: VecDeque<u8>,
    /// Whether this connection's mio registration currently includes
    /// writable interest. The multiplexer toggles this as `outbound`
    /// fills and drains so idle connections aren't woken for writability
    /// they don't need.
    pub write_interest: bool,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Self {
        Connection {
            stream,
            framer: Framer::new(),
            user: User::new(),
            outbound: VecDeque::new(),
            write_interest: false,
        }
    }

    /// Queues one line, terminated CR-LF on egress regardless of how the
    /// peer terminated its own lines.
    pub fn queue_line(&mut self, line: &str) {
        self.outbound.reserve(line.len() + 2);
        self.outbound.extend(line.as_bytes());
        self.outbound.extend(b"\r\n");
    }

    pub fn has_pending_output(&self) -> bool {
        !self.outbound.is_empty()
    }

    /// Best-effort flush of whatever is queued. A `WouldBlock` on write
    /// leaves the remainder queued for the next writable tick rather than
    /// retrying and stalling other peers.
    pub fn flush(&mut self) -> io::Result<()> {
        while !self.outbound.is_empty() {
            let (front, _) = self.outbound.as_slices();
            match self.stream.write(front) {
                Ok(0) => break,
                Ok(n) => {
                    self.outbound.drain(..n);
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
