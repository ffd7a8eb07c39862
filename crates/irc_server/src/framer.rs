//! Per-connection byte-to-message framer: a line split across two
//! `read()`s (or two TCP segments) must still come out whole. Bytes
//! accumulate in `buf`; each call to [`Framer::next_message`] drains at
//! most one complete message, head-consuming the terminator.

/// A CR-LF- or bare-LF-terminated line is "complete" once the buffer
/// contains either terminator.
pub struct Framer {
    buf: Vec<u8>,
}

impl Framer {
    pub fn new() -> Self {
        Framer { buf: Vec::new() }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn has_complete(&self) -> bool {
        self.buf.contains(&b'\n')
    }

    /// Pulls one message out of the buffer, if any is complete. The
    /// terminator (`\r\n` or bare `\n`) is consumed and never part of the
    /// returned bytes. An oversized line (more than 512 bytes including
    /// terminator) is handed back as-is — rejecting it is the parser's
    /// job, not the framer's.
    pub fn next_message(&mut self) -> Option<Vec<u8>> {
        let nl_pos = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=nl_pos).collect();
        line.pop(); // trailing '\n'
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(line)
    }

    /// Drains every complete message currently buffered, in arrival order.
    pub fn drain_messages(&mut self) -> Vec<Vec<u8>> {
        let mut messages = Vec::new();
        while let Some(msg) = self.next_message() {
            messages.push(msg);
        }
        messages
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_crlf_message() {
        let mut f = Framer::new();
        f.feed(b"NICK alice\r\n");
        assert_eq!(f.next_message(), Some(b"NICK alice".to_vec()));
        assert_eq!(f.next_message(), None);
    }

    #[test]
    fn tolerates_bare_lf() {
        let mut f = Framer::new();
        f.feed(b"NICK alice\n");
        assert_eq!(f.next_message(), Some(b"NICK alice".to_vec()));
    }

    #[test]
    fn arbitrary_chunking_yields_same_messages() {
        let whole = b"NICK alice\r\nUSER alice 0 * :Alice A.\r\n";
        // feed one byte at a time
        let mut f = Framer::new();
        for &b in whole {
            f.feed(&[b]);
        }
        assert_eq!(f.drain_messages(), vec![
            b"NICK alice".to_vec(),
            b"USER alice 0 * :Alice A.".to_vec(),
        ]);

        // split at an arbitrary boundary mid-message
        let mut f2 = Framer::new();
        f2.feed(&whole[..15]);
        f2.feed(&whole[15..]);
        assert_eq!(f2.drain_messages(), vec![
            b"NICK alice".to_vec(),
            b"USER alice 0 * :Alice A.".to_vec(),
        ]);
    }

    #[test]
    fn partial_message_not_yet_complete() {
        let mut f = Framer::new();
        f.feed(b"NICK al");
        assert!(!f.has_complete());
        assert_eq!(f.next_message(), None);
        f.feed(b"ice\r\n");
        assert!(f.has_complete());
        assert_eq!(f.next_message(), Some(b"NICK alice".to_vec()));
    }

    #[test]
    fn oversized_line_is_still_handed_out_whole() {
        let mut f = Framer::new();
        let long = "a".repeat(600);
        f.feed(format!("PRIVMSG #c :{long}\r\n").as_bytes());
        let msg = f.next_message().unwrap();
        assert!(msg.len() > 512);
    }
}
