//! End-to-end scenarios S1-S7, driven against real `TcpStream`s connected to
//! a server bound on a loopback ephemeral port: registration, channel
//! admission gates, operator privilege, and message delivery rules.

use std::io::{BufRead, BufReader, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream};
use std::thread;
use std::time::Duration;

const PASSWORD: &str = "secret";

/// Binds `ircserv` to an OS-assigned loopback port and drives it on a
/// background thread for the lifetime of the test process (the thread is
/// daemon-like: it outlives the test but each test gets its own listener
/// and port, so tests never interfere with one another).
fn start_server() -> SocketAddr {
    let (listener, bound) = irc_server::multiplexer::bind(0).expect("bind ephemeral port");
    thread::spawn(move || {
        let _ = irc_server::multiplexer::serve(listener, PASSWORD.to_string());
    });
    // The listener is already bound and registered by the time `bind`
    // returns; this just gives the poller thread a moment to reach its
    // first `poll()` call before the test's first connect.
    thread::sleep(Duration::from_millis(50));
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), bound.port())
}

struct Client {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl Client {
    fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).expect("connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let reader = BufReader::new(stream.try_clone().unwrap());
        Client { stream, reader }
    }

    fn send(&mut self, line: &str) {
        self.stream
            .write_all(format!("{line}\r\n").as_bytes())
            .expect("write");
    }

    fn read_line(&mut self) -> String {
        let mut buf = String::new();
        self.reader.read_line(&mut buf).expect("read reply");
        buf.trim_end_matches(['\r', '\n']).to_string()
    }

    /// Registers with PASS/NICK/USER and drains the 001-004 welcome burst,
    /// asserting each numeric lands in order.
    fn register(addr: SocketAddr, nick: &str) -> Self {
        let mut c = Client::connect(addr);
        c.send(&format!("PASS {PASSWORD}"));
        c.send(&format!("NICK {nick}"));
        c.send(&format!("USER {nick} 0 * :{nick} Realname"));
        for code in ["001", "002", "003", "004"] {
            let line = c.read_line();
            assert!(
                line.contains(&format!(" {code} ")),
                "expected numeric {code}, got: {line}"
            );
        }
        c
    }
}

/// S1 — registration success: numerics 001-004, in order.
#[test]
fn s1_registration_success() {
    let addr = start_server();
    let _alice = Client::register(addr, "alice");
}

/// S2 — bad password: 464, then any command before a correct PASS replies
/// 451 (not authenticated).
#[test]
fn s2_bad_password() {
    let addr = start_server();
    let mut c = Client::connect(addr);
    c.send("PASS wrong");
    let line = c.read_line();
    assert!(line.contains(" 464 "), "expected 464, got: {line}");

    c.send("NICK alice");
    let line = c.read_line();
    assert!(line.contains(" 451 "), "expected 451, got: {line}");
}

/// S3 — JOIN creates the channel, the joiner becomes operator.
#[test]
fn s3_join_creates_channel_joiner_is_operator() {
    let addr = start_server();
    let mut alice = Client::register(addr, "alice");

    alice.send("JOIN #dev");

    let join = alice.read_line();
    assert_eq!(join, ":alice!alice@localhost JOIN #dev");

    let no_topic = alice.read_line();
    assert!(no_topic.contains(" 331 "), "expected 331, got: {no_topic}");

    let names = alice.read_line();
    assert!(names.contains(" 353 "), "expected 353, got: {names}");
    assert!(names.contains("= #dev :@alice"), "names body: {names}");

    let end_names = alice.read_line();
    assert!(end_names.contains(" 366 "), "expected 366, got: {end_names}");
}

/// S4 — invite-only gate: a non-invited user is rejected, an invited one
/// succeeds and is consumed from the invite list.
#[test]
fn s4_invite_only_gate() {
    let addr = start_server();
    let mut alice = Client::register(addr, "alice");
    alice.send("JOIN #dev");
    drain_join_burst(&mut alice);

    alice.send("MODE #dev +i");
    let mode_echo = alice.read_line();
    assert_eq!(mode_echo, ":alice!alice@localhost MODE #dev +i");

    let mut bob = Client::register(addr, "bob");
    bob.send("JOIN #dev");
    let err = bob.read_line();
    assert!(err.contains(" 473 "), "expected 473, got: {err}");

    alice.send("INVITE bob #dev");
    let inviting = alice.read_line();
    assert!(inviting.contains(" 341 "), "expected 341, got: {inviting}");

    let invite_notice = bob.read_line();
    assert_eq!(invite_notice, ":alice!alice@localhost INVITE bob #dev");

    bob.send("JOIN #dev");
    // bob sees their own JOIN broadcast; alice sees it too but we only
    // assert from bob's side here.
    let join = bob.read_line();
    assert_eq!(join, ":bob!bob@localhost JOIN #dev");
}

/// S5 — channel key: wrong/missing key rejected, correct key admitted.
#[test]
fn s5_channel_key() {
    let addr = start_server();
    let mut alice = Client::register(addr, "alice");
    alice.send("JOIN #dev");
    drain_join_burst(&mut alice);

    alice.send("MODE #dev +k letmein");
    let _mode_echo = alice.read_line();

    let mut bob = Client::register(addr, "bob");
    bob.send("JOIN #dev");
    let err = bob.read_line();
    assert!(err.contains(" 475 "), "expected 475, got: {err}");

    bob.send("JOIN #dev letmein");
    let join = bob.read_line();
    assert_eq!(join, ":bob!bob@localhost JOIN #dev");
}

/// S6 — KICK requires operator status.
#[test]
fn s6_kick_requires_operator() {
    let addr = start_server();
    let mut alice = Client::register(addr, "alice");
    alice.send("JOIN #dev");
    drain_join_burst(&mut alice);

    let mut bob = Client::register(addr, "bob");
    bob.send("JOIN #dev");
    let _bob_join_self = bob.read_line();
    let _alice_sees_bob_join = alice.read_line();

    let mut carol = Client::register(addr, "carol");
    carol.send("JOIN #dev");
    let _carol_join_self = carol.read_line();
    let _alice_sees_carol_join = alice.read_line();
    let _bob_sees_carol_join = bob.read_line();

    carol.send("KICK #dev bob");
    let err = carol.read_line();
    assert!(err.contains(" 482 "), "expected 482, got: {err}");

    alice.send("KICK #dev bob :bye");
    let kick = alice.read_line();
    assert_eq!(kick, ":alice!alice@localhost KICK #dev bob :bye");
}

/// S7 — PRIVMSG to a channel the sender is not a member of replies 404.
#[test]
fn s7_privmsg_to_non_member_channel() {
    let addr = start_server();
    let mut alice = Client::register(addr, "alice");
    alice.send("JOIN #dev");
    drain_join_burst(&mut alice);

    let mut dave = Client::register(addr, "dave");
    dave.send("PRIVMSG #dev :hi");
    let err = dave.read_line();
    assert!(err.contains(" 404 "), "expected 404, got: {err}");
}

/// Unregistered commands are rejected with 451 and no state change.
#[test]
fn unregistered_command_rejected_before_registration() {
    let addr = start_server();
    let mut c = Client::connect(addr);
    c.send("JOIN #dev");
    let line = c.read_line();
    assert!(line.contains(" 451 "), "expected 451, got: {line}");
}

/// A JOIN-then-PRIVMSG from the same connection always reaches the newly
/// joined channel.
#[test]
fn join_then_privmsg_same_connection_is_ordered() {
    let addr = start_server();
    let mut alice = Client::register(addr, "alice");
    alice.send("JOIN #dev");
    drain_join_burst(&mut alice);

    let mut bob = Client::register(addr, "bob");
    bob.send("JOIN #dev");
    let _bob_join_self = bob.read_line();
    let _alice_sees_bob_join = alice.read_line();

    bob.send("PRIVMSG #dev :hello from bob");
    let privmsg = alice.read_line();
    assert_eq!(privmsg, ":bob!bob@localhost PRIVMSG #dev :hello from bob");
}

fn drain_join_burst(c: &mut Client) {
    let _join = c.read_line();
    let _topic_or_notopic = c.read_line();
    let _names = c.read_line();
    let _end_names = c.read_line();
}
