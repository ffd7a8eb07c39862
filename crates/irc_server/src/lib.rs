//! A single-threaded IRC relay server implementing the RFC 1459/2812 subset
//! mainstream clients use to register and operate channels.
//!
//! `multiplexer` drives every accepted connection from one thread via
//! readiness polling; no background threads, async tasks, or timers.

pub mod channel;
pub mod channel_ops;
pub mod connection;
pub mod constants;
pub mod dispatcher;
pub mod errors;
pub mod framer;
pub mod handlers;
pub mod message;
pub mod multiplexer;
pub mod registration;
pub mod parsers;
pub mod replies;
pub mod server;
pub mod user;
