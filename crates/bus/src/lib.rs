//! # Bus
//!
//! Best-effort publish/subscribe transport over UDP multicast.
//!
//! Delivery semantics: unordered, at-most-once per physical send. There is
//! no flow control; a slow consumer misses datagrams once the OS receive
//! buffer overflows. Acceptable because reports are latest-value snapshots,
//! not an event log.
//!
//! When a channel's group address is not a multicast address the transport
//! degrades to plain unicast UDP on that address/port (used for loopback
//! debugging and tests).

mod publisher;
mod subscriber;

pub use publisher::Publisher;
pub use subscriber::Subscriber;
