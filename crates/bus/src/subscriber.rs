//! Subscriber - multicast group membership + background receive task
//!
//! The socket task forwards each datagram's text over an unbounded channel.
//! Unbounded is the documented backpressure policy here: records are cheap
//! single-line strings and loss is already tolerated at the transport layer.

use std::net::{Ipv4Addr, SocketAddr};

use contracts::{Channel, SimError};
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const RECV_BUF_LEN: usize = 2048;

/// Subscribing side of one bus channel.
///
/// Dropping the subscriber aborts the receive task; no receive blocks past
/// the owner's lifetime.
pub struct Subscriber {
    channel: Channel,
    rx: mpsc::UnboundedReceiver<String>,
    task: JoinHandle<()>,
}

impl Subscriber {
    /// Join `channel` and start receiving.
    ///
    /// Multiple subscriber processes on one host share the port via
    /// SO_REUSEADDR/SO_REUSEPORT.
    pub async fn join(channel: Channel) -> Result<Self, SimError> {
        let socket = open_socket(channel).map_err(|e| SimError::bus(channel, e.to_string()))?;
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(receive_loop(socket, tx, channel));

        debug!(channel = %channel, "subscriber joined");

        Ok(Self { channel, rx, task })
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Next raw datagram line; `None` once the receive task has stopped.
    ///
    /// Decoding is the consumer's job (via [`contracts::Record::decode`]) so
    /// callers that only care about traffic presence can count undecoded
    /// datagrams too.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Non-blocking variant for drain-style consumers.
    pub fn try_recv(&mut self) -> Option<String> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Bind the channel port with address reuse and join the group.
///
/// Reuse flags must be set before bind, which plain std/tokio constructors
/// cannot do; hence socket2.
fn open_socket(channel: Channel) -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nonblocking(true)?;

    let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, channel.port));
    socket.bind(&bind_addr.into())?;

    let socket: std::net::UdpSocket = socket.into();
    if channel.group.is_multicast() {
        socket.join_multicast_v4(&channel.group, &Ipv4Addr::UNSPECIFIED)?;
    }

    UdpSocket::from_std(socket)
}

async fn receive_loop(socket: UdpSocket, tx: mpsc::UnboundedSender<String>, channel: Channel) {
    let channel_label = channel.to_string();
    let mut buf = [0u8; RECV_BUF_LEN];

    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, _peer)) => {
                observability::record_datagram_received(&channel_label);
                let line = String::from_utf8_lossy(&buf[..len]).trim().to_string();
                if tx.send(line).is_err() {
                    // Consumer gone; stop receiving
                    break;
                }
            }
            Err(e) => {
                warn!(channel = %channel, error = %e, "recv failed");
            }
        }
    }
}
