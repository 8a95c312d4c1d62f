//! Logical bus channels: multicast group + port.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use serde::{Deserialize, Serialize};

/// A logical broadcast domain, identified by multicast group and port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Multicast group address
    pub group: Ipv4Addr,

    /// UDP port
    pub port: u16,
}

impl Channel {
    pub const fn new(group: Ipv4Addr, port: u16) -> Self {
        Self { group, port }
    }

    /// Destination address for publishers.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.group, self.port))
    }

    /// Target emitters -> sensor agents.
    pub const fn default_object() -> Self {
        Self::new(Ipv4Addr::new(224, 1, 1, 1), 5004)
    }

    /// Sensor agents -> fusion / monitor / visualizer.
    pub const fn default_sensor() -> Self {
        Self::new(Ipv4Addr::new(224, 1, 1, 2), 5005)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.group, self.port)
    }
}
