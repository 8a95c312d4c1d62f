//! Publisher - UDP fire-and-forget record sender

use contracts::{Channel, ObjectReport, SensorReport, SimError};
use tokio::net::UdpSocket;
use tracing::{debug, error, trace};

/// Publishing side of one bus channel.
///
/// Send failures are logged and swallowed: UDP is best-effort and a lost
/// report is indistinguishable from a dropped datagram downstream.
pub struct Publisher {
    channel: Channel,
    socket: UdpSocket,
}

impl Publisher {
    /// Bind an ephemeral local port for sending to `channel`.
    pub async fn bind(channel: Channel) -> Result<Self, SimError> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| SimError::bus(channel, e.to_string()))?;

        if channel.group.is_multicast() {
            // Host/LAN-local traffic only
            socket
                .set_multicast_ttl_v4(1)
                .map_err(|e| SimError::bus(channel, e.to_string()))?;
        }

        debug!(channel = %channel, "publisher bound");

        Ok(Self { channel, socket })
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Send one pre-encoded wire line.
    pub async fn publish_line(&self, line: &str) {
        match self
            .socket
            .send_to(line.as_bytes(), self.channel.socket_addr())
            .await
        {
            Ok(sent) => {
                trace!(channel = %self.channel, bytes = sent, "sent");
                observability::record_datagram_sent(&self.channel.to_string());
            }
            Err(e) => {
                // Log but don't fail - UDP is best-effort
                error!(channel = %self.channel, error = %e, "UDP send failed");
            }
        }
    }

    pub async fn publish_object(&self, report: &ObjectReport) {
        self.publish_line(&report.encode()).await;
    }

    pub async fn publish_sensor(&self, report: &SensorReport) {
        self.publish_line(&report.encode()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn publish_without_receiver_succeeds() {
        // UDP doesn't care whether anyone is listening
        let channel = Channel::new(Ipv4Addr::LOCALHOST, 19990);
        let publisher = Publisher::bind(channel).await.unwrap();
        publisher.publish_line("object,t1,1.000,2.000,0.100").await;
    }

    #[tokio::test]
    async fn bind_multicast_channel() {
        let publisher = Publisher::bind(Channel::default_object()).await;
        assert!(publisher.is_ok());
    }
}
