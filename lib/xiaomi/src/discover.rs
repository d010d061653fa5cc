use std::net::{Ipv4Addr, SocketAddr};

use log::{debug, trace};
use tokio::{
    net::UdpSocket,
    time::{self, Duration},
};

use crate::message::{hello_bytes, Header, HEADER_LEN};
use crate::{Error, Result};

pub const PORT: u16 = 54321;
pub(crate) const RECV_TIMEOUT: Duration = Duration::from_secs(5);

const HELLO_BYTES: [u8; HEADER_LEN] = hello_bytes();

/// Sends a "hello" to the device and waits for its handshake header.
///
/// The answer carries the device id and its uptime stamp, which are
/// needed to build encrypted requests.
pub(crate) async fn handshake(
    socket: &UdpSocket,
    addr: SocketAddr,
    timeout: Duration,
) -> Result<Header> {
    socket.send_to(&HELLO_BYTES, addr).await?;
    trace!("sent hello to {}", addr);

    let mut buffer = [0; 64];

    loop {
        let received = time::timeout(timeout, socket.recv_from(&mut buffer)).await;
        let (size, from) = match received {
            Ok(result) => result?,
            Err(_) => return Err(Error::DeviceNotFound(ipv4(addr))),
        };

        if size != HEADER_LEN {
            trace!("skipping {} bytes from {}", size, from);
            continue;
        }

        let header = Header::read_from(&buffer[..size])?;

        debug!("ip: {}", from.ip());
        debug!("device id: {:x}", header.id);
        debug!("timestamp: {}", header.ts);

        return Ok(header);
    }
}

fn ipv4(addr: SocketAddr) -> Ipv4Addr {
    match addr {
        SocketAddr::V4(addr) => *addr.ip(),
        SocketAddr::V6(_) => Ipv4Addr::UNSPECIFIED,
    }
}
