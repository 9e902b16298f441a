use std::{
    io,
    net::SocketAddr,
};

use bytes::Bytes;
use tokio::{
    net::UdpSocket,
    sync::{
        mpsc,
        Mutex,
    },
};

/// Largest payload a long-range transceiver can carry in one packet.
pub const MAX_PAYLOAD: usize = 255;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LinkQuality {
    pub rssi: Option<i16>,
    pub snr:  Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub payload: Bytes,
    pub link:    LinkQuality,
}

impl Frame {
    #[inline]
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            link:    LinkQuality::default(),
        }
    }
}

#[async_trait::async_trait]
pub trait DatagramOps: Sized {
    type Address;

    async fn connect(address: &Self::Address) -> io::Result<Self>;
    async fn bind(address: &Self::Address) -> io::Result<Self>;
    fn display_addr(addr: &Self::Address) -> String;
}

#[async_trait::async_trait]
pub trait RadioReceiver {
    /// Wait for the next frame. Timeouts are the caller's business.
    async fn receive(&self) -> io::Result<Frame>;
}

#[async_trait::async_trait]
pub trait RadioTransmitter {
    async fn transmit(&self, payload: &[u8]) -> io::Result<()>;

    /// Transceivers without power control ignore this.
    async fn set_tx_power(&self, _dbm: i8) -> io::Result<()> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatagramOps for UdpSocket {
    type Address = SocketAddr;

    #[tracing::instrument(err, fields(address = Self::display_addr(address).as_str()))]
    #[inline]
    async fn connect(address: &SocketAddr) -> io::Result<Self> {
        let local: SocketAddr = match address {
            SocketAddr::V4(_) => ([0, 0, 0, 0], 0).into(),
            SocketAddr::V6(_) => ([0u16; 8], 0).into(),
        };

        let sock = UdpSocket::bind(local).await?;
        sock.set_broadcast(true)?;
        sock.connect(address).await?;

        Ok(sock)
    }

    #[tracing::instrument(err, fields(address = Self::display_addr(address).as_str()))]
    #[inline]
    async fn bind(address: &Self::Address) -> io::Result<Self> {
        UdpSocket::bind(address).await
    }

    #[inline]
    fn display_addr(addr: &SocketAddr) -> String {
        addr.to_string()
    }
}

#[async_trait::async_trait]
impl RadioTransmitter for UdpSocket {
    #[tracing::instrument(level = "trace", err, fields(packet.len = payload.len()), skip(payload, self))]
    #[inline]
    async fn transmit(&self, payload: &[u8]) -> io::Result<()> {
        let sent = self.send(payload).await?;

        if sent != payload.len() {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "short datagram write"));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl RadioReceiver for UdpSocket {
    #[tracing::instrument(level = "trace", err, skip(self))]
    #[inline]
    async fn receive(&self) -> io::Result<Frame> {
        let mut buf = [0u8; MAX_PAYLOAD];
        let (len, _from) = self.recv_from(&mut buf).await?;

        Ok(Frame::new(Bytes::copy_from_slice(&buf[..len])))
    }
}

#[async_trait::async_trait]
impl RadioTransmitter for mpsc::Sender<Frame> {
    async fn transmit(&self, payload: &[u8]) -> io::Result<()> {
        self.send(Frame::new(Bytes::copy_from_slice(payload)))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::ConnectionAborted, e.to_string()))
    }
}

/// In-memory radio end, mostly for wiring stations together in tests.
pub struct ChannelReceiver(Mutex<mpsc::Receiver<Frame>>);

#[async_trait::async_trait]
impl RadioReceiver for ChannelReceiver {
    async fn receive(&self) -> io::Result<Frame> {
        let mut lck = self.0.lock().await;

        lck.recv().await.ok_or_else(|| {
            io::Error::new(io::ErrorKind::ConnectionAborted, "remote end of channel closed")
        })
    }
}

pub fn channel(capacity: usize) -> (mpsc::Sender<Frame>, ChannelReceiver) {
    let (tx, rx) = mpsc::channel(capacity);

    (tx, ChannelReceiver(Mutex::new(rx)))
}
