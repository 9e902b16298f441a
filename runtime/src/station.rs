//! Base-station roles and the loop that drives them.
//!
//! The operating mode is chosen once at startup. Each mode becomes one
//! [`Station`] implementation, and the [`ReceiveLoop`] polls the long-range (or
//! local) radio and hands every frame to it, one at a time.

use std::{
    future::Future,
    io,
    time::Duration,
};

use async_trait::async_trait;
use tokio::time::{
    error::Elapsed,
    Instant,
};

use message::{
    NodeAddress,
    ReportId,
};
use net::{
    Frame,
    LinkQuality,
    RadioReceiver,
    RadioTransmitter,
};

use crate::{
    Accepted,
    Admission,
    HardwareFault,
    LocalReceiver,
    Path,
    Rejection,
    Relay,
    ReportSink,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum OperatingMode {
    #[display(fmt = "sensor node")]
    SensorNode,
    #[display(fmt = "base station")]
    BaseStation,
    #[display(fmt = "base station with gateway")]
    BaseStationWithGateway,
    #[display(fmt = "local-radio receiver")]
    LocalRadioReceiver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ModeError {
    #[error("a station cannot be both a gateway and a local-radio receiver")]
    GatewayAndReceiver,
}

impl OperatingMode {
    /// Resolve a base-station mode from its two role switches.
    pub fn station(gateway: bool, local_receiver: bool) -> Result<Self, ModeError> {
        match (gateway, local_receiver) {
            (false, false) => Ok(Self::BaseStation),
            (true, false) => Ok(Self::BaseStationWithGateway),
            (false, true) => Ok(Self::LocalRadioReceiver),
            (true, true) => Err(ModeError::GatewayAndReceiver),
        }
    }

    #[inline]
    pub fn is_station(self) -> bool {
        !matches!(self, Self::SensorNode)
    }
}

/// One receiving role: decide what a frame means and do whatever that role does
/// with it before the next frame is looked at.
#[async_trait]
pub trait Station: Send {
    fn mode(&self) -> OperatingMode;

    async fn ingest(&mut self, frame: Frame) -> Result<Accepted, Rejection>;
}

/// Verifies reports off the long-range link.
#[derive(Debug)]
pub struct DirectStation {
    admission: Admission,
}

impl DirectStation {
    pub fn new(admission: Admission) -> Self {
        Self {
            admission,
        }
    }
}

#[async_trait]
impl Station for DirectStation {
    fn mode(&self) -> OperatingMode {
        OperatingMode::BaseStation
    }

    async fn ingest(&mut self, frame: Frame) -> Result<Accepted, Rejection> {
        self.admission.admit(frame)
    }
}

/// A [`DirectStation`] that also rebroadcasts what it accepts onto the local
/// radio.
pub struct GatewayStation<T> {
    admission: Admission,
    relay:     Relay<T>,
}

impl<T> GatewayStation<T>
where
    T: RadioTransmitter + Send + Sync,
{
    pub fn new(admission: Admission, relay: Relay<T>) -> Self {
        Self {
            admission,
            relay,
        }
    }

    #[inline]
    pub fn relay(&self) -> &Relay<T> {
        &self.relay
    }
}

#[async_trait]
impl<T> Station for GatewayStation<T>
where
    T: RadioTransmitter + Send + Sync,
{
    fn mode(&self) -> OperatingMode {
        OperatingMode::BaseStationWithGateway
    }

    async fn ingest(&mut self, frame: Frame) -> Result<Accepted, Rejection> {
        let accepted = self.admission.admit(frame)?;

        // A relay drop is logged by the relay and never costs the local surface.
        self.relay.forward(&accepted).await;

        Ok(accepted)
    }
}

/// Listens on the local radio only.
#[derive(Debug)]
pub struct ReceiverStation {
    receiver: LocalReceiver,
}

impl ReceiverStation {
    pub fn new(receiver: LocalReceiver) -> Self {
        Self {
            receiver,
        }
    }
}

#[async_trait]
impl Station for ReceiverStation {
    fn mode(&self) -> OperatingMode {
        OperatingMode::LocalRadioReceiver
    }

    async fn ingest(&mut self, frame: Frame) -> Result<Accepted, Rejection> {
        self.receiver.admit(frame)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoopConfig {
    /// Longest a single receive may block.
    pub poll_timeout:     Duration,
    pub refresh_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            poll_timeout:     Duration::from_secs(1),
            refresh_interval: Duration::from_secs(5),
        }
    }
}

/// Result of one loop iteration.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Idle,
    Accepted(ReportId),
    Rejected(Rejection),
}

pub struct ReceiveLoop<St, R, S> {
    station:      St,
    radio:        R,
    sink:         S,
    config:       LoopConfig,
    last_refresh: Instant,
}

impl<St, R, S> ReceiveLoop<St, R, S>
where
    St: Station,
    R: RadioReceiver + Send + Sync,
    S: ReportSink,
{
    pub fn new(station: St, radio: R, sink: S, config: LoopConfig) -> Self {
        Self {
            station,
            radio,
            sink,
            config,
            last_refresh: Instant::now(),
        }
    }

    /// Wait up to the poll timeout for one frame and process it fully.
    pub async fn poll_once(&mut self) -> Result<Step, HardwareFault> {
        let received = tokio::time::timeout(self.config.poll_timeout, self.radio.receive()).await;
        self.process(received).await
    }

    /// Iterate until `shutdown` resolves or the radio fails. Shutdown is only
    /// observed between frames, so an accepted report is always relayed and
    /// surfaced before the loop exits.
    pub async fn run<F>(mut self, shutdown: F) -> Result<S, HardwareFault>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(mode = %self.station.mode(), "receive loop started");
        tokio::pin!(shutdown);

        loop {
            let received = tokio::select! {
                biased;

                _ = &mut shutdown => break,
                received = tokio::time::timeout(self.config.poll_timeout, self.radio.receive()) => received,
            };

            self.process(received).await?;
            self.refresh_if_due();
        }

        tracing::info!("receive loop stopped");
        Ok(self.sink)
    }

    async fn process(&mut self, received: Result<io::Result<Frame>, Elapsed>) -> Result<Step, HardwareFault> {
        let frame = match received {
            Err(_elapsed) => return Ok(Step::Idle),
            Ok(result) => result.map_err(|e| {
                tracing::error!(error = %e, "radio receive failed");
                HardwareFault::Radio(e)
            })?,
        };

        let link = frame.link;

        match self.station.ingest(frame).await {
            Ok(accepted) => {
                log_accepted(&accepted);
                self.sink.accept(&accepted);

                Ok(Step::Accepted(accepted.id()))
            },
            Err(rejection) => {
                log_rejection(&rejection, &link);

                Ok(Step::Rejected(rejection))
            },
        }
    }

    fn refresh_if_due(&mut self) {
        if self.last_refresh.elapsed() >= self.config.refresh_interval {
            self.sink.refresh();
            self.last_refresh = Instant::now();
        }
    }

    #[inline]
    pub fn station(&self) -> &St {
        &self.station
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

fn log_accepted(accepted: &Accepted) {
    let relay = match accepted.path {
        Path::Direct => None,
        Path::Relayed {
            relay,
        } => Some(relay),
    };

    tracing::info!(
        report = %accepted.report(),
        rssi = ?accepted.link.rssi,
        snr = ?accepted.link.snr,
        relay = ?relay.map(NodeAddress::get),
        "accepted report",
    );
}

fn log_rejection(rejection: &Rejection, link: &LinkQuality) {
    match rejection {
        Rejection::Decode(e) => tracing::debug!(error = %e, rssi = ?link.rssi, "dropping malformed frame"),
        Rejection::Auth(e) => {
            tracing::warn!(error = %e, rssi = ?link.rssi, snr = ?link.snr, "dropping unauthenticated frame")
        },
        Rejection::Replay(e) => tracing::info!(error = %e, "dropping stale report"),
        Rejection::Duplicate(id) => tracing::debug!(%id, "report already surfaced"),
        Rejection::Misaddressed(dest) => tracing::debug!(%dest, "frame addressed elsewhere"),
    }
}
