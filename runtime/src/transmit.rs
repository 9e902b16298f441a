//! The sensor side: sample, sign and transmit one report per cycle.

use std::time::Duration;

use async_trait::async_trait;

use codec::PacketCodec;
use message::{
    AuthenticatedPacket,
    Battery,
    Current,
    NodeAddress,
    SensorReport,
    SequenceNumber,
    Temperature,
};
use net::RadioTransmitter;

use crate::{
    watchdog,
    Authenticator,
    HardwareFault,
    KeyError,
    Protocol,
};

/// How long sampling may hang before the cycle gives up.
pub const DEFAULT_WATCHDOG: Duration = Duration::from_secs(3);

#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Hardware(#[from] HardwareFault),

    #[error("encoding report: {0}")]
    Encode(#[from] codec::Error),
}

/// One round of measurements.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Readings {
    pub temperature: Temperature,
    pub battery:     Battery,
    pub current:     Option<Current>,
}

#[async_trait]
pub trait SensorSource: Send {
    async fn sample(&mut self) -> Result<Readings, HardwareFault>;
}

#[async_trait]
impl<S> SensorSource for Box<S>
where
    S: SensorSource + ?Sized,
{
    async fn sample(&mut self) -> Result<Readings, HardwareFault> {
        (**self).sample().await
    }
}

/// Source of sequence numbers. Must never hand out a value twice.
pub trait SequenceClock: Send {
    fn next_sequence(&mut self) -> SequenceNumber;
}

impl<C> SequenceClock for Box<C>
where
    C: SequenceClock + ?Sized,
{
    fn next_sequence(&mut self) -> SequenceNumber {
        (**self).next_sequence()
    }
}

/// Derives sequence numbers from wall-clock seconds so they survive restarts
/// and deep sleep. A clock that is reset backwards will have its reports
/// rejected as replays until it catches up with the last value a station saw.
#[derive(Debug, Default, Clone)]
pub struct RtcClock {
    last: Option<u32>,
}

impl RtcClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn at(&mut self, now_secs: i64) -> SequenceNumber {
        let now = now_secs.clamp(0, u32::MAX as i64) as u32;

        let next = match self.last {
            Some(last) if now <= last => last.saturating_add(1),
            _ => now,
        };

        self.last = Some(next);
        SequenceNumber::new(next)
    }
}

impl SequenceClock for RtcClock {
    fn next_sequence(&mut self) -> SequenceNumber {
        self.at(chrono::Utc::now().timestamp())
    }
}

/// Plain in-process counter.
#[derive(Debug, Clone)]
pub struct CounterClock {
    next: u32,
}

impl CounterClock {
    pub fn starting_at(next: u32) -> Self {
        Self {
            next,
        }
    }
}

impl SequenceClock for CounterClock {
    fn next_sequence(&mut self) -> SequenceNumber {
        let seq = SequenceNumber::new(self.next);
        self.next = self.next.saturating_add(1);

        seq
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RampError {
    #[error("transmit power ramp is empty")]
    Empty,

    #[error("transmit power ramp steps down from {0} dBm to {1} dBm")]
    Decreasing(i8, i8),
}

/// Transmit powers for the copies of each report, in send order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRamp(Vec<i8>);

impl TxRamp {
    pub fn new(levels: Vec<i8>) -> Result<Self, RampError> {
        if levels.is_empty() {
            return Err(RampError::Empty);
        }

        if let Some(w) = levels.windows(2).find(|w| w[1] < w[0]) {
            return Err(RampError::Decreasing(w[0], w[1]));
        }

        Ok(Self(levels))
    }

    #[inline]
    pub fn levels(&self) -> &[i8] {
        &self.0
    }
}

impl Default for TxRamp {
    fn default() -> Self {
        Self(vec![8, 14])
    }
}

pub struct TransmitCycle<S, C, T> {
    address:  NodeAddress,
    codec:    PacketCodec,
    auth:     Authenticator,
    sensors:  S,
    clock:    C,
    radio:    T,
    ramp:     TxRamp,
    watchdog: Duration,
}

impl<S, C, T> TransmitCycle<S, C, T>
where
    S: SensorSource,
    C: SequenceClock,
    T: RadioTransmitter + Send + Sync,
{
    pub fn new(
        address: NodeAddress,
        protocol: &Protocol,
        sensors: S,
        clock: C,
        radio: T,
        ramp: TxRamp,
    ) -> Result<Self, KeyError> {
        Ok(Self {
            address,
            codec: protocol.codec(),
            auth: protocol.authenticator()?,
            sensors,
            clock,
            radio,
            ramp,
            watchdog: DEFAULT_WATCHDOG,
        })
    }

    pub fn with_watchdog(mut self, limit: Duration) -> Self {
        self.watchdog = limit;
        self
    }

    /// Sample once, sign, and send the same bytes at every ramp level.
    #[tracing::instrument(skip(self), fields(node = %self.address), err)]
    pub async fn run_once(&mut self) -> Result<AuthenticatedPacket, CycleError> {
        let readings = watchdog("sensor sampling", self.watchdog, self.sensors.sample()).await??;
        let seq = self.clock.next_sequence();

        let report = SensorReport::new(self.address, seq, readings.temperature, readings.battery)
            .with_current(readings.current);

        let tag = self.auth.sign(&self.codec.encode_report(&report)?);
        let packet = AuthenticatedPacket::new(report, tag);
        let bytes = self.codec.encode(&packet)?;

        for &dbm in self.ramp.levels() {
            self.radio.set_tx_power(dbm).await.map_err(HardwareFault::Radio)?;
            self.radio.transmit(&bytes).await.map_err(HardwareFault::Radio)?;

            tracing::debug!(dbm, len = bytes.len(), "sent");
        }

        tracing::info!(%packet, "transmitted report");
        Ok(packet)
    }

    #[inline]
    pub fn radio(&self) -> &T {
        &self.radio
    }
}

#[cfg(test)]
mod test {
    use std::io;

    use super::*;
    use crate::test_util::{
        protocol,
        Recorder,
    };

    struct Fixed(Readings);

    #[async_trait]
    impl SensorSource for Fixed {
        async fn sample(&mut self) -> Result<Readings, HardwareFault> {
            Ok(self.0)
        }
    }

    struct Hung;

    #[async_trait]
    impl SensorSource for Hung {
        async fn sample(&mut self) -> Result<Readings, HardwareFault> {
            futures::future::pending().await
        }
    }

    struct Broken;

    #[async_trait]
    impl SensorSource for Broken {
        async fn sample(&mut self) -> Result<Readings, HardwareFault> {
            Err(HardwareFault::Bus(io::Error::new(io::ErrorKind::NotFound, "no thermal zone")))
        }
    }

    fn readings() -> Readings {
        Readings {
            temperature: Temperature::from_centi_celsius(2150),
            battery:     Battery::Percent(87),
            current:     None,
        }
    }

    #[tokio::test]
    async fn sends_identical_copies_up_the_ramp() {
        let protocol = protocol();
        let radio = Recorder::default();
        let mut cycle = TransmitCycle::new(
            NodeAddress::new(1),
            &protocol,
            Fixed(readings()),
            CounterClock::starting_at(1001),
            radio.clone(),
            TxRamp::default(),
        )
        .unwrap();

        let packet = cycle.run_once().await.unwrap();
        assert_eq!(packet.report().seq(), SequenceNumber::new(1001));

        let sent = radio.payloads();
        assert_eq!(radio.powers(), vec![8, 14]);
        assert_eq!(sent[0], sent[1]);
        assert_eq!(&sent[0][..8], &[0x01, 0x00, 0x00, 0x03, 0xe9, 0x08, 0x66, 0x57]);

        let accepted = protocol.admission().unwrap().authenticate(&sent[0]).unwrap();
        assert_eq!(accepted, packet);

        let next = cycle.run_once().await.unwrap();
        assert_eq!(next.report().seq(), SequenceNumber::new(1002));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_sensor_trips_watchdog() {
        let radio = Recorder::default();
        let mut cycle = TransmitCycle::new(
            NodeAddress::new(1),
            &protocol(),
            Hung,
            CounterClock::starting_at(0),
            radio.clone(),
            TxRamp::default(),
        )
        .unwrap();

        assert!(matches!(cycle.run_once().await, Err(CycleError::Hardware(HardwareFault::Watchdog { .. }))));
        assert!(radio.payloads().is_empty());
    }

    #[tokio::test]
    async fn bus_and_radio_faults_propagate() {
        let mut cycle = TransmitCycle::new(
            NodeAddress::new(1),
            &protocol(),
            Broken,
            CounterClock::starting_at(0),
            Recorder::default(),
            TxRamp::default(),
        )
        .unwrap();
        assert!(matches!(cycle.run_once().await, Err(CycleError::Hardware(HardwareFault::Bus(_)))));

        let mut cycle = TransmitCycle::new(
            NodeAddress::new(1),
            &protocol(),
            Fixed(readings()),
            CounterClock::starting_at(0),
            Recorder::failing(1),
            TxRamp::default(),
        )
        .unwrap();
        assert!(matches!(cycle.run_once().await, Err(CycleError::Hardware(HardwareFault::Radio(_)))));
    }

    #[test]
    fn ramp_validation() {
        assert_eq!(TxRamp::new(vec![]), Err(RampError::Empty));
        assert_eq!(TxRamp::new(vec![14, 8]), Err(RampError::Decreasing(14, 8)));
        assert_eq!(TxRamp::new(vec![5, 5, 20]).unwrap().levels(), &[5, 5, 20]);
    }

    #[test]
    fn rtc_clock_never_repeats() {
        let mut clock = RtcClock::new();

        assert_eq!(clock.at(1_700_000_000), SequenceNumber::new(1_700_000_000));
        assert_eq!(clock.at(1_700_000_000), SequenceNumber::new(1_700_000_001));
        assert_eq!(clock.at(1_600_000_000), SequenceNumber::new(1_700_000_002));
        assert_eq!(clock.at(1_800_000_000), SequenceNumber::new(1_800_000_000));
        assert_eq!(clock.at(-5), SequenceNumber::new(1_800_000_001));
    }
}
