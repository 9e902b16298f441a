#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use loratel::{
    message::{
        AuthenticatedPacket,
        Battery,
        NodeAddress,
        SensorReport,
        SequenceNumber,
        Temperature,
        WireFormat,
    },
    net::{
        self,
        ChannelReceiver,
        Frame,
    },
    runtime::{
        Accepted,
        CounterClock,
        HardwareFault,
        LoopConfig,
        Protocol,
        Readings,
        ReceiveLoop,
        SensorSource,
        SharedKey,
        Station,
        TransmitCycle,
        TxRamp,
    },
};

pub const KEY: &str = "K: correct horse battery staple";

pub fn protocol() -> Protocol {
    Protocol::new(WireFormat::default(), SharedKey::new(KEY).unwrap())
}

pub fn config() -> LoopConfig {
    LoopConfig {
        poll_timeout: Duration::from_millis(50),
        ..LoopConfig::default()
    }
}

pub struct FixedReadings(pub Readings);

#[async_trait]
impl SensorSource for FixedReadings {
    async fn sample(&mut self) -> Result<Readings, HardwareFault> {
        Ok(self.0)
    }
}

/// 21.50 °C at 87%.
pub fn room() -> Readings {
    Readings {
        temperature: Temperature::from_centi_celsius(2150),
        battery:     Battery::Percent(87),
        current:     None,
    }
}

pub type Sensor = TransmitCycle<FixedReadings, CounterClock, mpsc::Sender<Frame>>;

pub fn sensor(node: u8, first_seq: u32, radio: mpsc::Sender<Frame>, ramp: TxRamp) -> Sensor {
    TransmitCycle::new(
        NodeAddress::new(node),
        &protocol(),
        FixedReadings(room()),
        CounterClock::starting_at(first_seq),
        radio,
        ramp,
    )
    .unwrap()
}

/// Bytes a key holder would send for `node`/`seq`, without going through a
/// transmit cycle.
pub fn signed(protocol: &Protocol, node: u8, seq: u32) -> Bytes {
    let codec = protocol.codec();
    let report = SensorReport::new(
        NodeAddress::new(node),
        SequenceNumber::new(seq),
        room().temperature,
        room().battery,
    );

    let tag = protocol.authenticator().unwrap().sign(&codec.encode_report(&report).unwrap());
    codec.encode(&AuthenticatedPacket::new(report, tag)).unwrap()
}

pub type TestLoop<St> = ReceiveLoop<St, ChannelReceiver, Vec<Accepted>>;

pub fn station<St: Station>(station: St) -> (mpsc::Sender<Frame>, TestLoop<St>) {
    let (tx, rx) = net::channel(16);
    (tx, ReceiveLoop::new(station, rx, Vec::new(), config()))
}
