use std::{
    io,
    sync::{
        atomic::{
            AtomicUsize,
            Ordering,
        },
        Arc,
        Mutex,
    },
};

use bytes::Bytes;

use message::{
    AuthenticatedPacket,
    Battery,
    NodeAddress,
    SensorReport,
    SequenceNumber,
    Temperature,
    WireFormat,
};

use crate::{
    Protocol,
    SharedKey,
};

pub fn protocol() -> Protocol {
    Protocol::new(WireFormat::default(), SharedKey::new("correct horse battery staple").unwrap())
}

pub fn report(node: u8, seq: u32) -> SensorReport {
    SensorReport::new(
        NodeAddress::new(node),
        SequenceNumber::new(seq),
        Temperature::from_centi_celsius(2150),
        Battery::Percent(87),
    )
}

pub fn signed(protocol: &Protocol, node: u8, seq: u32) -> Bytes {
    let codec = protocol.codec();
    let report = report(node, seq);
    let tag = protocol.authenticator().unwrap().sign(&codec.encode_report(&report).unwrap());

    codec.encode(&AuthenticatedPacket::new(report, tag)).unwrap()
}

/// Transmitter that remembers what it sent and fails on demand.
#[derive(Clone, Default)]
pub struct Recorder {
    pub sent:     Arc<Mutex<Vec<(i8, Bytes)>>>,
    pub failures: Arc<AtomicUsize>,
    power:        Arc<Mutex<i8>>,
}

impl Recorder {
    pub fn failing(times: usize) -> Self {
        let recorder = Self::default();
        recorder.failures.store(times, Ordering::SeqCst);
        recorder
    }

    pub fn payloads(&self) -> Vec<Bytes> {
        self.sent.lock().unwrap().iter().map(|(_, b)| b.clone()).collect()
    }

    pub fn powers(&self) -> Vec<i8> {
        self.sent.lock().unwrap().iter().map(|(p, _)| *p).collect()
    }
}

#[async_trait::async_trait]
impl net::RadioTransmitter for Recorder {
    async fn transmit(&self, payload: &[u8]) -> io::Result<()> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(io::Error::new(io::ErrorKind::Other, "radio busy"));
        }

        let power = *self.power.lock().unwrap();
        self.sent.lock().unwrap().push((power, Bytes::copy_from_slice(payload)));

        Ok(())
    }

    async fn set_tx_power(&self, dbm: i8) -> io::Result<()> {
        *self.power.lock().unwrap() = dbm;
        Ok(())
    }
}
