//! The protocol core: authenticate, track, bridge and transmit sensor reports.
//!
//! Everything here runs on a single logical thread of control. State that
//! matters for replay protection ([`SequenceState`], [`DedupeWindow`]) is owned
//! by exactly one station and lives only as long as the process.

mod admission;
pub mod auth;
pub mod board;
pub mod bridge;
mod dedupe;
mod hardware;
mod protocol;
mod sequence;
mod sink;
pub mod station;
pub mod transmit;

#[cfg(test)]
mod test_util;

pub use admission::{
    Accepted,
    Admission,
    Path,
    Rejection,
};
pub use auth::{
    AuthError,
    Authenticator,
    KeyError,
    SharedKey,
};
pub use board::ReportBoard;
pub use bridge::{
    LocalReceiver,
    Relay,
    RelayOutcome,
};
pub use dedupe::DedupeWindow;
pub use hardware::{
    watchdog,
    HardwareFault,
};
pub use protocol::Protocol;
pub use sequence::{
    SeqError,
    SequenceState,
};
pub use sink::ReportSink;
pub use station::{
    DirectStation,
    GatewayStation,
    LoopConfig,
    ModeError,
    OperatingMode,
    ReceiveLoop,
    ReceiverStation,
    Station,
    Step,
};
pub use transmit::{
    CounterClock,
    CycleError,
    Readings,
    RtcClock,
    SensorSource,
    SequenceClock,
    TransmitCycle,
    TxRamp,
};
