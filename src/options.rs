use std::{
    net::SocketAddr,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use message::{
    BatteryField,
    NodeAddress,
    TagLength,
    WireFormat,
};
use runtime::{
    transmit::RampError,
    LoopConfig,
    Protocol,
    SharedKey,
    TxRamp,
};

#[derive(Debug, Clone, structopt::StructOpt)]
#[structopt(name = "loratel", about = "authenticated sensor telemetry over long-range radio")]
pub struct Options {
    #[structopt(flatten)]
    pub protocol: ProtocolOptions,

    #[structopt(subcommand)]
    pub role: Role,
}

#[derive(Debug, Clone, structopt::StructOpt)]
pub enum Role {
    /// Sample, sign and transmit reports.
    Sensor(SensorOptions),

    /// Receive, verify and surface reports; optionally relay or listen locally.
    Station(StationOptions),
}

/// Settings every node and station in one deployment must share.
#[derive(Debug, Clone, structopt::StructOpt)]
pub struct ProtocolOptions {
    #[structopt(long, env = "HMAC_KEY", hide_env_values = true)]
    pub key: Option<SharedKey>,

    /// Tag length in bytes (4 to 20).
    #[structopt(long, env = "HMAC_TRUNC", default_value = "4")]
    pub trunc: TagLength,

    /// Battery field encoding: percent or millivolts.
    #[structopt(long, env = "LORATEL_BATTERY", default_value = "percent")]
    pub battery: BatteryField,

    /// Carry the optional current field.
    #[structopt(long, env = "LORATEL_CURRENT", parse(try_from_str), default_value = "false")]
    pub current: bool,
}

impl ProtocolOptions {
    #[inline]
    pub fn format(&self) -> WireFormat {
        WireFormat {
            tag_len: self.trunc,
            battery: self.battery,
            current: self.current,
        }
    }

    /// Falls back to the placeholder key, loudly.
    pub fn protocol(&self) -> Protocol {
        let key = match &self.key {
            Some(key) => key.clone(),
            None => {
                tracing::warn!("no HMAC_KEY configured, using the well-known placeholder key");
                SharedKey::placeholder()
            },
        };

        if key.is_placeholder() {
            tracing::warn!("reports are signed with the placeholder key and can be forged by anyone");
        }

        Protocol::new(self.format(), key)
    }
}

#[derive(Debug, Clone, structopt::StructOpt)]
pub struct StationOptions {
    /// Long-range radio endpoint to listen on.
    #[structopt(long, default_value = "0.0.0.0:7600")]
    pub lora_listen: SocketAddr,

    /// This station's address; used as the relay identity.
    #[structopt(long, default_value = "128", parse(try_from_str = parse_station))]
    pub address: NodeAddress,

    /// Rebroadcast accepted reports on the local radio.
    #[structopt(long, requires = "local-send", conflicts_with = "local-receiver")]
    pub gateway: bool,

    #[structopt(long)]
    pub local_send: Option<SocketAddr>,

    /// Listen on the local radio instead of the long-range one.
    #[structopt(long, requires = "local-listen")]
    pub local_receiver: bool,

    #[structopt(long)]
    pub local_listen: Option<SocketAddr>,

    #[structopt(long, default_value = "1000")]
    pub poll_timeout_ms: u64,

    #[structopt(long, default_value = "5")]
    pub refresh_secs: u64,

    /// Report ids remembered for relay and receiver dedupe.
    #[structopt(long, default_value = "64")]
    pub dedupe_window: usize,

    /// One JSON object per accepted report.
    #[structopt(long)]
    pub json: bool,

    /// Show the report board on every refresh.
    #[structopt(long)]
    pub board: bool,
}

impl StationOptions {
    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            poll_timeout:     Duration::from_millis(self.poll_timeout_ms),
            refresh_interval: Duration::from_secs(self.refresh_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOrigin {
    Counter,
    Rtc,
}

impl FromStr for SequenceOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "counter" => Ok(Self::Counter),
            "rtc" => Ok(Self::Rtc),
            other => Err(format!("unknown sequence origin {:?} (expected counter or rtc)", other)),
        }
    }
}

#[derive(Debug, Clone, structopt::StructOpt)]
pub struct SensorOptions {
    #[structopt(long, default_value = "1", parse(try_from_str = parse_sensor))]
    pub address: NodeAddress,

    /// Long-range radio endpoint to transmit to.
    #[structopt(long, default_value = "255.255.255.255:7600")]
    pub lora_send: SocketAddr,

    #[structopt(long, default_value = "300")]
    pub interval_secs: u64,

    /// Transmit powers in dBm, one copy per level.
    #[structopt(long, default_value = "8,14", parse(try_from_str = parse_ramp))]
    pub tx_power_ramp: TxRamp,

    /// Run one cycle and exit.
    #[structopt(long)]
    pub once: bool,

    /// Random-walk readings instead of sysfs.
    #[structopt(long)]
    pub simulate: bool,

    #[structopt(long, default_value = "/sys/class/thermal/thermal_zone0/temp")]
    pub thermal_zone: PathBuf,

    #[structopt(long, default_value = "/sys/class/power_supply/BAT0/capacity")]
    pub battery_capacity: PathBuf,

    #[structopt(long, default_value = "rtc")]
    pub sequence_origin: SequenceOrigin,

    /// First value handed out by the counter origin.
    #[structopt(long, default_value = "0")]
    pub counter_start: u32,
}

fn parse_address(s: &str, want_sensor: bool) -> Result<NodeAddress, String> {
    let raw = match s.strip_prefix("0x") {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    }
    .map_err(|e| e.to_string())?;

    let addr = NodeAddress::new(raw);
    let (ok, range) = if want_sensor {
        (addr.is_sensor(), NodeAddress::SENSORS)
    } else {
        (addr.is_station(), NodeAddress::STATIONS)
    };

    if !ok {
        return Err(format!("address {} outside {}..={}", raw, range.start(), range.end()));
    }

    Ok(addr)
}

fn parse_sensor(s: &str) -> Result<NodeAddress, String> {
    parse_address(s, true)
}

fn parse_station(s: &str) -> Result<NodeAddress, String> {
    parse_address(s, false)
}

fn parse_ramp(s: &str) -> Result<TxRamp, String> {
    let levels = s
        .split(',')
        .map(|level| level.trim().parse::<i8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    TxRamp::new(levels).map_err(|e: RampError| e.to_string())
}
