use std::time::Duration;

use eyre::{
    eyre,
    Result,
};
use structopt::StructOpt as _;
use tokio::net::UdpSocket;

use loratel::{
    build,
    console::ConsoleSink,
    options::{
        Options,
        Role,
        SensorOptions,
        SequenceOrigin,
        StationOptions,
    },
    sensors::{
        SimulatedSensors,
        SysfsSensors,
    },
    signals,
    trace,
};
use net::DatagramOps;
use runtime::{
    watchdog,
    CounterClock,
    DedupeWindow,
    DirectStation,
    GatewayStation,
    LocalReceiver,
    OperatingMode,
    Protocol,
    ReceiveLoop,
    ReceiverStation,
    Relay,
    RtcClock,
    SensorSource,
    SequenceClock,
    TransmitCycle,
};

/// Radio bring-up that takes longer than this is treated as wedged hardware.
const RADIO_INIT_LIMIT: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> Result<()> {
    util::bootstrap!(
        "starting {} {} (built at {} with rustc {} for {})",
        build::PACKAGE,
        build::VERSION,
        build::BUILD_TIMESTAMP,
        build::RUSTC_SEMVER,
        build::TARGET,
    );

    let options = Options::from_args();

    trace::init();

    tracing::info!(
        application = build::PACKAGE,
        version = build::VERSION,
        built_at = build::BUILD_TIMESTAMP,
        "tracing subsystem initialized"
    );

    let protocol = options.protocol.protocol();
    tracing::info!(format = %protocol.format, "wire format");

    match options.role {
        Role::Sensor(opts) => run_sensor(protocol, opts).await,
        Role::Station(opts) => run_station(protocol, opts).await,
    }
}

#[tracing::instrument(skip_all, fields(mode = %OperatingMode::SensorNode, node = %opts.address))]
async fn run_sensor(protocol: Protocol, opts: SensorOptions) -> Result<()> {
    let radio =
        watchdog("radio init", RADIO_INIT_LIMIT, <UdpSocket as DatagramOps>::connect(&opts.lora_send))
            .await??;

    let sensors: Box<dyn SensorSource> = if opts.simulate {
        Box::new(SimulatedSensors::new())
    } else {
        Box::new(SysfsSensors::new(opts.thermal_zone.clone(), opts.battery_capacity.clone()))
    };

    let clock: Box<dyn SequenceClock> = match opts.sequence_origin {
        SequenceOrigin::Rtc => Box::new(RtcClock::new()),
        SequenceOrigin::Counter => Box::new(CounterClock::starting_at(opts.counter_start)),
    };

    let mut cycle =
        TransmitCycle::new(opts.address, &protocol, sensors, clock, radio, opts.tx_power_ramp.clone())?;

    let shutdown = signals::shutdown()?;
    tokio::pin!(shutdown);

    loop {
        cycle.run_once().await?;

        if opts.once {
            break;
        }

        tokio::select! {
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(Duration::from_secs(opts.interval_secs)) => {},
        }
    }

    tracing::info!("sensor stopped");
    Ok(())
}

#[tracing::instrument(skip_all, fields(address = %opts.address))]
async fn run_station(protocol: Protocol, opts: StationOptions) -> Result<()> {
    let mode = OperatingMode::station(opts.gateway, opts.local_receiver)?;
    tracing::info!(%mode, "station configured");

    let admission = protocol.admission()?;
    let config = opts.loop_config();
    let sink = ConsoleSink::stdio(opts.json, opts.board);
    let shutdown = signals::shutdown()?;

    match mode {
        OperatingMode::BaseStation => {
            let radio = bind(opts.lora_listen).await?;
            let station = DirectStation::new(admission);

            ReceiveLoop::new(station, radio, sink, config).run(shutdown).await?;
        },

        OperatingMode::BaseStationWithGateway => {
            let local_send = opts.local_send.ok_or_else(|| eyre!("--gateway requires --local-send"))?;

            let radio = bind(opts.lora_listen).await?;
            let local =
                watchdog("local radio init", RADIO_INIT_LIMIT, <UdpSocket as DatagramOps>::connect(&local_send))
                    .await??;

            let relay = Relay::new(local, opts.address, DedupeWindow::new(opts.dedupe_window));
            let station = GatewayStation::new(admission, relay);

            ReceiveLoop::new(station, radio, sink, config).run(shutdown).await?;
        },

        OperatingMode::LocalRadioReceiver => {
            let local_listen =
                opts.local_listen.ok_or_else(|| eyre!("--local-receiver requires --local-listen"))?;

            let radio = bind(local_listen).await?;
            let receiver = LocalReceiver::new(opts.address, admission, DedupeWindow::new(opts.dedupe_window));
            let station = ReceiverStation::new(receiver);

            ReceiveLoop::new(station, radio, sink, config).run(shutdown).await?;
        },

        OperatingMode::SensorNode => return Err(eyre!("{} is not a station mode", mode)),
    }

    Ok(())
}

async fn bind(address: std::net::SocketAddr) -> Result<UdpSocket> {
    let sock = watchdog("radio init", RADIO_INIT_LIMIT, <UdpSocket as DatagramOps>::bind(&address)).await??;
    tracing::info!(%address, "listening");

    Ok(sock)
}
