use loratel::{
    message::{
        Battery,
        NodeAddress,
        SequenceNumber,
        Temperature,
    },
    net::{
        self,
        Frame,
    },
    runtime::{
        AuthError,
        DedupeWindow,
        DirectStation,
        GatewayStation,
        LocalReceiver,
        Path,
        Protocol,
        ReceiverStation,
        Rejection,
        Relay,
        SharedKey,
        Step,
        TxRamp,
    },
};

mod common;

const GATEWAY: NodeAddress = NodeAddress::new(0x80);
const OTHER_GATEWAY: NodeAddress = NodeAddress::new(0x82);
const RECEIVER: NodeAddress = NodeAddress::new(0x81);

#[tokio::test]
async fn direct_station_scenario() -> eyre::Result<()> {
    let protocol = common::protocol();
    let (lora, mut base) = common::station(DirectStation::new(protocol.admission()?));
    let mut node = common::sensor(1, 1001, lora.clone(), TxRamp::new(vec![14])?);

    node.run_once().await?;
    assert!(matches!(base.poll_once().await?, Step::Accepted(_)));

    let first = base.sink()[0].clone();
    let report = first.report();
    assert_eq!(report.node(), NodeAddress::new(1));
    assert_eq!(report.seq(), SequenceNumber::new(1001));
    assert_eq!(report.temperature(), Temperature::from_centi_celsius(2150));
    assert_eq!(report.battery(), Battery::Percent(87));

    // identical bytes again
    lora.send(Frame::new(first.raw.clone())).await?;
    assert!(matches!(base.poll_once().await?, Step::Rejected(Rejection::Replay(_))));

    node.run_once().await?;
    assert!(matches!(base.poll_once().await?, Step::Accepted(id) if id.seq == SequenceNumber::new(1002)));

    // validly signed, but behind the last accepted sequence number
    lora.send(Frame::new(common::signed(&protocol, 1, 999))).await?;
    assert!(matches!(base.poll_once().await?, Step::Rejected(Rejection::Replay(_))));

    let stranger = Protocol::new(protocol.format, SharedKey::new("not K")?);
    lora.send(Frame::new(common::signed(&stranger, 1, 5000))).await?;
    assert_eq!(base.poll_once().await?, Step::Rejected(Rejection::Auth(AuthError::BadTag)));

    assert_eq!(base.poll_once().await?, Step::Idle);
    assert_eq!(base.sink().len(), 2);

    Ok(())
}

#[tokio::test]
async fn ramp_copies_surface_once() -> eyre::Result<()> {
    let protocol = common::protocol();
    let (lora, mut base) = common::station(DirectStation::new(protocol.admission()?));
    let mut node = common::sensor(1, 7, lora, TxRamp::default());

    node.run_once().await?;

    assert!(matches!(base.poll_once().await?, Step::Accepted(_)));
    assert!(matches!(base.poll_once().await?, Step::Rejected(Rejection::Replay(_))));
    assert_eq!(base.sink().len(), 1);

    Ok(())
}

#[tokio::test]
async fn gateway_bridges_to_local_receiver() -> eyre::Result<()> {
    let protocol = common::protocol();

    let (local_tx, local_rx) = net::channel(16);
    let relay = Relay::new(local_tx, GATEWAY, DedupeWindow::default());
    let (lora, mut gateway) = common::station(GatewayStation::new(protocol.admission()?, relay));

    let receiver = LocalReceiver::new(RECEIVER, protocol.admission()?, DedupeWindow::default());
    let mut receiver = loratel::runtime::ReceiveLoop::new(
        ReceiverStation::new(receiver),
        local_rx,
        Vec::new(),
        common::config(),
    );

    let mut node = common::sensor(2, 5, lora, TxRamp::default());
    node.run_once().await?;

    assert!(matches!(gateway.poll_once().await?, Step::Accepted(_)));
    assert!(matches!(gateway.poll_once().await?, Step::Rejected(_)));

    assert!(matches!(receiver.poll_once().await?, Step::Accepted(_)));
    assert_eq!(receiver.poll_once().await?, Step::Idle);

    let surfaced = &receiver.sink()[0];
    assert_eq!(surfaced.path, Path::Relayed {
        relay: GATEWAY
    });
    assert_eq!(surfaced.raw, gateway.sink()[0].raw);

    Ok(())
}

#[tokio::test]
async fn receiver_merges_relay_paths() -> eyre::Result<()> {
    let protocol = common::protocol();
    let (local_tx, local_rx) = net::channel(16);

    let mut gateways = Vec::new();
    for address in [GATEWAY, OTHER_GATEWAY] {
        let relay = Relay::new(local_tx.clone(), address, DedupeWindow::default());
        gateways.push(common::station(GatewayStation::new(protocol.admission()?, relay)));
    }

    let receiver = LocalReceiver::new(RECEIVER, protocol.admission()?, DedupeWindow::default());
    let mut receiver = loratel::runtime::ReceiveLoop::new(
        ReceiverStation::new(receiver),
        local_rx,
        Vec::new(),
        common::config(),
    );

    let raw = common::signed(&protocol, 2, 5);
    for (lora, gateway) in &mut gateways {
        lora.send(Frame::new(raw.clone())).await?;
        assert!(matches!(gateway.poll_once().await?, Step::Accepted(_)));
    }

    assert!(matches!(receiver.poll_once().await?, Step::Accepted(_)));
    assert!(matches!(receiver.poll_once().await?, Step::Rejected(Rejection::Duplicate(_))));
    assert_eq!(receiver.poll_once().await?, Step::Idle);

    assert_eq!(receiver.sink().len(), 1);
    assert_eq!(receiver.sink()[0].path, Path::Relayed {
        relay: GATEWAY
    });

    Ok(())
}
