use bytes::{
    Buf,
    BufMut,
    Bytes,
    BytesMut,
};
use packed_struct::PackedStruct;

use message::{
    AuthenticatedPacket,
    Battery,
    BatteryField,
    Current,
    DecodeError,
    NodeAddress,
    ReportHeader,
    SensorReport,
    SequenceNumber,
    Tag,
    Temperature,
    WireFormat,
};

use crate::Error;

/// Fixed-layout encoding of reports and authenticated packets for a given
/// [`WireFormat`]. Each datagram carries exactly one packet.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PacketCodec {
    format: WireFormat,
}

impl PacketCodec {
    #[inline]
    pub const fn new(format: WireFormat) -> Self {
        Self {
            format,
        }
    }

    #[inline]
    pub const fn format(&self) -> &WireFormat {
        &self.format
    }

    /// The signed byte representation of a report: everything a packet carries
    /// except the tag.
    ///
    /// A battery reading is converted to the configured encoding if it was
    /// measured in the other one. A current reading is dropped if the format
    /// has no current field.
    pub fn encode_report(&self, report: &SensorReport) -> Result<Bytes, Error> {
        let mut dst = BytesMut::with_capacity(self.format.packet_len());
        self.put_report(report, &mut dst)?;

        Ok(dst.freeze())
    }

    pub fn decode_report(&self, src: &[u8]) -> Result<SensorReport, DecodeError> {
        let expected = self.format.report_len();
        if src.len() != expected {
            return Err(DecodeError::WrongLength {
                expected,
                got: src.len(),
            });
        }

        let (header, mut rest) = src.split_at(ReportHeader::SIZE);

        let header = {
            let mut raw = [0u8; ReportHeader::SIZE];
            raw.copy_from_slice(header);

            ReportHeader::unpack(&raw).map_err(|_| DecodeError::out_of_range("header", 0))?
        };

        let node = NodeAddress::new(header.node);
        if !node.is_sensor() {
            return Err(DecodeError::out_of_range("node", header.node));
        }

        let battery = match self.format.battery {
            BatteryField::Percent => {
                let pct = rest.get_u8();
                if pct > 100 {
                    return Err(DecodeError::out_of_range("battery", pct));
                }

                Battery::Percent(pct)
            },
            BatteryField::Millivolts => Battery::Millivolts(rest.get_u16()),
        };

        let current = match self.format.current {
            true => match rest.get_i16() {
                Current::NOT_MEASURED => None,
                ma => Some(Current::from_milliamps(ma)),
            },
            false => None,
        };

        let report = SensorReport::new(
            node,
            SequenceNumber::new(header.seq),
            Temperature::from_centi_celsius(header.temperature),
            battery,
        )
        .with_current(current);

        Ok(report)
    }

    pub fn encode(&self, packet: &AuthenticatedPacket) -> Result<Bytes, Error> {
        let mut dst = BytesMut::with_capacity(self.format.packet_len());
        self.put_report(packet.report(), &mut dst)?;
        dst.put_slice(packet.tag().as_ref());

        Ok(dst.freeze())
    }

    pub fn decode(&self, src: &[u8]) -> Result<AuthenticatedPacket, DecodeError> {
        let (message, tag) = self.split(src)?;
        let report = self.decode_report(message)?;

        Ok(AuthenticatedPacket::new(report, Tag::from(tag)))
    }

    /// Split a received packet into the signed message and its tag without
    /// interpreting any fields.
    pub fn split<'a>(&self, src: &'a [u8]) -> Result<(&'a [u8], &'a [u8]), DecodeError> {
        let expected = self.format.packet_len();
        if src.len() != expected {
            return Err(DecodeError::WrongLength {
                expected,
                got: src.len(),
            });
        }

        Ok(src.split_at(self.format.report_len()))
    }

    fn put_report(&self, report: &SensorReport, dst: &mut BytesMut) -> Result<(), Error> {
        let header = ReportHeader {
            node:        report.node().get(),
            seq:         report.seq().get(),
            temperature: report.temperature().centi_celsius(),
        };

        dst.put_slice(&header.pack()?);

        match self.format.battery {
            BatteryField::Percent => dst.put_u8(report.battery().percent()),
            BatteryField::Millivolts => dst.put_u16(report.battery().millivolts()),
        }

        if self.format.current {
            let raw = report.current().map_or(Current::NOT_MEASURED, Current::milliamps);
            dst.put_i16(raw);
        }

        Ok(())
    }
}
