use std::{
    io::{
        self,
        Write,
    },
    time::Instant,
};

use message::{
    NodeAddress,
    SensorReport,
};
use runtime::{
    Accepted,
    Path,
    ReportBoard,
    ReportSink,
};

/// One accepted report as emitted with `--json`.
#[derive(Debug, serde::Serialize)]
pub struct Record<'a> {
    #[serde(flatten)]
    pub report: &'a SensorReport,
    pub rssi:   Option<i16>,
    pub snr:    Option<f32>,
    pub relay:  Option<NodeAddress>,
    pub tag:    String,
}

impl<'a> From<&'a Accepted> for Record<'a> {
    fn from(accepted: &'a Accepted) -> Self {
        Self {
            report: accepted.report(),
            rssi:   accepted.link.rssi,
            snr:    accepted.link.snr,
            relay:  match accepted.path {
                Path::Direct => None,
                Path::Relayed {
                    relay,
                } => Some(relay),
            },
            tag:    accepted.packet.tag().to_string(),
        }
    }
}

/// Prints accepted reports on `out` and, with a board, a status summary on
/// `display` at every refresh.
pub struct ConsoleSink<W, D> {
    out:     W,
    display: D,
    json:    bool,
    board:   Option<ReportBoard>,
}

impl ConsoleSink<io::Stdout, io::Stderr> {
    pub fn stdio(json: bool, board: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), json, board)
    }
}

impl<W, D> ConsoleSink<W, D>
where
    W: Write,
    D: Write,
{
    pub fn new(out: W, display: D, json: bool, board: bool) -> Self {
        Self {
            out,
            display,
            json,
            board: board.then(|| ReportBoard::new(Instant::now())),
        }
    }

    fn write_report(&mut self, accepted: &Accepted) -> io::Result<()> {
        if self.json {
            serde_json::to_writer(&mut self.out, &Record::from(accepted))?;
            writeln!(self.out)?;
        } else {
            writeln!(self.out, "{}", rx_line(accepted))?;
        }

        self.out.flush()
    }

    pub fn into_parts(self) -> (W, D) {
        (self.out, self.display)
    }
}

impl<W, D> ReportSink for ConsoleSink<W, D>
where
    W: Write,
    D: Write,
{
    fn accept(&mut self, accepted: &Accepted) {
        util::trace_catch!(self.write_report(accepted), "writing report to console");

        if let Some(board) = &mut self.board {
            board.record(accepted.report(), Instant::now());
        }
    }

    fn refresh(&mut self) {
        if let Some(board) = &self.board {
            let rendered = board.render(Instant::now());
            util::trace_catch!(writeln!(self.display, "{}", rendered), "drawing report board");
        }
    }
}

/// `RX: rssi, snr, node, seq, battery, temperature, path`
pub fn rx_line(accepted: &Accepted) -> String {
    let report = accepted.report();

    let rssi = accepted.link.rssi.map_or_else(|| "-".to_owned(), |r| r.to_string());
    let snr = accepted.link.snr.map_or_else(|| "-".to_owned(), |s| format!("{:.1}", s));
    let path = match accepted.path {
        Path::Direct => "direct".to_owned(),
        Path::Relayed {
            relay,
        } => format!("via {}", relay),
    };

    format!(
        "RX: {}, {}, {}, {:08x}, {}, {}, {}",
        rssi,
        snr,
        report.node(),
        report.seq().get(),
        report.battery(),
        report.temperature(),
        path,
    )
}
