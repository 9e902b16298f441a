use std::{
    collections::{
        BTreeMap,
        VecDeque,
    },
    time::{
        Duration,
        Instant,
    },
};

use message::{
    Battery,
    NodeAddress,
    SensorReport,
    Temperature,
};

/// How long reports count toward a node's min/max.
pub const HISTORY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
struct Entry {
    at:          Instant,
    temperature: Temperature,
    battery:     Battery,
}

#[derive(Debug, Clone, Default)]
struct NodeHistory {
    entries: VecDeque<Entry>,
}

impl NodeHistory {
    fn latest(&self) -> Option<&Entry> {
        self.entries.back()
    }

    fn min_max(&self) -> Option<(Temperature, Temperature)> {
        let mut temps = self.entries.iter().map(|e| e.temperature);
        let first = temps.next()?;

        Some(temps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }
}

/// Rolling per-node summary of what the station has accepted, sized for a
/// two-line character display.
#[derive(Debug, Clone)]
pub struct ReportBoard {
    ready: Instant,
    nodes: BTreeMap<NodeAddress, NodeHistory>,
}

impl ReportBoard {
    pub fn new(ready: Instant) -> Self {
        Self {
            ready,
            nodes: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, report: &SensorReport, at: Instant) {
        let history = self.nodes.entry(report.node()).or_default();

        history.entries.push_back(Entry {
            at,
            temperature: report.temperature(),
            battery: report.battery(),
        });

        // The newest entry always stays, however old.
        while history.entries.len() > 1 {
            match history.entries.front() {
                Some(oldest) if oldest.at + HISTORY < at => {
                    history.entries.pop_front();
                },
                _ => break,
            }
        }
    }

    pub fn min_max(&self, node: NodeAddress) -> Option<(Temperature, Temperature)> {
        self.nodes.get(&node)?.min_max()
    }

    /// Latest report and 24h range for the lowest-numbered node.
    pub fn render(&self, now: Instant) -> String {
        let summary = self
            .nodes
            .iter()
            .next()
            .and_then(|(node, history)| Some((node, history.latest()?, history.min_max()?)));

        let (node, latest, (lo, hi)) = match summary {
            Some(summary) => summary,
            None => return format!("Ready {}", freshness_tag(now.saturating_duration_since(self.ready))),
        };

        format!(
            "{} {} {} {}\n {} {}",
            node,
            latest.battery,
            freshness_tag(now.saturating_duration_since(latest.at)),
            latest.temperature,
            lo,
            hi,
        )
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Coarse age: whole days, else whole hours, else whole minutes.
pub fn freshness_tag(age: Duration) -> String {
    let secs = age.as_secs();

    match (secs / 86_400, secs / 3_600, secs / 60) {
        (days, _, _) if days > 0 => format!("{}d", days),
        (_, hours, _) if hours > 0 => format!("{}h", hours),
        (_, _, minutes) => format!("{}m", minutes),
    }
}

#[cfg(test)]
mod test {
    use message::SequenceNumber;

    use super::*;

    fn report(node: u8, centi: i16) -> SensorReport {
        SensorReport::new(
            NodeAddress::new(node),
            SequenceNumber::new(1),
            Temperature::from_centi_celsius(centi),
            Battery::Percent(87),
        )
    }

    #[test]
    fn freshness() {
        assert_eq!(freshness_tag(Duration::from_secs(59)), "0m");
        assert_eq!(freshness_tag(Duration::from_secs(125)), "2m");
        assert_eq!(freshness_tag(Duration::from_secs(3 * 3600 + 5)), "3h");
        assert_eq!(freshness_tag(Duration::from_secs(2 * 86_400)), "2d");
    }

    #[test]
    fn ready_until_first_report() {
        let t0 = Instant::now();
        let board = ReportBoard::new(t0);

        assert_eq!(board.render(t0 + Duration::from_secs(60)), "Ready 1m");
    }

    #[test]
    fn shows_lowest_node_with_range() {
        let t0 = Instant::now();
        let mut board = ReportBoard::new(t0);

        board.record(&report(7, 1000), t0);
        board.record(&report(2, 2150), t0);
        board.record(&report(2, 1800), t0 + Duration::from_secs(60));

        assert_eq!(
            board.render(t0 + Duration::from_secs(180)),
            "2 87% 2m 18.00C\n 18.00C 21.50C"
        );
    }

    #[test]
    fn forgets_after_a_day() {
        let t0 = Instant::now();
        let mut board = ReportBoard::new(t0);
        let node = NodeAddress::new(1);

        board.record(&report(1, -500), t0);
        board.record(&report(1, 2000), t0 + Duration::from_secs(3600));
        assert_eq!(
            board.min_max(node),
            Some((Temperature::from_centi_celsius(-500), Temperature::from_centi_celsius(2000)))
        );

        board.record(&report(1, 1000), t0 + HISTORY + Duration::from_secs(1));
        assert_eq!(
            board.min_max(node),
            Some((Temperature::from_centi_celsius(1000), Temperature::from_centi_celsius(2000)))
        );
    }
}
