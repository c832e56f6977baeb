//! Order-preserving projections of a result set, one per display mode.
//!
//! Every projection reads the same records and the same classifier, so hop
//! `i` reports identical address, time and tier in all three.

use crate::classify::classify;
use crate::result_set::ResultSet;
use serde::Serialize;
use traceview_model::{HopRecord, SeverityTier};

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry<'a> {
    pub hop_number: usize,
    pub record: &'a HopRecord,
    pub tier: SeverityTier,
}

/// One point of the response-time series; x is the hop number, y the time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub hop_number: usize,
    pub time_ms: f64,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub hop_number: usize,
    pub address: String,
    pub time_ms: f64,
    pub tier: SeverityTier,
}

pub fn timeline(results: &ResultSet) -> Vec<TimelineEntry<'_>> {
    numbered(results)
        .map(|(hop_number, record)| TimelineEntry {
            hop_number,
            record,
            tier: classify(record),
        })
        .collect()
}

pub fn chart(results: &ResultSet) -> Vec<ChartPoint> {
    numbered(results)
        .map(|(hop_number, record)| ChartPoint {
            hop_number,
            time_ms: record.time_ms,
            address: record.address.clone(),
        })
        .collect()
}

pub fn table(results: &ResultSet) -> Vec<TableRow> {
    numbered(results)
        .map(|(hop_number, record)| TableRow {
            hop_number,
            address: record.address.clone(),
            time_ms: record.time_ms,
            tier: classify(record),
        })
        .collect()
}

fn numbered(results: &ResultSet) -> impl Iterator<Item = (usize, &HopRecord)> {
    results.iter().enumerate().map(|(index, hop)| (index + 1, hop))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_numbers_are_one_based_in_measurement_order() {
        let results = ResultSet::new(vec![
            HopRecord::new("192.168.1.1", 40.0, false),
            HopRecord::new("10.0.0.1", 2.0, true),
        ])
        .unwrap();

        let entries = timeline(&results);
        assert_eq!(entries[0].hop_number, 1);
        assert_eq!(entries[0].tier, SeverityTier::Elevated);
        assert_eq!(entries[1].record.address, "10.0.0.1");

        let points = chart(&results);
        assert_eq!(
            points.iter().map(|point| point.hop_number).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(points[0].time_ms, 40.0);

        let rows = table(&results);
        assert_eq!(rows[1].tier, SeverityTier::Anomalous);
        assert_eq!(rows[1].address, "10.0.0.1");
    }

    #[test]
    fn empty_set_projects_to_nothing() {
        let results = ResultSet::empty();
        assert!(timeline(&results).is_empty());
        assert!(chart(&results).is_empty());
        assert!(table(&results).is_empty());
    }
}
