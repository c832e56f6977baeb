//! Shared data structures for traceview.

use serde::{Deserialize, Serialize};

/// One measured hop as it appears in a results snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HopRecord {
    #[serde(rename = "IP Address")]
    pub address: String,
    #[serde(rename = "Time")]
    pub time_ms: f64,
    #[serde(rename = "Anomaly")]
    pub anomaly: bool,
}

impl HopRecord {
    pub fn new(address: impl Into<String>, time_ms: f64, anomaly: bool) -> Self {
        Self {
            address: address.into(),
            time_ms,
            anomaly,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Normal,
    Elevated,
    Anomalous,
}

impl SeverityTier {
    pub fn status_label(&self) -> &'static str {
        match self {
            SeverityTier::Normal => "Normal",
            SeverityTier::Elevated => "Elevated",
            SeverityTier::Anomalous => "Anomaly Detected",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            SeverityTier::Normal => "Normal",
            SeverityTier::Elevated => "Elevated",
            SeverityTier::Anomalous => "Anomaly",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    #[default]
    Timeline,
    Chart,
    Table,
}

impl ActiveView {
    pub const ALL: [ActiveView; 3] = [ActiveView::Timeline, ActiveView::Chart, ActiveView::Table];

    /// Tab order, wrapping from `Table` back to `Timeline`.
    pub fn next(self) -> Self {
        match self {
            ActiveView::Timeline => ActiveView::Chart,
            ActiveView::Chart => ActiveView::Table,
            ActiveView::Table => ActiveView::Timeline,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ActiveView::Timeline => "Timeline",
            ActiveView::Chart => "Chart",
            ActiveView::Table => "Table",
        }
    }
}

/// Aggregate statistics over a result set, kept at full precision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Summary {
    pub average_time_ms: f64,
    pub max_time_ms: f64,
    pub hop_count: usize,
    pub anomaly_count: usize,
}

impl Summary {
    /// Copy with the timing fields rounded to two decimals for display.
    pub fn rounded(&self) -> Self {
        Self {
            average_time_ms: round_ms(self.average_time_ms),
            max_time_ms: round_ms(self.max_time_ms),
            ..*self
        }
    }

    pub fn anomaly_badge(&self) -> Option<String> {
        match self.anomaly_count {
            0 => None,
            1 => Some("1 Anomaly".to_string()),
            n => Some(format!("{n} Anomalies")),
        }
    }
}

pub fn round_ms(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn format_ms(value: f64) -> String {
    format!("{value:.2} ms")
}
