use traceview_model::{HopRecord, SeverityTier};

/// Round-trip time above which an unflagged hop is `Elevated`. Strict `>`.
pub const ELEVATED_THRESHOLD_MS: f64 = 20.0;

/// Highest precedence first. The anomaly flag wins over any timing.
pub const TIER_PRECEDENCE: [SeverityTier; 3] = [
    SeverityTier::Anomalous,
    SeverityTier::Elevated,
    SeverityTier::Normal,
];

pub fn classify(hop: &HopRecord) -> SeverityTier {
    if hop.anomaly {
        SeverityTier::Anomalous
    } else if exceeds_threshold(hop.time_ms) {
        SeverityTier::Elevated
    } else {
        SeverityTier::Normal
    }
}

/// Whether a time is drawn highlighted, independent of the anomaly flag.
pub fn exceeds_threshold(time_ms: f64) -> bool {
    time_ms > ELEVATED_THRESHOLD_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strict() {
        assert_eq!(
            classify(&HopRecord::new("a", ELEVATED_THRESHOLD_MS, false)),
            SeverityTier::Normal
        );
        assert_eq!(
            classify(&HopRecord::new("a", ELEVATED_THRESHOLD_MS + 1e-9, false)),
            SeverityTier::Elevated
        );
        assert_eq!(classify(&HopRecord::new("a", 0.0, false)), SeverityTier::Normal);
    }

    #[test]
    fn anomaly_flag_takes_precedence() {
        assert_eq!(TIER_PRECEDENCE[0], SeverityTier::Anomalous);
        for time in [0.0, ELEVATED_THRESHOLD_MS, 250.0] {
            assert_eq!(
                classify(&HopRecord::new("a", time, true)),
                SeverityTier::Anomalous
            );
        }
    }

    #[test]
    fn precedence_matches_tier_order() {
        let hops = [
            HopRecord::new("a", 5.0, false),
            HopRecord::new("b", 25.0, false),
            HopRecord::new("c", 25.0, true),
        ];
        let mut tiers: Vec<SeverityTier> = hops.iter().map(classify).collect();
        tiers.reverse();
        assert_eq!(tiers, TIER_PRECEDENCE.to_vec());
    }
}
