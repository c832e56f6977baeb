use crate::result_set::ResultSet;
use traceview_model::Summary;

pub fn summarize(results: &ResultSet) -> Summary {
    if results.is_empty() {
        return Summary::default();
    }

    let mut mean = 0.0;
    let mut min = f64::INFINITY;
    let mut max = 0.0_f64;
    let mut anomaly_count = 0;

    // Running mean: a plain sum of large finite times can overflow.
    for (seen, hop) in results.iter().enumerate() {
        mean += (hop.time_ms - mean) / (seen + 1) as f64;
        min = min.min(hop.time_ms);
        max = max.max(hop.time_ms);
        if hop.anomaly {
            anomaly_count += 1;
        }
    }

    let hop_count = results.len();
    // Rounding can still push the mean just past the extremes.
    let average_time_ms = mean.clamp(min, max);

    Summary {
        average_time_ms,
        max_time_ms: max,
        hop_count,
        anomaly_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traceview_model::HopRecord;

    fn set(hops: &[(&str, f64, bool)]) -> ResultSet {
        ResultSet::new(
            hops.iter()
                .map(|(address, time, anomaly)| HopRecord::new(*address, *time, *anomaly))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn empty_set_is_all_zero() {
        assert_eq!(summarize(&ResultSet::empty()), Summary::default());
    }

    #[test]
    fn counts_and_extremes() {
        let summary = summarize(&set(&[
            ("10.0.0.1", 1.0, false),
            ("10.0.0.2", 42.5, true),
            ("10.0.0.3", 3.5, true),
        ]));
        assert_eq!(summary.hop_count, 3);
        assert_eq!(summary.anomaly_count, 2);
        assert_eq!(summary.max_time_ms, 42.5);
        assert!((summary.average_time_ms - 47.0 / 3.0).abs() < 1e-9);
        assert!((summary.rounded().average_time_ms - 15.67).abs() < 1e-9);
    }

    #[test]
    fn average_stays_within_identical_values() {
        let summary = summarize(&set(&[("a", 0.1, false), ("b", 0.1, false), ("c", 0.1, false)]));
        assert!(summary.average_time_ms <= 0.1);
        assert!(summary.average_time_ms >= 0.1);
    }

    #[test]
    fn average_of_huge_times_stays_finite() {
        let summary = summarize(&set(&[("a", 1e308, false), ("b", 1e308, false), ("c", 0.0, false)]));
        assert!(summary.average_time_ms.is_finite());
        assert!(summary.average_time_ms < summary.max_time_ms);
        let expected = 2.0 / 3.0 * 1e308;
        assert!((summary.average_time_ms - expected).abs() / expected < 1e-12);
    }
}
