//! Segment Extractor — pure read of metric samples within a half-open
//! time window, with an explicit optional entity filter.

use super::tail_matches;
use crate::types::MetricSample;
use chrono::NaiveDateTime;

/// All samples with `start <= timestamp < end` matching the tail filter.
///
/// `tail = None` means no filtering; an empty result is a normal outcome,
/// not an error. No side effects.
pub fn extract_segment<'a>(
    samples: &'a [MetricSample],
    start: NaiveDateTime,
    end: NaiveDateTime,
    tail: Option<&str>,
) -> Vec<&'a MetricSample> {
    samples
        .iter()
        .filter(|s| s.timestamp >= start && s.timestamp < end)
        .filter(|s| tail_matches(tail, s.tail.as_deref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample(tail: Option<&str>, day: u32, value: f64) -> MetricSample {
        MetricSample {
            tail: tail.map(String::from),
            timestamp: ts(day),
            value,
        }
    }

    #[test]
    fn test_window_is_half_open() {
        let samples = vec![
            sample(None, 1, 1.0),
            sample(None, 5, 2.0),
            sample(None, 10, 3.0),
        ];

        let seg = extract_segment(&samples, ts(1), ts(10), None);
        let values: Vec<f64> = seg.iter().map(|s| s.value).collect();
        // start inclusive, end exclusive
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_entity_filter() {
        let samples = vec![
            sample(Some("N1"), 2, 1.0),
            sample(Some("N2"), 3, 2.0),
            sample(None, 4, 3.0),
        ];

        let seg = extract_segment(&samples, ts(1), ts(10), Some("N1"));
        assert_eq!(seg.len(), 1);
        assert_eq!(seg[0].value, 1.0);

        // No filter keeps everything in the window
        assert_eq!(extract_segment(&samples, ts(1), ts(10), None).len(), 3);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let samples = vec![sample(None, 1, 1.0)];
        assert!(extract_segment(&samples, ts(5), ts(10), None).is_empty());
    }
}
