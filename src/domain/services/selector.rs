use crate::domain::model::NormalizedInterval;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub intervals: Vec<NormalizedInterval>,
    /// 沒有任何未來區間，改取最早的幾筆
    pub used_fallback: bool,
}

/// 選出 `now` 之後（含）最早的 `max_count` 筆區間。
///
/// 上游資料過期而全部都在過去時，不回傳空集合，
/// 而是把所有區間依時間排序後取前 `max_count` 筆。
/// 呼叫端保證 `intervals` 不為空。
pub fn select_upcoming(
    intervals: Vec<NormalizedInterval>,
    now: DateTime<Utc>,
    max_count: usize,
) -> Selection {
    let mut upcoming: Vec<NormalizedInterval> = intervals
        .iter()
        .filter(|interval| interval.instant >= now)
        .cloned()
        .collect();

    if !upcoming.is_empty() {
        upcoming.sort_by_key(|interval| interval.instant);
        upcoming.truncate(max_count);
        return Selection {
            intervals: upcoming,
            used_fallback: false,
        };
    }

    let mut all = intervals;
    all.sort_by_key(|interval| interval.instant);
    all.truncate(max_count);
    Selection {
        intervals: all,
        used_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;

    fn interval(instant: DateTime<Utc>, price: i64) -> NormalizedInterval {
        NormalizedInterval {
            instant,
            raw_price: Decimal::from(price),
            degraded: false,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 19, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_selects_future_sorted_and_capped() {
        let intervals = (0..20)
            .rev()
            .map(|i| interval(now() + Duration::minutes(15 * (i - 4)), i))
            .collect();

        let selection = select_upcoming(intervals, now(), 12);

        assert!(!selection.used_fallback);
        assert_eq!(selection.intervals.len(), 12);
        assert_eq!(selection.intervals[0].instant, now());
        assert!(selection
            .intervals
            .windows(2)
            .all(|w| w[0].instant <= w[1].instant));
        assert!(selection.intervals.iter().all(|i| i.instant >= now()));
    }

    #[test]
    fn test_all_past_falls_back_to_earliest() {
        let intervals = (1..=20)
            .map(|i| interval(now() - Duration::minutes(15 * i), i))
            .collect();

        let selection = select_upcoming(intervals, now(), 12);

        assert!(selection.used_fallback);
        assert_eq!(selection.intervals.len(), 12);
        assert_eq!(
            selection.intervals[0].instant,
            now() - Duration::minutes(15 * 20)
        );
        assert!(selection
            .intervals
            .windows(2)
            .all(|w| w[0].instant <= w[1].instant));
    }

    #[test]
    fn test_fewer_than_max_returns_all_upcoming() {
        let intervals = vec![
            interval(now() + Duration::minutes(30), 2),
            interval(now() - Duration::minutes(15), 1),
            interval(now() + Duration::minutes(15), 3),
        ];

        let selection = select_upcoming(intervals, now(), 12);

        assert!(!selection.used_fallback);
        assert_eq!(selection.intervals.len(), 2);
        assert_eq!(selection.intervals[0].raw_price, Decimal::from(3));
    }
}
