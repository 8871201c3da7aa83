use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

static EXPLICIT_OFFSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(z|[+-]\d{2}:?\d{2})$").expect("offset pattern is a valid regex")
});

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// 沒有明確時區時，「照字面」解讀所用的時區
#[derive(Debug, Clone, Copy)]
pub enum LocalZone {
    System,
    Named(Tz),
}

impl LocalZone {
    fn resolve(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            LocalZone::System => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            LocalZone::Named(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// 把格式與時區都不固定的時間字串轉為絕對時間點。
///
/// 字串帶有 `Z` 或 `±HH:MM` 時直接解析；否則依序產生三個候選：
/// 照字面（本地時區）、UTC、固定偏移（預設 UTC+3），
/// 再以接受窗口 `[now - lookback, now + horizon]` 篩選。
#[derive(Debug, Clone)]
pub struct TimestampNormalizer {
    local_zone: LocalZone,
    fallback_offset: FixedOffset,
    lookback: Duration,
    horizon: Duration,
}

impl TimestampNormalizer {
    pub fn new(
        local_zone: LocalZone,
        fallback_offset: FixedOffset,
        lookback: Duration,
        horizon: Duration,
    ) -> Self {
        Self {
            local_zone,
            fallback_offset,
            lookback,
            horizon,
        }
    }

    pub fn parse_timestamp(&self, raw: Option<&str>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }

        if EXPLICIT_OFFSET.is_match(raw) {
            if let Some(instant) = parse_with_offset(raw) {
                return Some(instant);
            }
        }

        let candidates = self.candidates(raw);
        if candidates.is_empty() {
            return None;
        }

        let min_allowed = now - self.lookback;
        let max_allowed = now + self.horizon;
        let mut accepted: Vec<DateTime<Utc>> = candidates
            .iter()
            .copied()
            .filter(|c| *c >= min_allowed && *c <= max_allowed)
            .collect();

        if !accepted.is_empty() {
            accepted.sort();
            return accepted
                .iter()
                .copied()
                .find(|c| *c >= now)
                .or_else(|| accepted.first().copied());
        }

        candidates
            .into_iter()
            .min_by_key(|c| (*c - now).num_milliseconds().unsigned_abs())
    }

    fn candidates(&self, raw: &str) -> Vec<DateTime<Utc>> {
        let Some(naive) = parse_naive(raw) else {
            return Vec::new();
        };

        [
            self.local_zone.resolve(&naive),
            Some(Utc.from_utc_datetime(&naive)),
            self.fallback_offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn parse_with_offset(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = match raw.strip_suffix(['Z', 'z']) {
        Some(stripped) => format!("{}+00:00", stripped),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }

    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 19, 10, 0, 0).unwrap()
    }

    fn normalizer(zone: &str) -> TimestampNormalizer {
        TimestampNormalizer::new(
            LocalZone::Named(zone.parse().unwrap()),
            FixedOffset::east_opt(3 * 3600).unwrap(),
            Duration::hours(2),
            Duration::hours(72),
        )
    }

    #[test]
    fn test_explicit_utc_marker_is_parsed_directly() {
        let parsed = normalizer("UTC").parse_timestamp(Some("2025-10-19T08:00:00Z"), now());
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 10, 19, 8, 0, 0).unwrap()));
    }

    #[test]
    fn test_explicit_offset_is_parsed_directly() {
        // 早於接受窗口也不影響：帶時區的字串直接採用
        let parsed =
            normalizer("UTC").parse_timestamp(Some("2025-10-01T12:00:00+03:00"), now());
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap()));
    }

    #[test]
    fn test_naive_prefers_earliest_candidate_at_or_after_now() {
        // Helsinki (UTC+3 in October) -> 09:00Z, UTC -> 12:00Z, +03:00 -> 09:00Z
        let parsed =
            normalizer("Europe/Helsinki").parse_timestamp(Some("2025-10-19T12:00:00"), now());
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 10, 19, 12, 0, 0).unwrap()));
    }

    #[test]
    fn test_naive_consistent_interpretations_pick_earliest_future() {
        // Helsinki 與 +03:00 都讀成 11:00Z，UTC 讀成 14:00Z；三者皆在窗口內且 >= now
        let parsed =
            normalizer("Europe/Helsinki").parse_timestamp(Some("2025-10-19T14:00:00"), now());
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 10, 19, 11, 0, 0).unwrap()));

        // 本地為 UTC 時照字面與 UTC 一致，+03:00 的 11:00Z 仍是最早的未來候選
        let parsed = normalizer("UTC").parse_timestamp(Some("2025-10-19T14:00:00"), now());
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 10, 19, 11, 0, 0).unwrap()));
    }

    #[test]
    fn test_naive_takes_earliest_accepted_when_none_in_future() {
        // UTC -> 09:30Z (accepted, past), +03:00 -> 06:30Z (outside lookback)
        let parsed = normalizer("UTC").parse_timestamp(Some("2025-10-19 09:30"), now());
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 10, 19, 9, 30, 0).unwrap()));
    }

    #[test]
    fn test_outside_window_falls_back_to_closest_candidate() {
        // 所有候選都超出 72 小時窗口，取最接近 now 的 +03:00 解讀
        let parsed = normalizer("UTC").parse_timestamp(Some("2025-10-30T00:00:00"), now());
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 10, 29, 21, 0, 0).unwrap()));
    }

    #[test]
    fn test_date_only_reads_as_midnight() {
        // +03:00 午夜 = 21:00Z，早於 UTC 午夜且 >= now
        let parsed = normalizer("UTC").parse_timestamp(Some("2025-10-20"), now());
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 10, 19, 21, 0, 0).unwrap()));

        // now 落在兩個讀法之間時取 UTC 午夜
        let late = Utc.with_ymd_and_hms(2025, 10, 19, 22, 0, 0).unwrap();
        let parsed = normalizer("UTC").parse_timestamp(Some("2025-10-20"), late);
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 10, 20, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_unparseable_returns_none() {
        let n = normalizer("UTC");
        assert_eq!(n.parse_timestamp(None, now()), None);
        assert_eq!(n.parse_timestamp(Some(""), now()), None);
        assert_eq!(n.parse_timestamp(Some("tomorrow-ish"), now()), None);
        assert_eq!(n.parse_timestamp(Some("2025-13-45T99:00:00Z"), now()), None);
    }
}
