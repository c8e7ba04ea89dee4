//! 시세 값 타입.
//!
//! 모든 데이터 소스는 최종적으로 `Quote`(날짜 + 종가)로 수렴합니다.
//! 날짜는 소스가 준 오프셋을 그대로 보존하며, 비교/병합 시에는 UTC로 정규화합니다.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 단일 시세 관측값 (날짜, 종가).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// 시세 일자 (전체 정밀도 유지)
    #[serde(with = "rfc3339")]
    pub date: DateTime<FixedOffset>,
    /// 종가
    pub close: f32,
}

impl Quote {
    /// 임의의 타임존 날짜로 시세를 생성합니다.
    pub fn new<Tz: TimeZone>(date: DateTime<Tz>, close: f32) -> Self {
        Self {
            date: date.fixed_offset(),
            close,
        }
    }

    /// 달력 날짜(UTC 자정)로 시세를 생성합니다.
    pub fn on_day(day: NaiveDate, close: f32) -> Self {
        Self::new(Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)), close)
    }

    /// 병합 키로 사용되는 UTC 정규화 날짜.
    pub fn utc_date(&self) -> DateTime<Utc> {
        self.date.with_timezone(&Utc)
    }

    /// 같은 시각을 UTC 오프셋으로 표현한 시세.
    pub fn normalized(&self) -> Self {
        Self::new(self.utc_date(), self.close)
    }
}

/// 시세 묶음의 날짜 범위 (관측용).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub first: DateTime<Utc>,
    pub last: DateTime<Utc>,
}

impl DateRange {
    /// 정렬되지 않은 시세에서 최소/최대 날짜를 구합니다.
    ///
    /// 빈 입력이면 `None`.
    pub fn of(quotes: &[Quote]) -> Option<Self> {
        let first = quotes.iter().map(Quote::utc_date).min()?;
        let last = quotes.iter().map(Quote::utc_date).max()?;
        Some(Self { first, last })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ~ {}",
            self.first.format("%Y-%m-%d"),
            self.last.format("%Y-%m-%d")
        )
    }
}

/// RFC 3339 직렬화 (UTC는 `Z` 접미사).
mod rfc3339 {
    use chrono::{DateTime, FixedOffset, SecondsFormat};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<FixedOffset>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<FixedOffset>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw).map_err(de::Error::custom)
    }
}
