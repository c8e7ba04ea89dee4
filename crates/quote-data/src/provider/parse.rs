//! 소스 공통 파싱 도우미.

use chrono::{Months, NaiveDate};
use quote_core::{QuoteError, QuoteResult};
use scraper::{ElementRef, Selector};

/// CSS 셀렉터 생성 (실패는 파싱 에러로 변환).
pub(crate) fn selector(css: &str) -> QuoteResult<Selector> {
    Selector::parse(css).map_err(|e| QuoteError::Parse(format!("invalid selector '{}': {}", css, e)))
}

/// 요소의 텍스트를 이어 붙이고 앞뒤 공백 제거.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// 유한한 `f32` 종가로 변환.
///
/// NaN, 무한대, `f32` 범위를 벗어나는 값은 저장할 수 없으므로 `None`.
pub(crate) fn finite_close(value: f64) -> Option<f32> {
    let close = value as f32;
    close.is_finite().then_some(close)
}

/// 점 소수점 가격 문자열 파싱 (`185.48`).
pub(crate) fn parse_decimal(raw: &str) -> Option<f32> {
    raw.trim().parse::<f64>().ok().and_then(finite_close)
}

/// 가격 문자열 파싱.
///
/// 이탈리아식 소수점(`12,345`)과 천 단위 구분(`1.234,56`)을 모두 허용합니다.
pub(crate) fn parse_price(raw: &str) -> Option<f32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let normalized = if raw.contains(',') {
        raw.replace('.', "").replace(',', ".")
    } else {
        raw.to_string()
    };

    normalized.parse::<f64>().ok().and_then(finite_close)
}

/// 해당 월의 마지막 날.
pub(crate) fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// 이탈리아어 월 이름 → 월 번호.
pub(crate) fn italian_month(name: &str) -> Option<u32> {
    let month = match name.trim().to_lowercase().as_str() {
        "gennaio" => 1,
        "febbraio" => 2,
        "marzo" => 3,
        "aprile" => 4,
        "maggio" => 5,
        "giugno" => 6,
        "luglio" => 7,
        "agosto" => 8,
        "settembre" => 9,
        "ottobre" => 10,
        "novembre" => 11,
        "dicembre" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("12,345"), Some(12.345));
        assert_eq!(parse_price(" 1.234,56 "), Some(1234.56));
        assert_eq!(parse_price("185.48"), Some(185.48));
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("n.d."), None);
        assert_eq!(parse_price("NaN"), None);
    }

    #[test]
    fn test_finite_close() {
        assert_eq!(finite_close(100.25), Some(100.25));
        assert_eq!(finite_close(f64::NAN), None);
        assert_eq!(finite_close(f64::INFINITY), None);
        assert_eq!(finite_close(1e39), None);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(" 185.48 "), Some(185.48));
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal("-infinity"), None);
        assert_eq!(parse_decimal("1e39"), None);
        assert_eq!(parse_decimal("12,5"), None);
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2024, 2), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(last_day_of_month(2023, 12), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(last_day_of_month(2023, 13), None);
    }

    #[test]
    fn test_italian_month() {
        assert_eq!(italian_month("Gennaio"), Some(1));
        assert_eq!(italian_month("DICEMBRE"), Some(12));
        assert_eq!(italian_month("January"), None);
    }
}
