//! 복합 식별자 파싱.
//!
//! 설정 파일의 식별자 열은 `ISIN.시장코드`, `ISIN.펀드ID.클래스ID`처럼
//! 소스별 파라미터를 `.`으로 이어 붙인 형태입니다.

use quote_core::{QuoteError, QuoteResult};

/// 식별자를 `layout` 순서의 `N`개 파트로 분리합니다.
///
/// 모든 파트는 비어 있지 않아야 합니다.
///
/// # Example
/// ```
/// use quote_data::provider::parse_identity;
///
/// let [isin, market] = parse_identity("IT0005273013.MOT", ["ISIN", "market"]).unwrap();
/// assert_eq!(isin, "IT0005273013");
/// assert_eq!(market, "MOT");
/// ```
pub fn parse_identity<const N: usize>(
    identity: &str,
    layout: [&str; N],
) -> QuoteResult<[String; N]> {
    let invalid = || QuoteError::InvalidIdentity {
        identity: identity.to_string(),
        reason: format!("should be \"{}\"", layout.join(".")),
    };

    let parts: Vec<String> = identity.split('.').map(|p| p.trim().to_string()).collect();
    if parts.len() != N || parts.iter().any(String::is_empty) {
        return Err(invalid());
    }

    parts.try_into().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_part_identity() {
        let [isin, fund, class] =
            parse_identity("LU0119620416.6.F", ["ISIN", "fundID", "shareClassID"]).unwrap();
        assert_eq!((isin.as_str(), fund.as_str(), class.as_str()), ("LU0119620416", "6", "F"));
    }

    #[test]
    fn test_wrong_part_count_names_layout() {
        let err = parse_identity("IT0005273013", ["ISIN", "market"]).unwrap_err();
        match err {
            QuoteError::InvalidIdentity { identity, reason } => {
                assert_eq!(identity, "IT0005273013");
                assert_eq!(reason, "should be \"ISIN.market\"");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(parse_identity("A.B.C", ["ISIN", "market"]).is_err());
    }

    #[test]
    fn test_empty_part_rejected() {
        assert!(parse_identity(".MOT", ["ISIN", "market"]).is_err());
        assert!(parse_identity("IT0005273013.", ["ISIN", "market"]).is_err());
        assert!(parse_identity("", ["ISIN"]).is_err());
    }
}
