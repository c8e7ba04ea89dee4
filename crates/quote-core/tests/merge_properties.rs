//! 병합 엔진 속성 테스트
//!
//! 임의의 기존/신규 시계열에 대해 멱등성, 합집합 보존, 정렬, 후순위 우선 규칙을 검증합니다.

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use proptest::prelude::*;
use quote_core::{merge, merge_quotes, Quote};
use std::collections::{BTreeMap, BTreeSet};

/// 날짜 충돌이 잦도록 40일 범위, 세 가지 오프셋, 다섯 가지 종가에서 생성
fn arb_quote() -> impl Strategy<Value = Quote> {
    (
        0i64..40,
        prop_oneof![Just(0i32), Just(3600), Just(-7200)],
        0u8..5,
    )
        .prop_map(|(day, offset, close)| {
            let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day);
            let tz = FixedOffset::east_opt(offset).unwrap();
            Quote::new(base.with_timezone(&tz), f32::from(close) * 1.25)
        })
}

fn arb_series() -> impl Strategy<Value = Vec<Quote>> {
    prop::collection::vec(arb_quote(), 0..30)
}

proptest! {
    #[test]
    fn merge_is_idempotent(a in arb_series(), b in arb_series()) {
        let once = merge(&a, &b);
        let twice = merge(&once, &b);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn merge_keeps_each_date_exactly_once(a in arb_series(), b in arb_series()) {
        let merged = merge(&a, &b);

        let expected: Vec<_> = a
            .iter()
            .chain(b.iter())
            .map(Quote::utc_date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let actual: Vec<_> = merged.iter().map(Quote::utc_date).collect();

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn merge_output_strictly_ascending_in_utc(a in arb_series(), b in arb_series()) {
        let merged = merge(&a, &b);

        for pair in merged.windows(2) {
            prop_assert!(pair[0].utc_date() < pair[1].utc_date());
        }
        for quote in &merged {
            prop_assert_eq!(quote.date.offset().local_minus_utc(), 0);
        }
    }

    #[test]
    fn merge_last_argument_wins(a in arb_series(), b in arb_series()) {
        let merged: BTreeMap<_, _> = merge(&a, &b)
            .into_iter()
            .map(|q| (q.utc_date(), q.close))
            .collect();

        // b 안에서도 뒤에 나온 값이 이김
        let winners: BTreeMap<_, _> = b.iter().map(|q| (q.utc_date(), q.close)).collect();
        for (date, close) in winners {
            prop_assert_eq!(merged.get(&date), Some(&close));
        }
    }

    #[test]
    fn conflicts_only_report_changed_values(a in arb_series(), b in arb_series()) {
        let outcome = merge_quotes(&a, &b);
        for conflict in &outcome.conflicts {
            prop_assert!(conflict.old_close != conflict.new_close);
        }
    }
}

#[test]
fn conflict_example_from_history() {
    let a = vec![Quote::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), 10.0)];
    let b = vec![Quote::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), 12.0)];

    let outcome = merge_quotes(&a, &b);

    assert_eq!(outcome.quotes, b);
    assert_eq!(outcome.conflicts.len(), 1);

    // 인자 순서를 바꾸면 결과 값도 바뀜
    let reversed = merge_quotes(&b, &a);
    assert_eq!(reversed.quotes, a);
}
