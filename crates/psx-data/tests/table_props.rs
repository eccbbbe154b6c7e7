//! 테이블 파서 속성 테스트.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use psx_data::provider::psx::parse_row;
use psx_data::SkipReason;
use rust_decimal::Decimal;

fn target() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

/// 1234567 -> "1,234,567"
fn with_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

proptest! {
    #[test]
    fn wrong_cell_count_never_yields_record(
        cells in prop::collection::vec("[ -~]{0,12}", 0..12usize)
            .prop_filter("6셀 행 제외", |c| c.len() != 6)
    ) {
        prop_assert_eq!(
            parse_row(&cells, "ABC", target()),
            Err(SkipReason::CellCount(cells.len()))
        );
    }

    #[test]
    fn well_formed_target_row_yields_one_record(
        whole in 0u64..5_000_000,
        cents in 0u32..100,
        volume in 0u64..50_000_000_000,
    ) {
        let price = format!("{}.{:02}", with_thousands(whole), cents);
        let cells: Vec<String> = vec![
            "Mar 5, 2024".to_string(),
            price.clone(),
            price.clone(),
            price.clone(),
            price,
            with_thousands(volume),
        ];

        let record = parse_row(&cells, "ABC", target()).unwrap();
        let expected = Decimal::new((whole * 100 + cents as u64) as i64, 2);

        prop_assert_eq!(record.open, expected);
        prop_assert_eq!(record.close, expected);
        prop_assert_eq!(record.volume, volume as i64);
        prop_assert_eq!(record.date, target());
    }

    #[test]
    fn other_dates_are_filtered(offset in 1i64..3650, before in any::<bool>()) {
        let date = if before {
            target() - Duration::days(offset)
        } else {
            target() + Duration::days(offset)
        };
        let cells: Vec<String> = vec![
            date.format("%b %d, %Y").to_string(),
            "1.00".to_string(),
            "1.00".to_string(),
            "1.00".to_string(),
            "1.00".to_string(),
            "100".to_string(),
        ];

        prop_assert_eq!(
            parse_row(&cells, "ABC", target()),
            Err(SkipReason::DateMismatch(date))
        );
    }
}
