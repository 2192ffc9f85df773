use chrono::NaiveDate;
use proptest::prelude::*;
use remap_engine::evaluate::format_dmy_date;
use remap_model::Value;

proptest! {
    #[test]
    fn any_valid_date_round_trips_to_iso(year in 1000i32..3000, month in 1u32..=12, day in 1u32..=31) {
        prop_assume!(NaiveDate::from_ymd_opt(year, month, day).is_some());
        let formatted = format_dmy_date(&Value::from(format!("{day}/{month}/{year}")));
        prop_assert_eq!(formatted, Ok(Value::from(format!("{year:04}-{month:02}-{day:02}"))));
    }

    #[test]
    fn short_years_are_written_as_given(year in 1i32..100, month in 1u32..=12, day in 1u32..=28) {
        let formatted = format_dmy_date(&Value::from(format!("{day}/{month}/{year}")));
        prop_assert_eq!(formatted, Ok(Value::from(format!("{year}-{month:02}-{day:02}"))));
    }

    #[test]
    fn impossible_days_are_rejected(year in 1000i32..3000, day in 32u32..100) {
        let input = Value::from(format!("{day}/1/{year}"));
        prop_assert!(format_dmy_date(&input).is_err());
    }
}
