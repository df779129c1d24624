#[cfg(test)]
mod tests {
    #[test]
    fn test_date_parsing() {
        use crate::commands::utils::parse_date_safe;
        use chrono::NaiveDate;

        assert_eq!(
            parse_date_safe("2023-10-27"),
            Some(NaiveDate::from_ymd_opt(2023, 10, 27).unwrap())
        );
        assert_eq!(
            parse_date_safe("20231027"),
            Some(NaiveDate::from_ymd_opt(2023, 10, 27).unwrap())
        );
        assert_eq!(parse_date_safe("invalid"), None);
        assert_eq!(parse_date_safe(""), None);
    }

    #[test]
    fn test_datetime_parsing_falls_back_to_midnight() {
        use crate::commands::utils::parse_datetime_safe;
        use chrono::NaiveDate;

        let midnight = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_datetime_safe("2024-03-05"), Some(midnight));
        assert_eq!(
            parse_datetime_safe("2024-03-05 18:01:24"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(18, 1, 24)
        );
        assert_eq!(parse_datetime_safe(""), None);
    }

    #[test]
    fn test_kst_is_utc_plus_nine() {
        use crate::commands::utils::kst;
        assert_eq!(kst().local_minus_utc(), 9 * 3600);
    }

    /// Order totals are the sum of line totals, not recomputed from
    /// unit price * quantity (clients may apply per-line adjustments).
    #[test]
    fn test_order_total_is_sum_of_line_totals() {
        let lines = [(3, 1000, 2900), (1, 5000, 5000), (2, 700, 1400)];
        let total: i32 = lines.iter().map(|(_, _, line_total)| line_total).sum();
        assert_eq!(total, 9300);
        assert_ne!(
            total,
            lines
                .iter()
                .map(|(qty, unit, _)| qty * unit)
                .sum::<i32>()
        );
    }

    #[test]
    fn test_archive_kind_year_columns() {
        use crate::archive::ArchiveKind;

        assert_eq!(ArchiveKind::SalesRecords.year_column(), "sale_date");
        assert_eq!(ArchiveKind::Orders.year_column(), "order_date");
        assert_eq!(ArchiveKind::ClientVisits.year_column(), "visit_datetime");
        assert_eq!(ArchiveKind::Purchases.year_column(), "purchase_date");
        assert_eq!(ArchiveKind::FranchiseOrders.year_column(), "order_date");
    }
}
