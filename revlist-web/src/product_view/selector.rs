//! Current revenue record selection

use revlist_common::db::RevenueRecord;

/// Pick the record a product page shows as "current"
///
/// The latest `date_reported` wins. Records reported on the same day are
/// ordered by id, so the most recently entered one is chosen and repeated
/// loads of unchanged data always pick the same record.
pub fn select_current(records: Vec<RevenueRecord>) -> Option<RevenueRecord> {
    records.into_iter().max_by(|a, b| {
        a.date_reported
            .cmp(&b.date_reported)
            .then_with(|| a.id.cmp(&b.id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: i64, date: (i32, u32, u32), mrr: f64) -> RevenueRecord {
        RevenueRecord {
            id,
            product_id: 42,
            mrr: Some(mrr),
            arr: Some(mrr * 12.0),
            date_reported: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            verification_tier_id: None,
            source_url: None,
        }
    }

    #[test]
    fn test_empty_has_no_current() {
        assert_eq!(select_current(Vec::new()), None);
    }

    #[test]
    fn test_latest_date_wins_regardless_of_order() {
        let records = vec![
            record(1, (2024, 3, 1), 2000.0),
            record(2, (2024, 1, 1), 1000.0),
            record(3, (2023, 12, 31), 900.0),
        ];

        let current = select_current(records.clone()).unwrap();
        assert_eq!(current.id, 1);

        let mut reversed = records;
        reversed.reverse();
        assert_eq!(select_current(reversed).unwrap().id, 1);
    }

    #[test]
    fn test_current_is_never_older_than_any_record() {
        let records: Vec<_> = (1..=20)
            .map(|i| record(i, (2024, (i as u32 * 7) % 12 + 1, (i as u32 * 5) % 28 + 1), 0.0))
            .collect();

        let current = select_current(records.clone()).unwrap();
        assert!(records
            .iter()
            .all(|r| current.date_reported >= r.date_reported));
    }

    #[test]
    fn test_same_day_tie_goes_to_highest_id() {
        let records = vec![
            record(5, (2024, 3, 1), 1.0),
            record(9, (2024, 3, 1), 2.0),
            record(7, (2024, 3, 1), 3.0),
            record(12, (2024, 2, 1), 4.0),
        ];

        assert_eq!(select_current(records).unwrap().id, 9);
    }
}
