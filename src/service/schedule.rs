use chrono::{Datelike, NaiveDate};

use crate::models::{RecurrenceType, RecurringBill};

/// 判断账单定义在基准日期当天是否应该生成
///
/// monthly 的月末处理策略: recurrence_day 超过当月天数时钳制到月末
/// (31号的定义在二月于28/29号触发), 不跳过也不顺延到下月
pub fn should_trigger(bill: &RecurringBill, today: NaiveDate) -> bool {
    // 有效期窗口检查
    if today < bill.start_date {
        return false;
    }
    if let Some(end) = bill.end_date {
        if today > end {
            return false;
        }
    }

    match RecurrenceType::parse(&bill.recurrence_type) {
        Some(RecurrenceType::Daily) => true,
        Some(RecurrenceType::Weekly) => {
            // 0-6, 周日=0
            today.weekday().num_days_from_sunday() as i32 == bill.recurrence_day
        }
        Some(RecurrenceType::Monthly) => {
            let last = last_day_of_month(today.year(), today.month());
            let trigger_day = bill.recurrence_day.min(last as i32);
            today.day() as i32 == trigger_day
        }
        Some(RecurrenceType::Yearly) => {
            today.month() == bill.start_date.month() && today.day() == bill.start_date.day()
        }
        None => false,
    }
}

/// 计算生成流水应携带的到期日
pub fn due_date(bill: &RecurringBill, today: NaiveDate) -> NaiveDate {
    match RecurrenceType::parse(&bill.recurrence_type) {
        Some(RecurrenceType::Monthly) => {
            let last = last_day_of_month(today.year(), today.month());
            let day = bill.recurrence_day.clamp(1, last as i32) as u32;
            NaiveDate::from_ymd_opt(today.year(), today.month(), day).unwrap_or(today)
        }
        Some(RecurrenceType::Yearly) => {
            let month = bill.start_date.month();
            let day = bill
                .start_date
                .day()
                .min(last_day_of_month(today.year(), month));
            NaiveDate::from_ymd_opt(today.year(), month, day).unwrap_or(today)
        }
        _ => today,
    }
}

/// 组合入口: 当天应触发时返回到期日, 否则 None
pub fn next_occurrence(bill: &RecurringBill, today: NaiveDate) -> Option<NaiveDate> {
    if should_trigger(bill, today) {
        Some(due_date(bill, today))
    } else {
        None
    }
}

/// 当月最后一天的日号
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// 基准日期所在月的 [首日, 末日], 即去重窗口
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
    let last = NaiveDate::from_ymd_opt(
        today.year(),
        today.month(),
        last_day_of_month(today.year(), today.month()),
    )
    .unwrap_or(today);
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bill(
        recurrence_type: &str,
        recurrence_day: i32,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> RecurringBill {
        RecurringBill {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            description: "Aluguel do escritório".to_string(),
            amount: BigDecimal::from(500),
            bill_type: "expense".to_string(),
            recurrence_type: recurrence_type.to_string(),
            recurrence_day,
            start_date: start,
            end_date: end,
            is_active: true,
        }
    }

    #[test]
    fn daily_triggers_inside_window() {
        let b = bill("daily", 0, date(2024, 1, 1), None);
        assert!(should_trigger(&b, date(2024, 3, 15)));
        assert_eq!(due_date(&b, date(2024, 3, 15)), date(2024, 3, 15));
    }

    #[test]
    fn never_triggers_before_start_date() {
        let start = date(2024, 6, 1);
        for rt in ["daily", "weekly", "monthly", "yearly"] {
            let b = bill(rt, 1, start, None);
            assert!(!should_trigger(&b, date(2024, 5, 31)), "type {}", rt);
        }
    }

    #[test]
    fn never_triggers_after_end_date() {
        let b = bill("daily", 0, date(2024, 1, 1), Some(date(2024, 3, 31)));
        assert!(should_trigger(&b, date(2024, 3, 31)));
        assert!(!should_trigger(&b, date(2024, 4, 1)));
    }

    #[test]
    fn weekly_matches_sunday_indexed_day() {
        // 2024-03-10 是周日, 2024-03-13 是周三
        let sunday_bill = bill("weekly", 0, date(2024, 1, 1), None);
        assert!(should_trigger(&sunday_bill, date(2024, 3, 10)));
        assert!(!should_trigger(&sunday_bill, date(2024, 3, 13)));

        let wednesday_bill = bill("weekly", 3, date(2024, 1, 1), None);
        assert!(should_trigger(&wednesday_bill, date(2024, 3, 13)));
        assert_eq!(due_date(&wednesday_bill, date(2024, 3, 13)), date(2024, 3, 13));
    }

    #[test]
    fn monthly_triggers_on_recurrence_day() {
        let b = bill("monthly", 10, date(2024, 1, 1), None);
        assert!(should_trigger(&b, date(2024, 3, 10)));
        assert_eq!(next_occurrence(&b, date(2024, 3, 10)), Some(date(2024, 3, 10)));
        assert!(!should_trigger(&b, date(2024, 3, 11)));
        assert_eq!(next_occurrence(&b, date(2024, 3, 11)), None);
    }

    #[test]
    fn monthly_day_31_clamps_to_short_months() {
        let b = bill("monthly", 31, date(2023, 1, 1), None);

        // 30天的月份 → 30号触发
        assert!(should_trigger(&b, date(2024, 4, 30)));
        assert_eq!(due_date(&b, date(2024, 4, 30)), date(2024, 4, 30));
        assert!(!should_trigger(&b, date(2024, 4, 29)));

        // 平年二月 → 28号
        assert!(should_trigger(&b, date(2023, 2, 28)));
        assert_eq!(due_date(&b, date(2023, 2, 28)), date(2023, 2, 28));

        // 闰年二月 → 29号
        assert!(should_trigger(&b, date(2024, 2, 29)));
        assert_eq!(due_date(&b, date(2024, 2, 29)), date(2024, 2, 29));
        assert!(!should_trigger(&b, date(2024, 2, 28)));

        // 31天的月份正常触发
        assert!(should_trigger(&b, date(2024, 1, 31)));
    }

    #[test]
    fn yearly_matches_start_month_and_day() {
        let b = bill("yearly", 0, date(2023, 7, 15), None);
        assert!(should_trigger(&b, date(2024, 7, 15)));
        assert_eq!(due_date(&b, date(2024, 7, 15)), date(2024, 7, 15));
        assert!(!should_trigger(&b, date(2024, 7, 14)));
        assert!(!should_trigger(&b, date(2024, 8, 15)));
    }

    #[test]
    fn unknown_recurrence_type_never_triggers() {
        let b = bill("biweekly", 1, date(2024, 1, 1), None);
        assert!(!should_trigger(&b, date(2024, 3, 10)));
        assert_eq!(next_occurrence(&b, date(2024, 3, 10)), None);
    }

    #[test]
    fn last_day_of_month_handles_leap_years_and_december() {
        assert_eq!(last_day_of_month(2024, 2), 29);
        assert_eq!(last_day_of_month(2023, 2), 28);
        assert_eq!(last_day_of_month(2024, 4), 30);
        assert_eq!(last_day_of_month(2024, 12), 31);
    }

    #[test]
    fn month_bounds_covers_whole_month() {
        assert_eq!(
            month_bounds(date(2024, 2, 14)),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            month_bounds(date(2024, 12, 5)),
            (date(2024, 12, 1), date(2024, 12, 31))
        );
    }
}
