use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// 周期账单定义表 (recurring_bills)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RecurringBill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub amount: BigDecimal,
    pub bill_type: String,      // income | expense
    pub recurrence_type: String, // daily | weekly | monthly | yearly
    pub recurrence_day: i32,     // weekly: 0-6 (周日=0); monthly: 几号
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

/// 周期类型, 数据库存原始字符串, 未知值解析为 None (永不触发)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}
