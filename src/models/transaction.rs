use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recurring::RecurringBill;

/// 自动生成流水的来源备注
pub const AUTO_GENERATED_NOTE: &str = "Gerada automaticamente a partir de conta recorrente";

/// 待插入的流水记录 (transactions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub amount: BigDecimal,
    pub transaction_type: String,
    pub status: String, // pending | paid | received | overdue
    pub due_date: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl NewTransaction {
    /// 从账单定义生成一条 pending 流水
    pub fn from_bill(bill: &RecurringBill, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: bill.user_id,
            description: bill.description.clone(),
            amount: bill.amount.clone(),
            transaction_type: bill.bill_type.clone(),
            status: "pending".to_string(),
            due_date,
            notes: AUTO_GENERATED_NOTE.to_string(),
            created_at: Utc::now(),
        }
    }
}
