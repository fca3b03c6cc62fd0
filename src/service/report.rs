use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{Months, Utc};
use indexmap::IndexMap;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::queries;
use crate::models::{CategoryAmount, FinancialAnalysis, MonthlyFlow};
use crate::service::schedule;

/// 月度财务汇总服务, 输出可直接作为洞察接口的输入
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 当月收支汇总 + 前5大收支 + 近 trailing_months 个月趋势
    pub async fn monthly_summary(
        &self,
        user_id: Uuid,
        trailing_months: u32,
    ) -> Result<FinancialAnalysis, Box<dyn std::error::Error + Send + Sync>> {
        let today = Utc::now().date_naive();
        let (month_start, month_end) = schedule::month_bounds(today);

        let total_income =
            queries::sum_by_type(&self.pool, user_id, "income", month_start, month_end).await?;
        let total_expense =
            queries::sum_by_type(&self.pool, user_id, "expense", month_start, month_end).await?;

        let top_expenses =
            queries::top_by_description(&self.pool, user_id, "expense", month_start, month_end, 5)
                .await?;
        let top_incomes =
            queries::top_by_description(&self.pool, user_id, "income", month_start, month_end, 5)
                .await?;

        let trend_start = month_start
            .checked_sub_months(Months::new(trailing_months.saturating_sub(1)))
            .unwrap_or(month_start);
        let income_rows =
            queries::monthly_totals_by_type(&self.pool, user_id, "income", trend_start, month_end)
                .await?;
        let expense_rows =
            queries::monthly_totals_by_type(&self.pool, user_id, "expense", trend_start, month_end)
                .await?;

        // 两路按月汇总合并; YYYY-MM 键排序即时间顺序
        let mut trend: IndexMap<String, MonthlyFlow> = IndexMap::new();
        for row in income_rows {
            trend
                .entry(row.month.clone())
                .or_insert_with(|| empty_flow(&row.month))
                .income = to_f64(&row.total);
        }
        for row in expense_rows {
            trend
                .entry(row.month.clone())
                .or_insert_with(|| empty_flow(&row.month))
                .expense = to_f64(&row.total);
        }
        trend.sort_keys();

        let balance = &total_income - &total_expense;
        Ok(FinancialAnalysis {
            total_income: to_f64(&total_income),
            total_expense: to_f64(&total_expense),
            balance: to_f64(&balance),
            top_expenses: top_expenses
                .into_iter()
                .map(|row| CategoryAmount {
                    description: row.description,
                    amount: to_f64(&row.total),
                })
                .collect(),
            top_incomes: top_incomes
                .into_iter()
                .map(|row| CategoryAmount {
                    description: row.description,
                    amount: to_f64(&row.total),
                })
                .collect(),
            monthly_trend: trend.into_values().collect(),
        })
    }
}

fn empty_flow(month: &str) -> MonthlyFlow {
    MonthlyFlow {
        month: month.to_string(),
        income: 0.0,
        expense: 0.0,
    }
}

fn to_f64(value: &BigDecimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
