use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::path::Path;
use uuid::Uuid;

use crate::models::{CategoryTotal, MonthTotal, NewTransaction, RecurringBill};

/// 查询全部启用的周期账单定义
pub async fn list_active_recurring_bills(
    pool: &PgPool,
) -> Result<Vec<RecurringBill>, sqlx::Error> {
    sqlx::query_as::<_, RecurringBill>(
        r#"
        SELECT id, user_id, description, amount, bill_type,
               recurrence_type, recurrence_day, start_date, end_date, is_active
        FROM recurring_bills
        WHERE is_active = true
        "#,
    )
    .fetch_all(pool)
    .await
}

/// 按 (用户, 描述, 到期日区间) 统计已生成流水, 用于插入前查重
pub async fn count_generated_in_period(
    pool: &PgPool,
    user_id: Uuid,
    description: &str,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT count(*)
        FROM transactions
        WHERE user_id = $1
          AND description = $2
          AND due_date >= $3
          AND due_date <= $4
        "#,
    )
    .bind(user_id)
    .bind(description)
    .bind(period_start)
    .bind(period_end)
    .fetch_one(pool)
    .await
}

/// 插入一条生成的流水
pub async fn insert_transaction(
    pool: &PgPool,
    tx: &NewTransaction,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO transactions (
            id, user_id, description, amount, transaction_type,
            status, due_date, notes, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(tx.id)
    .bind(tx.user_id)
    .bind(&tx.description)
    .bind(tx.amount.clone())
    .bind(&tx.transaction_type)
    .bind(&tx.status)
    .bind(tx.due_date)
    .bind(&tx.notes)
    .bind(tx.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// 到期未付的 pending 流水批量置为 overdue
pub async fn mark_overdue(pool: &PgPool, today: NaiveDate) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE transactions
        SET status = 'overdue'
        WHERE status = 'pending'
          AND due_date < $1
        "#,
    )
    .bind(today)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// 区间内按类型汇总金额
pub async fn sum_by_type(
    pool: &PgPool,
    user_id: Uuid,
    transaction_type: &str,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<BigDecimal, sqlx::Error> {
    sqlx::query_scalar::<_, BigDecimal>(
        r#"
        SELECT coalesce(sum(amount), 0) as total
        FROM transactions
        WHERE user_id = $1
          AND transaction_type = $2
          AND due_date >= $3
          AND due_date <= $4
        "#,
    )
    .bind(user_id)
    .bind(transaction_type)
    .bind(period_start)
    .bind(period_end)
    .fetch_one(pool)
    .await
}

/// 区间内按描述汇总金额, 降序取前 N
pub async fn top_by_description(
    pool: &PgPool,
    user_id: Uuid,
    transaction_type: &str,
    period_start: NaiveDate,
    period_end: NaiveDate,
    limit: i64,
) -> Result<Vec<CategoryTotal>, sqlx::Error> {
    sqlx::query_as::<_, CategoryTotal>(
        r#"
        SELECT description,
               coalesce(sum(amount), 0) as total
        FROM transactions
        WHERE user_id = $1
          AND transaction_type = $2
          AND due_date >= $3
          AND due_date <= $4
        GROUP BY description
        ORDER BY total DESC
        LIMIT $5
        "#,
    )
    .bind(user_id)
    .bind(transaction_type)
    .bind(period_start)
    .bind(period_end)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// 区间内按月汇总金额, 升序 (month 格式 YYYY-MM)
pub async fn monthly_totals_by_type(
    pool: &PgPool,
    user_id: Uuid,
    transaction_type: &str,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<Vec<MonthTotal>, sqlx::Error> {
    sqlx::query_as::<_, MonthTotal>(
        r#"
        SELECT to_char(date_trunc('month', due_date), 'YYYY-MM') as month,
               coalesce(sum(amount), 0) as total
        FROM transactions
        WHERE user_id = $1
          AND transaction_type = $2
          AND due_date >= $3
          AND due_date <= $4
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(user_id)
    .bind(transaction_type)
    .bind(period_start)
    .bind(period_end)
    .fetch_all(pool)
    .await
}

/// 导出一次批次生成的流水到 CSV 文件 (审计用)
pub fn export_to_csv(
    transactions: &[NewTransaction],
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use csv::Writer;
    use std::fs::File;

    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);

    for tx in transactions {
        writer.write_record(&[
            tx.id.to_string(),
            tx.user_id.to_string(),
            tx.description.clone(),
            tx.amount.to_string(),
            tx.transaction_type.clone(),
            tx.status.clone(),
            tx.due_date.to_string(),
            tx.created_at.to_rfc3339(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
