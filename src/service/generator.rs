use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::db::queries;
use crate::models::{GenerationError, GenerationReport, NewTransaction, RecurringBill};
use crate::service::schedule;

/// 周期账单生成服务: 遍历有效定义, 把当天到期的定义落为 pending 流水
pub struct RecurringGenerator {
    pool: PgPool,
    export_path: Option<PathBuf>,
}

/// 单条定义的处理结果
enum BillOutcome {
    Created(NewTransaction),
    NotDue,
    Duplicate,
}

impl RecurringGenerator {
    pub fn new(pool: PgPool, export_path: Option<PathBuf>) -> Self {
        Self { pool, export_path }
    }

    /// 批量生成入口, 基准日期取 UTC 当天
    pub async fn generate(
        &self,
    ) -> Result<GenerationReport, Box<dyn std::error::Error + Send + Sync>> {
        self.generate_for_date(Utc::now().date_naive()).await
    }

    /// 按指定基准日期生成
    ///
    /// 定义列表查询失败会中止整个批次; 单条定义的失败被捕获记录,
    /// 不影响其余定义的处理
    pub async fn generate_for_date(
        &self,
        today: NaiveDate,
    ) -> Result<GenerationReport, Box<dyn std::error::Error + Send + Sync>> {
        let bills = queries::list_active_recurring_bills(&self.pool).await?;
        tracing::info!("开始生成周期账单: {} 个有效定义, 基准日期 {}", bills.len(), today);

        let mut report = GenerationReport::new(bills.len());
        let mut created: Vec<NewTransaction> = Vec::new();

        for bill in &bills {
            match self.process_bill(bill, today).await {
                Ok(BillOutcome::Created(tx)) => {
                    tracing::info!(
                        "账单 {} ({}) 生成流水, 到期日 {}",
                        bill.id,
                        bill.description,
                        tx.due_date
                    );
                    report.processed += 1;
                    created.push(tx);
                }
                Ok(BillOutcome::NotDue) => {
                    report.skipped += 1;
                }
                Ok(BillOutcome::Duplicate) => {
                    tracing::info!("账单 {} 本月已生成, 跳过", bill.id);
                    report.skipped += 1;
                }
                Err(e) => {
                    tracing::error!("账单 {} 生成失败: {}", bill.id, e);
                    report.errors.push(GenerationError {
                        bill_id: bill.id,
                        error: e.to_string(),
                    });
                }
            }
        }

        // 审计导出失败只告警, 不影响批次结果
        if let Some(path) = &self.export_path {
            if let Err(e) = queries::export_to_csv(&created, path) {
                tracing::warn!("生成结果导出失败 {}: {}", path.display(), e);
            }
        }

        tracing::info!(
            "生成完成: 总数 {}, 新增 {}, 跳过 {}, 失败 {}",
            report.total,
            report.processed,
            report.skipped,
            report.errors.len()
        );

        Ok(report)
    }

    async fn process_bill(
        &self,
        bill: &RecurringBill,
        today: NaiveDate,
    ) -> Result<BillOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let Some(due) = schedule::next_occurrence(bill, today) else {
            return Ok(BillOutcome::NotDue);
        };

        // 插入前按 (用户, 描述, 当月到期日区间) 查重, 同月只生成一次.
        // 注意这是逻辑保障而非唯一约束, 两个批次真正并发时仍可能重复
        let (month_start, month_end) = schedule::month_bounds(today);
        let existing = queries::count_generated_in_period(
            &self.pool,
            bill.user_id,
            &bill.description,
            month_start,
            month_end,
        )
        .await?;
        if existing > 0 {
            return Ok(BillOutcome::Duplicate);
        }

        let tx = NewTransaction::from_bill(bill, due);
        queries::insert_transaction(&self.pool, &tx).await?;
        Ok(BillOutcome::Created(tx))
    }

    /// 把到期未付的 pending 流水批量置为 overdue, 返回更新行数
    pub async fn mark_overdue(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let today = Utc::now().date_naive();
        let updated = queries::mark_overdue(&self.pool, today).await?;
        if updated > 0 {
            tracing::info!("{} 条流水置为 overdue", updated);
        }
        Ok(updated)
    }
}
