use bigdecimal::BigDecimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// 单条账单定义的生成失败记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationError {
    pub bill_id: Uuid,
    pub error: String,
}

/// 一次生成批次的统计
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub errors: Vec<GenerationError>,
}

impl GenerationReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            skipped: 0,
            errors: Vec::new(),
        }
    }
}

/// 按描述汇总的金额行
#[derive(Debug, Clone, FromRow)]
pub struct CategoryTotal {
    pub description: String,
    pub total: BigDecimal,
}

/// 按月汇总的金额行, month 格式 YYYY-MM
#[derive(Debug, Clone, FromRow)]
pub struct MonthTotal {
    pub month: String,
    pub total: BigDecimal,
}
