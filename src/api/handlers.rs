use crate::models::{ChatTurn, FinancialAnalysis, GenerationError, GenerationReport, ReplyKind};
use crate::service::{AssistantClient, AssistantError, RecurringGenerator, ReportService};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// 统一错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 生成批次统计
#[derive(Debug, Serialize)]
pub struct GenerationStats {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// 生成接口响应体
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub stats: GenerationStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GenerationError>>,
}

impl GenerateResponse {
    fn from_report(report: GenerationReport) -> Self {
        let stats = GenerationStats {
            total: report.total,
            processed: report.processed,
            skipped: report.skipped,
            errors: report.errors.len(),
        };
        Self {
            success: true,
            stats,
            errors: if report.errors.is_empty() {
                None
            } else {
                Some(report.errors)
            },
        }
    }
}

/// 置为 overdue 接口响应体
#[derive(Debug, Serialize)]
pub struct MarkOverdueResponse {
    pub success: bool,
    pub updated: u64,
}

/// 会话请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub system_data: Option<serde_json::Value>,
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
}

/// 会话响应体
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(rename = "type")]
    pub kind: ReplyKind,
}

/// 洞察请求体
#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    pub analysis: FinancialAnalysis,
}

/// 洞察响应体
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: String,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 周期账单批量生成接口 (由外部调度器按天触发)
pub async fn generate_recurring(
    State(generator): State<Arc<RecurringGenerator>>,
) -> Response {
    match generator.generate().await {
        Ok(report) => {
            (StatusCode::OK, Json(GenerateResponse::from_report(report))).into_response()
        }
        Err(e) => {
            tracing::error!("Recurring generation aborted: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Error: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// 过期流水批量标记接口
pub async fn mark_overdue(State(generator): State<Arc<RecurringGenerator>>) -> Response {
    match generator.mark_overdue().await {
        Ok(updated) => (
            StatusCode::OK,
            Json(MarkOverdueResponse {
                success: true,
                updated,
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Error: {}", e),
            }),
        )
            .into_response(),
    }
}

/// AI 会话代理接口
pub async fn ai_chat(
    State(assistant): State<Arc<AssistantClient>>,
    Json(req): Json<ChatRequest>,
) -> Response {
    let message = req.message.trim();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "message is required".to_string(),
            }),
        )
            .into_response();
    }

    match assistant
        .chat(message, req.system_data.as_ref(), &req.conversation_history)
        .await
    {
        Ok(reply) => (
            StatusCode::OK,
            Json(ChatResponse {
                response: reply.text,
                kind: reply.kind,
            }),
        )
            .into_response(),
        Err(e) => assistant_error_response(e),
    }
}

/// AI 财务洞察代理接口
pub async fn ai_insights(
    State(assistant): State<Arc<AssistantClient>>,
    Json(req): Json<InsightsRequest>,
) -> Response {
    match assistant.insights(&req.analysis).await {
        Ok(text) => (StatusCode::OK, Json(InsightsResponse { insights: text })).into_response(),
        Err(e) => assistant_error_response(e),
    }
}

/// 月度汇总接口, 输出可直接作为洞察接口的 analysis 输入
pub async fn monthly_summary(
    State(reports): State<Arc<ReportService>>,
    Path(user_id): Path<Uuid>,
) -> Response {
    match reports.monthly_summary(user_id, 6).await {
        Ok(analysis) => (StatusCode::OK, Json(analysis)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Error: {}", e),
            }),
        )
            .into_response(),
    }
}

/// 按失败类型映射 HTTP 状态: 凭证缺失 401, 限流 429, 额度 402, 其余 500
fn assistant_error_response(e: AssistantError) -> Response {
    let status = match &e {
        AssistantError::MissingApiKey => StatusCode::UNAUTHORIZED,
        AssistantError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        AssistantError::InsufficientCredits => StatusCode::PAYMENT_REQUIRED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}
