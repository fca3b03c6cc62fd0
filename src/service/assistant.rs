use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::models::{ChatReply, ChatTurn, FinancialAnalysis, ReplyKind};

/// 固定系统提示词: 产品面向葡语用户
const SYSTEM_PROMPT: &str = "Você é um assistente financeiro especializado em gestão \
empresarial: contas a pagar e a receber, fluxo de caixa e contas recorrentes. \
Responda sempre em português, de forma clara e objetiva. Quando identificar \
oportunidades de melhoria, apresente sugestões práticas; quando analisar números, \
destaque os insights mais relevantes.";

/// AI 代理错误, 每种失败对应一个明确的 HTTP 状态
#[derive(Debug)]
pub enum AssistantError {
    /// 网关凭证未配置, 不可重试
    MissingApiKey,
    /// 上游限流 (429)
    RateLimited,
    /// 上游额度耗尽 (402)
    InsufficientCredits,
    /// 其他非成功状态
    UpstreamStatus(u16),
    /// 传输层失败
    Request(reqwest::Error),
    /// 上游返回了空回复
    EmptyReply,
}

impl fmt::Display for AssistantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "AI gateway API key is not configured"),
            Self::RateLimited => write!(f, "too many requests, please try again later"),
            Self::InsufficientCredits => write!(f, "insufficient AI credits"),
            Self::UpstreamStatus(status) => write!(f, "AI gateway returned status {}", status),
            Self::Request(e) => write!(f, "AI gateway request failed: {}", e),
            Self::EmptyReply => write!(f, "AI gateway returned an empty reply"),
        }
    }
}

impl std::error::Error for AssistantError {}

impl From<reqwest::Error> for AssistantError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e)
    }
}

/// OpenAI 兼容网关的请求/响应体
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<GatewayMessage>,
}

#[derive(Debug, Serialize)]
struct GatewayMessage {
    role: String,
    content: String,
}

impl GatewayMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// AI 代理服务: 把用户消息/财务汇总转发给托管网关并转发文本回复
pub struct AssistantClient {
    http: reqwest::Client,
    config: AiConfig,
}

impl AssistantClient {
    pub fn new(config: AiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// 会话转发: 系统提示 + 可选财务快照 + 历史轮次 + 当前消息
    pub async fn chat(
        &self,
        message: &str,
        system_data: Option<&serde_json::Value>,
        history: &[ChatTurn],
    ) -> Result<ChatReply, AssistantError> {
        let mut messages: Vec<GatewayMessage> = Vec::with_capacity(history.len() + 3);
        messages.push(GatewayMessage::new("system", SYSTEM_PROMPT));

        if let Some(data) = system_data {
            messages.push(GatewayMessage::new(
                "system",
                format!(
                    "Resumo financeiro atual do usuário: {}",
                    serde_json::to_string(data).unwrap_or_default()
                ),
            ));
        }

        // 历史原样透传, 上下文长度由网关裁决
        for turn in history {
            messages.push(GatewayMessage::new(&turn.role, turn.content.clone()));
        }
        messages.push(GatewayMessage::new("user", message));

        let text = self.complete(messages).await?;
        let kind = classify_reply(&text);
        Ok(ChatReply { text, kind })
    }

    /// 财务洞察: 把结构化汇总渲染成提示词, 返回原始回复文本
    pub async fn insights(&self, analysis: &FinancialAnalysis) -> Result<String, AssistantError> {
        let messages = vec![
            GatewayMessage::new("system", SYSTEM_PROMPT),
            GatewayMessage::new("user", build_insights_prompt(analysis)),
        ];
        self.complete(messages).await
    }

    async fn complete(&self, messages: Vec<GatewayMessage>) -> Result<String, AssistantError> {
        let Some(api_key) = &self.config.api_key else {
            return Err(AssistantError::MissingApiKey);
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = CompletionRequest {
            model: &self.config.model,
            messages,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        match response.status().as_u16() {
            429 => return Err(AssistantError::RateLimited),
            402 => return Err(AssistantError::InsufficientCredits),
            status if status >= 400 => {
                tracing::error!("AI gateway error: status {}", status);
                return Err(AssistantError::UpstreamStatus(status));
            }
            _ => {}
        }

        let completion: CompletionResponse = response.json().await?;
        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AssistantError::EmptyReply);
        }
        Ok(text)
    }
}

/// 按葡语关键词分类回复, 不区分大小写; 建议类优先于洞察类
pub fn classify_reply(text: &str) -> ReplyKind {
    let lower = text.to_lowercase();
    if lower.contains("sugestão") || lower.contains("recomendo") {
        ReplyKind::Suggestion
    } else if lower.contains("insight") || lower.contains("análise") {
        ReplyKind::Insight
    } else {
        ReplyKind::Text
    }
}

/// 把汇总数据渲染为葡语提示词
fn build_insights_prompt(analysis: &FinancialAnalysis) -> String {
    let mut prompt = String::from(
        "Analise os seguintes dados financeiros e gere insights acionáveis:\n\n",
    );
    prompt.push_str(&format!(
        "Receita total: R$ {:.2}\nDespesa total: R$ {:.2}\nSaldo: R$ {:.2}\n",
        analysis.total_income, analysis.total_expense, analysis.balance
    ));

    if !analysis.top_expenses.is_empty() {
        prompt.push_str("\nMaiores despesas:\n");
        for item in &analysis.top_expenses {
            prompt.push_str(&format!("- {}: R$ {:.2}\n", item.description, item.amount));
        }
    }
    if !analysis.top_incomes.is_empty() {
        prompt.push_str("\nMaiores receitas:\n");
        for item in &analysis.top_incomes {
            prompt.push_str(&format!("- {}: R$ {:.2}\n", item.description, item.amount));
        }
    }
    if !analysis.monthly_trend.is_empty() {
        prompt.push_str("\nEvolução mensal:\n");
        for flow in &analysis.monthly_trend {
            prompt.push_str(&format!(
                "- {}: receitas R$ {:.2}, despesas R$ {:.2}\n",
                flow.month, flow.income, flow.expense
            ));
        }
    }

    prompt.push_str("\nDestaque tendências, riscos e oportunidades de economia.");
    prompt
}
