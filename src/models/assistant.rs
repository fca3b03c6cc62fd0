use serde::{Deserialize, Serialize};

/// 会话历史中的一轮对话
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String, // user | assistant
    pub content: String,
}

/// 回复分类: 按回复文本中的葡语关键词判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyKind {
    Text,
    Suggestion,
    Insight,
}

/// AI 网关返回的已分类回复
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub text: String,
    pub kind: ReplyKind,
}

/// 财务汇总数据, 仅用于透传给 AI 生成洞察, 不落库
/// (落库金额一律 BigDecimal, 这里是 JS 客户端的 JSON 数字边界)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAnalysis {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    #[serde(default)]
    pub top_expenses: Vec<CategoryAmount>,
    #[serde(default)]
    pub top_incomes: Vec<CategoryAmount>,
    #[serde(default)]
    pub monthly_trend: Vec<MonthlyFlow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyFlow {
    pub month: String, // YYYY-MM
    pub income: f64,
    pub expense: f64,
}
