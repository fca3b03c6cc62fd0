use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use finflow_rust::api::handlers::{
    ChatRequest, ChatResponse, ErrorResponse, GenerateResponse, GenerationStats,
};
use finflow_rust::models::{
    FinancialAnalysis, GenerationError, NewTransaction, RecurringBill, ReplyKind,
    AUTO_GENERATED_NOTE,
};
use finflow_rust::service::{classify_reply, schedule};
use serde_json::json;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn monthly_expense_bill() -> RecurringBill {
    RecurringBill {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        description: "Aluguel do escritório".to_string(),
        amount: BigDecimal::from(500),
        bill_type: "expense".to_string(),
        recurrence_type: "monthly".to_string(),
        recurrence_day: 10,
        start_date: date(2024, 1, 1),
        end_date: None,
        is_active: true,
    }
}

#[test]
fn chat_request_accepts_camel_case_payload() {
    let req: ChatRequest = serde_json::from_value(json!({
        "message": "Quais insights sobre minhas despesas?",
        "systemData": { "totalIncome": 10000.0, "totalExpense": 7500.0, "balance": 2500.0 },
        "conversationHistory": [
            { "role": "user", "content": "Olá" },
            { "role": "assistant", "content": "Olá! Como posso ajudar?" }
        ]
    }))
    .expect("parse chat request");

    assert_eq!(req.message, "Quais insights sobre minhas despesas?");
    assert!(req.system_data.is_some());
    assert_eq!(req.conversation_history.len(), 2);
    assert_eq!(req.conversation_history[1].role, "assistant");
}

#[test]
fn chat_request_history_and_snapshot_are_optional() {
    let req: ChatRequest =
        serde_json::from_value(json!({ "message": "Olá" })).expect("parse minimal chat request");
    assert!(req.system_data.is_none());
    assert!(req.conversation_history.is_empty());
}

#[test]
fn chat_response_serializes_type_field() {
    let response = ChatResponse {
        response: "Com base na análise dos seus gastos...".to_string(),
        kind: ReplyKind::Insight,
    };
    let value = serde_json::to_value(&response).expect("serialize chat response");
    assert_eq!(value["type"], "insight");
    assert!(value["response"].as_str().unwrap().contains("análise"));
}

#[test]
fn insight_reply_classifies_as_insight_end_to_end() {
    // 对 "Quais insights sobre minhas despesas?" 的典型回复
    let reply = "A análise das suas despesas mostra que o aluguel domina o mês.";
    assert_eq!(classify_reply(reply), ReplyKind::Insight);
}

#[test]
fn generate_response_envelope_matches_contract() {
    let bill_id = Uuid::new_v4();
    let response = GenerateResponse {
        success: true,
        stats: GenerationStats {
            total: 3,
            processed: 1,
            skipped: 1,
            errors: 1,
        },
        errors: Some(vec![GenerationError {
            bill_id,
            error: "insert failed".to_string(),
        }]),
    };

    let value = serde_json::to_value(&response).expect("serialize generate response");
    assert_eq!(value["success"], true);
    assert_eq!(value["stats"]["total"], 3);
    assert_eq!(value["stats"]["processed"], 1);
    assert_eq!(value["stats"]["skipped"], 1);
    assert_eq!(value["stats"]["errors"], 1);
    assert_eq!(value["errors"][0]["billId"], bill_id.to_string());
    assert_eq!(value["errors"][0]["error"], "insert failed");
}

#[test]
fn generate_response_omits_empty_error_list() {
    let response = GenerateResponse {
        success: true,
        stats: GenerationStats {
            total: 0,
            processed: 0,
            skipped: 0,
            errors: 0,
        },
        errors: None,
    };
    let value = serde_json::to_value(&response).expect("serialize generate response");
    assert!(value.get("errors").is_none());
}

#[test]
fn error_response_is_a_plain_error_object() {
    let value = serde_json::to_value(ErrorResponse {
        error: "message is required".to_string(),
    })
    .expect("serialize error response");
    assert_eq!(value, json!({ "error": "message is required" }));
}

#[test]
fn financial_analysis_round_trips_camel_case() {
    let payload = json!({
        "totalIncome": 10000.0,
        "totalExpense": 7500.0,
        "balance": 2500.0,
        "topExpenses": [ { "description": "Aluguel", "amount": 3000.0 } ],
        "topIncomes": [ { "description": "Consultoria", "amount": 8000.0 } ],
        "monthlyTrend": [ { "month": "2024-03", "income": 10000.0, "expense": 7500.0 } ]
    });

    let analysis: FinancialAnalysis =
        serde_json::from_value(payload.clone()).expect("parse analysis");
    assert_eq!(analysis.total_income, 10000.0);
    assert_eq!(analysis.top_expenses[0].description, "Aluguel");
    assert_eq!(analysis.monthly_trend[0].month, "2024-03");

    let back = serde_json::to_value(&analysis).expect("serialize analysis");
    assert_eq!(back, payload);
}

#[test]
fn financial_analysis_lists_default_to_empty() {
    let analysis: FinancialAnalysis = serde_json::from_value(json!({
        "totalIncome": 0.0,
        "totalExpense": 0.0,
        "balance": 0.0
    }))
    .expect("parse minimal analysis");
    assert!(analysis.top_expenses.is_empty());
    assert!(analysis.monthly_trend.is_empty());
}

#[test]
fn generated_transaction_carries_provenance_and_pending_status() {
    let bill = monthly_expense_bill();

    // 2024-03-10 应触发, 2024-03-11 不应触发
    let due = schedule::next_occurrence(&bill, date(2024, 3, 10)).expect("due on the 10th");
    assert_eq!(due, date(2024, 3, 10));
    assert_eq!(schedule::next_occurrence(&bill, date(2024, 3, 11)), None);

    let tx = NewTransaction::from_bill(&bill, due);
    assert_eq!(tx.user_id, bill.user_id);
    assert_eq!(tx.description, bill.description);
    assert_eq!(tx.amount, BigDecimal::from(500));
    assert_eq!(tx.transaction_type, "expense");
    assert_eq!(tx.status, "pending");
    assert_eq!(tx.due_date, date(2024, 3, 10));
    assert_eq!(tx.notes, AUTO_GENERATED_NOTE);
}
