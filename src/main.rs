use axum::{routing::{get, post}, Router};
use finflow_rust::{api, create_pool, AppConfig, AssistantClient, RecurringGenerator, ReportService};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config.server);

    // 创建数据库连接池
    let pool = create_pool(&config.database.url).await?;
    info!("Database pool created");

    // 创建服务
    let generator = Arc::new(RecurringGenerator::new(
        pool.clone(),
        config.generation.export_path.as_ref().map(PathBuf::from),
    ));
    let assistant = Arc::new(AssistantClient::new(config.ai.clone()));
    let reports = Arc::new(ReportService::new(pool));

    // 构建路由
    // 周期账单批处理路由
    let recurring_routes = Router::new()
        .route("/api/recurring/generate", post(api::generate_recurring))
        .route("/api/transactions/mark-overdue", post(api::mark_overdue))
        .with_state(generator);

    // AI 代理路由
    let assistant_routes = Router::new()
        .route("/api/ai/chat", post(api::ai_chat))
        .route("/api/ai/insights", post(api::ai_insights))
        .with_state(assistant);

    // 汇总报表路由
    let report_routes = Router::new()
        .route("/api/reports/summary/:user_id", get(api::monthly_summary))
        .with_state(reports);

    // 合并路由
    let app = Router::new()
        .route("/health", get(api::health_check))
        .merge(recurring_routes)
        .merge(assistant_routes)
        .merge(report_routes)
        .layer(ServiceBuilder::new());

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/recurring/generate       - Materialize due recurring bills");
    info!("  POST /api/transactions/mark-overdue - Flag overdue pending transactions");
    info!("  POST /api/ai/chat                  - AI assistant chat proxy");
    info!("  POST /api/ai/insights              - AI financial insights proxy");
    info!("  GET  /api/reports/summary/:user_id - Monthly financial summary");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
