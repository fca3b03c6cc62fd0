pub mod assistant;
pub mod generator;
pub mod report;
pub mod schedule;

pub use assistant::{classify_reply, AssistantClient, AssistantError};
pub use generator::RecurringGenerator;
pub use report::ReportService;
