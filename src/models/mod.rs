pub mod assistant;
pub mod recurring;
pub mod report;
pub mod transaction;

pub use assistant::{CategoryAmount, ChatReply, ChatTurn, FinancialAnalysis, MonthlyFlow, ReplyKind};
pub use recurring::{RecurrenceType, RecurringBill};
pub use report::{CategoryTotal, GenerationError, GenerationReport, MonthTotal};
pub use transaction::{NewTransaction, AUTO_GENERATED_NOTE};
