//! Data models for Toolcrib

pub mod rfid;
pub mod tool;
pub mod transaction;
pub mod user;

// Re-export commonly used types
pub use rfid::RfidRead;
pub use tool::{Tool, ToolStatus};
pub use transaction::{Operation, Transaction, TransactionAction};
pub use user::{AccessLevel, User};
