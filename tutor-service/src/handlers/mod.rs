//! HTTP handlers for the tutor service.

pub mod ask;
pub mod health;

pub use ask::ask_question;
pub use health::{health_check, metrics, not_found};
