pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod tutor;

pub use self::metrics::{get_metrics, init_metrics};
pub use prompt::build_prompt;
pub use tutor::{Query, TutorError, TutorService, DEFAULT_TOPIC, FALLBACK_ANSWER};
