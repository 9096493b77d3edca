//! Answer pipeline requests, results and stage failures

mod request;
mod result;
mod stage;

pub use request::AnswerRequest;
pub(crate) use result::millis;
pub use result::{AnswerResult, AnswerTiming, BatchItemResult, FollowupResult};
pub use stage::{AnswerFailure, AnswerStage};
