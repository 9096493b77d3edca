//! Infrastructure services

mod answer_service;
mod embedding_service;
mod warmup_service;

pub use answer_service::{AnswerService, AnswerServiceConfig};
pub use embedding_service::{EmbeddingService, EmbeddingServiceConfig};
pub use warmup_service::{WarmupReport, WarmupService};
