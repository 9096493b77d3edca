//! API request/response types

pub mod error;
pub mod json;
pub mod rag;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use rag::{
    AskRequest, AskResponse, BatchEntry, BatchRequest, BatchResponse, CacheStatsResponse,
    FollowupResponse, IndexResponse, MessageResponse,
};
