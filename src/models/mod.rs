//! Request and Response models for the response cache API

pub mod requests;
pub mod responses;

pub use requests::{
    CacheSetRequest, ChatMessage, ChatRequest, CodeReviewRequest, ExplainRequest, HintRequest,
    LearningPathRequest,
};
pub use responses::{
    CacheGetResponse, ChatResponse, FeatureResponse, HealthResponse, MessageResponse,
    StatsResponse,
};
