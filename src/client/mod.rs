//! Analysis service client
//! Request building, the HTTP transport and response normalization

pub mod endpoint;
pub mod http;
pub mod request;
pub mod response;
pub mod service;

pub use endpoint::Endpoint;
pub use http::HttpAnalysisClient;
pub use request::AnalyzeRequest;
pub use response::{AnalysisResult, AnalyzeResponse, RoleRecommendation};
pub use service::AnalysisService;
