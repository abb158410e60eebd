pub mod search_request;
pub mod search_response;

pub use search_request::SearchRequest;
pub use search_response::SearchResponse;
