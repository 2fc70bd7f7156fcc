use crate::elasticsearch::ElasticsearchError;

/// Turns a response body into a `serde_json::Value`, which the caller then
/// maps onto its response type.
///
/// Swapping the decoder lets callers plug in a faster or more lenient JSON
/// parser without touching individual requests.
pub trait Decoder: Send + Sync {
    fn decode(&self, body: &str) -> Result<serde_json::Value, ElasticsearchError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDecoder;

impl Decoder for DefaultDecoder {
    fn decode(&self, body: &str) -> Result<serde_json::Value, ElasticsearchError> {
        serde_json::from_str(body).map_err(ElasticsearchError::Decode)
    }
}
