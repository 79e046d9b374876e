pub mod health;
pub mod metrics;
pub mod profile;
pub mod wallet;
pub mod ws;

use serde::Serialize;

use crate::aggregator::Fetched;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl<V: Serialize> ApiResponse<Fetched<V>> {
    /// Failed fetches still carry their zero value so the client can render.
    pub fn fetched(fetched: Fetched<V>) -> Self {
        Self {
            success: !fetched.is_failed(),
            error: fetched.error().map(str::to_string),
            data: Some(fetched),
        }
    }
}
