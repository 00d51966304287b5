use serde::{Deserialize, Serialize};

/// `GET /api/health` body. `status` is `"UP"` while the server is serving.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn up() -> Self {
        Self {
            status: "UP".to_string(),
        }
    }
}

/// Generic `{ "message": ... }` success body (logout, acknowledgements).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}
