//! API Models Module
//!
//! Request, response and configuration types for the prediction service.

use serde::{Deserialize, Serialize};

use formgrade_core::Grade;

/// Configuration for the API server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Body of a prediction request.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    /// Flattened landmark coordinates; must hold exactly 99 values.
    #[serde(default)]
    pub landmarks: Option<Vec<f64>>,
}

/// Successful prediction response.
#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub prediction: Grade,
}

/// Error payload for rejected requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
