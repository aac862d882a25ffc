//! API Handlers Module
//!
//! This module contains the request handlers for the prediction service.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{debug_handler, extract::State, http::StatusCode, response::Json};

use formgrade_core::{GradeClassifier, PoseFeatures};

use crate::models::{ErrorResponse, PredictRequest, PredictResponse};

/// Represents the state of the prediction service
///
/// Holds the one model artifact loaded at startup. It is immutable for the
/// process lifetime, so concurrent requests read it without locking.
pub struct ApiState {
    /// Classifier loaded from the model artifact
    pub classifier: GradeClassifier,
}

/// Health check endpoint
#[debug_handler]
pub async fn health_check() -> Json<HashMap<String, String>> {
    let mut response = HashMap::new();
    response.insert("status".to_string(), "healthy".to_string());
    response.insert("service".to_string(), "formgrade-api".to_string());
    Json(response)
}

/// Classify one pose feature vector
#[debug_handler]
pub async fn predict(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Some(landmarks) = request.landmarks else {
        return Err(bad_request("No landmarks provided"));
    };

    // Length is the only validation; capture applied no normalization
    // beyond flattening, so none is applied here either.
    let features = PoseFeatures::from_flat(landmarks)
        .map_err(|_| bad_request("Invalid number of landmarks"))?;

    match state.classifier.predict(&features) {
        Ok(grade) => {
            tracing::debug!("Classified request as {}", grade);
            Ok(Json(PredictResponse { prediction: grade }))
        }
        Err(e) => {
            tracing::error!("Failed to classify request: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Prediction failed".to_string(),
                }),
            ))
        }
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}
