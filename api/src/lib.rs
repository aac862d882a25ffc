//! Formgrade API Module
//!
//! The API module exposes the trained pose-quality classifier over HTTP:
//! one prediction endpoint plus a health check, stateless across requests
//! except for the immutable loaded model.

pub mod handlers;
pub mod models;
pub mod server;

pub use handlers::*;
pub use models::*;
pub use server::*;

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use ndarray::Array2;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use formgrade_core::{train, Grade, LabeledDataset, TrainingConfig, FEATURE_DIMENSIONS};

    fn trained_server() -> ApiServer {
        let mut values = Vec::new();
        let mut grades = Vec::new();

        for i in 0..10 {
            values.extend(vec![0.1 + i as f64 * 0.001; FEATURE_DIMENSIONS]);
            grades.push(Grade::Good);
            values.extend(vec![0.9 - i as f64 * 0.001; FEATURE_DIMENSIONS]);
            grades.push(Grade::Bad);
        }

        let dataset = LabeledDataset {
            records: Array2::from_shape_vec((grades.len(), FEATURE_DIMENSIONS), values).unwrap(),
            grades,
        };
        let (classifier, _) = train(&dataset, &TrainingConfig::default()).unwrap();

        ApiServer::new(ApiConfig::default(), classifier)
    }

    async fn post_predict(server: &ApiServer, body: Value) -> (StatusCode, Value) {
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/predict")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_api_config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
    }

    #[tokio::test]
    async fn test_valid_request_returns_known_grade() {
        let server = trained_server();
        let (status, body) = post_predict(&server, json!({ "landmarks": vec![0.1; 99] })).await;

        assert_eq!(status, StatusCode::OK);
        let prediction = body["prediction"].as_str().unwrap();
        assert!(["good", "mediocre", "bad"].contains(&prediction));
    }

    #[tokio::test]
    async fn test_missing_landmarks_is_rejected() {
        let server = trained_server();
        let (status, body) = post_predict(&server, json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No landmarks provided");
    }

    #[tokio::test]
    async fn test_wrong_landmark_count_is_rejected() {
        let server = trained_server();

        for count in [50usize, 98, 100] {
            let (status, body) =
                post_predict(&server, json!({ "landmarks": vec![0.1; count] })).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Invalid number of landmarks");
        }
    }

    #[tokio::test]
    async fn test_health_check_reports_healthy() {
        let server = trained_server();
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
    }
}
