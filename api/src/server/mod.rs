//! API Server Module
//!
//! This module contains the server setup functionality for the prediction
//! service.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use formgrade_core::GradeClassifier;

use crate::handlers::{health_check, predict, ApiState};
use crate::models::ApiConfig;

/// Main prediction server
pub struct ApiServer {
    /// Server configuration
    config: ApiConfig,
    /// Shared state
    state: Arc<ApiState>,
}

impl ApiServer {
    /// Create a new server around an already-loaded classifier
    pub fn new(config: ApiConfig, classifier: GradeClassifier) -> Self {
        let state = Arc::new(ApiState { classifier });
        Self { config, state }
    }

    /// Build the application router with the shared state
    pub fn router(&self) -> Router {
        Router::new()
            .route("/predict", post(predict))
            .route("/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the API server
    pub async fn start(&self) -> Result<()> {
        info!(
            "Starting formgrade API server on {}:{}",
            self.config.host, self.config.port
        );

        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("formgrade API server listening on {}", addr);

        axum::serve(listener, self.router())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to start API server: {}", e))?;

        Ok(())
    }
}
