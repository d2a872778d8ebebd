//! Hand-off to the rendering layer.
//!
//! Handlers never format pages themselves: they pass a view name and a fully
//! defaulted context to the `PageRenderer` held in `AppState`.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::errors::AppError;

/// A page the service can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View(String);

impl View {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Turns a view and its context into a response.
///
/// Carried in `AppState` as `Arc<dyn PageRenderer>`, so an HTML engine can
/// replace the JSON hand-off without touching handlers.
pub trait PageRenderer: Send + Sync {
    fn render(&self, view: &View, context: Value) -> Result<Response, AppError>;
}

/// Responds with `{"view": ..., "context": ...}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl PageRenderer for JsonRenderer {
    fn render(&self, view: &View, context: Value) -> Result<Response, AppError> {
        Ok(Json(json!({
            "view": view.name(),
            "context": context,
        }))
        .into_response())
    }
}
