//! Axum route handlers for the landing pages and the three template forms.

use axum::{
    extract::{Path, State},
    response::{Redirect, Response},
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::form::FormSubmission;
use crate::portfolio::{catalog, resume, showcase, sidebar, Template};
use crate::render::View;
use crate::state::AppState;

/// Anything but `1`, `2` or `3` in the path is a missing page, not a bad request.
fn template_from_path(raw: &str) -> Result<Template, AppError> {
    raw.parse::<u8>()
        .ok()
        .and_then(Template::from_number)
        .ok_or_else(|| AppError::NotFound(format!("Template {raw} does not exist")))
}

fn to_context<T: Serialize>(context: &T) -> Result<Value, AppError> {
    serde_json::to_value(context).map_err(|e| AppError::Internal(e.into()))
}

/// GET /
pub async fn handle_home(State(state): State<AppState>) -> Result<Response, AppError> {
    state
        .renderer
        .render(&View::new("home.html"), json!({ "templates": catalog() }))
}

/// GET /design
pub async fn handle_design(State(state): State<AppState>) -> Result<Response, AppError> {
    let schemas: Vec<_> = Template::ALL.iter().map(|t| t.form_schema()).collect();
    state.renderer.render(
        &View::new("design.html"),
        json!({ "templates": catalog(), "forms": schemas }),
    )
}

/// GET /template/:n
pub async fn handle_template(Path(n): Path<String>) -> Result<Redirect, AppError> {
    let template = template_from_path(&n)?;
    Ok(Redirect::to(&template.form_path()))
}

/// GET /template/:n/form
///
/// Renders the empty form; every submission starts from scratch.
pub async fn handle_form(
    State(state): State<AppState>,
    Path(n): Path<String>,
) -> Result<Response, AppError> {
    let template = template_from_path(&n)?;
    state.renderer.render(
        &View::new(template.form_view()),
        to_context(&template.form_schema())?,
    )
}

/// POST /template/:n/form
///
/// Normalizes the submission into the template's context and renders the portfolio.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(n): Path<String>,
    form: FormSubmission,
) -> Result<Response, AppError> {
    let template = template_from_path(&n)?;

    let context = match template {
        Template::Showcase => to_context(&showcase::assemble(&form))?,
        Template::Sidebar => to_context(&sidebar::assemble(&form))?,
        Template::Resume => to_context(&resume::assemble_with_upload(&form, &state.uploads).await?)?,
    };

    info!("Rendering portfolio template {}", template.number());
    state
        .renderer
        .render(&View::new(template.portfolio_view()), context)
}
