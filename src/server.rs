use std::sync::Arc;
use axum::{Form, Json, Router, extract::State, routing::post};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use tower_http::cors::{CorsLayer, Any};
use serde::Serialize;
use tracing::{info, warn};
use crate::error::KineticError;
use crate::form::FormData;
use crate::serializer::{FormQuerySerializer, Submission};

pub struct AppState {
    pub serializer: FormQuerySerializer,
    /// When set, `/search` answers with the url instead of redirecting.
    pub dry_run: bool,
}

#[derive(Serialize)]
pub struct UrlResponse {
    pub status: String,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/search", post(search_form))
        .route("/v1/url", post(url_json))
        .layer(cors)
        .with_state(state)
}

// Browser form posts. Pairs keep their order and repeats.
async fn search_form(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form: FormData = pairs.into_iter().collect();
    match state.serializer.submit(&form, state.dry_run) {
        Ok(Submission::Navigate(url)) => {
            // Redirect::to panics on urls that are not valid header values
            if let Err(e) = HeaderValue::try_from(url.as_str()) {
                let e = KineticError::Input(format!("url is not a valid Location header: {e}"));
                return error(e.to_string(), state.dry_run);
            }
            info!(%url, fields = form.len(), "redirecting search");
            Redirect::to(&url).into_response()
        }
        Ok(Submission::DryRun(url)) => {
            info!(%url, fields = form.len(), "dry run search");
            ok(url, true)
        }
        Err(e) => error(e.to_string(), state.dry_run),
    }
}

// Programmatic clients always get the url back.
async fn url_json(State(state): State<Arc<AppState>>, Json(form): Json<FormData>) -> Response {
    match state.serializer.build_url(&form) {
        Ok(url) => {
            info!(%url, fields = form.len(), "url built");
            ok(url, state.dry_run)
        }
        Err(e) => error(e.to_string(), state.dry_run),
    }
}

fn ok(url: String, dry_run: bool) -> Response {
    let body = UrlResponse { status: "ok".into(), dry_run, url: Some(url), error: None };
    (StatusCode::OK, Json(body)).into_response()
}

fn error(msg: String, dry_run: bool) -> Response {
    warn!(%msg, code = StatusCode::BAD_REQUEST.as_u16(), "search error");
    let body = UrlResponse { status: "error".into(), dry_run, url: None, error: Some(msg) };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}
