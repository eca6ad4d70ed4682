//! HTTP front end.
//!
//! The router maps form posts and page requests onto [`crate::core`]
//! operations. State is only the shared database connection; the caller's
//! identity travels with each request as a [`core::session::Principal`].
//!
//! [`core::session::Principal`]: crate::core::session::Principal

mod admin;
mod auth;
mod dashboard;
mod error;
pub mod forms;
pub mod principal;
pub mod render;

use crate::errors::{Error, Result};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use sea_orm::DatabaseConnection;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool
    pub db: DatabaseConnection,
}

impl AppState {
    /// Wraps a database connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Answers a failed form submission.
///
/// Form errors re-render the form through `page` with status 422; every
/// other error is passed on.
pub(crate) fn rerender<F>(err: Error, page: F) -> Result<Response>
where
    F: FnOnce(&str) -> Html<String>,
{
    if err.is_form_error() {
        warn!("Form rejected: {}", err);
        Ok((StatusCode::UNPROCESSABLE_ENTITY, page(&err.to_string())).into_response())
    } else {
        Err(err)
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/login") }))
        .route(
            "/register",
            get(auth::register_form).post(auth::register_submit),
        )
        .route("/login", get(auth::login_form).post(auth::login_submit))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/health", get(dashboard::health))
        .nest("/admin", admin::routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves the application until the process stops.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
