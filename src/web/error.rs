//! HTTP presentation of [`Error`].
//!
//! Handlers that own a form re-render it themselves for form errors; anything
//! that reaches this impl is answered with a status code and a short page.

use crate::{errors::Error, web::render};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{error, warn};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => Redirect::to("/login").into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                render::message_page("Login", &self.to_string()),
            )
                .into_response(),
            Self::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                render::message_page("Not Found", &self.to_string()),
            )
                .into_response(),
            e if e.is_form_error() => {
                warn!("Unhandled form error: {}", e);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    render::message_page("Error", &e.to_string()),
                )
                    .into_response()
            }
            e => {
                error!("Internal error while handling request: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    render::message_page(
                        "Internal Server Error",
                        "Something went wrong on our end.",
                    ),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            Error::NotFound {
                entity: "Course",
                id: 1
            }
            .into_response()
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::validation("credits", "bad").into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::Database(sea_orm::DbErr::Custom("x".into()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let response = Error::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).map(|v| v.as_bytes()),
            Some(&b"/login"[..])
        );
    }
}
