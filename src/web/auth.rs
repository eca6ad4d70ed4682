//! Registration, login and logout pages.

use crate::{
    core::{
        auth::{self, RegistrationForm},
        session,
    },
    errors::{Error, Result},
    web::{
        AppState,
        forms::{LoginForm, NoticeQuery},
        principal::{Authenticated, expired_session_cookie, session_cookie},
        render::{self, Field},
        rerender,
    },
};
use axum::{
    Form,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::info;

const ROLES: [(&str, &str); 3] = [
    ("Student", "Student"),
    ("Teacher", "Teacher"),
    ("Admin", "Admin"),
];

fn register_page(form: &RegistrationForm, error: Option<&str>) -> Html<String> {
    let body = render::form(
        "/register",
        &[
            Field::text("email", "Email", &form.email),
            Field::text("username", "Username", &form.username),
            Field::text("contact", "Contact", &form.contact),
            Field::text("address", "Address", &form.address),
            Field::select("role", "Role", &ROLES, &form.role),
            Field::password("password", "Password"),
            Field::password("confirm_password", "Confirm password"),
        ],
        "Register",
        error,
    );
    render::page("Register", None, &body)
}

fn login_page(email: &str, notice: Option<&str>, error: Option<&str>) -> Html<String> {
    let body = format!(
        "{}{}<p><a href=\"/register\">Create an account</a></p>",
        render::notice(notice),
        render::form(
            "/login",
            &[
                Field::text("email", "Email", email),
                Field::password("password", "Password"),
            ],
            "Login",
            error,
        )
    );
    render::page("Login", None, &body)
}

/// `GET /register`
pub async fn register_form() -> Html<String> {
    register_page(&RegistrationForm::default(), None)
}

/// `POST /register`
pub async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegistrationForm>,
) -> Result<Response> {
    match auth::register(&state.db, &form).await {
        Ok((user, _)) => {
            info!(user_id = user.id, "Registration completed");
            Ok(Redirect::to("/login?notice=registered").into_response())
        }
        Err(e) => rerender(e, |message| register_page(&form, Some(message))),
    }
}

/// `GET /login`
pub async fn login_form(Query(query): Query<NoticeQuery>) -> Html<String> {
    login_page("", query.message(), None)
}

/// `POST /login`
///
/// Sets the session cookie and sends the user to their landing page.
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match auth::login(&state.db, &form.email, &form.password).await {
        Ok((user, session)) => Ok((
            [(header::SET_COOKIE, session_cookie(&session.key))],
            Redirect::to(auth::landing_path(&user)),
        )
            .into_response()),
        Err(Error::InvalidCredentials) => Ok((
            StatusCode::UNAUTHORIZED,
            login_page(
                &form.email,
                None,
                Some(&Error::InvalidCredentials.to_string()),
            ),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

/// `GET /logout`
pub async fn logout(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
) -> Result<Response> {
    session::close_session(&state.db, &principal.session_key).await?;
    info!(user_id = principal.user_id, "User logged out");
    Ok((
        [(header::SET_COOKIE, expired_session_cookie())],
        Redirect::to("/login?notice=logged_out"),
    )
        .into_response())
}
