//! Route handlers and middleware

use crate::error::AppError;
use crate::types::{NameForm, NameResponse};
use axum::extract::rejection::FormRejection;
use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use axum::{Form, Json};
use std::net::SocketAddr;
use tracing::{debug, info};

/// `POST /name`: echo `first` and `last` as one name
///
/// A body that is not a parseable form counts as missing fields.
pub async fn post_name(
    form: Result<Form<NameForm>, FormRejection>,
) -> Result<Json<NameResponse>, AppError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!(error = %rejection, "Rejected name form body");
            NameForm::default()
        }
    };

    form.full_name()
        .map(|name| Json(NameResponse { name }))
        .ok_or_else(AppError::missing_name)
}

/// Log `<METHOD> <path> - <client ip>` for every request
pub async fn log_request(req: Request, next: Next) -> Response {
    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());
    info!("{} {} - {}", req.method(), req.uri().path(), ip);

    next.run(req).await
}
