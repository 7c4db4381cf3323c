//! Request body extraction that reports failures through `AppError`.

use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejections (malformed body, wrong field types, missing
/// content type) come back as the standard error body with `validation_error`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
