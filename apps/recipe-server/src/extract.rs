//! Request extractors.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ServerError;

/// JSON body extractor whose rejections render as [`ServerError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);

/// Path parameter extractor. Unparsable ids render as 404.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServerError))]
pub struct ApiPath<T>(pub T);
