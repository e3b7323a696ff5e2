use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{rejection::FormRejection, FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
    Form,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::shared::constants::TIMEZONE_COOKIE;

/// Form extractor that reports rejections through `AppError`
pub struct AppForm<T>(pub T);

impl<T, S> FromRequest<S> for AppForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(form_rejection_error(rejection)),
        }
    }
}

fn form_rejection_error(rejection: FormRejection) -> AppError {
    let message = match rejection {
        FormRejection::InvalidFormContentType(_) => {
            "Expected an application/x-www-form-urlencoded body".to_string()
        }
        other => format!("Failed to parse form: {}", other.body_text()),
    };

    AppError::BadRequest(message)
}

/// Raw value of the requester's `timezone` cookie, if any.
///
/// Resolution against the server default happens in the service, this only
/// reads the header.
#[derive(Debug, Clone, Default)]
pub struct TimezoneCookie(pub Option<String>);

impl<S> FromRequestParts<S> for TimezoneCookie
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(find_cookie(&parts.headers, TIMEZONE_COOKIE)))
    }
}

/// Find a cookie by name across all `Cookie` headers, percent-decoding its value
fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            let value = value.trim().trim_matches('"');
            urlencoding::decode(value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
}
