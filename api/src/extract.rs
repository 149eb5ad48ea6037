use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use tracing::debug;

/// A submitted body, read as JSON when the request says so and as a
/// urlencoded form otherwise.
///
/// Bodies that cannot be read become `T::default()`, so the handler's own
/// checks decide what the user sees.
#[derive(Debug, Clone, Default)]
pub struct Submitted<T>(pub T);

impl<T, S> FromRequest<S> for Submitted<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.trim_start().starts_with("application/json"));

        let parsed = if is_json {
            Json::<T>::from_request(req, state)
                .await
                .map(|Json(value)| value)
                .map_err(|e| e.body_text())
        } else {
            Form::<T>::from_request(req, state)
                .await
                .map(|Form(value)| value)
                .map_err(|e| e.body_text())
        };

        Ok(Self(parsed.unwrap_or_else(|reason| {
            debug!("Unreadable request body, treating as empty: {}", reason);
            T::default()
        })))
    }
}
