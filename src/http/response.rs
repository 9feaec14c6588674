//! Response classification
//!
//! No requests are made here; callers own the client, authentication and
//! request construction.

use crate::catalogue::ErrorList;
use crate::error::{Error, Result};
use crate::pagination::{Page, Paginated};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Pass a successful response through, classify everything else
///
/// - 429 → [`Error::RateLimited`] carrying the `Retry-After` seconds, if any
/// - other non-2xx with an `{errors: [...]}` body → [`Error::Api`]
/// - other non-2xx → [`Error::HttpStatus`] with the raw body
pub async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = extract_retry_after(&response);
        debug!("Throttled by {}, retry after {:?}", response.url(), retry_after);
        return Err(Error::rate_limited(retry_after));
    }

    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorList>(&body) {
        Ok(list) if !list.errors.is_empty() => Err(list.into()),
        _ => Err(Error::http_status(status.as_u16(), body)),
    }
}

/// Classify the response, then decode its JSON body
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_response(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Classify the response, decode a list response and view it as a page
pub async fn read_page<R>(response: Response) -> Result<Page<R::Item>>
where
    R: Paginated + DeserializeOwned,
{
    read_json::<R>(response).await?.into_page()
}

/// Extract the `Retry-After` header value in seconds
pub fn extract_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .map(Duration::from_secs)
}
