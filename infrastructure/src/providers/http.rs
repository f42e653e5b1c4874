//! HTTP helpers shared by the connectors

use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use panel_application::{ProviderError, TextStream};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Send a request and decode a JSON body, mapping HTTP failures.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = send(request).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse response: {e}")))
}

/// Send a request and require a 2xx status.
pub(crate) async fn send(request: RequestBuilder) -> Result<Response, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::Http(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, body))
}

pub(crate) fn status_error(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(body),
        _ => ProviderError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

/// Server-sent events from a streaming response, as `(event, data)` pairs.
pub(crate) fn sse_events(
    response: Response,
) -> impl Stream<Item = Result<(String, String), ProviderError>> + Send {
    response
        .bytes_stream()
        .eventsource()
        .map(|event| match event {
            Ok(event) => Ok((event.event, event.data)),
            Err(e) => Err(ProviderError::Stream(e.to_string())),
        })
}

/// Box a fragment stream into the port's stream type.
pub(crate) fn text_stream<S>(stream: S) -> TextStream
where
    S: Stream<Item = Result<String, ProviderError>> + Send + 'static,
{
    Box::pin(stream)
}
