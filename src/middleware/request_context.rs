use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::models::ANONYMOUS_USER;

/// HTTP header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP header carrying the signed-in reader's id
pub const READER_ID_HEADER: &str = "x-reader-id";

const MAX_READER_ID_LEN: usize = 128;

/// Extension type for storing request ID in request extensions
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The reader a request acts for; anonymous when no usable header was sent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReaderId(pub String);

impl ReaderId {
    pub fn anonymous() -> Self {
        Self(ANONYMOUS_USER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads the reader id header, falling back to anonymous when it is
    /// missing, blank, not valid text or unreasonably long
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(READER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.len() <= MAX_READER_ID_LEN)
            .map(|s| Self(s.to_string()))
            .unwrap_or_else(Self::anonymous)
    }
}

impl std::fmt::Display for ReaderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Middleware that resolves the request ID and reader ID into request extensions.
///
/// An incoming `x-request-id` is reused when it parses as a UUID, otherwise a
/// new one is generated. The request ID is echoed on the response.
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(RequestId)
        .unwrap_or_else(RequestId::new);
    let reader_id = ReaderId::from_headers(request.headers());

    request.extensions_mut().insert(request_id.clone());
    request.extensions_mut().insert(reader_id);

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id.to_string()) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

/// Tracing span for an HTTP request, tagged with its request ID and reader
pub fn make_span_with_request_id(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let reader_id = request
        .extensions()
        .get::<ReaderId>()
        .map(|id| id.to_string())
        .unwrap_or_else(|| ANONYMOUS_USER.to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
        reader_id = %reader_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_reader(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(READER_ID_HEADER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        let reader = ReaderId::from_headers(&HeaderMap::new());
        assert_eq!(reader, ReaderId::anonymous());
        assert_eq!(reader.as_str(), "anonymous");
    }

    #[test]
    fn test_header_value_is_trimmed() {
        let reader = ReaderId::from_headers(&headers_with_reader("  reader-42 "));
        assert_eq!(reader, ReaderId("reader-42".to_string()));
    }

    #[test]
    fn test_blank_header_is_anonymous() {
        assert_eq!(
            ReaderId::from_headers(&headers_with_reader("   ")),
            ReaderId::anonymous()
        );
    }

    #[test]
    fn test_overlong_header_is_anonymous() {
        let long = "r".repeat(MAX_READER_ID_LEN + 1);
        assert_eq!(
            ReaderId::from_headers(&headers_with_reader(&long)),
            ReaderId::anonymous()
        );
    }

    #[test]
    fn test_request_id_display_is_uuid() {
        let id = RequestId::new();
        assert!(Uuid::parse_str(&id.to_string()).is_ok());
    }
}
