//! Response bodies and the uniform error response.

use bytes::Bytes;
use http_body_util::{BodyExt, Empty, Full, combinators::BoxBody};
use hyper::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderName, HeaderValue};
use hyper::{HeaderMap, Response, StatusCode};

use super::endpoint::TEXT_PLAIN_UTF8;

/// Body type of every response the monitor produces.
pub type RelayBody = BoxBody<Bytes, hyper::Error>;

/// Marker header telling pprof clients the body is an error, not a profile.
pub const PPROF_ERROR_HEADER: HeaderName = HeaderName::from_static("x-go-pprof");

/// Create an empty response body.
pub fn empty_body() -> RelayBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

/// Create a response body with content.
pub fn full_body(content: impl Into<Bytes>) -> RelayBody {
    Full::new(content.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Build a plain-text error response on top of `headers`.
///
/// Any `Content-Disposition` already in `headers` is dropped so an error page
/// is never offered as a file download.
pub fn serve_error(mut headers: HeaderMap, status: StatusCode, message: &str) -> Response<RelayBody> {
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8));
    headers.insert(PPROF_ERROR_HEADER, HeaderValue::from_static("1"));
    headers.remove(CONTENT_DISPOSITION);

    let mut response = Response::new(full_body(format!("{}\n", message)));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_string(response: Response<RelayBody>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_serve_error_shape() {
        let response = serve_error(HeaderMap::new(), StatusCode::BAD_REQUEST, "nope");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[CONTENT_TYPE], TEXT_PLAIN_UTF8);
        assert_eq!(response.headers()[PPROF_ERROR_HEADER], "1");
        assert_eq!(body_string(response).await, "nope\n");
    }

    #[test]
    fn test_serve_error_clears_disposition() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"trace\""),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));

        let response = serve_error(headers, StatusCode::INTERNAL_SERVER_ERROR, "boom");

        assert!(response.headers().get(CONTENT_DISPOSITION).is_none());
        assert_eq!(response.headers()[CONTENT_TYPE], TEXT_PLAIN_UTF8);
    }

    #[test]
    fn test_serve_error_keeps_unrelated_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));

        let response = serve_error(headers, StatusCode::BAD_REQUEST, "nope");
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    }
}
