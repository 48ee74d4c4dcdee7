//! Map curl errors and HTTP status codes onto transport error kinds.

use super::error::{TransportError, TransportErrorKind};

/// Classify a non-2xx HTTP status.
pub fn classify_http_status(code: u32) -> TransportErrorKind {
    TransportErrorKind::HttpStatus(code)
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> TransportErrorKind {
    if e.is_operation_timedout() {
        return TransportErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
        || e.is_file_couldnt_read_file()
    {
        return TransportErrorKind::Connection;
    }
    TransportErrorKind::Other
}

pub(crate) fn from_curl(url: &str, e: &curl::Error) -> TransportError {
    TransportError {
        kind: classify_curl_error(e),
        url: url.to_string(),
        message: e.to_string(),
    }
}

pub(crate) fn from_status(url: &str, code: u32) -> TransportError {
    TransportError {
        kind: classify_http_status(code),
        url: url.to_string(),
        message: format!("server returned status {}", code),
    }
}
