//! Classify HTTP status and curl errors into retry policy error kinds.

use crate::retry::policy::ErrorKind;
use crate::service::ServiceError;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify a service error. Malformed bodies and local I/O are never retried.
pub fn classify(e: &ServiceError) -> ErrorKind {
    match e {
        ServiceError::Curl(ce) => classify_curl_error(ce),
        ServiceError::Http { status, .. } => classify_http_status(*status),
        ServiceError::Parse(_) | ServiceError::Protocol(_) | ServiceError::Io(_) => {
            ErrorKind::Other
        }
    }
}

/// Like [`classify`], but any HTTP answer is final. Used for calls that are
/// not safe to repeat once the service has answered, such as starting a job.
pub fn classify_transport(e: &ServiceError) -> ErrorKind {
    match e {
        ServiceError::Curl(ce) => classify_curl_error(ce),
        _ => ErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_429_and_503_throttled() {
        assert_eq!(classify_http_status(429), ErrorKind::Throttled);
        assert_eq!(classify_http_status(503), ErrorKind::Throttled);
    }

    #[test]
    fn http_5xx_retryable() {
        assert!(matches!(classify_http_status(500), ErrorKind::Http5xx(500)));
        assert!(matches!(classify_http_status(502), ErrorKind::Http5xx(502)));
    }

    #[test]
    fn http_4xx_and_bodies_are_final() {
        let rejected = ServiceError::Http {
            status: 404,
            detail: "unknown job".into(),
        };
        assert_eq!(classify(&rejected), ErrorKind::Other);
        assert_eq!(
            classify(&ServiceError::Protocol("bad status".into())),
            ErrorKind::Other
        );
    }

    #[test]
    fn transport_only_ignores_http_answers() {
        let rejected = ServiceError::Http {
            status: 500,
            detail: "Unsupported URL".into(),
        };
        assert!(matches!(classify(&rejected), ErrorKind::Http5xx(500)));
        assert_eq!(classify_transport(&rejected), ErrorKind::Other);
        assert_eq!(
            classify_transport(&ServiceError::Curl(curl::Error::new(7))),
            ErrorKind::Connection
        );
    }

    #[test]
    fn curl_timeout_and_connect() {
        // CURLE_OPERATION_TIMEDOUT = 28, CURLE_COULDNT_CONNECT = 7
        assert_eq!(
            classify(&ServiceError::Curl(curl::Error::new(28))),
            ErrorKind::Timeout
        );
        assert_eq!(
            classify(&ServiceError::Curl(curl::Error::new(7))),
            ErrorKind::Connection
        );
    }
}
