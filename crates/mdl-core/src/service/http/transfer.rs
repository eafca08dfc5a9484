//! One libcurl request/response cycle.
//!
//! Runs in the current thread; call from `spawn_blocking` when used from
//! async code.

use std::cell::Cell;
use std::io::{self, Write};
use std::str;
use std::time::Duration;

use url::Url;

use super::headers::{parse_headers, parse_status_line, ResponseHeaders};
use crate::service::wire::error_detail;
use crate::service::ServiceError;

/// Issues a GET (or a JSON POST when `json_body` is set) and streams a 2xx
/// body into `out`. Non-2xx bodies are kept aside and turned into
/// `ServiceError::Http` with the service's detail message.
pub(crate) fn perform(
    url: &Url,
    json_body: Option<&[u8]>,
    connect_timeout: Duration,
    timeout: Duration,
    out: &mut dyn Write,
) -> Result<ResponseHeaders, ServiceError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url.as_str())?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(connect_timeout)?;
    easy.timeout(timeout)?;

    let mut list = curl::easy::List::new();
    if let Some(data) = json_body {
        easy.post(true)?;
        easy.post_fields_copy(data)?;
        list.append("Content-Type: application/json")?;
        // No 100-continue round trip for small JSON bodies.
        list.append("Expect:")?;
    }
    easy.http_headers(list)?;

    let status = Cell::new(0u32);
    let mut header_lines: Vec<String> = Vec::new();
    let mut error_body: Vec<u8> = Vec::new();
    let mut write_error: Option<io::Error> = None;

    let result = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                let line = s.trim_end();
                if let Some(code) = parse_status_line(line) {
                    // New response (redirect or 100-continue): start over.
                    status.set(code);
                    header_lines.clear();
                } else if !line.is_empty() {
                    header_lines.push(line.to_string());
                }
            }
            true
        })?;
        transfer.write_function(|data| {
            if !(200..300).contains(&status.get()) {
                error_body.extend_from_slice(data);
                return Ok(data.len());
            }
            match out.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            }
        })?;
        transfer.perform()
    };

    if let Err(e) = result {
        return Err(match write_error {
            Some(io) => ServiceError::Io(io),
            None => ServiceError::Curl(e),
        });
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(ServiceError::Http {
            status: code,
            detail: error_detail(&error_body),
        });
    }
    Ok(parse_headers(&header_lines))
}
