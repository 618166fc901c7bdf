//! Request/response logging.
//!
//! A [`RequestSpan`] is opened when a request arrives and logs exactly one
//! entry: either when it is finished with a status, or when it is dropped
//! without one (the connection closed first).

use crate::decorate::Logger;
use crate::dispatch::Pending;
use crate::domain::{LogLevel, Payload};
use std::time::Instant;

pub const REQUEST_EVENT: &str = "HTTP:request";

/// Status reported for spans dropped before a response status was set.
const DEFAULT_STATUS: u16 = 200;

/// ≥500 error, ≥400 warning, everything else info.
pub fn level_for_status(status: u16) -> LogLevel {
    match status {
        500.. => LogLevel::Error,
        400..=499 => LogLevel::Warning,
        _ => LogLevel::Info,
    }
}

#[derive(Clone)]
pub struct HttpInstrumentation {
    logger: Logger,
}

impl HttpInstrumentation {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn start(&self, method: impl Into<String>, url: impl Into<String>) -> RequestSpan {
        RequestSpan {
            logger: self.logger.clone(),
            method: method.into(),
            url: url.into(),
            started: Instant::now(),
            status: None,
            reported: false,
        }
    }
}

pub struct RequestSpan {
    logger: Logger,
    method: String,
    url: String,
    started: Instant,
    status: Option<u16>,
    reported: bool,
}

impl RequestSpan {
    /// Records the status without logging; used if the span is later dropped.
    pub fn set_status(&mut self, status: u16) {
        self.status = Some(status);
    }

    pub fn finish(mut self, status: u16) -> Pending {
        self.status = Some(status);
        self.report()
    }

    fn report(&mut self) -> Pending {
        self.reported = true;
        let status = self.status.unwrap_or(DEFAULT_STATUS);
        let elapsed = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let data = Payload::map();
        data.insert("url", self.url.as_str())
            .insert("method", self.method.as_str())
            .insert("statusCode", u64::from(status))
            .insert("executionTime", elapsed);
        let message = format!("{} [{status}] - {} {elapsed}ms", self.method, self.url);

        self.logger.log(
            level_for_status(status),
            Some(REQUEST_EVENT),
            message,
            Some(&data),
            None,
        )
    }
}

impl Drop for RequestSpan {
    fn drop(&mut self) {
        if !self.reported {
            self.report();
        }
    }
}

#[cfg(feature = "axum")]
pub mod axum {
    //! Middleware for `axum::middleware::from_fn_with_state`.

    use super::HttpInstrumentation;
    use ::axum::extract::{Request, State};
    use ::axum::middleware::Next;
    use ::axum::response::Response;

    pub async fn log_requests(
        State(http): State<HttpInstrumentation>,
        request: Request,
        next: Next,
    ) -> Response {
        let span = http.start(request.method().as_str(), request.uri().to_string());
        let response = next.run(request).await;
        span.finish(response.status().as_u16());
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::lumberjack::Lumberjack;
    use crate::sink::{ConsoleStreams, CoutSinkFactory, SharedBuffer};
    use regex::Regex;
    use serde_json::Value;

    fn instrumented() -> (HttpInstrumentation, SharedBuffer) {
        let out = SharedBuffer::new();
        let streams = ConsoleStreams {
            out: out.writer(),
            err: out.writer(),
        };
        let lumberjack = Lumberjack::builder()
            .sink("cout", CoutSinkFactory::with_streams(streams))
            .create(Options::new().logger("cout"))
            .unwrap();
        (lumberjack.register_http(), out)
    }

    fn entries(out: &SharedBuffer) -> Vec<Value> {
        out.contents()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for_status(200), LogLevel::Info);
        assert_eq!(level_for_status(399), LogLevel::Info);
        assert_eq!(level_for_status(400), LogLevel::Warning);
        assert_eq!(level_for_status(499), LogLevel::Warning);
        assert_eq!(level_for_status(500), LogLevel::Error);
    }

    #[test]
    fn test_finish_logs_once() {
        let (http, out) = instrumented();
        http.start("GET", "http://www.test.com").finish(400);

        let entries = entries(&out);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry["event"], REQUEST_EVENT);
        assert_eq!(entry["logLevel"], "WARNING");
        let message = Regex::new(r"^GET \[400\] - http://www\.test\.com \d+ms$").unwrap();
        assert!(message.is_match(entry["message"].as_str().unwrap()));
        assert_eq!(entry["data"]["url"], "http://www.test.com");
        assert_eq!(entry["data"]["method"], "GET");
        assert_eq!(entry["data"]["statusCode"], 400);
        assert!(entry["data"]["executionTime"].is_u64());
    }

    #[test]
    fn test_drop_logs_the_recorded_status() {
        let (http, out) = instrumented();
        {
            let mut span = http.start("POST", "/upload");
            span.set_status(503);
        }
        let entries = entries(&out);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["logLevel"], "ERROR");
        assert_eq!(entries[0]["data"]["statusCode"], 503);
    }

    #[test]
    fn test_drop_without_status() {
        let (http, out) = instrumented();
        drop(http.start("GET", "/"));
        assert_eq!(entries(&out)[0]["logLevel"], "INFO");
    }
}
