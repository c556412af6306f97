use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use capsule_config::{RateLimitConfig, RequestRateLimit};
use capsule_core::{Failure, Verbosity, classify};
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DashMapStateStore;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

use crate::reply::ApiReply;

type GlobalLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;
type PerIpLimiter = RateLimiter<String, DashMapStateStore<String>, DefaultClock>;

/// Seconds until the caller may retry
#[derive(Debug)]
pub struct Exceeded {
    pub retry_after: u64,
}

/// In-memory request limiter (global and per-IP)
pub struct RequestLimiter {
    global: Option<GlobalLimiter>,
    per_ip: Option<PerIpLimiter>,
}

impl RequestLimiter {
    /// Create from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a window does not parse or the quota is invalid
    pub fn new(config: &RateLimitConfig) -> anyhow::Result<Self> {
        let global = config
            .global
            .as_ref()
            .map(|limit| quota(limit).map(RateLimiter::direct))
            .transpose()?;
        let per_ip = config
            .per_ip
            .as_ref()
            .map(|limit| quota(limit).map(RateLimiter::dashmap))
            .transpose()?;

        Ok(Self { global, per_ip })
    }

    /// Check both limits for a request from the given client IP
    ///
    /// # Errors
    ///
    /// Returns [`Exceeded`] with the shortest wait when a limit trips
    pub fn check(&self, ip: Option<&str>) -> Result<(), Exceeded> {
        if let Some(ref limiter) = self.global {
            limiter.check().map_err(|not_until| exceeded(&not_until))?;
        }

        if let (Some(limiter), Some(ip)) = (self.per_ip.as_ref(), ip) {
            limiter
                .check_key(&ip.to_owned())
                .map_err(|not_until| exceeded(&not_until))?;
        }

        Ok(())
    }
}

fn exceeded(not_until: &governor::NotUntil<<DefaultClock as Clock>::Instant>) -> Exceeded {
    let wait = not_until.wait_time_from(DefaultClock::default().now());
    Exceeded {
        retry_after: wait.as_secs().max(1),
    }
}

fn quota(limit: &RequestRateLimit) -> anyhow::Result<Quota> {
    let window: Duration =
        duration_str::parse(&limit.window).map_err(|e| anyhow::anyhow!("invalid window '{}': {e}", limit.window))?;
    if window.is_zero() {
        anyhow::bail!("rate limit window must be > 0");
    }

    let burst = NonZeroU32::new(limit.requests).ok_or_else(|| anyhow::anyhow!("requests must be > 0"))?;
    let period = window / limit.requests;

    Quota::with_period(period)
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit period"))
        .map(|quota| quota.allow_burst(burst))
}

/// Reject requests over quota with the classified 429 envelope
pub async fn rate_limit_middleware(
    limiter: Arc<RequestLimiter>,
    verbosity: Verbosity,
    request: Request,
    next: Next,
) -> Response {
    match limiter.check(extract_client_ip(&request).as_deref()) {
        Ok(()) => next.run(request).await,
        Err(exceeded) => {
            let mut response = ApiReply::from(classify(Failure::RateLimited, verbosity)).into_response();
            if let Ok(value) = exceeded.retry_after.to_string().parse() {
                response.headers_mut().insert("retry-after", value);
            }
            response
        }
    }
}

fn extract_client_ip(request: &Request) -> Option<String> {
    // Try X-Forwarded-For first
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        return Some(first.trim().to_string());
    }

    // Try X-Real-IP
    if let Some(real_ip) = request.headers().get("x-real-ip")
        && let Ok(val) = real_ip.to_str()
    {
        return Some(val.trim().to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(requests: u32) -> RequestLimiter {
        RequestLimiter::new(&RateLimitConfig {
            global: None,
            per_ip: Some(RequestRateLimit {
                requests,
                window: "1m".to_string(),
            }),
        })
        .unwrap()
    }

    #[test]
    fn per_ip_limits_are_independent() {
        let limiter = limiter(2);

        assert!(limiter.check(Some("10.0.0.1")).is_ok());
        assert!(limiter.check(Some("10.0.0.1")).is_ok());
        assert!(limiter.check(Some("10.0.0.1")).is_err());
        assert!(limiter.check(Some("10.0.0.2")).is_ok());
    }

    #[test]
    fn exceeded_reports_a_positive_retry_after() {
        let limiter = limiter(1);
        limiter.check(Some("10.0.0.1")).unwrap();
        let exceeded = limiter.check(Some("10.0.0.1")).unwrap_err();
        assert!(exceeded.retry_after >= 1);
    }

    #[test]
    fn zero_requests_is_a_config_error() {
        let result = RequestLimiter::new(&RateLimitConfig {
            global: Some(RequestRateLimit {
                requests: 0,
                window: "1m".to_string(),
            }),
            per_ip: None,
        });
        assert!(result.is_err());
    }
}
