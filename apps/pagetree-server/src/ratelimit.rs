//! Per-(client IP, method, path) rate limiting (§5, §6.4).
//!
//! Uses `governor`'s keyed GCRA limiter behind an `Arc`, the same shape as
//! the original's `sync.Map` of per-IP token buckets
//! (`original_source/backend/router/ratelimit.go`) but with `governor`'s
//! algorithm instead of `golang.org/x/time/rate`, and with a periodic sweep
//! addressing the unbounded-growth note in spec §9.

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::{Quota, RateLimiter};
use serde::Serialize;

const REQUESTS_PER_MINUTE: u32 = 60;
const BURST: u32 = 5;
const SWEEP_INTERVAL: Duration = Duration::from_secs(120);

type Key = (IpAddr, Method, String);
type KeyedLimiter = RateLimiter<Key, governor::state::keyed::DefaultKeyedStateStore<Key>, governor::clock::DefaultClock>;

#[derive(Clone)]
pub struct RateLimiterState {
    limiter: Arc<KeyedLimiter>,
}

impl RateLimiterState {
    #[must_use]
    pub fn new() -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(REQUESTS_PER_MINUTE).unwrap_or(NonZeroU32::MIN))
            .allow_burst(NonZeroU32::new(BURST).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
        }
    }

    /// Spawns the background sweep that evicts idle buckets so the
    /// per-IP map does not grow without bound (spec §9 "Rate limiter
    /// eviction").
    pub fn spawn_sweeper(&self) {
        let limiter = Arc::clone(&self.limiter);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                limiter.retain_recent();
            }
        });
    }
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct RateLimitedBody {
    error: &'static str,
}

/// Resolves the client's IP per §6.4: `X-Forwarded-For`'s first entry,
/// then `X-Real-IP`, else the transport peer address.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
    if let Some(forwarded) = headers.get(header::HeaderName::from_static("x-forwarded-for")) {
        if let Ok(value) = forwarded.to_str() {
            if let Some(first) = value.split(',').next() {
                if let Ok(ip) = first.trim().parse() {
                    return Some(ip);
                }
            }
        }
    }
    if let Some(real_ip) = headers.get(header::HeaderName::from_static("x-real-ip")) {
        if let Ok(value) = real_ip.to_str() {
            if let Ok(ip) = value.trim().parse() {
                return Some(ip);
            }
        }
    }
    peer.map(|addr| addr.ip())
}

pub async fn rate_limit(
    State(state): State<RateLimiterState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(ip) = client_ip(req.headers(), Some(peer)) else {
        return next.run(req).await;
    };
    let key = (ip, req.method().clone(), req.uri().path().to_owned());
    if state.limiter.check_key(&key).is_err() {
        return (StatusCode::TOO_MANY_REQUESTS, axum::Json(RateLimitedBody {
            error: "Rate limit exceeded",
        }))
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_x_forwarded_for_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HeaderName::from_static("x-forwarded-for"), "203.0.113.1, 10.0.0.1".parse().unwrap());
        let ip = client_ip(&headers, None);
        assert_eq!(ip, Some("203.0.113.1".parse().unwrap()));
    }

    #[test]
    fn falls_back_to_x_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HeaderName::from_static("x-real-ip"), "198.51.100.7".parse().unwrap());
        let ip = client_ip(&headers, None);
        assert_eq!(ip, Some("198.51.100.7".parse().unwrap()));
    }

    #[test]
    fn falls_back_to_peer_address() {
        let headers = HeaderMap::new();
        let peer: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        assert_eq!(client_ip(&headers, Some(peer)), Some(peer.ip()));
    }
}
