use std::net::SocketAddr;

use game_core::RequestMeta;
use warp::Filter;

/// Collects the request fields that make up a browser fingerprint.
pub fn request_meta() -> impl Filter<Extract = (RequestMeta,), Error = warp::Rejection> + Clone {
    warp::addr::remote()
        .and(warp::header::optional::<String>("x-forwarded-for"))
        .and(warp::header::optional::<String>("user-agent"))
        .and(warp::header::optional::<String>("accept-language"))
        .map(
            |remote: Option<SocketAddr>,
             forwarded_for: Option<String>,
             user_agent: Option<String>,
             accept_language: Option<String>| RequestMeta {
                remote_addr: remote.map(|addr| addr.ip().to_string()),
                forwarded_for,
                user_agent,
                accept_language,
            },
        )
}

/// First few characters of a fingerprint, for logs.
pub fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..8).unwrap_or(fingerprint)
}
