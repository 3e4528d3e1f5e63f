//! Client network identification
//!
//! Resolves the client IP behind reverse proxies; used for rate-limit
//! keying and request logging.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Client IP from X-Forwarded-For (first entry), falling back to the
/// direct connection address
pub fn client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|forwarded| forwarded.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );

        let direct: IpAddr = "127.0.0.1".parse().unwrap();
        assert_eq!(
            client_ip(&headers, Some(direct)),
            Some("192.168.1.1".parse().unwrap())
        );
    }

    #[test]
    fn test_direct_fallback() {
        let direct: IpAddr = "127.0.0.1".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), Some(direct)), Some(direct));
        assert_eq!(client_ip(&HeaderMap::new(), None), None);
    }

    #[test]
    fn test_malformed_forwarded_entry_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));

        let direct: IpAddr = "10.0.0.5".parse().unwrap();
        assert_eq!(client_ip(&headers, Some(direct)), Some(direct));
    }
}
