//! Cookie Management Infrastructure
//!
//! Set-Cookie construction and request-cookie extraction for the
//! session cookies.

use axum::http::{HeaderMap, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<u64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "auth_token".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Config for a named session cookie with a fixed lifetime
    pub fn session(name: impl Into<String>, same_site: SameSite, max_age_secs: u64) -> Self {
        Self {
            name: name.into(),
            same_site,
            max_age_secs: Some(max_age_secs),
            ..Self::default()
        }
    }

    /// Build a Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut attributes = vec![format!("{}={}", self.name, value)];

        if self.http_only {
            attributes.push("HttpOnly".to_string());
        }
        if self.secure {
            attributes.push("Secure".to_string());
        }
        attributes.push(format!("SameSite={}", self.same_site.as_str()));
        attributes.push(format!("Path={}", self.path));
        if let Some(max_age) = self.max_age_secs {
            attributes.push(format!("Max-Age={}", max_age));
        }

        attributes.join("; ")
    }

    /// Build a Set-Cookie header value that deletes the cookie
    pub fn build_delete_cookie(&self) -> String {
        format!("{}=; HttpOnly; Path={}; Max-Age=0", self.name, self.path)
    }
}

/// Extract a cookie value from request headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_admin_session_cookie_attributes() {
        let config = CookieConfig::session("admin_token", SameSite::Strict, 24 * 3600);
        let cookie = config.build_set_cookie("value123");

        assert_eq!(
            cookie,
            "admin_token=value123; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age=86400"
        );
    }

    #[test]
    fn test_insecure_cookie_omits_secure_flag() {
        let config = CookieConfig {
            secure: false,
            ..CookieConfig::default()
        };
        let cookie = config.build_set_cookie("abc");
        assert!(!cookie.contains("Secure"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn test_delete_cookie_expires_immediately() {
        let config = CookieConfig::session("admin_token", SameSite::Strict, 24 * 3600);
        let cookie = config.build_delete_cookie();
        assert!(cookie.starts_with("admin_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_cookie_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; auth_token=abc123; other=xyz"),
        );

        assert_eq!(
            extract_cookie(&headers, "auth_token").as_deref(),
            Some("abc123")
        );
        assert_eq!(extract_cookie(&headers, "foo").as_deref(), Some("bar"));
        assert_eq!(extract_cookie(&headers, "missing"), None);
        assert_eq!(extract_cookie(&HeaderMap::new(), "auth_token"), None);
    }
}
