//! Session cookie handling
//!
//! Builds `Set-Cookie` values and reads cookies back from request headers.

use axum::http::{HeaderMap, HeaderValue, header};

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

/// Cookie attributes shared by the set and delete forms
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Attributes after `name=value`, in a stable order
    fn attributes(&self, max_age: Option<i64>) -> String {
        let mut attrs = String::new();

        if self.http_only {
            attrs.push_str("; HttpOnly");
        }
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs.push_str("; SameSite=");
        attrs.push_str(self.same_site.as_str());
        attrs.push_str("; Path=");
        attrs.push_str(&self.path);

        if let Some(max_age) = max_age {
            attrs.push_str(&format!("; Max-Age={}", max_age));
        }

        attrs
    }

    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        format!("{}={}{}", self.name, value, self.attributes(self.max_age_secs))
    }

    /// Build a Set-Cookie value that expires the cookie immediately
    ///
    /// Carries the same Path/SameSite/Secure attributes so browsers match it
    /// against the cookie being removed.
    pub fn build_delete_cookie(&self) -> String {
        format!("{}={}", self.name, self.attributes(Some(0)))
    }

    pub fn set_header(&self, value: &str) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.build_set_cookie(value)).ok()
    }

    pub fn delete_header(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.build_delete_cookie()).ok()
    }
}

/// Extract a cookie value from headers
///
/// Every `Cookie` header is searched; the first matching pair wins.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}
