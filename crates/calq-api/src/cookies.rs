//! Cookie-header scanning.
//!
//! The CSRF token travels as a cookie and must be echoed back as a header
//! on mutating requests. The cookie jar exposes its contents as a single
//! `Cookie` header string; this module picks one value out of it.

/// Extracts the value of the named cookie from a `Cookie` header string
/// (`"a=1; b=2"`). Returns `None` when the cookie is absent.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    for part in header.split(';') {
        let part = part.trim();
        if let Some(rest) = part.strip_prefix(name) {
            if let Some(value) = rest.strip_prefix('=') {
                return Some(value.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_named_cookie() {
        let header = "sessionid=abc123; csrftoken=tok42";
        assert_eq!(cookie_value(header, "csrftoken").as_deref(), Some("tok42"));
        assert_eq!(cookie_value(header, "sessionid").as_deref(), Some("abc123"));
    }

    #[test]
    fn test_ignores_prefix_collisions() {
        let header = "csrftoken2=wrong; csrftoken=right";
        assert_eq!(cookie_value(header, "csrftoken").as_deref(), Some("right"));
    }

    #[test]
    fn test_absent_cookie() {
        assert_eq!(cookie_value("sessionid=abc", "csrftoken"), None);
        assert_eq!(cookie_value("", "csrftoken"), None);
    }
}
