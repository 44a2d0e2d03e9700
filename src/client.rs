use axum::{extract::FromRequestParts, http::HeaderMap, http::request::Parts};
use std::convert::Infallible;

use crate::shaping::ClientKind;

pub const CLIENT_KIND_HEADER: &str = "x-client-kind";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    pub ip: String,
    pub kind: ClientKind,
}

impl ClientContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        // first hop of X-Forwarded-For is the original client
        let ip = header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| header("x-real-ip").map(str::trim).filter(|v| !v.is_empty()))
            .unwrap_or("unknown")
            .to_string();

        let kind = ClientKind::resolve(header(CLIENT_KIND_HEADER), header("user-agent"));

        Self { ip, kind }
    }
}

impl<S> FromRequestParts<S> for ClientContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn forwarded_for_takes_first_hop() {
        let ctx = ClientContext::from_headers(&headers(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
            ("x-real-ip", "10.0.0.9"),
        ]));
        assert_eq!(ctx.ip, "203.0.113.7");
    }

    #[test]
    fn falls_back_to_real_ip_then_unknown() {
        assert_eq!(
            ClientContext::from_headers(&headers(&[("x-real-ip", "198.51.100.2")])).ip,
            "198.51.100.2"
        );
        assert_eq!(ClientContext::from_headers(&HeaderMap::new()).ip, "unknown");
    }

    #[test]
    fn kind_comes_from_declared_header_first() {
        let ctx = ClientContext::from_headers(&headers(&[
            ("user-agent", "Mozilla/5.0 (Linux; Android 14) Mobile"),
            ("x-client-kind", "desktop"),
        ]));
        assert_eq!(ctx.kind, ClientKind::Desktop);

        let ctx = ClientContext::from_headers(&headers(&[("user-agent", "Mozilla/5.0 (iPad)")]));
        assert_eq!(ctx.kind, ClientKind::Mobile);
    }
}
