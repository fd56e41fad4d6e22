//! Outbound request construction for the Prey API.
//!
//! A built [`ApiRequest`] is transport-ready but unauthenticated: the
//! `apikey` header is attached by the dispatching client at execution time,
//! so requests can be assembled before a client is resolved.

use reqwest::Method;
use serde_json::Value;

use super::error::{ApiError, ApiResult};

/// A fully composed upstream request: method, absolute URL, optional JSON
/// body. Built fresh per call, never reused.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: String,
    body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Compose `base_url` and `path` (exactly one separating slash), append
    /// the URL-encoded query when non-empty, and serialize the body.
    pub fn new(
        base_url: &str,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> ApiResult<Self> {
        let mut url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        if !query.is_empty() {
            let encoded = serde_urlencoded::to_string(query)
                .map_err(|e| ApiError::validation(format!("invalid query string: {e}")))?;
            url.push('?');
            url.push_str(&encoded);
        }
        let body = body
            .map(|b| serde_json::to_vec(b).map_err(ApiError::Serialize))
            .transpose()?;
        Ok(Self { method, url, body })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Serialized JSON body, when one was supplied. A present body implies
    /// `Content-Type: application/json` at dispatch time.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn q(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn joins_base_and_path_with_single_slash() {
        for (base, path) in [
            ("https://api.example.com/v1", "/devices"),
            ("https://api.example.com/v1/", "devices"),
            ("https://api.example.com/v1/", "/devices"),
            ("https://api.example.com/v1", "devices"),
        ] {
            let req = ApiRequest::new(base, Method::GET, path, &[], None).unwrap();
            assert_eq!(req.url(), "https://api.example.com/v1/devices");
        }
    }

    #[test]
    fn empty_query_adds_no_question_mark() {
        let req = ApiRequest::new("https://x/v1", Method::GET, "/account", &[], None).unwrap();
        assert!(!req.url().contains('?'));
    }

    #[test]
    fn query_is_url_encoded() {
        let req = ApiRequest::new(
            "https://x/v1",
            Method::GET,
            "/devices",
            &q(&[("page", "1"), ("name", "a b")]),
            None,
        )
        .unwrap();
        assert_eq!(req.url(), "https://x/v1/devices?page=1&name=a+b");
    }

    #[test]
    fn body_is_serialized_to_json() {
        let body = json!({"missing": true});
        let req = ApiRequest::new(
            "https://x/v1",
            Method::PUT,
            "/devices/42/missing",
            &[],
            Some(&body),
        )
        .unwrap();
        let bytes = req.body().expect("body present");
        let round: Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(round, body);
    }

    #[test]
    fn no_body_means_no_bytes() {
        let req = ApiRequest::new("https://x/v1", Method::GET, "/account", &[], None).unwrap();
        assert!(req.body().is_none());
    }
}
