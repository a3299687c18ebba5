use std::collections::HashMap;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        Method, Request, StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
    response::Response,
};
use tower::ServiceExt;

use super::fixtures::FAKE_AUTHORIZE_URL;

/// Drives the router in-process and keeps cookies between requests like a browser
pub struct MockBrowser {
    router: Router,
    cookies: HashMap<String, String>,
}

/// Status, headers and body of one exchange
pub struct Page {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl Page {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl MockBrowser {
    pub fn new(router: &Router) -> Self {
        Self {
            router: router.clone(),
            cookies: HashMap::new(),
        }
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub async fn get(&mut self, path: &str) -> Page {
        self.send(Method::GET, path, None).await
    }

    pub async fn delete(&mut self, path: &str) -> Page {
        self.send(Method::DELETE, path, None).await
    }

    pub async fn post_form(&mut self, path: &str, form: &[(&str, &str)]) -> Page {
        self.send(Method::POST, path, Some(encode_form(form))).await
    }

    pub async fn patch_form(&mut self, path: &str, form: &[(&str, &str)]) -> Page {
        self.send(Method::PATCH, path, Some(encode_form(form))).await
    }

    async fn send(&mut self, method: Method, path: &str, form: Option<String>) -> Page {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("user-agent", "MockBrowser/1.0");
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(COOKIE, cookie);
        }
        let request = match form {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        self.store_cookies(&response);

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        Page {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn store_cookies(&mut self, response: &Response) {
        for value in response.headers().get_all(SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let Some((name, rest)) = value.split_once('=') else {
                continue;
            };
            let cookie_value = rest.split(';').next().unwrap_or_default();
            let expired = rest.contains("Max-Age=-") || rest.contains("Max-Age=0");
            if expired || cookie_value.is_empty() {
                self.cookies.remove(name);
            } else {
                self.cookies.insert(name.to_string(), cookie_value.to_string());
            }
        }
    }

    /// Run the GitHub login round trip: start, let the provider "approve", call back.
    ///
    /// Returns the callback response.
    pub async fn login(&mut self) -> Page {
        let start = self.get("/oauth/github/login").await;
        assert_eq!(start.status, StatusCode::FOUND);
        let location = start.location().expect("provider redirect").to_string();
        assert!(location.starts_with(FAKE_AUTHORIZE_URL));
        let state = location
            .split("state=")
            .nth(1)
            .expect("state in authorize url")
            .to_string();

        self.get(&format!("/oauth/github/callback?code=good-code&state={state}"))
            .await
    }
}

fn encode_form(form: &[(&str, &str)]) -> String {
    form.iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
