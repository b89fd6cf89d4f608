//! HTTP front end: decodes requests for the update service and renders
//! its replies

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use dyndns_core::{Credentials, UpdateReply, UpdateRequest, UpdateService};
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::{Body, Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

/// Serve one request
pub async fn handle(
    service: Arc<UpdateService>,
    request: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    if request.uri().path() != "/" {
        return Ok(plain(StatusCode::NOT_FOUND, "not found"));
    }

    if request.method() != Method::GET {
        let mut response = plain(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("GET"));
        return Ok(response);
    }

    let reply = service.handle(decode_request(&request)).await;
    Ok(render(&reply))
}

/// Extract query parameters and Basic credentials
///
/// Only the first occurrence of a repeated parameter counts.
pub fn decode_request<B>(request: &Request<B>) -> UpdateRequest {
    let mut update = UpdateRequest::default();

    if let Some(query) = request.uri().query() {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match &*key {
                "domain" => &mut update.domain,
                "ip4" => &mut update.ip4,
                "ip6" => &mut update.ip6,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
    }

    update.credentials = basic_credentials(request.headers());
    update
}

/// Decode `Authorization: Basic ...`
///
/// A header that is malformed or uses another scheme counts as absent.
pub fn basic_credentials(headers: &HeaderMap) -> Option<Credentials> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = String::from_utf8(BASE64.decode(encoded.trim()).ok()?).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Render a service reply as a plain-text response
pub fn render(reply: &UpdateReply) -> Response<Body> {
    let status =
        StatusCode::from_u16(reply.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = plain(status, reply.body());

    if let Some(challenge) = reply.challenge()
        && let Ok(value) = HeaderValue::from_str(&challenge)
    {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, value);
    }

    response
}

fn plain(status: StatusCode, body: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use dyndns_core::{ServiceConfig, hash_password};

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn basic(username: &str, password: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let encoded = BASE64.encode(format!("{username}:{password}"));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {encoded}")).unwrap(),
        );
        headers
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn service() -> Arc<UpdateService> {
        let text = format!(
            "dnsserver: 192.0.2.53\n\
             tsig:\n  name: update-key.\n  secret: c2VjcmV0LXNpZ25pbmcta2V5\n\
             domains:\n  home.example.com:\n    username: alice\n    password: \"{}\"\n",
            hash_password("wonderland").unwrap()
        );
        let config = ServiceConfig::from_yaml_str(&text).unwrap();
        Arc::new(UpdateService::from_config(&config).unwrap())
    }

    #[test]
    fn test_query_parameters() {
        let request = decode_request(&get(
            "/?domain=home.example.com&ip4=1.1.1.1&ip6=2606%3A4700%3A%3A1111&extra=1",
        ));

        assert_eq!(request.domain.as_deref(), Some("home.example.com"));
        assert_eq!(request.ip4.as_deref(), Some("1.1.1.1"));
        assert_eq!(request.ip6.as_deref(), Some("2606:4700::1111"));
        assert!(request.credentials.is_none());
    }

    #[test]
    fn test_empty_and_repeated_parameters() {
        let request = decode_request(&get("/?domain=a.example.com&domain=b.example.com&ip4="));

        assert_eq!(request.domain.as_deref(), Some("a.example.com"));
        assert_eq!(request.ip4.as_deref(), Some(""));
        assert_eq!(request.ip6, None);
    }

    #[test]
    fn test_basic_credentials() {
        let credentials = basic_credentials(&basic("alice", "wonder:land")).unwrap();
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, "wonder:land");
    }

    #[test]
    fn test_malformed_authorization_is_absent() {
        let mut headers = HeaderMap::new();
        assert!(basic_credentials(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert!(basic_credentials(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic !!!"));
        assert!(basic_credentials(&headers).is_none());

        // no colon separator
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic YWxpY2U="));
        assert!(basic_credentials(&headers).is_none());
    }

    #[tokio::test]
    async fn test_login_challenge_rendering() {
        let response = render(&UpdateReply::LoginRequired {
            realm: "DynDNS".to_string(),
        });

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            "Basic realm=\"DynDNS\""
        );
        assert_eq!(body_text(response).await, "login required");
    }

    #[tokio::test]
    async fn test_unknown_path_and_method() {
        let response = handle(service(), get("/update")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let post = Request::post("/").body(Body::empty()).unwrap();
        let response = handle(service(), post).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET");
    }

    #[tokio::test]
    async fn test_unknown_domain_is_not_found() {
        let response = handle(service(), get("/?domain=other.example.com&ip4=1.1.1.1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "domain not found");
    }

    #[tokio::test]
    async fn test_missing_credentials_get_a_challenge() {
        let response = handle(service(), get("/?domain=home.example.com&ip4=1.1.1.1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    #[tokio::test]
    async fn test_invalid_address_with_valid_login() {
        let mut request = get("/?domain=home.example.com&ip4=10.0.0.1");
        *request.headers_mut() = basic("alice", "wonderland");

        let response = handle(service(), request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "invalid IPv4 address");
    }
}
