//! End-to-end tests for the `/proxy` routes.

use frame_relay::routing::encode_target;

mod common;

use common::{client, closed_port, start_relay, start_static_upstream, start_upstream, test_config, MockReply};

#[tokio::test]
async fn test_frame_options_stripped_from_relayed_page() {
    let (upstream, _) = start_static_upstream(
        MockReply::ok("<html>hi</html>")
            .header("X-Frame-Options", "SAMEORIGIN")
            .header("Content-Security-Policy", "frame-ancestors 'self'")
            .header("Content-Security-Policy-Report-Only", "default-src 'self'")
            .header("Content-Type", "text/html; charset=utf-8")
            .header("Cache-Control", "max-age=60"),
    )
    .await;
    let (relay, _shutdown) = start_relay(test_config()).await;

    let res = client()
        .get(format!("http://{}/proxy/http://{}/", relay, upstream))
        .send()
        .await
        .expect("Relay unreachable");

    assert_eq!(res.status(), 200);
    assert!(res.headers().get("x-frame-options").is_none());
    assert!(res.headers().get("content-security-policy").is_none());
    assert!(res.headers().get("content-security-policy-report-only").is_none());
    assert_eq!(res.headers()["content-type"], "text/html; charset=utf-8");
    assert_eq!(res.headers()["cache-control"], "max-age=60");
    assert_eq!(res.text().await.unwrap(), "<html>hi</html>");
}

#[tokio::test]
async fn test_encoded_target_is_decoded() {
    let (upstream, seen) = start_static_upstream(MockReply::ok("encoded")).await;
    let (relay, _shutdown) = start_relay(test_config()).await;

    let target = encode_target(&format!("http://{}/enc/path?q=1&r=two", upstream));
    let res = client()
        .get(format!("http://{}/proxy/{}", relay, target))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "encoded");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].path, "/enc/path?q=1&r=two");
}

#[tokio::test]
async fn test_plain_target_keeps_query_string() {
    let (upstream, seen) = start_static_upstream(MockReply::ok("plain")).await;
    let (relay, _shutdown) = start_relay(test_config()).await;

    let res = client()
        .get(format!("http://{}/proxy/http://{}/page?x=1", relay, upstream))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(seen.lock().unwrap()[0].path, "/page?x=1");
}

#[tokio::test]
async fn test_upstream_error_status_passes_through() {
    let (upstream, _) = start_static_upstream(
        MockReply::ok("missing")
            .status(404)
            .header("X-Frame-Options", "DENY"),
    )
    .await;
    let (relay, _shutdown) = start_relay(test_config()).await;

    let res = client()
        .get(format!("http://{}/proxy/http://{}/nope", relay, upstream))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert!(res.headers().get("x-frame-options").is_none());
    assert_eq!(res.text().await.unwrap(), "missing");
}

#[tokio::test]
async fn test_binary_body_is_unchanged() {
    let payload: Vec<u8> = (0..=255u8).rev().chain([0, 0xff, 0xfe]).collect();
    let (upstream, _) = start_static_upstream(
        MockReply::ok(payload.clone()).header("Content-Type", "image/png"),
    )
    .await;
    let (relay, _shutdown) = start_relay(test_config()).await;

    let res = client()
        .get(format!("http://{}/proxy/http://{}/logo.png", relay, upstream))
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers()["content-type"], "image/png");
    assert_eq!(res.bytes().await.unwrap().to_vec(), payload);
}

#[tokio::test]
async fn test_browser_user_agent_and_cors_on_proxy() {
    let (upstream, seen) = start_static_upstream(MockReply::ok("ua")).await;
    let (relay, _shutdown) = start_relay(test_config()).await;

    let res = client()
        .get(format!("http://{}/proxy/http://{}/", relay, upstream))
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(res.headers()["access-control-allow-methods"], "GET, POST, PUT, DELETE, OPTIONS");
    assert_eq!(res.headers()["access-control-allow-headers"], "*");

    let seen = seen.lock().unwrap();
    let ua = seen[0].header("user-agent").unwrap_or_default();
    assert!(ua.starts_with("Mozilla/5.0"), "unexpected user agent {ua:?}");
}

#[tokio::test]
async fn test_cors_trio_omitted_when_disabled() {
    let (upstream, _) = start_static_upstream(MockReply::ok("x")).await;
    let mut config = test_config();
    config.server.cors_enabled = false;
    config.endpoints.proxy.cors = false;
    let (relay, _shutdown) = start_relay(config).await;

    let res = client()
        .get(format!("http://{}/proxy/http://{}/", relay, upstream))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert!(res.headers().get("access-control-allow-origin").is_none());
    assert!(res.headers().get("access-control-allow-methods").is_none());
}

#[tokio::test]
async fn test_redirects_followed_within_limit() {
    let (upstream, seen) = start_upstream(|req| {
        if req.path == "/start" {
            MockReply::ok("").status(302).header("Location", "/final")
        } else {
            MockReply::ok("final")
        }
    })
    .await;
    let (relay, _shutdown) = start_relay(test_config()).await;

    let res = client()
        .get(format!("http://{}/proxy/http://{}/start", relay, upstream))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "final");
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_redirect_limit_surfaces_last_response() {
    let (upstream, seen) = start_upstream(|req| {
        let hop: u32 = req
            .path
            .trim_start_matches("/hop/")
            .parse()
            .unwrap_or(0);
        MockReply::ok("moved")
            .status(302)
            .header("Location", &format!("/hop/{}", hop + 1))
    })
    .await;
    let (relay, _shutdown) = start_relay(test_config()).await;

    let res = client()
        .get(format!("http://{}/proxy/http://{}/hop/0", relay, upstream))
        .send()
        .await
        .unwrap();

    // original request plus five followed hops
    assert_eq!(res.status(), 302);
    assert_eq!(res.headers()["location"], "/hop/6");
    assert_eq!(seen.lock().unwrap().len(), 6);
}

#[tokio::test]
async fn test_unreachable_upstream_is_500() {
    let dead = closed_port().await;
    let (relay, _shutdown) = start_relay(test_config()).await;

    let res = client()
        .get(format!("http://{}/proxy/http://{}/", relay, dead))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let text = res.text().await.unwrap();
    assert!(text.starts_with("Proxy Error: "), "{text}");
    assert!(text.len() > "Proxy Error: ".len());
}

#[tokio::test]
async fn test_undecodable_target_fails_at_fetch() {
    let (relay, _shutdown) = start_relay(test_config()).await;

    let res = client()
        .get(format!("http://{}/proxy/not-a-url", relay))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert!(res.text().await.unwrap().starts_with("Proxy Error: "));
}

#[tokio::test]
async fn test_strict_proxy_rejects_before_fetch() {
    let mut config = test_config();
    config.endpoints.proxy.strict_validation = true;
    let (relay, _shutdown) = start_relay(config).await;

    let res = client()
        .get(format!("http://{}/proxy/not-a-url", relay))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "URL must be a valid http:// or https:// URL");
}

#[tokio::test]
async fn test_empty_target_is_400() {
    let (relay, _shutdown) = start_relay(test_config()).await;

    let res = client()
        .get(format!("http://{}/proxy/", relay))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "URL is required");
}
