//! Integration tests for the landing page backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::{create_router, AppState};

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "correct-horse";

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    /// A running server with a client that is already logged in.
    async fn new() -> Self {
        let mut fixture = Self::anonymous().await;
        let resp = fixture
            .client
            .post(fixture.url("/api/auth/login"))
            .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        let token = body["data"]["token"].as_str().unwrap();

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "authorization",
            format!("Bearer {}", token).parse().unwrap(),
        );
        fixture.client = Client::builder().default_headers(headers).build().unwrap();
        fixture
    }

    /// A running server with a client holding no session.
    async fn anonymous() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        // Create config
        let config = Config {
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            log_json: false,
            admin_email: Some(ADMIN_EMAIL.to_string()),
            admin_password: Some(ADMIN_PASSWORD.to_string()),
            session_ttl_hours: 24,
            secure_cookies: false,
        };

        let state = AppState {
            repo,
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, body: Value) -> Value {
        let resp = self
            .client
            .post(self.url("/api/businesses"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
        body["data"].clone()
    }
}

fn sample_business() -> Value {
    json!({
        "name": "Joe's Plumbing & Heating!!",
        "phone": "555-0100",
        "hours": "Mon-Fri 8am-5pm",
        "services": "Leaks, boilers, drains",
        "address": "Springfield",
        "photos": ["https://img.example/1.jpg", "https://img.example/2.jpg", "https://img.example/3.jpg"],
        "testimonials": [
            { "rating": 5, "text": "Fixed it fast", "author": "Ann" },
            { "rating": 4, "text": "Fair price", "author": "Bob" }
        ],
        "customSections": []
    })
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::anonymous().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_admin_requires_session() {
    let fixture = TestFixture::anonymous().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/businesses"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    // Mutations are rejected before touching storage
    let resp = fixture
        .client
        .post(fixture.url("/api/businesses"))
        .json(&sample_business())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = fixture
        .client
        .get(fixture.url("/api/pages/joe-s-plumbing-heating"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let fixture = TestFixture::anonymous().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/auth/login"))
        .json(&json!({ "email": ADMIN_EMAIL, "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = fixture
        .client
        .get(fixture.url("/api/auth/session"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_bearer_token_and_logout() {
    let fixture = TestFixture::anonymous().await;
    let plain = Client::new();

    let resp = plain
        .post(fixture.url("/api/auth/login"))
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let set_cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    let body: Value = resp.json().await.unwrap();
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let resp = plain
        .get(fixture.url("/api/auth/session"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);
    assert!(body["data"].get("token").is_none());

    // The same token works as the session cookie
    let resp = plain
        .get(fixture.url("/api/businesses"))
        .header("cookie", format!("landing_session={}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = plain
        .post(fixture.url("/api/auth/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = plain
        .get(fixture.url("/api/auth/session"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_create_and_publish() {
    let fixture = TestFixture::new().await;

    let created = fixture.create(sample_business()).await;
    assert_eq!(created["slug"], "joe-s-plumbing-heating");
    assert_eq!(created["active"], true);
    assert_eq!(created["primaryColor"], "#2563eb");
    assert_eq!(created["template"], "classic");
    assert_eq!(created["mapEmbedUrl"], "");
    assert_eq!(created["photos"].as_array().unwrap().len(), 3);
    assert_eq!(created["testimonials"].as_array().unwrap().len(), 2);
    assert_eq!(created["customSections"].as_array().unwrap().len(), 0);

    // Public JSON lookup
    let resp = fixture
        .client
        .get(fixture.url("/api/pages/joe-s-plumbing-heating"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["renderer"], "classic");
    assert_eq!(
        body["data"]["business"]["photos"][0],
        "https://img.example/1.jpg"
    );

    // Public HTML page
    let resp = fixture
        .client
        .get(fixture.url("/joe-s-plumbing-heating"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Joe&#39;s Plumbing &amp; Heating!!"));
    assert!(html.contains("What Our Customers Say"));
    assert!(html.contains("data-section=\"photos\""));
    assert!(!html.contains("data-section=\"custom\""));
}

#[tokio::test]
async fn test_inactive_is_not_found() {
    let fixture = TestFixture::new().await;

    let created = fixture.create(sample_business()).await;
    let id = created["id"].as_str().unwrap();

    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/businesses/{}/toggle-active", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["active"], false);

    let inactive = fixture
        .client
        .get(fixture.url("/joe-s-plumbing-heating"))
        .send()
        .await
        .unwrap();
    let missing = fixture
        .client
        .get(fixture.url("/no-such-business"))
        .send()
        .await
        .unwrap();
    assert_eq!(inactive.status(), 404);
    assert_eq!(missing.status(), 404);
    assert_eq!(
        inactive.text().await.unwrap(),
        missing.text().await.unwrap()
    );

    let resp = fixture
        .client
        .get(fixture.url("/api/pages/joe-s-plumbing-heating"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    // Admin listing and preview still see it
    let resp = fixture
        .client
        .get(fixture.url("/api/businesses"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/businesses/{}/preview", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("CALL NOW"));

    // And it can be republished
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/businesses/{}/active", id)))
        .json(&json!({ "active": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let resp = fixture
        .client
        .get(fixture.url("/joe-s-plumbing-heating"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_update_replaces_children() {
    let fixture = TestFixture::new().await;

    let created = fixture.create(sample_business()).await;
    let id = created["id"].as_str().unwrap();

    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/businesses/{}", id)))
        .json(&json!({
            "name": "Joe's Heating Only",
            "phone": "555-0199",
            "photos": ["https://img.example/3.jpg", "https://img.example/1.jpg"],
            "testimonials": [],
            "customSections": [{ "title": "Warranty", "content": "Two years\nparts and labor" }],
            "template": "modern",
            "primaryColor": "#ff6600"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let updated = &body["data"];

    assert_eq!(updated["slug"], "joe-s-plumbing-heating");
    assert_eq!(updated["name"], "Joe's Heating Only");
    assert_eq!(
        updated["photos"],
        json!(["https://img.example/3.jpg", "https://img.example/1.jpg"])
    );
    assert_eq!(updated["testimonials"].as_array().unwrap().len(), 0);
    assert_eq!(updated["customSections"][0]["title"], "Warranty");
    assert_eq!(updated["template"], "modern");

    let resp = fixture
        .client
        .get(fixture.url("/joe-s-plumbing-heating"))
        .send()
        .await
        .unwrap();
    let html = resp.text().await.unwrap();
    assert!(html.contains("Our Services"));
    assert!(html.contains("Two years\nparts and labor"));
    assert!(!html.contains("data-section=\"testimonials\""));
}

#[tokio::test]
async fn test_unknown_template_falls_back() {
    let fixture = TestFixture::new().await;

    let mut body = sample_business();
    body["template"] = json!("bogus");
    let created = fixture.create(body).await;
    assert_eq!(created["template"], "classic");
}

#[tokio::test]
async fn test_duplicate_slug_conflict() {
    let fixture = TestFixture::new().await;

    fixture.create(sample_business()).await;

    let mut duplicate = sample_business();
    duplicate["name"] = json!("Joe's Plumbing + Heating");
    let resp = fixture
        .client
        .post(fixture.url("/api/businesses"))
        .json(&duplicate)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_validation_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/businesses"))
        .json(&json!({ "name": "", "phone": "555" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let resp = fixture
        .client
        .post(fixture.url("/api/businesses"))
        .json(&json!({ "name": "???", "phone": "555" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let mut bad_rating = sample_business();
    bad_rating["testimonials"] = json!([{ "rating": 0, "text": "x", "author": "y" }]);
    let resp = fixture
        .client
        .post(fixture.url("/api/businesses"))
        .json(&bad_rating)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_delete_and_not_found() {
    let fixture = TestFixture::new().await;

    let created = fixture.create(sample_business()).await;
    let id = created["id"].as_str().unwrap();

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/businesses/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/businesses/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/businesses/{}", id)))
        .json(&sample_business())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_list_templates() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/templates"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"], json!(["classic", "modern", "minimal"]));
}

#[tokio::test]
async fn test_reserved_slug_rejected() {
    let fixture = TestFixture::new().await;

    for name in ["Health", "API"] {
        let mut body = sample_business();
        body["name"] = json!(name);
        let resp = fixture
            .client
            .post(fixture.url("/api/businesses"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "{} should be rejected", name);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    let resp = fixture.client.get(fixture.url("/health")).send().await.unwrap();
    assert_eq!(resp.text().await.unwrap(), "OK");

    // Names that merely contain a reserved word are fine
    let mut body = sample_business();
    body["name"] = json!("Health Foods");
    let created = fixture.create(body).await;
    assert_eq!(created["slug"], "health-foods");
    let resp = fixture
        .client
        .get(fixture.url("/health-foods"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("CALL NOW"));
}

#[tokio::test]
async fn test_links_must_be_web_urls() {
    let fixture = TestFixture::new().await;

    let mut body = sample_business();
    body["googleMapsUrl"] = json!("javascript:alert(1)");
    let resp = fixture
        .client
        .post(fixture.url("/api/businesses"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let mut body = sample_business();
    body["photos"] = json!(["javascript:alert(1)"]);
    let resp = fixture
        .client
        .post(fixture.url("/api/businesses"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_short_primary_color_is_expanded() {
    let fixture = TestFixture::new().await;

    let mut body = sample_business();
    body["primaryColor"] = json!("#abc");
    let created = fixture.create(body).await;
    assert_eq!(created["primaryColor"], "#aabbcc");

    let html = fixture
        .client
        .get(fixture.url("/joe-s-plumbing-heating"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("#aabbccdd"));
}

#[tokio::test]
async fn test_preview_with_template_override() {
    let fixture = TestFixture::new().await;

    let created = fixture.create(sample_business()).await;
    let id = created["id"].as_str().unwrap();

    let preview = |query: &str| {
        fixture
            .client
            .get(fixture.url(&format!("/api/businesses/{}/preview{}", id, query)))
            .send()
    };

    let html = preview("?template=modern").await.unwrap().text().await.unwrap();
    assert!(html.contains("Our Services"));

    let html = preview("?template=bogus").await.unwrap().text().await.unwrap();
    assert!(html.contains("CALL NOW"));

    // The stored template is untouched
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/businesses/{}", id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["template"], "classic");
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/businesses"))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = fixture
        .client
        .get(fixture.url("/api/businesses"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}
