use super::*;
use crate::api::ApiClient;
use crate::request::{HttpMethod, MockHttpClient};
use crate::storage::MemoryStorage;
use gritsee_shared::{PATH_AUTH_ME, UserProfile};
use serde_json::json;

const BASE: &str = "http://localhost:8000";

struct TestContext {
    http: Rc<MockHttpClient>,
    session: Rc<SessionStore>,
    guard: NavigationGuard,
}

impl TestContext {
    fn new() -> Self {
        let http = Rc::new(MockHttpClient::new());
        let api = Rc::new(ApiClient::new(http.clone(), BASE));
        let storage = Rc::new(MemoryStorage::new());
        let session = Rc::new(SessionStore::new(api, storage, "user_public_data"));
        let guard = NavigationGuard::new(session.clone(), "/login", "/");
        Self {
            http,
            session,
            guard,
        }
    }

    fn me_url() -> String {
        format!("{BASE}{PATH_AUTH_ME}")
    }

    fn me_calls(&self) -> usize {
        self.http.count(HttpMethod::Get, &Self::me_url())
    }

    fn backend_accepts_cookie(&self) {
        self.http.mock_response(
            HttpMethod::Get,
            &Self::me_url(),
            200,
            json!({"username": "a", "is_active": true}),
        );
    }

    fn backend_rejects_cookie(&self) {
        self.http
            .mock_response(HttpMethod::Get, &Self::me_url(), 401, json!({}));
    }
}

// =========================================================
// Protected routes
// =========================================================

#[tokio::test]
async fn cached_session_allows_without_backend_call() {
    let ctx = TestContext::new();
    ctx.session.set_user(UserProfile::new("a", true));

    for path in ["/", "/carga", "/historial"] {
        let decision = ctx.guard.check_path(path, AppRoute::Login).await;
        assert_eq!(decision, Navigation::Allow);
    }
    assert!(ctx.http.requests.borrow().is_empty());
}

#[tokio::test]
async fn empty_cache_checks_session_exactly_once() {
    let ctx = TestContext::new();
    ctx.backend_accepts_cookie();

    let decision = ctx.guard.check_path("/historial", AppRoute::Login).await;

    assert_eq!(decision, Navigation::Allow);
    assert_eq!(ctx.me_calls(), 1);
    assert!(ctx.session.is_logged_in());
}

#[tokio::test]
async fn rejected_session_redirects_to_login() {
    let ctx = TestContext::new();
    ctx.backend_rejects_cookie();

    let decision = ctx.guard.check_path("/", AppRoute::NotFound).await;

    assert_eq!(decision, Navigation::Redirect("/login".to_string()));
    assert_eq!(ctx.me_calls(), 1);
}

#[tokio::test]
async fn unreachable_backend_redirects_to_login() {
    let ctx = TestContext::new();
    ctx.http.set_offline(true);
    let decision = ctx.guard.check_path("/carga", AppRoute::Dashboard).await;
    assert_eq!(decision, Navigation::Redirect("/login".to_string()));
    assert_eq!(ctx.me_calls(), 1);
}

#[tokio::test]
async fn second_navigation_uses_revalidated_cache() {
    let ctx = TestContext::new();
    ctx.backend_accepts_cookie();

    ctx.guard.check_path("/", AppRoute::Login).await;
    ctx.guard.check_path("/carga", AppRoute::Dashboard).await;

    assert_eq!(ctx.me_calls(), 1);
}

// =========================================================
// Guest routes
// =========================================================

#[tokio::test]
async fn logged_in_user_is_sent_home_from_login() {
    let ctx = TestContext::new();
    ctx.session.set_user(UserProfile::new("a", true));
    let decision = ctx.guard.check_path("/login", AppRoute::Dashboard).await;
    assert_eq!(decision, Navigation::Redirect("/".to_string()));
    assert!(ctx.http.requests.borrow().is_empty());
}

#[tokio::test]
async fn anonymous_user_reaches_login_without_backend_call() {
    let ctx = TestContext::new();
    let decision = ctx.guard.check_path("/login", AppRoute::NotFound).await;
    assert_eq!(decision, Navigation::Allow);
    assert!(ctx.http.requests.borrow().is_empty());
}

#[tokio::test]
async fn unknown_routes_are_allowed() {
    let ctx = TestContext::new();
    let decision = ctx.guard.check_path("/does-not-exist", AppRoute::Dashboard).await;
    assert_eq!(decision, Navigation::Allow);
    assert!(ctx.http.requests.borrow().is_empty());
}
