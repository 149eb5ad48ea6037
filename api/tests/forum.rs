use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use chrono::Duration;
use forum::{
    AppState, Config, app,
    models::{SessionData, SessionToken},
    store::{MemorySessionStore, SessionError, SessionStore},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

fn forum() -> (AppState, Router) {
    let state = AppState::new(Config::default());
    (state.clone(), app(state))
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

fn post_raw(uri: &str, content_type: Option<&str>, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

fn session_set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.starts_with("forum.sid="))
        .map(str::to_owned)
        .collect()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// `name=value` pair from the response's session Set-Cookie header.
fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("forum.sid="))
        .and_then(|v| v.split(';').next())
        .map(str::to_owned)
}

async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let body = format!("username={username}&password={password}");
    let response = send(app, post_form("/register", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = send(app, post_form("/login", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    session_cookie(&response).expect("login should set the session cookie")
}

#[tokio::test]
async fn health_reports_service() {
    let (_, app) = forum();
    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "status": "healthy", "service": "nodejs-backend" })
    );
}

#[tokio::test]
async fn registration_redirects_to_login_with_flag() {
    let (state, app) = forum();
    let response = send(&app, post_form("/register", "username=alice&password=pw1", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?registered=1");
    assert_eq!(state.users.len(), 1);

    let page = body_text(send(&app, get("/login?registered=1", None)).await).await;
    assert!(page.contains("Successfully registered! Log in."));
}

#[tokio::test]
async fn duplicate_registration_re_renders_form() {
    let (state, app) = forum();
    send(&app, post_form("/register", "username=alice&password=pw1", None)).await;

    let response = send(&app, post_form("/register", "username=alice&password=pw2", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Username already exists"));
    assert!(page.contains("action=\"/register\""));
    assert_eq!(state.users.len(), 1);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let (_, app) = forum();
    send(&app, post_form("/register", "username=alice&password=pw1", None)).await;

    for body in ["username=alice&password=nope", "username=bob&password=pw1"] {
        let response = send(&app, post_form("/login", body, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?error=1");
        assert!(session_cookie(&response).is_none());
    }

    let page = body_text(send(&app, get("/login?error=1", None)).await).await;
    assert!(page.contains("Invalid username or password"));
}

#[tokio::test]
async fn guest_cannot_post_comments() {
    let (state, app) = forum();
    let response = send(&app, post_form("/comments", "text=hello", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("You must be logged in to post a comment."));
    assert!(page.contains("action=\"/login\""));
    assert!(state.comments.is_empty().await);
}

#[tokio::test]
async fn blank_comment_is_rejected_with_identity() {
    let (state, app) = forum();
    let cookie = register_and_login(&app, "alice", "pw1").await;

    let response = send(&app, post_form("/comments", "text=%20%20%20", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Comment cannot be empty."));
    assert!(page.contains("Posting as alice"));
    assert!(state.comments.is_empty().await);

    let response = send(&app, post_form("/comments", "", Some(&cookie))).await;
    assert!(body_text(response).await.contains("Comment cannot be empty."));
    assert!(state.comments.is_empty().await);
}

#[tokio::test]
async fn posting_appends_and_renders_list() {
    let (state, app) = forum();
    let cookie = register_and_login(&app, "alice", "pw1").await;

    let response = send(&app, post_form("/comments", "text=hello", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Comment added."));
    assert!(page.contains("hello"));

    let comments = state.comments.all().await;
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author, "alice");
    assert_eq!(comments[0].text, "hello");
}

#[tokio::test]
async fn comments_are_listed_oldest_first() {
    let (_, app) = forum();
    let alice = register_and_login(&app, "alice", "pw1").await;
    let bob = register_and_login(&app, "bob", "pw2").await;

    for (cookie, text) in [(&alice, "one"), (&bob, "two"), (&alice, "three")] {
        send(&app, post_form("/comments", &format!("text={text}"), Some(cookie))).await;
    }

    let page = body_text(send(&app, get("/comments", None)).await).await;
    let one = page.find("<p class=\"text\">one</p>").unwrap();
    let two = page.find("<p class=\"text\">two</p>").unwrap();
    let three = page.find("<p class=\"text\">three</p>").unwrap();
    assert!(one < two && two < three);
}

#[tokio::test]
async fn full_session_scenario() {
    let (state, app) = forum();
    let cookie = register_and_login(&app, "alice", "pw1").await;

    send(&app, post_form("/comments", "text=hi", Some(&cookie))).await;
    let comments = state.comments.all().await;
    assert_eq!(comments.len(), 1);
    assert_eq!((comments[0].author.as_str(), comments[0].text.as_str()), ("alice", "hi"));

    let response = send(&app, post_form("/logout", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    // the old cookie no longer identifies anyone
    let page = body_text(send(&app, get("/comments", Some(&cookie))).await).await;
    assert!(page.contains("<a href=\"/login\">Login</a>"));
    assert!(!page.contains("<span class=\"user\">alice</span>"));
    assert!(page.contains("<p class=\"text\">hi</p>"));
    assert_eq!(state.comments.len().await, 1);

    let response = send(&app, post_form("/comments", "text=again", Some(&cookie))).await;
    assert!(body_text(response).await.contains("You must be logged in to post a comment."));
    assert_eq!(state.comments.len().await, 1);
}

#[tokio::test]
async fn logout_clears_cookie() {
    let (_, app) = forum();
    let cookie = register_and_login(&app, "alice", "pw1").await;

    let response = send(&app, post_form("/logout", "", Some(&cookie))).await;
    let cleared = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with("forum.sid=;") && v.contains("Max-Age=0"));
    assert!(cleared);
}

#[tokio::test]
async fn logout_without_session_still_redirects() {
    let (_, app) = forum();
    let response = send(&app, post_form("/logout", "", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn homepage_counts_visits() {
    let (_, app) = forum();
    let cookie = register_and_login(&app, "alice", "pw1").await;

    let first = body_text(send(&app, get("/", Some(&cookie))).await).await;
    assert!(first.contains("Hello, alice!"));
    assert!(first.contains("Visits this session: 0"));

    let second = body_text(send(&app, get("/", Some(&cookie))).await).await;
    assert!(second.contains("Visits this session: 1"));

    let guest = body_text(send(&app, get("/", None)).await).await;
    assert!(guest.contains("Hello, Guest!"));
    assert!(!guest.contains("Visits this session"));
}

#[tokio::test]
async fn relogin_issues_a_new_token() {
    let (_, app) = forum();
    let first = register_and_login(&app, "alice", "pw1").await;

    let response = send(&app, post_form("/login", "username=alice&password=pw1", Some(&first))).await;
    let second = session_cookie(&response).unwrap();
    assert_ne!(first, second);

    let page = body_text(send(&app, get("/comment/new", Some(&first))).await).await;
    assert!(page.contains("browsing as Guest"));
    let page = body_text(send(&app, get("/comment/new", Some(&second))).await).await;
    assert!(page.contains("Posting as alice"));
}

#[tokio::test]
async fn garbage_cookie_is_a_guest() {
    let (_, app) = forum();
    let page = body_text(send(&app, get("/comments", Some("forum.sid=not-a-uuid"))).await).await;
    assert!(page.contains("<a href=\"/register\">Register</a>"));
}

#[tokio::test]
async fn user_text_is_escaped() {
    let (_, app) = forum();
    let cookie = register_and_login(&app, "alice", "pw1").await;
    send(
        &app,
        post_form("/comments", "text=%3Cscript%3Ealert(1)%3C%2Fscript%3E", Some(&cookie)),
    )
    .await;

    let page = body_text(send(&app, get("/comments", None)).await).await;
    assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!page.contains("<script>"));
}

#[tokio::test]
async fn render_test_page() {
    let (_, app) = forum();
    let page = body_text(send(&app, get("/test", None)).await).await;
    assert!(page.contains("<title>Handlebars Test</title>"));
    assert!(page.contains("If you see this, Handlebars is working properly."));
}

/// Session store whose destroy always fails.
struct StuckStore {
    inner: MemorySessionStore,
}

impl SessionStore for StuckStore {
    fn create(&self, data: SessionData) -> Result<SessionToken, SessionError> {
        self.inner.create(data)
    }

    fn load(&self, token: &SessionToken) -> Result<Option<SessionData>, SessionError> {
        self.inner.load(token)
    }

    fn save(&self, token: &SessionToken, data: SessionData) -> Result<(), SessionError> {
        self.inner.save(token, data)
    }

    fn increment_visits(&self, token: &SessionToken) -> Result<u64, SessionError> {
        self.inner.increment_visits(token)
    }

    fn destroy(&self, _token: &SessionToken) -> Result<(), SessionError> {
        Err(SessionError::Backend("store unavailable".into()))
    }

    fn purge_expired(&self) -> usize {
        self.inner.purge_expired()
    }
}

fn stuck_forum() -> Router {
    let store = Arc::new(StuckStore {
        inner: MemorySessionStore::new(Duration::hours(24)),
    });
    app(AppState::with_session_store(Config::default(), store))
}

#[tokio::test]
async fn logout_fails_open_when_destroy_errors() {
    let app = stuck_forum();
    let cookie = register_and_login(&app, "alice", "pw1").await;

    let response = send(&app, post_form("/logout", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let cleared = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with("forum.sid=") && v.contains("Max-Age=0"));
    assert!(cleared);
}

#[tokio::test]
async fn login_over_a_stuck_session_still_succeeds() {
    let app = stuck_forum();
    let first = register_and_login(&app, "alice", "pw1").await;

    let response = send(&app, post_form("/login", "username=alice&password=pw1", Some(&first))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let second = session_cookie(&response).unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn guest_comment_with_unreadable_body_shows_login() {
    let (state, app) = forum();

    for content_type in [Some("application/json"), None, Some("text/plain")] {
        let response = send(&app, post_raw("/comments", content_type, r#"{"text":"hello"}"#, None)).await;
        assert_eq!(response.status(), StatusCode::OK, "{content_type:?}");
        let page = body_text(response).await;
        assert!(page.contains("You must be logged in to post a comment."));
    }
    assert!(state.comments.is_empty().await);
}

#[tokio::test]
async fn json_bodies_are_accepted() {
    let (state, app) = forum();

    let response = send(
        &app,
        post_raw(
            "/register",
            Some("application/json"),
            r#"{"username":"a","password":"b"}"#,
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?registered=1");
    assert_eq!(state.users.len(), 1);

    let response = send(
        &app,
        post_raw("/login", Some("application/json"), r#"{"username":"a","password":"b"}"#, None),
    )
    .await;
    assert_eq!(location(&response), "/");
    let cookie = session_cookie(&response).unwrap();

    let response = send(
        &app,
        post_raw("/comments", Some("application/json"), r#"{"text":"hi"}"#, Some(&cookie)),
    )
    .await;
    assert!(body_text(response).await.contains("Comment added."));
    let comments = state.comments.all().await;
    assert_eq!((comments[0].author.as_str(), comments[0].text.as_str()), ("a", "hi"));
}

#[tokio::test]
async fn member_comment_with_unreadable_body_is_empty() {
    let (state, app) = forum();
    let cookie = register_and_login(&app, "alice", "pw1").await;

    let response = send(&app, post_raw("/comments", None, "text=hello", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Comment cannot be empty."));
    assert!(state.comments.is_empty().await);
}

#[tokio::test]
async fn authenticated_requests_refresh_the_cookie() {
    let (_, app) = forum();
    let cookie = register_and_login(&app, "alice", "pw1").await;

    for uri in ["/", "/comments", "/comment/new"] {
        let response = send(&app, get(uri, Some(&cookie))).await;
        let refreshed = session_set_cookies(&response);
        assert_eq!(refreshed.len(), 1, "{uri}");
        assert!(refreshed[0].starts_with(&format!("{cookie};")), "{uri}");
        assert!(refreshed[0].contains("Max-Age=86400"), "{uri}");
    }
}

#[tokio::test]
async fn guests_get_no_session_cookie() {
    let (_, app) = forum();
    assert!(session_set_cookies(&send(&app, get("/", None)).await).is_empty());

    let cookie = register_and_login(&app, "alice", "pw1").await;
    send(&app, post_form("/logout", "", Some(&cookie))).await;

    // stale token: nothing to refresh
    assert!(session_set_cookies(&send(&app, get("/comments", Some(&cookie))).await).is_empty());
}

#[tokio::test]
async fn logout_sends_only_the_removal_cookie() {
    for app in [forum().1, stuck_forum()] {
        let cookie = register_and_login(&app, "alice", "pw1").await;
        let response = send(&app, post_form("/logout", "", Some(&cookie))).await;
        let cookies = session_set_cookies(&response);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].contains("Max-Age=0"));
    }
}
