use axum::http::{self, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use todo_core::ListOrder;
use std::time::Duration;

use todo_server::{app, router, Config, SessionLimits, SessionStore, SESSION_COOKIE};
use tower::ServiceExt;

/// A browser stand-in: one router, one cookie jar holding the session id.
struct Browser {
    app: Router,
    cookie: Option<String>,
}

impl Browser {
    fn new() -> Self {
        Self::with_app(app(&Config::default()))
    }

    fn with_app(app: Router) -> Self {
        Self { app, cookie: None }
    }

    async fn send(&mut self, builder: http::request::Builder, body: String) -> Response {
        let builder = match &self.cookie {
            Some(cookie) => builder.header(http::header::COOKIE, cookie),
            None => builder,
        };
        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        if let Some(set) = response.headers().get(http::header::SET_COOKIE) {
            let pair = set.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }
        response
    }

    async fn get(&mut self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri), String::new()).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Response {
        let builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(builder, form.to_string()).await
    }

    async fn page(&mut self, uri: &str) -> String {
        let resp = self.get(uri).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
        body_text(resp).await
    }
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(http::header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

fn assert_redirect(response: &Response, to: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), to);
}

// --- session cookie ---

#[tokio::test]
async fn first_request_issues_session_cookie_once() {
    let mut browser = Browser::new();

    let resp = browser.get("/lists").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = browser.cookie.clone().unwrap();
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));

    let resp = browser.get("/lists").await;
    assert!(resp.headers().get(http::header::SET_COOKIE).is_none());
    assert_eq!(browser.cookie.as_deref(), Some(cookie.as_str()));
}

#[tokio::test]
async fn sessions_do_not_share_lists() {
    let app = app(&Config::default());
    let mut alice = Browser::with_app(app.clone());
    let mut bob = Browser::with_app(app);

    alice.post("/lists", "list_name=Secret").await;

    assert!(alice.page("/lists").await.contains("Secret"));
    assert!(!bob.page("/lists").await.contains("Secret"));
}

#[tokio::test]
async fn unknown_cookie_is_kept_without_reissuing() {
    let mut browser = Browser::new();
    let forged = format!("{SESSION_COOKIE}=5f0c6d2e-8a43-4c1e-9d57-2b8f3c1a7e90");
    browser.cookie = Some(forged.clone());

    let resp = browser.get("/lists").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(http::header::SET_COOKIE).is_none());

    browser.post("/lists", "list_name=Kept").await;
    assert_eq!(browser.cookie.as_deref(), Some(forged.as_str()));
    assert!(browser.page("/lists").await.contains("Kept"));
}

// --- session storage ---

#[tokio::test]
async fn read_only_requests_store_no_sessions() {
    let store = SessionStore::new();
    let app = router(&Config::default(), store.clone());

    for uri in ["/", "/lists", "/lists/new", "/lists/9", "/lists/9/edit", "/lists/abc"] {
        Browser::with_app(app.clone()).get(uri).await;

        let mut forged = Browser::with_app(app.clone());
        forged.cookie = Some(format!("{SESSION_COOKIE}=0b8e7a0e-3f1d-4c55-a1d2-6b0a9e4c2f11"));
        forged.get(uri).await;
    }
    let resp = Browser::with_app(app.clone()).post("/lists/3/todos", "todo=x").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn rejected_create_stores_nothing_until_a_change_sticks() {
    let store = SessionStore::new();
    let mut browser = Browser::with_app(router(&Config::default(), store.clone()));

    browser.post("/lists", "list_name=").await;
    assert_eq!(store.len().await, 0);

    browser.post("/lists", "list_name=Work").await;
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn session_store_is_capped() {
    let config = Config {
        session_limits: SessionLimits {
            idle_timeout: Duration::from_secs(60),
            max_sessions: 3,
        },
        ..Config::default()
    };
    let store = SessionStore::with_limits(config.session_limits);
    let app = router(&config, store.clone());

    for i in 0..10 {
        let mut browser = Browser::with_app(app.clone());
        browser.post("/lists", &format!("list_name=List{i}")).await;
    }

    assert_eq!(store.len().await, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_on_one_session_are_all_kept() {
    const ADDS: usize = 100;
    let mut browser = Browser::new();
    browser.post("/lists", "list_name=Busy").await;
    let cookie = browser.cookie.clone().unwrap();

    let tasks: Vec<_> = (0..ADDS)
        .map(|i| {
            let app = browser.app.clone();
            let request = Request::builder()
                .method("POST")
                .uri("/lists/1/todos")
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(http::header::COOKIE, cookie.as_str())
                .body(format!("todo=item+{i}"))
                .unwrap();
            tokio::spawn(async move { app.oneshot(request).await.unwrap() })
        })
        .collect();
    for task in tasks {
        let resp = task.await.unwrap();
        assert_redirect(&resp, "/lists/1");
    }

    let html = browser.page("/lists/1").await;
    assert_eq!(html.matches("<h3>").count(), ADDS);
}

// --- lists ---

#[tokio::test]
async fn root_redirects_to_lists() {
    let resp = Browser::new().get("/").await;
    assert_redirect(&resp, "/lists");
}

#[tokio::test]
async fn new_list_form_renders() {
    let html = Browser::new().page("/lists/new").await;
    assert!(html.contains(r#"name="list_name""#));
}

#[tokio::test]
async fn create_list_flashes_success_once() {
    let mut browser = Browser::new();

    let resp = browser.post("/lists", "list_name=Groceries").await;
    assert_redirect(&resp, "/lists");

    let html = browser.page("/lists").await;
    assert!(html.contains("The list has been created"));
    assert!(html.contains("<h2>Groceries</h2>"));

    let html = browser.page("/lists").await;
    assert!(!html.contains("The list has been created"));
    assert!(html.contains("<h2>Groceries</h2>"));
}

#[tokio::test]
async fn create_list_too_long_rerenders_form() {
    let mut browser = Browser::new();
    let name = "x".repeat(101);

    let resp = browser.post("/lists", &format!("list_name={name}")).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(resp).await;
    assert!(html.contains("List name must be between 1 and 100 characters"));
    assert!(html.contains(&format!(r#"value="{name}""#)));

    // The error was consumed by the form render.
    let html = browser.page("/lists").await;
    assert!(!html.contains("must be between"));
    assert!(!html.contains(&name));
}

#[tokio::test]
async fn missing_list_name_counts_as_empty() {
    let mut browser = Browser::new();
    let resp = browser.post("/lists", "").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("List name must be between 1 and 100 characters"));
}

#[tokio::test]
async fn duplicate_list_name_is_rejected() {
    let mut browser = Browser::new();
    browser.post("/lists", "list_name=Home").await;

    let resp = browser.post("/lists", "list_name=Home").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("List name must be unique"));
}

#[tokio::test]
async fn rename_list() {
    let mut browser = Browser::new();
    browser.post("/lists", "list_name=Work").await;

    let html = browser.page("/lists/1/edit").await;
    assert!(html.contains(r#"value="Work""#));

    let resp = browser.post("/lists/1", "list_name=Office").await;
    assert_redirect(&resp, "/lists/1");

    let html = browser.page("/lists/1").await;
    assert!(html.contains("The list has been updated."));
    assert!(html.contains("<h2>Office</h2>"));
}

#[tokio::test]
async fn rename_with_empty_name_rerenders_edit_form() {
    let mut browser = Browser::new();
    browser.post("/lists", "list_name=Work").await;

    let resp = browser.post("/lists/1", "list_name=").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(resp).await;
    assert!(html.contains("List name must be between 1 and 100 characters"));
    assert!(html.contains("Editing 'Work'"));
}

#[tokio::test]
async fn delete_list_keeps_other_ids_stable() {
    let mut browser = Browser::new();
    browser.post("/lists", "list_name=First").await;
    browser.post("/lists", "list_name=Second").await;

    let resp = browser.post("/lists/1/destroy", "").await;
    assert_redirect(&resp, "/lists");

    let html = browser.page("/lists").await;
    assert!(html.contains("The list has been deleted."));
    assert!(!html.contains("First"));

    assert!(browser.page("/lists/2").await.contains("<h2>Second</h2>"));
    assert_eq!(browser.get("/lists/1").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_list_is_404_everywhere() {
    let mut browser = Browser::new();
    assert_eq!(browser.get("/lists/9").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(browser.get("/lists/9/edit").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(browser.post("/lists/9", "list_name=X").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(browser.post("/lists/9/destroy", "").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(browser.post("/lists/9/todos", "todo=X").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(browser.post("/lists/9/complete", "").await.status(), StatusCode::NOT_FOUND);

    let resp = browser.get("/lists/9").await;
    assert!(body_text(resp).await.contains("The specified list was not found."));
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let resp = Browser::new().get("/lists/abc").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn completed_lists_sort_last() {
    let mut browser = Browser::new();
    browser.post("/lists", "list_name=Finished").await;
    browser.post("/lists", "list_name=Pending").await;
    browser.post("/lists/1/todos", "todo=Only").await;
    browser.post("/lists/1/complete", "").await;

    let html = browser.page("/lists").await;
    let pending = html.find("<h2>Pending</h2>").unwrap();
    let finished = html.find("<h2>Finished</h2>").unwrap();
    assert!(pending < finished);
}

#[tokio::test]
async fn stored_order_when_sorting_disabled() {
    let config = Config {
        list_order: ListOrder::Stored,
        ..Config::default()
    };
    let mut browser = Browser::with_app(app(&config));
    browser.post("/lists", "list_name=Finished").await;
    browser.post("/lists", "list_name=Pending").await;
    browser.post("/lists/1/todos", "todo=Only").await;
    browser.post("/lists/1/complete", "").await;

    let html = browser.page("/lists").await;
    let pending = html.find("<h2>Pending</h2>").unwrap();
    let finished = html.find("<h2>Finished</h2>").unwrap();
    assert!(finished < pending);
}

// --- todos ---

#[tokio::test]
async fn groceries_scenario() {
    let mut browser = Browser::new();

    let resp = browser.post("/lists", "list_name=Groceries").await;
    assert_redirect(&resp, "/lists");

    let resp = browser.post("/lists/1/todos", "todo=Milk").await;
    assert_redirect(&resp, "/lists/1");

    let resp = browser.post("/lists/1/todos/1/check", "").await;
    assert_redirect(&resp, "/lists/1");

    let html = browser.page("/lists/1").await;
    assert!(html.contains("Todo Updated."));
    assert_eq!(html.matches("<h3>").count(), 1);
    assert!(html.contains("<h3>Milk</h3>"));
    assert!(html.contains(r#"<li class="complete">"#));
    assert!(html.contains("Uncheck"));
}

#[tokio::test]
async fn empty_todo_redirects_with_error() {
    let mut browser = Browser::new();
    browser.post("/lists", "list_name=Errands").await;

    let resp = browser.post("/lists/1/todos", "todo=").await;
    assert_redirect(&resp, "/lists/1");

    let html = browser.page("/lists/1").await;
    assert!(html.contains("Todo must be between 1 and 100 characters"));
    assert_eq!(html.matches("<h3>").count(), 0);
}

#[tokio::test]
async fn delete_todo() {
    let mut browser = Browser::new();
    browser.post("/lists", "list_name=Errands").await;
    browser.post("/lists/1/todos", "todo=Bank").await;
    browser.post("/lists/1/todos", "todo=Post").await;

    let resp = browser.post("/lists/1/todos/1/destroy", "").await;
    assert_redirect(&resp, "/lists/1");

    let html = browser.page("/lists/1").await;
    assert!(html.contains("The todo has been deleted."));
    assert!(!html.contains("<h3>Bank</h3>"));
    assert!(html.contains("<h3>Post</h3>"));

    // The same link from a stale page now misses.
    let resp = browser.post("/lists/1/todos/1/destroy", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = browser.post("/lists/1/todos/1/check", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn complete_all_todos() {
    let mut browser = Browser::new();
    browser.post("/lists", "list_name=Chores").await;
    browser.post("/lists/1/todos", "todo=Dishes").await;
    browser.post("/lists/1/todos", "todo=Laundry").await;
    browser.post("/lists/1/todos/2/check", "").await;

    let resp = browser.post("/lists/1/complete", "").await;
    assert_redirect(&resp, "/lists/1");

    let html = browser.page("/lists/1").await;
    assert!(html.contains("Todos Complete!"));
    assert_eq!(html.matches(r#"<li class="complete">"#).count(), 2);

    let html = browser.page("/lists").await;
    assert!(html.contains("<p>0 / 2</p>"));
}
