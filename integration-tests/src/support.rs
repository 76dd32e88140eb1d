//! An in-process comment service that records every request it receives.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use comment_panel::comment::{Comment, CommentPage};
use tokio::net::TcpListener;

/// A request as the service saw it: path, method and form parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: &'static str,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
pub struct ServiceState {
    pub comments: Vec<Comment>,
    pub page: u32,
    pub page_size: u32,
    pub next_id: u64,
    pub requests: Vec<RecordedRequest>,
    /// When set, every endpoint answers with this status.
    pub fail_with: Option<StatusCode>,
    /// When set, only `/translate` answers with this status.
    pub fail_translate_with: Option<StatusCode>,
    /// When set, `GET /comment` answers 200 with a body that is not a comment page.
    pub garbled_listing: bool,
}

impl ServiceState {
    fn new(comments: Vec<Comment>, page_size: u32) -> Self {
        let next_id = comments.len() as u64 + 1;
        Self {
            comments,
            page: 0,
            page_size: page_size.max(1),
            next_id,
            requests: Vec::new(),
            fail_with: None,
            fail_translate_with: None,
            garbled_listing: false,
        }
    }

    fn maximum_pages(&self) -> u32 {
        let count = self.comments.len() as u32;
        count.div_ceil(self.page_size).saturating_sub(1)
    }

    fn current_page(&self) -> CommentPage {
        let start = (self.page * self.page_size) as usize;
        let comments = self.comments.iter().skip(start).take(self.page_size as usize).cloned().collect();
        CommentPage { comments, maximum_pages: self.maximum_pages() }
    }

    fn record(&mut self, method: &'static str, path: &'static str, params: &HashMap<String, String>) {
        let mut params: Vec<_> = params.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        params.sort();
        self.requests.push(RecordedRequest { method, path, params });
    }
}

#[derive(Clone)]
pub struct MockCommentService {
    pub state: Arc<Mutex<ServiceState>>,
    pub base_url: String,
}

impl MockCommentService {
    /// Serves `comments` on an ephemeral localhost port.
    pub async fn spawn(comments: Vec<Comment>, page_size: u32) -> Self {
        let state = Arc::new(Mutex::new(ServiceState::new(comments, page_size)));
        let app = Router::new()
            .route("/comment", get(list_comments).post(update_listing))
            .route("/new-comment", post(new_comment))
            .route("/delete-comments", post(delete_comments))
            .route("/delete-comment", post(delete_comment))
            .route("/translate", post(translate))
            .with_state(Arc::clone(&state));
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock service");
        let addr = listener.local_addr().expect("mock service addr");
        tokio::spawn(async move { axum::serve(listener, app.into_make_service()).await.expect("mock service") });
        Self { state, base_url: format!("http://{addr}") }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().expect("service state poisoned").requests.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }

    pub fn comment_count(&self) -> usize {
        self.state.lock().expect("service state poisoned").comments.len()
    }

    pub fn with_state<T>(&self, f: impl FnOnce(&mut ServiceState) -> T) -> T {
        let mut guard = self.state.lock().expect("service state poisoned");
        f(&mut *guard)
    }
}

type Shared = State<Arc<Mutex<ServiceState>>>;

fn failure(state: &ServiceState) -> Option<Response> {
    state.fail_with.map(|status| (status, "mock failure").into_response())
}

async fn list_comments(State(state): Shared) -> Response {
    let mut state = state.lock().expect("service state poisoned");
    state.record("GET", "/comment", &HashMap::new());
    if let Some(resp) = failure(&state) {
        return resp;
    }
    if state.garbled_listing {
        return "<html>not json</html>".into_response();
    }
    Json(state.current_page()).into_response()
}

async fn update_listing(State(state): Shared, Form(params): Form<HashMap<String, String>>) -> Response {
    let mut state = state.lock().expect("service state poisoned");
    state.record("POST", "/comment", &params);
    if let Some(resp) = failure(&state) {
        return resp;
    }
    if let Some(size) = params.get("max-comments").and_then(|v| v.parse::<u32>().ok()) {
        state.page_size = size.max(1);
    }
    if let Some(page) = params.get("page").and_then(|v| v.parse::<u32>().ok()) {
        state.page = page;
    }
    state.page = state.page.min(state.maximum_pages());
    Json(state.current_page()).into_response()
}

async fn new_comment(State(state): Shared, Form(params): Form<HashMap<String, String>>) -> Response {
    let mut state = state.lock().expect("service state poisoned");
    state.record("POST", "/new-comment", &params);
    if let Some(resp) = failure(&state) {
        return resp;
    }
    let id = state.next_id;
    state.next_id += 1;
    let text = params.get("comment").cloned().unwrap_or_default();
    let sentiment = if text.contains("love") {
        0.9
    } else if text.contains("hate") {
        -0.9
    } else {
        0.0
    };
    let comment = Comment {
        id: id.to_string(),
        user: params.get("user").cloned().unwrap_or_default(),
        user_id: None,
        comment: text,
        timestamp: 1_600_000_000_000 + id as i64,
        language_id: params.get("language").cloned(),
        sentiment,
    };
    state.comments.insert(0, comment);
    StatusCode::OK.into_response()
}

async fn delete_comments(State(state): Shared) -> Response {
    let mut state = state.lock().expect("service state poisoned");
    state.record("POST", "/delete-comments", &HashMap::new());
    if let Some(resp) = failure(&state) {
        return resp;
    }
    state.comments.clear();
    state.page = 0;
    StatusCode::OK.into_response()
}

async fn delete_comment(State(state): Shared, Form(params): Form<HashMap<String, String>>) -> Response {
    let mut state = state.lock().expect("service state poisoned");
    state.record("POST", "/delete-comment", &params);
    if let Some(resp) = failure(&state) {
        return resp;
    }
    let Some(id) = params.get("id") else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    state.comments.retain(|c| &c.id != id);
    StatusCode::OK.into_response()
}

async fn translate(State(state): Shared, Form(params): Form<HashMap<String, String>>) -> Response {
    let mut state = state.lock().expect("service state poisoned");
    state.record("POST", "/translate", &params);
    if let Some(resp) = failure(&state) {
        return resp;
    }
    if let Some(status) = state.fail_translate_with {
        return (status, "translation unavailable").into_response();
    }
    let text = params.get("text").cloned().unwrap_or_default();
    let language = params.get("language").cloned().unwrap_or_default();
    format!("[{language}] {text}").into_response()
}

/// A comment owned by `user_id`, written in `language` with the given sentiment.
pub fn comment(id: u64, user_id: &str, language: &str, sentiment: f64) -> Comment {
    Comment {
        id: id.to_string(),
        user: format!("user{id}"),
        user_id: Some(user_id.to_string()),
        comment: format!("comment {id}"),
        timestamp: 1_593_561_600_000 + id as i64,
        language_id: Some(language.to_string()),
        sentiment,
    }
}
