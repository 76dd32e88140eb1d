//! Client side of the comment service endpoints.

use std::time::Duration;

use log::debug;
use reqwest::{Client, Response};
use thiserror::Error;

use crate::comment::CommentPage;

pub const FETCH_NEW_COMMENT: &str = "/new-comment";
pub const FETCH_COMMENT: &str = "/comment";
pub const FETCH_DELETE_COMMENTS: &str = "/delete-comments";
pub const FETCH_DELETE_COMMENT: &str = "/delete-comment";
pub const FETCH_TRANSLATE: &str = "/translate";

pub const PARAM_USER: &str = "user";
pub const PARAM_COMMENT: &str = "comment";
pub const PARAM_ID: &str = "id";
pub const PARAM_MAX_COMMENT: &str = "max-comments";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_LANG: &str = "language";
pub const PARAM_TEXT: &str = "text";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("http status {0}")]
    Http(u16),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The comment service endpoints, one method per endpoint/method pair.
#[allow(async_fn_in_trait)]
pub trait CommentService {
    /// `POST /new-comment` with `user`, `comment`, `language`.
    async fn new_comment(&self, user: &str, comment: &str, language: &str) -> Result<(), ServiceError>;
    /// `GET /comment`.
    async fn fetch_comments(&self) -> Result<CommentPage, ServiceError>;
    /// `POST /comment` with `max-comments`.
    async fn set_max_comments(&self, max_comments: u32) -> Result<(), ServiceError>;
    /// `POST /comment` with `page`.
    async fn set_page(&self, page: u32) -> Result<(), ServiceError>;
    /// `POST /delete-comments`.
    async fn delete_comments(&self) -> Result<(), ServiceError>;
    /// `POST /delete-comment` with `id`.
    async fn delete_comment(&self, id: &str) -> Result<(), ServiceError>;
    /// `POST /translate` with `text`, `language`; the body is the translated text.
    async fn translate(&self, text: &str, language: &str) -> Result<String, ServiceError>;
}

#[derive(Clone, Debug)]
pub struct HttpCommentService {
    base_url: String,
    client: Client,
}

impl HttpCommentService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_form(&self, path: &str, params: &[(&str, &str)]) -> Result<Response, ServiceError> {
        let url = self.url(path);
        debug!("POST {} params={:?}", url, params.iter().map(|(k, _)| *k).collect::<Vec<_>>());
        let resp = self.client.post(&url).form(params).send().await?;
        check_status(resp)
    }
}

fn check_status(resp: Response) -> Result<Response, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ServiceError::Http(status.as_u16()))
    }
}

impl CommentService for HttpCommentService {
    async fn new_comment(&self, user: &str, comment: &str, language: &str) -> Result<(), ServiceError> {
        self.post_form(FETCH_NEW_COMMENT, &[(PARAM_USER, user), (PARAM_COMMENT, comment), (PARAM_LANG, language)]).await?;
        Ok(())
    }

    async fn fetch_comments(&self) -> Result<CommentPage, ServiceError> {
        let url = self.url(FETCH_COMMENT);
        debug!("GET {}", url);
        let resp = check_status(self.client.get(&url).send().await?)?;
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn set_max_comments(&self, max_comments: u32) -> Result<(), ServiceError> {
        let max_comments = max_comments.to_string();
        self.post_form(FETCH_COMMENT, &[(PARAM_MAX_COMMENT, &max_comments)]).await?;
        Ok(())
    }

    async fn set_page(&self, page: u32) -> Result<(), ServiceError> {
        let page = page.to_string();
        self.post_form(FETCH_COMMENT, &[(PARAM_PAGE, &page)]).await?;
        Ok(())
    }

    async fn delete_comments(&self) -> Result<(), ServiceError> {
        self.post_form(FETCH_DELETE_COMMENTS, &[]).await?;
        Ok(())
    }

    async fn delete_comment(&self, id: &str) -> Result<(), ServiceError> {
        self.post_form(FETCH_DELETE_COMMENT, &[(PARAM_ID, id)]).await?;
        Ok(())
    }

    async fn translate(&self, text: &str, language: &str) -> Result<String, ServiceError> {
        let resp = self.post_form(FETCH_TRANSLATE, &[(PARAM_TEXT, text), (PARAM_LANG, language)]).await?;
        Ok(resp.text().await?)
    }
}
