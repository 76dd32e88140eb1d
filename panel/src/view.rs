//! In-memory comment list: the element tree the front ends draw from.

use chrono::{Local, TimeZone};

use crate::comment::Comment;
use crate::sentiment::SentimentColor;

/// Element ids and class names of the comment panel.
pub mod element {
    /// Comment text input
    pub const TEXTAREA_COMMENT: &str = "textarea-comment";
    /// Username input
    pub const TEXTAREA_USER: &str = "textarea-user";
    /// List container holding one node per comment
    pub const COMMENT_CONTAINER: &str = "comment-container";
    pub const COMMENTS: &str = "comments";
    pub const COMMENT_DIV: &str = "comment-div";
    pub const USER_TEXT: &str = "user-text";
    pub const TIME_TEXT: &str = "time-text";
    pub const COMMENT_TEXT: &str = "comment-text";
    pub const DELETE_BUTTON: &str = "delete-button";
    pub const INDIV_DELETE: &str = "indiv-delete-button";
    /// Language selector
    pub const LANGUAGE: &str = "language";

    /// Id of the username element of a comment node.
    pub fn user_element_id(comment_id: &str) -> String {
        format!("{comment_id}:user")
    }
}

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One rendered comment.
#[derive(Clone, Debug, PartialEq)]
pub struct CommentNode {
    pub id: String,
    pub user_label: String,
    pub time_label: String,
    pub text: String,
    pub user_color: SentimentColor,
    pub deletable: bool,
}

impl CommentNode {
    pub fn from_comment(comment: &Comment, deletable: bool) -> Self {
        Self {
            id: comment.id.clone(),
            user_label: format!("{}:", comment.user),
            time_label: format_timestamp(comment.timestamp),
            text: comment.comment.clone(),
            user_color: SentimentColor::Neutral,
            deletable,
        }
    }

    pub fn user_element_id(&self) -> String {
        element::user_element_id(&self.id)
    }
}

/// Renders epoch millis in local time; out-of-range values render as the raw number.
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(t) => t.format(TIME_FORMAT).to_string(),
        None => millis.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Clone, Debug, Default)]
pub struct CommentView {
    nodes: Vec<CommentNode>,
    status: Option<Status>,
}

impl CommentView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[CommentNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&CommentNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn append(&mut self, node: CommentNode) {
        self.nodes.push(node);
    }

    /// Removes the node with `id`. Returns whether one was present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.nodes.iter().position(|n| n.id == id) {
            Some(idx) => {
                self.nodes.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Colors the username element, addressed as `<commentId>:user`.
    pub fn set_user_color(&mut self, user_element_id: &str, color: SentimentColor) -> bool {
        match self.nodes.iter_mut().find(|n| n.user_element_id() == user_element_id) {
            Some(node) => {
                node.user_color = color;
                true
            }
            None => false,
        }
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn set_info(&mut self, msg: impl Into<String>) {
        self.status = Some(Status::Info(msg.into()));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status = Some(Status::Error(msg.into()));
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn has_error(&self) -> bool {
        matches!(self.status, Some(Status::Error(_)))
    }
}
