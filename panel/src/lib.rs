//! Client for a paginated comment panel backed by a remote comment service.
//!
//! The [`controller::CommentPanel`] owns the page state, the selected display language and an
//! in-memory [`view::CommentView`] that front ends draw from. All network traffic goes through a
//! [`service::CommentService`].

pub mod cli;
pub mod comment;
pub mod config;
pub mod controller;
pub mod language;
pub mod paging;
pub mod sentiment;
pub mod service;
pub mod view;

pub use comment::{Comment, CommentDraft, CommentPage};
pub use controller::{CommentPanel, PanelError, Viewer};
pub use language::Language;
pub use service::{CommentService, HttpCommentService, ServiceError};
