//! The comment panel controller: every user action on the panel goes through here.

use futures_util::future::join_all;
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::comment::{Comment, CommentDraft};
use crate::language::{language_options, Language, LanguageOption};
use crate::paging::PageState;
use crate::sentiment::SentimentColor;
use crate::service::{CommentService, ServiceError};
use crate::view::{element, CommentNode, CommentView};

#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("not allowed to delete comment {0}")]
    NotPermitted(String),
}

/// Who is looking at the panel. Decides which comments get a delete control.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Option<String>,
    pub admin: bool,
}

impl Viewer {
    pub fn new(user_id: Option<String>, admin: bool) -> Self {
        Self { user_id, admin }
    }

    /// Admins may delete anything, everyone else only their own comments.
    pub fn can_delete(&self, comment: &Comment) -> bool {
        if self.admin {
            return true;
        }
        match (&self.user_id, &comment.user_id) {
            (Some(viewer), Some(owner)) => viewer == owner,
            _ => false,
        }
    }
}

pub struct CommentPanel<S> {
    service: S,
    pages: PageState,
    view: CommentView,
    language: Language,
    viewer: Viewer,
    draft: CommentDraft,
}

impl<S: CommentService> CommentPanel<S> {
    pub fn new(service: S, language: Language, viewer: Viewer) -> Self {
        Self {
            service,
            pages: PageState::new(),
            view: CommentView::new(),
            language,
            viewer,
            draft: CommentDraft::default(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn view(&self) -> &CommentView {
        &self.view
    }

    pub fn pages(&self) -> PageState {
        self.pages
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn draft(&self) -> &CommentDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut CommentDraft {
        &mut self.draft
    }

    pub fn language_options(&self) -> Vec<LanguageOption> {
        language_options(self.language)
    }

    /// Posts the current draft in the selected language, then reloads the list.
    /// The comment text is cleared once the service accepts it; the username is kept.
    pub async fn submit_comment(&mut self) -> Result<(), PanelError> {
        let user = self.draft.author().to_string();
        let text = self.draft.text.clone();
        let result = self.service.new_comment(&user, &text, self.language.id).await;
        self.check("posting comment", result)?;
        self.draft.text.clear();
        info!("comment posted: user={} language={} len={}", user, self.language.id, text.len());
        self.load_comments().await
    }

    pub async fn change_max_comments(&mut self, max_comments: u32) -> Result<(), PanelError> {
        let result = self.service.set_max_comments(max_comments).await;
        self.check("changing page size", result)?;
        info!("page size set to {}", max_comments);
        self.load_comments().await
    }

    /// Fetches the current page and rebuilds the view with one node per comment.
    ///
    /// Comments written in another language than the selected one are translated
    /// concurrently after the nodes are in place. A failed translation keeps the
    /// original text and flags the view, but does not fail the load.
    pub async fn load_comments(&mut self) -> Result<(), PanelError> {
        self.remove_comments_from_view();
        let result = self.service.fetch_comments().await;
        let page = self.check("loading comments", result)?;
        self.pages.set_maximum_pages(page.maximum_pages);

        for comment in &page.comments {
            let node = CommentNode::from_comment(comment, self.viewer.can_delete(comment));
            self.view.append(node);
            self.display_sentiment(comment);
        }

        let language = self.language.id;
        let service = &self.service;
        let pending = page.comments.iter().filter(|c| c.needs_translation(language)).map(move |c| async move {
            debug!("translating comment {} from {:?} to {}", c.id, c.language_id, language);
            (c.id.as_str(), service.translate(&c.comment, language).await)
        });
        let results = join_all(pending).await;

        let mut failed = Vec::new();
        for (id, result) in results {
            match result {
                Ok(text) => {
                    self.view.set_text(id, text);
                }
                Err(e) => {
                    warn!("translation of comment {} failed: {}", id, e);
                    failed.push(e);
                }
            }
        }

        if let Some(last) = failed.last() {
            self.view.set_error(format!("translation failed for {} comment(s): {}", failed.len(), last));
        } else {
            self.view.set_info(format!("page {}/{}", self.pages.page_number() + 1, self.pages.maximum_pages() + 1));
        }
        info!("loaded {} comments (page {} of {})", page.comments.len(), self.pages.page_number(), self.pages.maximum_pages());
        Ok(())
    }

    /// Moves `delta` pages (clamped to the known page range), tells the service, reloads.
    /// The local page only moves once the service has accepted it.
    pub async fn increment_page(&mut self, delta: i64) -> Result<u32, PanelError> {
        let mut next = self.pages;
        let page = next.increment(delta);
        let result = self.service.set_page(page).await;
        self.check("changing page", result)?;
        self.pages = next;
        self.load_comments().await?;
        Ok(page)
    }

    /// Deletes one comment and drops just its node.
    pub async fn delete_comment(&mut self, id: &str) -> Result<(), PanelError> {
        if let Some(node) = self.view.node(id) {
            if !node.deletable {
                warn!("refusing to delete comment {} for viewer {:?}", id, self.viewer);
                self.view.set_error(format!("not allowed to delete comment {id}"));
                return Err(PanelError::NotPermitted(id.to_string()));
            }
        }
        let result = self.service.delete_comment(id).await;
        self.check("deleting comment", result)?;
        self.view.remove(id);
        info!("comment {} deleted", id);
        self.view.set_info(format!("deleted comment {id}"));
        Ok(())
    }

    pub async fn delete_comments(&mut self) -> Result<(), PanelError> {
        let result = self.service.delete_comments().await;
        self.check("deleting comments", result)?;
        info!("all comments deleted");
        self.load_comments().await
    }

    /// Replaces the text of the node `comment_id` with `text` translated into `language_id`.
    pub async fn translate_comment(&mut self, text: &str, language_id: &str, comment_id: &str) -> Result<String, PanelError> {
        let result = self.service.translate(text, language_id).await;
        let translated = self.check("translating comment", result)?;
        if !self.view.set_text(comment_id, translated.clone()) {
            debug!("translated comment {} is no longer displayed", comment_id);
        }
        self.view.set_info(format!("translated into {language_id}"));
        Ok(translated)
    }

    /// Colors the username of `comment` by its sentiment and returns the color.
    pub fn display_sentiment(&mut self, comment: &Comment) -> SentimentColor {
        let color = SentimentColor::from_score(comment.sentiment);
        self.view.set_user_color(&element::user_element_id(&comment.id), color);
        color
    }

    /// Switches the display language and reloads so every comment is re-checked for translation.
    pub async fn language_changed(&mut self, language: Language) -> Result<(), PanelError> {
        info!("display language {} -> {}", self.language.id, language.id);
        self.language = language;
        self.load_comments().await
    }

    pub fn remove_comments_from_view(&mut self) {
        self.view.clear();
    }

    fn check<T>(&mut self, action: &str, result: Result<T, ServiceError>) -> Result<T, PanelError> {
        result.map_err(|e| {
            error!("{} failed: {}", action, e);
            self.view.set_error(format!("{action} failed: {e}"));
            PanelError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::CommentPage;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        NewComment { user: String, comment: String, language: String },
        Fetch,
        MaxComments(u32),
        Page(u32),
        DeleteAll,
        Delete(String),
        Translate { text: String, language: String },
    }

    #[derive(Default)]
    struct FakeService {
        page: Mutex<CommentPage>,
        calls: Mutex<Vec<Call>>,
        fail_with: Option<u16>,
        fail_page: bool,
        fail_translate: AtomicBool,
    }

    impl FakeService {
        fn with_page(page: CommentPage) -> Self {
            Self { page: Mutex::new(page), ..Default::default() }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> Result<(), ServiceError> {
            self.calls.lock().unwrap().push(call);
            match self.fail_with {
                Some(code) => Err(ServiceError::Http(code)),
                None => Ok(()),
            }
        }
    }

    impl CommentService for FakeService {
        async fn new_comment(&self, user: &str, comment: &str, language: &str) -> Result<(), ServiceError> {
            self.record(Call::NewComment { user: user.into(), comment: comment.into(), language: language.into() })
        }

        async fn fetch_comments(&self) -> Result<CommentPage, ServiceError> {
            self.record(Call::Fetch)?;
            Ok(self.page.lock().unwrap().clone())
        }

        async fn set_max_comments(&self, max_comments: u32) -> Result<(), ServiceError> {
            self.record(Call::MaxComments(max_comments))
        }

        async fn set_page(&self, page: u32) -> Result<(), ServiceError> {
            self.record(Call::Page(page))?;
            if self.fail_page {
                return Err(ServiceError::Http(500));
            }
            Ok(())
        }

        async fn delete_comments(&self) -> Result<(), ServiceError> {
            self.record(Call::DeleteAll)?;
            self.page.lock().unwrap().comments.clear();
            Ok(())
        }

        async fn delete_comment(&self, id: &str) -> Result<(), ServiceError> {
            self.record(Call::Delete(id.into()))
        }

        async fn translate(&self, text: &str, language: &str) -> Result<String, ServiceError> {
            self.record(Call::Translate { text: text.into(), language: language.into() })?;
            if self.fail_translate.load(Ordering::SeqCst) {
                return Err(ServiceError::Http(503));
            }
            Ok(format!("[{language}] {text}"))
        }
    }

    fn comment(id: &str, user_id: &str, language: &str, sentiment: f64) -> Comment {
        Comment {
            id: id.into(),
            user: format!("user{id}"),
            user_id: Some(user_id.into()),
            comment: format!("text{id}"),
            timestamp: 1_593_561_600_000,
            language_id: Some(language.into()),
            sentiment,
        }
    }

    fn three_comments() -> CommentPage {
        CommentPage {
            comments: vec![comment("1", "u1", "en", 1.0), comment("2", "u2", "fr", -1.0), comment("3", "u1", "en", 0.0)],
            maximum_pages: 2,
        }
    }

    fn admin_panel(service: FakeService) -> CommentPanel<FakeService> {
        CommentPanel::new(service, Language::default(), Viewer::new(None, true))
    }

    #[tokio::test]
    async fn load_builds_nodes_and_translates_foreign_comments() {
        let mut panel = admin_panel(FakeService::with_page(three_comments()));
        panel.load_comments().await.unwrap();

        let view = panel.view();
        assert_eq!(view.len(), 3);
        assert_eq!(view.node("1").unwrap().text, "text1");
        assert_eq!(view.node("2").unwrap().text, "[en] text2");
        assert_eq!(view.node("1").unwrap().user_color.to_string(), "#00ff00");
        assert_eq!(view.node("2").unwrap().user_color.to_string(), "#ff0000");
        assert_eq!(view.node("3").unwrap().user_color.to_string(), "white");
        assert_eq!(panel.pages().maximum_pages(), 2);

        let translations: Vec<_> =
            panel.service().calls().into_iter().filter(|c| matches!(c, Call::Translate { .. })).collect();
        assert_eq!(translations, vec![Call::Translate { text: "text2".into(), language: "en".into() }]);
    }

    #[tokio::test]
    async fn submit_defaults_to_anonymous_and_reloads() {
        let mut panel = admin_panel(FakeService::with_page(CommentPage::default()));
        *panel.draft_mut() = CommentDraft::new("", "hello there");
        panel.submit_comment().await.unwrap();

        assert_eq!(
            panel.service().calls(),
            vec![
                Call::NewComment { user: "Anonymous".into(), comment: "hello there".into(), language: "en".into() },
                Call::Fetch,
            ]
        );
        assert!(panel.draft().text.is_empty());
    }

    #[tokio::test]
    async fn increment_clamps_to_reported_page_count() {
        let mut panel = admin_panel(FakeService::with_page(three_comments()));
        panel.load_comments().await.unwrap();
        assert_eq!(panel.increment_page(5).await.unwrap(), 2);
        assert_eq!(panel.pages().page_number(), 2);
        assert!(panel.service().calls().contains(&Call::Page(2)));
        assert_eq!(panel.increment_page(-9).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn single_delete_removes_one_node() {
        let mut panel = admin_panel(FakeService::with_page(three_comments()));
        panel.load_comments().await.unwrap();
        let before = panel.service().calls().len();

        panel.delete_comment("2").await.unwrap();

        assert_eq!(panel.view().len(), 2);
        assert!(panel.view().node("2").is_none());
        let after = panel.service().calls();
        assert_eq!(&after[before..], &[Call::Delete("2".into())]);
    }

    #[tokio::test]
    async fn delete_is_gated_to_owner() {
        let service = FakeService::with_page(three_comments());
        let mut panel = CommentPanel::new(service, Language::default(), Viewer::new(Some("u1".into()), false));
        panel.load_comments().await.unwrap();

        assert!(panel.view().node("1").unwrap().deletable);
        assert!(!panel.view().node("2").unwrap().deletable);
        match panel.delete_comment("2").await {
            Err(PanelError::NotPermitted(id)) => assert_eq!(id, "2"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(!panel.service().calls().contains(&Call::Delete("2".into())));
        assert_eq!(panel.view().len(), 3);
    }

    #[tokio::test]
    async fn anonymous_viewer_gets_no_delete_controls() {
        let mut panel = CommentPanel::new(FakeService::with_page(three_comments()), Language::default(), Viewer::default());
        panel.load_comments().await.unwrap();
        assert!(panel.view().nodes().iter().all(|n| !n.deletable));
    }

    #[tokio::test]
    async fn bulk_delete_reloads() {
        let mut panel = admin_panel(FakeService::with_page(three_comments()));
        panel.load_comments().await.unwrap();
        panel.delete_comments().await.unwrap();
        assert!(panel.view().is_empty());
        let calls = panel.service().calls();
        assert_eq!(&calls[calls.len() - 2..], &[Call::DeleteAll, Call::Fetch]);
    }

    #[tokio::test]
    async fn page_size_change_reloads() {
        let mut panel = admin_panel(FakeService::with_page(three_comments()));
        panel.change_max_comments(10).await.unwrap();
        let calls = panel.service().calls();
        assert_eq!(&calls[..2], &[Call::MaxComments(10), Call::Fetch]);
        assert_eq!(panel.view().len(), 3);
    }

    #[tokio::test]
    async fn language_change_retranslates() {
        let mut panel = admin_panel(FakeService::with_page(three_comments()));
        panel.load_comments().await.unwrap();
        panel.language_changed(Language::from_id("fr").unwrap()).await.unwrap();

        assert_eq!(panel.view().len(), 3);
        assert_eq!(panel.view().node("1").unwrap().text, "[fr] text1");
        assert_eq!(panel.view().node("2").unwrap().text, "text2");
        assert_eq!(panel.language().id, "fr");
    }

    #[tokio::test]
    async fn translate_comment_replaces_node_text() {
        let mut panel = admin_panel(FakeService::with_page(three_comments()));
        panel.load_comments().await.unwrap();
        let out = panel.translate_comment("hola", "de", "3").await.unwrap();
        assert_eq!(out, "[de] hola");
        assert_eq!(panel.view().node("3").unwrap().text, "[de] hola");
    }

    #[tokio::test]
    async fn service_failure_is_visible_not_fatal() {
        let service = FakeService { fail_with: Some(500), ..FakeService::with_page(three_comments()) };
        let mut panel = admin_panel(service);
        match panel.load_comments().await {
            Err(PanelError::Service(ServiceError::Http(500))) => {}
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(panel.view().is_empty());
        assert!(panel.view().has_error());
    }

    #[tokio::test]
    async fn failed_submit_keeps_draft() {
        let service = FakeService { fail_with: Some(502), ..Default::default() };
        let mut panel = admin_panel(service);
        *panel.draft_mut() = CommentDraft::new("ada", "keep me");
        assert!(panel.submit_comment().await.is_err());
        assert_eq!(panel.draft().text, "keep me");
        assert!(panel.view().has_error());
    }

    #[tokio::test]
    async fn failed_translation_keeps_original_text() {
        let service = FakeService { fail_translate: AtomicBool::new(true), ..FakeService::with_page(three_comments()) };
        let mut panel = admin_panel(service);
        panel.load_comments().await.unwrap();
        assert_eq!(panel.view().node("2").unwrap().text, "text2");
        assert!(panel.view().has_error());
    }

    #[tokio::test]
    async fn rejected_page_change_keeps_position() {
        let service = FakeService { fail_page: true, ..FakeService::with_page(three_comments()) };
        let mut panel = admin_panel(service);
        panel.load_comments().await.unwrap();

        assert!(panel.increment_page(1).await.is_err());
        assert_eq!(panel.pages().page_number(), 0);
        assert!(panel.view().has_error());
        assert_eq!(panel.service().calls().last(), Some(&Call::Page(1)));
    }

    #[tokio::test]
    async fn successful_translation_clears_error() {
        let service = FakeService { fail_translate: AtomicBool::new(true), ..FakeService::with_page(three_comments()) };
        let mut panel = admin_panel(service);
        panel.load_comments().await.unwrap();
        assert!(panel.view().has_error());

        panel.service().fail_translate.store(false, Ordering::SeqCst);
        panel.translate_comment("text2", "en", "2").await.unwrap();
        assert!(!panel.view().has_error());
        assert_eq!(panel.view().node("2").unwrap().text, "[en] text2");
    }

    #[tokio::test]
    async fn repeated_loads_do_not_duplicate_nodes() {
        let mut panel = admin_panel(FakeService::with_page(three_comments()));
        panel.load_comments().await.unwrap();
        panel.load_comments().await.unwrap();
        assert_eq!(panel.view().len(), 3);
    }
}
