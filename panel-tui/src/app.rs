use comment_panel::controller::CommentPanel;
use comment_panel::sentiment::SentimentColor;
use comment_panel::service::CommentService;
use ratatui::style::Color;
use std::time::{Duration, Instant};

/// Page size the panel starts from before the user adjusts it.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Comment,
    User,
}

pub struct StatusMessage {
    pub msg: String,
    pub color: Color,
    time: Instant,
}

pub struct App<S> {
    pub panel: CommentPanel<S>,
    pub selection: usize,
    pub input_mode: InputMode,
    pub input: String,
    pub page_size: u32,
    pub status: Option<StatusMessage>,
}

impl<S: CommentService> App<S> {
    pub fn new(panel: CommentPanel<S>) -> Self {
        Self {
            panel,
            selection: 0,
            input_mode: InputMode::Normal,
            input: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            status: None,
        }
    }

    pub async fn refresh(&mut self) {
        let _ = self.panel.load_comments().await;
        self.clamp_selection();
    }

    pub async fn change_page(&mut self, delta: i64) {
        let _ = self.panel.increment_page(delta).await;
        self.selection = 0;
    }

    pub async fn change_page_size(&mut self, delta: i64) {
        let size = (self.page_size as i64 + delta).max(1) as u32;
        if self.panel.change_max_comments(size).await.is_ok() {
            self.page_size = size;
        }
        self.clamp_selection();
    }

    pub async fn next_language(&mut self) {
        let language = self.panel.language().next();
        let _ = self.panel.language_changed(language).await;
        self.clamp_selection();
    }

    pub async fn delete_selected(&mut self) {
        let Some((id, deletable)) = self.panel.view().nodes().get(self.selection).map(|n| (n.id.clone(), n.deletable)) else {
            self.set_status("no comment selected".into(), Color::Yellow);
            return;
        };
        if !deletable {
            self.set_status("you can only delete your own comments".into(), Color::Yellow);
            return;
        }
        let _ = self.panel.delete_comment(&id).await;
        self.clamp_selection();
    }

    pub async fn delete_all(&mut self) {
        let _ = self.panel.delete_comments().await;
        self.selection = 0;
    }

    pub fn select_next(&mut self) {
        let len = self.panel.view().len();
        if len > 0 {
            self.selection = (self.selection + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selection = self.selection.min(self.panel.view().len().saturating_sub(1));
    }

    /// Starts composing: comment text first, then the username.
    pub fn start_compose(&mut self) {
        self.input_mode = InputMode::Comment;
        self.input = self.panel.draft().text.clone();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    pub fn input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Enter in an input field: advances from comment to username, then posts.
    pub async fn submit_input(&mut self) {
        match self.input_mode {
            InputMode::Normal => {}
            InputMode::Comment => {
                self.panel.draft_mut().text = std::mem::take(&mut self.input);
                self.input = self.panel.draft().user.clone();
                self.input_mode = InputMode::User;
            }
            InputMode::User => {
                self.panel.draft_mut().user = std::mem::take(&mut self.input);
                self.input_mode = InputMode::Normal;
                if self.panel.submit_comment().await.is_ok() {
                    self.selection = 0;
                }
            }
        }
    }

    pub fn tick(&mut self) {
        if let Some(status) = &self.status {
            if status.time.elapsed() > Duration::from_secs(3) {
                self.status = None;
            }
        }
    }

    pub fn set_status(&mut self, msg: String, color: Color) {
        self.status = Some(StatusMessage { msg, color, time: Instant::now() });
    }
}

pub fn sentiment_to_color(color: SentimentColor) -> Color {
    match color {
        SentimentColor::Neutral => Color::White,
        SentimentColor::Rgb(r, g, b) => Color::Rgb(r, g, b),
    }
}
