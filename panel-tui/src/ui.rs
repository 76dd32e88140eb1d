use crate::app::{sentiment_to_color, App, InputMode};
use comment_panel::service::CommentService;
use comment_panel::view::Status;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

pub fn draw<S: CommentService>(f: &mut Frame, app: &App<S>) {
    let size = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(1)])
        .split(size);

    render_header(f, app, chunks[0]);
    render_comments(f, app, chunks[1]);
    render_status(f, app, chunks[2]);

    if app.input_mode != InputMode::Normal {
        render_input(f, app);
    }
}

fn render_header<S: CommentService>(f: &mut Frame, app: &App<S>, area: Rect) {
    let pages = app.panel.pages();
    let text = format!(
        "page {}/{}  size {}  language {}  |  q quit  r reload  ←/→ page  n new  d delete  D delete all  l language  +/- size",
        pages.page_number() + 1,
        pages.maximum_pages() + 1,
        app.page_size,
        app.panel.language(),
    );
    let block = Block::default().title("Comments").borders(Borders::ALL);
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_comments<S: CommentService>(f: &mut Frame, app: &App<S>, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let view = app.panel.view();
    if view.is_empty() {
        f.render_widget(Paragraph::new("No comments yet.").block(block), area);
        return;
    }
    let items: Vec<ListItem> = view
        .nodes()
        .iter()
        .map(|n| {
            let mut spans = vec![
                Span::styled(format!("{} ", n.time_label), Style::default().fg(Color::DarkGray)),
                Span::styled(n.user_label.clone(), Style::default().fg(sentiment_to_color(n.user_color))),
                Span::raw(format!(" {}", n.text)),
            ];
            if n.deletable {
                spans.push(Span::styled(" [x]", Style::default().fg(Color::Red)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    let mut state = ListState::default();
    state.select(Some(app.selection));
    let list = List::new(items).block(block).highlight_style(Style::default().bg(Color::Blue));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_status<S: CommentService>(f: &mut Frame, app: &App<S>, area: Rect) {
    let (text, color) = if let Some(status) = &app.status {
        (status.msg.clone(), status.color)
    } else {
        match app.panel.view().status() {
            Some(Status::Error(msg)) => (msg.clone(), Color::Red),
            Some(Status::Info(msg)) => (msg.clone(), Color::Green),
            None => (String::new(), Color::White),
        }
    };
    f.render_widget(Paragraph::new(text).style(Style::default().fg(color)), area);
}

fn render_input<S: CommentService>(f: &mut Frame, app: &App<S>) {
    let area = centered_rect(60, 20, f.size());
    f.render_widget(Clear, area);
    let title = match app.input_mode {
        InputMode::User => "Username (blank posts as Anonymous)",
        _ => "Comment",
    };
    let block = Block::default().title(title).borders(Borders::ALL).border_style(Style::default().fg(Color::Yellow));
    let lines = vec![Line::raw(format!("{}_", app.input)), Line::raw("[Enter] next  [Esc] cancel")];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
