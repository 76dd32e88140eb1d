use std::error::Error;

use log::info;

use crate::cli::{Args, Command};
use crate::comment::CommentDraft;
use crate::config::PanelConfig;
use crate::controller::CommentPanel;
use crate::language::LANGUAGES;
use crate::service::HttpCommentService;
use crate::view::{CommentView, Status};

pub fn init_logger(level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).try_init();
}

pub async fn handle_command(args: Args) -> Result<(), Box<dyn Error>> {
    let cfg = args.settings.load_config()?;
    init_logger(&cfg.log_level);

    if args.command == Command::Languages {
        let selected = cfg.display_language()?;
        for lang in LANGUAGES {
            let marker = if lang == selected { "*" } else { " " };
            println!("{} {}  {}", marker, lang.id, lang.name);
        }
        return Ok(());
    }

    let mut panel = build_panel(&cfg)?;
    info!("comment service: {}", panel.service().base_url());
    let result = run(&mut panel, &args.command).await;
    for line in render_lines(panel.view()) {
        println!("{line}");
    }
    result
}

pub fn build_panel(cfg: &PanelConfig) -> Result<CommentPanel<HttpCommentService>, Box<dyn Error>> {
    let service = HttpCommentService::new(&cfg.base_url, cfg.timeout())?;
    let mut panel = CommentPanel::new(service, cfg.display_language()?, cfg.viewer());
    panel.draft_mut().user = cfg.user.clone();
    Ok(panel)
}

async fn run(panel: &mut CommentPanel<HttpCommentService>, command: &Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List => panel.load_comments().await?,
        Command::Post { text } => {
            let user = panel.draft().user.clone();
            *panel.draft_mut() = CommentDraft::new(user, text.clone());
            panel.submit_comment().await?;
        }
        Command::Delete { id } => {
            panel.load_comments().await?;
            panel.delete_comment(id).await?;
        }
        Command::DeleteAll => panel.delete_comments().await?,
        Command::Page { delta } => {
            panel.load_comments().await?;
            panel.increment_page(*delta).await?;
        }
        Command::PageSize { max_comments } => panel.change_max_comments(*max_comments).await?,
        Command::Translate { text } => {
            let language = panel.language();
            let translated = panel.translate_comment(text, language.id, "").await?;
            println!("{translated}");
        }
        Command::Languages => {}
    }
    Ok(())
}

/// Text form of the view: one line per comment plus the status line.
pub fn render_lines(view: &CommentView) -> Vec<String> {
    let mut lines: Vec<String> = view
        .nodes()
        .iter()
        .map(|n| {
            let delete = if n.deletable { " [x]" } else { "" };
            format!("{} #{} {} {} ({}){}", n.time_label, n.id, n.user_label, n.text, n.user_color, delete)
        })
        .collect();
    match view.status() {
        Some(Status::Info(msg)) => lines.push(format!("-- {msg}")),
        Some(Status::Error(msg)) => lines.push(format!("!! {msg}")),
        None => {}
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::SentimentColor;
    use crate::view::CommentNode;

    #[test]
    fn renders_nodes_and_status() {
        let mut view = CommentView::new();
        view.append(CommentNode {
            id: "9".into(),
            user_label: "ada:".into(),
            time_label: "2020-07-01 00:00:00".into(),
            text: "hi".into(),
            user_color: SentimentColor::from_score(0.5),
            deletable: true,
        });
        view.set_error("loading comments failed: http status 500");
        let lines = render_lines(&view);
        assert_eq!(lines[0], "2020-07-01 00:00:00 #9 ada: hi (#40bf00) [x]");
        assert_eq!(lines[1], "!! loading comments failed: http status 500");
    }
}
