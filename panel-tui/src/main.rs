mod actions;
mod app;
mod ui;

use actions::Action;
use app::App;
use clap::Parser;
use comment_panel::cli::{build_panel, init_logger, SettingsArgs};
use comment_panel::service::CommentService;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{event, execute};
use ratatui::{prelude::*, Terminal};
use std::error::Error;

#[derive(Parser, Debug)]
#[command(name = "comment-panel-tui", version, about = "Terminal front end for the comment panel")]
struct TuiArgs {
    #[command(flatten)]
    settings: SettingsArgs,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = TuiArgs::parse();
    let cfg = args.settings.load_config()?;
    // stderr shares the terminal with the alternate screen
    if std::env::var_os("RUST_LOG").is_some() {
        init_logger(&cfg.log_level);
    }

    let mut app = App::new(build_panel(&cfg)?);
    app.refresh().await;

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    // restore terminal
    disable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;
    if let Err(e) = res {
        eprintln!("{:?}", e);
    }
    Ok(())
}

async fn run_app<B: Backend, S: CommentService>(terminal: &mut Terminal<B>, app: &mut App<S>) -> Result<(), Box<dyn Error>> {
    loop {
        app.tick();
        terminal.draw(|f| ui::draw(f, app))?;
        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let event::Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != event::KeyEventKind::Press {
            continue;
        }
        if app.input_mode != app::InputMode::Normal {
            match key.code {
                event::KeyCode::Esc => app.cancel_input(),
                event::KeyCode::Enter => app.submit_input().await,
                event::KeyCode::Backspace => app.backspace(),
                event::KeyCode::Char(c) => app.input_char(c),
                _ => {}
            }
            continue;
        }
        match Action::from_key(key) {
            Action::Quit => return Ok(()),
            Action::Refresh => app.refresh().await,
            Action::PrevPage => app.change_page(-1).await,
            Action::NextPage => app.change_page(1).await,
            Action::SelectNext => app.select_next(),
            Action::SelectPrev => app.select_prev(),
            Action::Compose => app.start_compose(),
            Action::DeleteSelected => app.delete_selected().await,
            Action::DeleteAll => app.delete_all().await,
            Action::NextLanguage => app.next_language().await,
            Action::GrowPage => app.change_page_size(1).await,
            Action::ShrinkPage => app.change_page_size(-1).await,
            Action::None => {}
        }
    }
}
