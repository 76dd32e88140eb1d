use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    PrevPage,
    NextPage,
    SelectNext,
    SelectPrev,
    Compose,
    DeleteSelected,
    DeleteAll,
    NextLanguage,
    GrowPage,
    ShrinkPage,
    None,
}

impl Action {
    pub fn from_key(key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Left => Action::PrevPage,
            KeyCode::Right => Action::NextPage,
            KeyCode::Up => Action::SelectPrev,
            KeyCode::Down => Action::SelectNext,
            KeyCode::Char('n') => Action::Compose,
            KeyCode::Char('d') => Action::DeleteSelected,
            KeyCode::Char('D') => Action::DeleteAll,
            KeyCode::Char('l') => Action::NextLanguage,
            KeyCode::Char('+') => Action::GrowPage,
            KeyCode::Char('-') => Action::ShrinkPage,
            _ => Action::None,
        }
    }
}
