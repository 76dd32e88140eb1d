use std::fmt;

/// A display language the comment service can translate into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Language {
    pub id: &'static str,
    pub name: &'static str,
}

pub const LANGUAGES: [Language; 10] = [
    Language { id: "en", name: "English" },
    Language { id: "zh", name: "Chinese" },
    Language { id: "es", name: "Spanish" },
    Language { id: "fr", name: "French" },
    Language { id: "ar", name: "Arabic" },
    Language { id: "it", name: "Italian" },
    Language { id: "pt", name: "Portuguese" },
    Language { id: "de", name: "German" },
    Language { id: "ko", name: "Korean" },
    Language { id: "ja", name: "Japanese" },
];

impl Language {
    pub fn from_id(id: &str) -> Option<Language> {
        let id = id.trim();
        LANGUAGES.iter().copied().find(|l| l.id.eq_ignore_ascii_case(id))
    }

    /// The language after this one in the table, wrapping around.
    pub fn next(self) -> Language {
        let idx = LANGUAGES.iter().position(|l| *l == self).unwrap_or(0);
        LANGUAGES[(idx + 1) % LANGUAGES.len()]
    }
}

impl Default for Language {
    fn default() -> Self {
        LANGUAGES[0]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// One entry of the language selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LanguageOption {
    pub language: Language,
    pub selected: bool,
}

/// Selector options in table order with `selected` marked.
pub fn language_options(selected: Language) -> Vec<LanguageOption> {
    LANGUAGES.iter().map(|&language| LanguageOption { language, selected: language == selected }).collect()
}
