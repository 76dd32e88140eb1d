use std::fmt;

/// Scores closer to zero than this render as neutral white.
pub const NEUTRAL_BAND: f64 = 0.05;

/// Username color derived from a comment's sentiment score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SentimentColor {
    Neutral,
    Rgb(u8, u8, u8),
}

impl SentimentColor {
    /// Red for negative scores, green for positive ones, blue is always 0.
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() || score.abs() < NEUTRAL_BAND {
            return SentimentColor::Neutral;
        }
        let score = score.clamp(-1.0, 1.0);
        let green = (127.5 * (score + 1.0)).floor() as u8;
        SentimentColor::Rgb(255 - green, green, 0)
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            SentimentColor::Neutral => (255, 255, 255),
            SentimentColor::Rgb(r, g, b) => (r, g, b),
        }
    }
}

/// CSS form: `white` or `#rrggbb`.
impl fmt::Display for SentimentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentColor::Neutral => write!(f, "white"),
            SentimentColor::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}
