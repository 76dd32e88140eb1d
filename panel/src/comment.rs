use serde::{Deserialize, Deserializer, Serialize};

/// A comment as served by the comment service. The client only renders these.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    pub id: String,
    pub user: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub comment: String,
    /// Epoch millis.
    pub timestamp: i64,
    #[serde(default)]
    pub language_id: Option<String>,
    #[serde(default)]
    pub sentiment: f64,
}

impl Comment {
    /// Whether the comment text needs translating before display in `language_id`.
    /// Comments without a recorded language are always sent for translation.
    pub fn needs_translation(&self, language_id: &str) -> bool {
        self.language_id.as_deref() != Some(language_id)
    }
}

/// Body of `GET /comment` (and of the `POST /comment` page/size triggers).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, alias = "maxPages")]
    pub maximum_pages: u32,
}

/// Text and username as typed into the panel inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommentDraft {
    pub user: String,
    pub text: String,
}

pub const ANONYMOUS_USER: &str = "Anonymous";

impl CommentDraft {
    pub fn new(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self { user: user.into(), text: text.into() }
    }

    /// Username to submit; blank names become [`ANONYMOUS_USER`].
    pub fn author(&self) -> &str {
        let trimmed = self.user.trim();
        if trimmed.is_empty() {
            ANONYMOUS_USER
        } else {
            trimmed
        }
    }
}

// Datastore-backed services hand out numeric ids, others strings.
fn deserialize_id_flexible<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{Error as DeError, Unexpected};
    use serde_json::Value;
    let v = Value::deserialize(deserializer)?;
    match v {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s),
        other => Err(DeError::invalid_type(Unexpected::Other(other.to_string().as_str()), &"number or string id")),
    }
}
