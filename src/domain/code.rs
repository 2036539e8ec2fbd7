use serde_json::Value;

use crate::api::error::FetchError;

/// Shown in place of a missing code inside a batch listing.
pub const MISSING_CODE: &str = "no code found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: String,
    pub api_key: String,
}

impl Credentials {
    /// Trims both inputs and drops trailing slashes from the base URL.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, FetchError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(FetchError::Input("API key is required".into()));
        }
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(FetchError::Input("API base URL is required".into()));
        }
        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeResult {
    pub code: String,
    pub subject: String,
    pub sender: String,
    pub timestamp: String,
}

impl CodeResult {
    /// Missing or non-string fields are read as empty strings.
    pub fn from_json(v: &Value) -> Self {
        Self {
            code: str_field(v, "code"),
            subject: str_field(v, "subject"),
            sender: str_field(v, "from"),
            timestamp: str_field(v, "date"),
        }
    }

    pub fn has_code(&self) -> bool {
        !self.code.is_empty()
    }

    /// Scrollback line for a single-code fetch.
    pub fn history_line(&self) -> String {
        format!(
            "[{}] {} - {}...",
            self.timestamp,
            self.code,
            prefix_chars(&self.subject, 30)
        )
    }

    /// Scrollback line for one entry of a batch fetch.
    pub fn batch_line(&self) -> String {
        let code = if self.has_code() {
            self.code.as_str()
        } else {
            MISSING_CODE
        };
        format!(
            "[{}] {} - {}",
            self.timestamp,
            code,
            prefix_chars(&self.subject, 40)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBatch {
    pub items: Vec<CodeResult>,
}

impl CodeBatch {
    /// Reads the `messages` array in server order. Anything else is an empty batch.
    pub fn from_json(v: &Value) -> Self {
        let items = v
            .get("messages")
            .and_then(Value::as_array)
            .map(|msgs| msgs.iter().map(CodeResult::from_json).collect())
            .unwrap_or_default();
        Self { items }
    }

    pub fn first(&self) -> Option<&CodeResult> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn str_field(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
