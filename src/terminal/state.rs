use log::{debug, info};

use crate::api::client::Endpoint;
use crate::api::error::FetchError;
use crate::domain::code::{CodeBatch, CodeResult, Credentials, MISSING_CODE};
use crate::fetcher::{FetchOutcome, FetchRequest, RequestId};
use crate::terminal::clipboard::Clipboard;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

// Placeholder texts for the code display. None of them is ever copied.
pub const NO_CODE_YET: &str = "------";
pub const NO_CODE_FOUND: &str = MISSING_CODE;
pub const ERROR_CODE: &str = "error";

const IDLE_STATUS: &str = "Enter an API key, then fetch";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Single(CodeResult),
    Batch(CodeBatch),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    Idle,
    Loading,
    Success(Fetched),
    Empty,
    Error(String),
}

/// Color class of the code display. Survives `Loading` so the last code keeps its look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Idle,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Url,
    Key,
    History,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    NothingToCopy,
    Failed,
}

pub struct AppState {
    pub base_url: String,
    pub api_key: String,
    pub focus: Focus,

    pub display: DisplayState,
    pub tone: Tone,
    pub code_text: String,
    pub detail_text: String,
    pub status_text: String,

    pub history: Vec<String>,
    /// Lines scrolled back from the newest entry (0 = pinned to the bottom).
    pub history_back: usize,

    pub notice: Option<Notice>,

    last_issued: RequestId,
    latest_in_flight: bool,
    all_in_flight: bool,
}

impl AppState {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: String::new(),
            focus: Focus::Key,
            display: DisplayState::Idle,
            tone: Tone::Idle,
            code_text: NO_CODE_YET.to_string(),
            detail_text: String::new(),
            status_text: IDLE_STATUS.to_string(),
            history: Vec::new(),
            history_back: 0,
            notice: None,
            last_issued: 0,
            latest_in_flight: false,
            all_in_flight: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.display == DisplayState::Loading
    }

    /// An action is disabled while a request of its kind is in flight.
    pub fn is_enabled(&self, kind: Endpoint) -> bool {
        match kind {
            Endpoint::Latest => !self.latest_in_flight,
            Endpoint::All => !self.all_in_flight,
        }
    }

    fn set_in_flight(&mut self, kind: Endpoint, v: bool) {
        match kind {
            Endpoint::Latest => self.latest_in_flight = v,
            Endpoint::All => self.all_in_flight = v,
        }
    }

    /// Moves to `Loading` and hands back the request to run, or `None` when the
    /// action is disabled or the inputs are rejected (a notice is raised then).
    pub fn begin_fetch(&mut self, kind: Endpoint) -> Option<FetchRequest> {
        if !self.is_enabled(kind) {
            debug!("{kind:?} ignored: already in flight");
            return None;
        }

        let credentials = match Credentials::new(&self.base_url, &self.api_key) {
            Ok(c) => c,
            Err(e) => {
                self.notice = Some(Notice {
                    title: "Missing input",
                    message: e.to_string(),
                });
                return None;
            }
        };

        self.last_issued += 1;
        self.set_in_flight(kind, true);
        self.display = DisplayState::Loading;
        self.status_text = "Fetching...".to_string();

        Some(FetchRequest {
            id: self.last_issued,
            kind,
            credentials,
        })
    }

    /// Applies a finished request. Outcomes superseded by a newer request only
    /// re-enable their action.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        self.set_in_flight(outcome.kind, false);

        if outcome.id != self.last_issued {
            info!(
                "discarding stale {:?} response {} (latest is {})",
                outcome.kind, outcome.id, self.last_issued
            );
            return;
        }

        match (outcome.kind, outcome.result) {
            (Endpoint::Latest, Ok(body)) => self.show_single(CodeResult::from_json(&body)),
            (Endpoint::All, Ok(body)) => self.show_batch(CodeBatch::from_json(&body)),
            (_, Err(e)) => self.show_error(&e),
        }
    }

    fn show_single(&mut self, r: CodeResult) {
        if !r.has_code() {
            self.show_empty();
            return;
        }
        self.code_text = r.code.clone();
        self.tone = Tone::Success;
        self.status_text = "Fetched!".to_string();
        self.detail_text = format!(
            "From: {}\nSubject: {}\nTime: {}",
            r.sender, r.subject, r.timestamp
        );
        self.history.push(r.history_line());
        self.history_back = 0;
        self.display = DisplayState::Success(Fetched::Single(r));
    }

    fn show_batch(&mut self, batch: CodeBatch) {
        let Some(first) = batch.first() else {
            self.show_empty();
            return;
        };
        self.code_text = if first.has_code() {
            first.code.clone()
        } else {
            NO_CODE_FOUND.to_string()
        };
        self.tone = Tone::Success;
        self.status_text = format!("Fetched! {} total", batch.len());
        self.detail_text = format!("From: {}\nSubject: {}", first.sender, first.subject);

        self.history = batch.items.iter().map(CodeResult::batch_line).collect();
        // show the first entries
        self.history_back = self.history.len();
        self.display = DisplayState::Success(Fetched::Batch(batch));
    }

    fn show_empty(&mut self) {
        self.code_text = NO_CODE_FOUND.to_string();
        self.tone = Tone::Warning;
        self.status_text = "No code found".to_string();
        self.detail_text.clear();
        self.display = DisplayState::Empty;
    }

    fn show_error(&mut self, e: &FetchError) {
        let msg = e.to_string();
        self.code_text = ERROR_CODE.to_string();
        self.tone = Tone::Error;
        self.status_text = format!("Error: {msg}");
        self.detail_text.clear();
        self.display = DisplayState::Error(msg);
    }

    pub fn has_copyable_code(&self) -> bool {
        !self.code_text.is_empty()
            && ![NO_CODE_YET, NO_CODE_FOUND, ERROR_CODE].contains(&self.code_text.as_str())
    }

    pub fn copy_code(&mut self, clipboard: &mut dyn Clipboard) -> CopyOutcome {
        if !self.has_copyable_code() {
            self.notice = Some(Notice {
                title: "Nothing to copy",
                message: "There is no verification code to copy".to_string(),
            });
            return CopyOutcome::NothingToCopy;
        }
        match clipboard.set_text(&self.code_text) {
            Ok(()) => {
                self.status_text = "Copied to clipboard!".to_string();
                CopyOutcome::Copied
            }
            Err(e) => {
                self.status_text = format!("Copy failed: {e}");
                CopyOutcome::Failed
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ----- Input -----

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Focus::Url => Focus::Key,
            Focus::Key => Focus::History,
            Focus::History => Focus::Url,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            Focus::Url => Focus::History,
            Focus::Key => Focus::Url,
            Focus::History => Focus::Key,
        };
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Url => Some(&mut self.base_url),
            Focus::Key => Some(&mut self.api_key),
            Focus::History => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(f) = self.field_mut() {
            f.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(f) = self.field_mut() {
            f.pop();
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(f) = self.field_mut() {
            f.clear();
        }
    }

    pub fn scroll_history(&mut self, delta: i32) {
        let back = self.history_back as i64 - delta as i64;
        self.history_back = back.clamp(0, self.history.len() as i64) as usize;
    }

    /// First history line to show in a pane `height` lines tall.
    pub fn history_top(&self, height: usize) -> usize {
        self.history
            .len()
            .saturating_sub(height)
            .saturating_sub(self.history_back)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[derive(Default)]
    struct RecordingClipboard {
        writes: Vec<String>,
    }

    impl Clipboard for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
            self.writes.push(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn set_text(&mut self, _text: &str) -> anyhow::Result<()> {
            anyhow::bail!("no terminal")
        }
    }

    fn with_key() -> AppState {
        let mut s = AppState::default();
        s.api_key = "key".into();
        s
    }

    fn complete(s: &mut AppState, kind: Endpoint, result: Result<Value, FetchError>) {
        let req = s.begin_fetch(kind).expect("request should start");
        s.apply(FetchOutcome {
            id: req.id,
            kind,
            result,
        });
    }

    #[test]
    fn blank_key_raises_a_notice_and_no_request() {
        let mut s = AppState::default();
        s.api_key = "   ".into();
        assert!(s.begin_fetch(Endpoint::Latest).is_none());
        assert!(s.notice.is_some());
        assert_eq!(s.display, DisplayState::Idle);
        assert!(s.is_enabled(Endpoint::Latest));
    }

    #[test]
    fn begin_fetch_enters_loading_and_disables_the_action() {
        let mut s = with_key();
        let req = s.begin_fetch(Endpoint::Latest).unwrap();
        assert_eq!(req.credentials.api_key, "key");
        assert_eq!(req.credentials.base_url, DEFAULT_BASE_URL);
        assert!(s.is_loading());
        assert!(!s.is_enabled(Endpoint::Latest));
        assert!(s.is_enabled(Endpoint::All));
        assert!(s.begin_fetch(Endpoint::Latest).is_none());
        // display text untouched until the request completes
        assert_eq!(s.code_text, NO_CODE_YET);
    }

    #[test]
    fn single_code_success() {
        let mut s = with_key();
        complete(
            &mut s,
            Endpoint::Latest,
            Ok(json!({"code":"123456","subject":"S","from":"F","date":"D"})),
        );
        assert!(matches!(s.display, DisplayState::Success(Fetched::Single(_))));
        assert_eq!(s.code_text, "123456");
        assert_eq!(s.tone, Tone::Success);
        assert_eq!(s.detail_text, "From: F\nSubject: S\nTime: D");
        assert_eq!(s.history.len(), 1);
        assert!(s.history[0].contains("123456"));
        assert!(s.history[0].contains("S"));
        assert!(s.is_enabled(Endpoint::Latest));
    }

    #[test]
    fn single_fetches_append_to_history() {
        let mut s = with_key();
        complete(&mut s, Endpoint::Latest, Ok(json!({"code":"111"})));
        complete(&mut s, Endpoint::Latest, Ok(json!({"code":"222"})));
        assert_eq!(s.history.len(), 2);
        assert!(s.history[1].contains("222"));
    }

    #[test]
    fn empty_code_is_empty_not_success() {
        let mut s = with_key();
        complete(&mut s, Endpoint::Latest, Ok(json!({"code":""})));
        assert_eq!(s.display, DisplayState::Empty);
        assert_eq!(s.code_text, NO_CODE_FOUND);
        assert_eq!(s.tone, Tone::Warning);
        assert!(s.history.is_empty());
    }

    #[test]
    fn http_error_is_shown_and_history_kept() {
        let mut s = with_key();
        complete(&mut s, Endpoint::Latest, Ok(json!({"code":"111"})));
        complete(
            &mut s,
            Endpoint::Latest,
            Err(FetchError::Http {
                status: 404,
                message: "invalid key".into(),
            }),
        );
        match &s.display {
            DisplayState::Error(msg) => assert!(msg.contains("invalid key")),
            other => panic!("unexpected state {other:?}"),
        }
        assert_eq!(s.code_text, ERROR_CODE);
        assert_eq!(s.tone, Tone::Error);
        assert!(s.status_text.contains("invalid key"));
        assert_eq!(s.history.len(), 1);
    }

    #[test]
    fn batch_replaces_history() {
        let mut s = with_key();
        complete(&mut s, Endpoint::Latest, Ok(json!({"code":"old"})));
        complete(
            &mut s,
            Endpoint::All,
            Ok(json!({"messages":[{"code":"A"},{"code":"B"}]})),
        );
        assert!(matches!(s.display, DisplayState::Success(Fetched::Batch(_))));
        assert_eq!(s.code_text, "A");
        assert_eq!(s.history.len(), 2);
        assert!(s.history[0].contains("A"));
        assert!(s.history[1].contains("B"));
        assert_eq!(s.status_text, "Fetched! 2 total");
    }

    #[test]
    fn empty_batch_is_empty() {
        let mut s = with_key();
        complete(&mut s, Endpoint::All, Ok(json!({"messages":[]})));
        assert_eq!(s.display, DisplayState::Empty);
        assert_eq!(s.code_text, NO_CODE_FOUND);
    }

    #[test]
    fn stale_response_does_not_overwrite_newer_one() {
        let mut s = with_key();
        let first = s.begin_fetch(Endpoint::Latest).unwrap();
        let second = s.begin_fetch(Endpoint::All).unwrap();

        s.apply(FetchOutcome {
            id: second.id,
            kind: Endpoint::All,
            result: Ok(json!({"messages":[{"code":"NEW"}]})),
        });
        s.apply(FetchOutcome {
            id: first.id,
            kind: Endpoint::Latest,
            result: Ok(json!({"code":"OLD"})),
        });

        assert_eq!(s.code_text, "NEW");
        assert_eq!(s.history.len(), 1);
        assert!(s.is_enabled(Endpoint::Latest));
        assert!(s.is_enabled(Endpoint::All));
    }

    #[test]
    fn stale_response_keeps_loading_until_latest_arrives() {
        let mut s = with_key();
        let first = s.begin_fetch(Endpoint::Latest).unwrap();
        let _second = s.begin_fetch(Endpoint::All).unwrap();
        s.apply(FetchOutcome {
            id: first.id,
            kind: Endpoint::Latest,
            result: Ok(json!({"code":"OLD"})),
        });
        assert!(s.is_loading());
        assert_eq!(s.code_text, NO_CODE_YET);
    }

    #[test]
    fn copy_of_placeholder_is_a_noop() {
        let mut s = AppState::default();
        let mut cb = RecordingClipboard::default();
        assert_eq!(s.copy_code(&mut cb), CopyOutcome::NothingToCopy);
        assert!(cb.writes.is_empty());
        assert!(s.notice.is_some());

        s.dismiss_notice();
        s.api_key = "key".into();
        let refused = FetchError::Transport {
            message: "refused".into(),
        };
        complete(&mut s, Endpoint::Latest, Err(refused));
        assert_eq!(s.copy_code(&mut cb), CopyOutcome::NothingToCopy);
        assert!(cb.writes.is_empty());
    }

    #[test]
    fn copy_writes_the_code() {
        let mut s = with_key();
        complete(&mut s, Endpoint::Latest, Ok(json!({"code":"654321"})));
        let mut cb = RecordingClipboard::default();
        assert_eq!(s.copy_code(&mut cb), CopyOutcome::Copied);
        assert_eq!(cb.writes, ["654321"]);
        assert_eq!(s.status_text, "Copied to clipboard!");
    }

    #[test]
    fn copy_failure_is_reported() {
        let mut s = with_key();
        complete(&mut s, Endpoint::Latest, Ok(json!({"code":"654321"})));
        assert_eq!(s.copy_code(&mut BrokenClipboard), CopyOutcome::Failed);
        assert!(s.status_text.starts_with("Copy failed"));
    }

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut s = AppState::new("");
        s.focus = Focus::Url;
        "http://h".chars().for_each(|c| s.input_char(c));
        s.focus_next();
        "abc".chars().for_each(|c| s.input_char(c));
        s.backspace();
        assert_eq!(s.base_url, "http://h");
        assert_eq!(s.api_key, "ab");

        s.focus_next();
        s.input_char('x');
        assert_eq!(s.api_key, "ab");
        s.focus_prev();
        s.clear_field();
        assert_eq!(s.api_key, "");
    }

    #[test]
    fn history_scroll_is_clamped() {
        let mut s = AppState::default();
        s.history = (0..10).map(|i| i.to_string()).collect();
        assert_eq!(s.history_top(4), 6);
        s.scroll_history(-3);
        assert_eq!(s.history_top(4), 3);
        s.scroll_history(-100);
        assert_eq!(s.history_top(4), 0);
        s.scroll_history(100);
        assert_eq!(s.history_back, 0);
    }
}
