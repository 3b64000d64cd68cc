//! Chat transcript and command parsing for the interactive session

use chrono::{DateTime, Utc};
use serde::Serialize;

use yakgwan_core::{AnswerResult, SourceRef};

/// Quick questions offered in the session, selectable by number
pub const EXAMPLE_QUESTIONS: [&str; 5] = [
    "보험계약은 어떻게 성립되나요?",
    "보험료 납입이 연체되면 어떻게 되나요?",
    "청약을 철회할 수 있나요?",
    "보험금 지급 조건은 무엇인가요?",
    "계약 해지 절차를 알려주세요",
];

/// Shown to the user in place of an answer when `ask` fails
pub const ERROR_APOLOGY: &str = "죄송합니다. 시스템에 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";

/// One line of input, interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Ask(String),
    Help,
    Examples,
    Clear,
    ToggleDebug,
    Exit,
    Empty,
}

impl ChatCommand {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.to_lowercase().as_str() {
            "" => Self::Empty,
            "help" | "?" => Self::Help,
            "examples" => Self::Examples,
            "clear" => Self::Clear,
            "debug" => Self::ToggleDebug,
            "exit" | "quit" => Self::Exit,
            shortcut => match shortcut.parse::<usize>() {
                Ok(n) if (1..=EXAMPLE_QUESTIONS.len()).contains(&n) => {
                    Self::Ask(EXAMPLE_QUESTIONS[n - 1].to_string())
                }
                _ => Self::Ask(input.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatEntry {
    pub speaker: Speaker,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,
    pub timestamp: DateTime<Utc>,
}

/// Conversation history of one session
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_question(&mut self, question: &str) {
        self.push(Speaker::User, question.to_string(), Vec::new());
    }

    pub fn push_answer(&mut self, result: &AnswerResult) {
        self.push(Speaker::Assistant, result.answer.clone(), result.sources.clone());
    }

    /// Record the generic apology in place of a failed answer
    pub fn push_error(&mut self) {
        self.push(Speaker::Assistant, ERROR_APOLOGY.to_string(), Vec::new());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of (user, assistant) entries
    pub fn counts(&self) -> (usize, usize) {
        let questions = self
            .entries
            .iter()
            .filter(|e| e.speaker == Speaker::User)
            .count();
        (questions, self.entries.len() - questions)
    }

    pub fn last_question(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.speaker == Speaker::User)
            .map(|e| e.content.as_str())
    }

    /// The most recent `n` entries, oldest first
    pub fn recent(&self, n: usize) -> &[ChatEntry] {
        &self.entries[self.entries.len().saturating_sub(n)..]
    }

    fn push(&mut self, speaker: Speaker, content: String, sources: Vec<SourceRef>) {
        self.entries.push(ChatEntry {
            speaker,
            content,
            sources,
            timestamp: Utc::now(),
        });
    }
}
