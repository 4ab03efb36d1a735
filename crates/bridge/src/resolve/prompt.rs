//! Interactive questions asked when a run is not unattended

use anyhow::{Result, bail};
use std::collections::VecDeque;

/// A question put to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    SourceUrl,
    SourceToken,
    Username,
    Password,
    TransferGlucose,
    TransferFood,
    TransferInsulin,
    AutoMode,
    Year,
    Month,
    ResetDevice,
}

impl Question {
    /// Text shown to the operator
    pub fn text(&self) -> &'static str {
        match self {
            Question::SourceUrl => "Enter your Nightscout url",
            Question::SourceToken => "Enter your Nightscout token",
            Question::Username => "Enter your LibreView username",
            Question::Password => "Enter your LibreView password",
            Question::TransferGlucose => "Transfer Glucose?",
            Question::TransferFood => "Transfer Food?",
            Question::TransferInsulin => "Transfer Insulin?",
            Question::AutoMode => {
                "Enable automatic mode? Automatic mode transfers everything since the last run \
                 and is designed to be run from a scheduler"
            }
            Question::Year => "Enter the year you want to transfer to LibreView",
            Question::Month => {
                "Enter the month you want to transfer to LibreView (0 = January, 11 = December)"
            }
            Question::ResetDevice => {
                "If you have problems with your transfer, recreate your device id"
            }
        }
    }
}

/// Collects answers from the operator
///
/// Implementations return the default (or an empty string when there is
/// none) when the operator just presses enter.
pub trait Prompter {
    /// Free text input
    fn input(&mut self, question: Question, default: Option<&str>) -> Result<String>;

    /// Hidden input
    fn password(&mut self, question: Question, default: Option<&str>) -> Result<String>;

    /// Yes/no
    fn confirm(&mut self, question: Question, default: bool) -> Result<bool>;
}

/// A canned answer for [`ScriptedPrompter`]
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Accept the default
    Default,
    Text(String),
    Yes,
    No,
}

/// Replays a fixed list of answers in order
///
/// Records the questions it was asked, so callers can check which ones were
/// skipped.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    asked: Vec<Question>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far
    pub fn asked(&self) -> &[Question] {
        &self.asked
    }

    fn next(&mut self, question: Question) -> Result<Answer> {
        self.asked.push(question);
        match self.answers.pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("no scripted answer for {:?}", question),
        }
    }

    fn text(&mut self, question: Question, default: Option<&str>) -> Result<String> {
        match self.next(question)? {
            Answer::Default => Ok(default.unwrap_or_default().to_string()),
            Answer::Text(text) => Ok(text),
            other => bail!("expected text for {:?}, got {:?}", question, other),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, question: Question, default: Option<&str>) -> Result<String> {
        self.text(question, default)
    }

    fn password(&mut self, question: Question, default: Option<&str>) -> Result<String> {
        self.text(question, default)
    }

    fn confirm(&mut self, question: Question, default: bool) -> Result<bool> {
        match self.next(question)? {
            Answer::Default => Ok(default),
            Answer::Yes => Ok(true),
            Answer::No => Ok(false),
            other => bail!("expected yes/no for {:?}, got {:?}", question, other),
        }
    }
}
