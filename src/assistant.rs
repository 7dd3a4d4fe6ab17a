//! AI-assisted features over an injected completion service.
//!
//! The visualization core never depends on this module. It exists so the
//! prompt shapes and response parsing can be exercised without a network:
//! hosts plug in their own [`CompletionService`], tests use
//! [`CannedCompletion`].

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AssistantError;

/// A text completion endpoint: one prompt in, free text out.
pub trait CompletionService {
    fn complete(&self, prompt: &str) -> Result<String, AssistantError>;
}

impl<C: CompletionService + ?Sized> CompletionService for &C {
    fn complete(&self, prompt: &str) -> Result<String, AssistantError> {
        (**self).complete(prompt)
    }
}

/// A generated practice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionList {
    Bare(Vec<Question>),
    Wrapped { questions: Vec<Question> },
}

pub struct Assistant<C> {
    service: C,
}

impl<C: CompletionService> Assistant<C> {
    pub fn new(service: C) -> Self {
        Self { service }
    }

    fn ask(&self, feature: &str, prompt: String) -> Result<String, AssistantError> {
        debug!(feature, prompt_len = prompt.len(), "requesting completion");
        let reply = self.service.complete(&prompt)?;
        if reply.trim().is_empty() {
            warn!(feature, "empty completion");
            return Err(AssistantError::EmptyResponse);
        }
        Ok(reply)
    }

    /// Explain what a snippet does, its complexity and likely bugs.
    pub fn analyze_code(&self, language: &str, code: &str) -> Result<String, AssistantError> {
        self.ask("analyze", analyze_prompt(language, code))
    }

    /// Translate a snippet to another language.
    pub fn convert_code(&self, from: &str, to: &str, code: &str) -> Result<String, AssistantError> {
        let reply = self.ask("convert", convert_prompt(from, to, code))?;
        Ok(strip_fence(&reply).to_string())
    }

    pub fn generate_questions(
        &self,
        topic: &str,
        count: usize,
    ) -> Result<Vec<Question>, AssistantError> {
        let reply = self.ask("questions", questions_prompt(topic, count))?;
        parse_questions(&reply)
    }

    /// Critique an interview answer.
    pub fn interview_feedback(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<String, AssistantError> {
        self.ask("feedback", feedback_prompt(question, answer))
    }
}

fn analyze_prompt(language: &str, code: &str) -> String {
    format!(
        "Analyze the following {language} code. Describe what it does, \
         state its time and space complexity, and point out any bugs.\n\n\
         ```{language}\n{code}\n```"
    )
}

fn convert_prompt(from: &str, to: &str, code: &str) -> String {
    format!(
        "Convert the following {from} code to {to}. \
         Reply with only the converted code in one fenced block.\n\n\
         ```{from}\n{code}\n```"
    )
}

fn questions_prompt(topic: &str, count: usize) -> String {
    format!(
        "Generate {count} multiple-choice interview questions about {topic}. \
         Reply with a JSON array of objects with the keys \"question\", \
         \"options\", \"answer\" and \"difficulty\"."
    )
}

fn feedback_prompt(question: &str, answer: &str) -> String {
    format!(
        "You are a technical interviewer. The candidate was asked:\n{question}\n\n\
         They answered:\n{answer}\n\n\
         Give concise feedback: strengths, gaps, and a score out of 10."
    )
}

/// Body of the first fenced block, or the whole text trimmed.
fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[open + 3..];
    // skip the info string (```json, ```rust, ...)
    let body_start = after.find('\n').map_or(after.len(), |i| i + 1);
    let body = &after[body_start..];
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

/// Parse a question list, bare or under a `questions` key, fenced or not.
pub fn parse_questions(reply: &str) -> Result<Vec<Question>, AssistantError> {
    let body = strip_fence(reply);
    if body.is_empty() {
        return Err(AssistantError::EmptyResponse);
    }
    let list: QuestionList = serde_json::from_str(body)?;
    Ok(match list {
        QuestionList::Bare(questions) => questions,
        QuestionList::Wrapped { questions } => questions,
    })
}

/// Replays one fixed reply and remembers the prompts it was given.
#[derive(Debug)]
pub struct CannedCompletion {
    reply: Result<String, String>,
    prompts: RefCell<Vec<String>>,
}

impl CannedCompletion {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    /// A service that always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl CompletionService for CannedCompletion {
    fn complete(&self, prompt: &str) -> Result<String, AssistantError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.reply.clone().map_err(AssistantError::Completion)
    }
}
