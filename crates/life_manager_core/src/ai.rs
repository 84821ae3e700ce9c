//! Suggestions from a local text-generation endpoint.
//!
//! # Responsibility
//! - Talk to an Ollama-compatible `/api/generate` endpoint.
//! - Turn suggestion requests into prompts and fall back to fixed text.
//!
//! # Invariants
//! - Suggestion calls never fail; every generator error is logged and
//!   replaced by the fallback string of that suggestion.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

pub const DAILY_IDEA_FALLBACK: &str = "Could not generate an idea for today";
pub const TASK_ANALYSIS_FALLBACK: &str = "Could not analyze the task";
pub const HABIT_ADVICE_FALLBACK: &str = "Could not get a recommendation";

#[derive(Debug)]
pub enum AiError {
    Transport(reqwest::Error),
    Status(u16),
    /// Body decoded but carried no `response` text.
    EmptyResponse,
}

impl Display for AiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "text generation request failed: {err}"),
            Self::Status(code) => write!(f, "text generation endpoint returned status {code}"),
            Self::EmptyResponse => write!(f, "text generation returned no response text"),
        }
    }
}

impl Error for AiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

pub type AiResult<T> = Result<T, AiError>;

/// Produces text for a prompt.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> AiResult<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Blocking client for Ollama's generate endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// `base_url` is scheme, host and port, e.g. `http://localhost:11434`.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> AiResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

impl TextGenerator for OllamaClient {
    fn generate(&self, prompt: &str) -> AiResult<String> {
        let started_at = Instant::now();
        let response = self
            .http
            .post(self.endpoint())
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response.json()?;
        debug!(
            "event=ai_generate module=ai status=ok model={} duration_ms={}",
            self.model,
            started_at.elapsed().as_millis()
        );
        body.response.ok_or(AiError::EmptyResponse)
    }
}

/// Prompt templates with fixed fallbacks over a [`TextGenerator`].
pub struct SuggestionService<G: TextGenerator> {
    generator: G,
}

impl<G: TextGenerator> SuggestionService<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// One concrete self-improvement idea doable within a day.
    pub fn daily_idea(&self) -> String {
        self.ask(
            "daily_idea",
            "Suggest one interesting self-improvement idea for today. \
             The idea must be concrete and doable within a single day.",
            DAILY_IDEA_FALLBACK,
        )
    }

    pub fn analyze_task(&self, task_description: &str) -> String {
        let prompt = format!(
            "Analyze the following task and suggest an effective way to complete it: \
             {task_description}"
        );
        self.ask("analyze_task", &prompt, TASK_ANALYSIS_FALLBACK)
    }

    pub fn suggest_habit_improvement(&self, habit_name: &str) -> String {
        let prompt = format!(
            "Suggest a way to improve sticking to the following habit: {habit_name}. \
             Give one concrete piece of advice."
        );
        self.ask("habit_advice", &prompt, HABIT_ADVICE_FALLBACK)
    }

    fn ask(&self, kind: &'static str, prompt: &str, fallback: &str) -> String {
        match self.generator.generate(prompt) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("event=ai_suggest module=ai status=fallback kind={kind} error_code=empty_text");
                fallback.to_string()
            }
            Err(err) => {
                warn!("event=ai_suggest module=ai status=fallback kind={kind} error={err}");
                fallback.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AiError, AiResult, OllamaClient, SuggestionService, TextGenerator, DAILY_IDEA_FALLBACK,
        HABIT_ADVICE_FALLBACK, TASK_ANALYSIS_FALLBACK,
    };
    use std::cell::RefCell;
    use std::time::Duration;

    struct Scripted {
        reply: Option<String>,
        prompts: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(reply: Option<&str>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for Scripted {
        fn generate(&self, prompt: &str) -> AiResult<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.reply.clone().ok_or(AiError::Status(500))
        }
    }

    #[test]
    fn generator_text_is_returned_as_is() {
        let service = SuggestionService::new(Scripted::new(Some("Walk 5 km")));
        assert_eq!(service.daily_idea(), "Walk 5 km");
    }

    #[test]
    fn failures_fall_back_per_suggestion_kind() {
        let service = SuggestionService::new(Scripted::new(None));
        assert_eq!(service.daily_idea(), DAILY_IDEA_FALLBACK);
        assert_eq!(service.analyze_task("Pay rent"), TASK_ANALYSIS_FALLBACK);
        assert_eq!(service.suggest_habit_improvement("Run"), HABIT_ADVICE_FALLBACK);
    }

    #[test]
    fn blank_text_counts_as_failure() {
        let service = SuggestionService::new(Scripted::new(Some("  ")));
        assert_eq!(service.analyze_task("x"), TASK_ANALYSIS_FALLBACK);
    }

    #[test]
    fn prompts_embed_the_subject() {
        let service = SuggestionService::new(Scripted::new(Some("ok")));
        service.analyze_task("Renew passport");
        service.suggest_habit_improvement("Morning stretch");

        let prompts = service.generator().prompts.borrow();
        assert!(prompts[0].contains("Renew passport"));
        assert!(prompts[1].contains("Morning stretch"));
    }

    #[test]
    fn client_normalizes_base_url() {
        let client =
            OllamaClient::new("http://localhost:11434/", "llama2", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.endpoint(), "http://localhost:11434/api/generate");
        assert_eq!(client.model(), "llama2");
    }
}
