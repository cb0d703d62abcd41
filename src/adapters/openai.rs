//! Coaching assistant backed by an OpenAI-compatible chat-completions API.
//!
//! Every call asks for a JSON object and decodes it into the domain type,
//! so the model's output is validated by serde before anything sees it.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Assistant, AssistantError};
use crate::domain::{
    ModerationVerdict, MotivationalTip, PlayerProfile, ProgressRecord, TipCategory,
    TrainingSuggestion,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const COACH_PROMPT: &str = "You are a supportive soccer coach for players aged 35 and older. \
Prioritize injury prevention, recovery and steady progress. Always answer with a single JSON object.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct Insights {
    insights: Vec<String>,
}

/// Chat-completions client for coaching prompts
pub struct OpenAiAssistant {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiAssistant {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at a proxy or compatible server
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Give up on requests that take longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, AssistantError> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Send one prompt and decode the JSON object the model returns
    async fn ask<T: DeserializeOwned>(&self, prompt: String) -> Result<T, AssistantError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage::system(COACH_PROMPT), ChatMessage::user(prompt)],
            response_format: ResponseFormat { kind: "json_object" },
            temperature: 0.7,
        };

        debug!(model = %self.model, "Sending chat completion");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AssistantError::EmptyResponse)?;

        Ok(serde_json::from_str(&content)?)
    }
}

fn suggestion_prompt(profile: &PlayerProfile) -> String {
    let sessions: Vec<String> = profile
        .recent_sessions
        .iter()
        .map(|s| {
            format!(
                "{} min at intensity {} (drills: {})",
                s.duration_minutes,
                s.intensity.level(),
                s.drill_ids.join(", ")
            )
        })
        .collect();

    format!(
        "Player age: {}\nSkill levels (0-100): {:?}\nRecent sessions: {:?}\nInjuries: {:?}\n\n\
         Suggest today's training. Respond as JSON with keys \"suggestion\" (string), \
         \"reasoning\" (string), \"intensity\" (integer 1-5) and \"focus_areas\" (array of strings).",
        profile.age, profile.skill_levels, sessions, profile.injuries
    )
}

fn tip_prompt(preferences: &[TipCategory]) -> String {
    let wanted = if preferences.is_empty() {
        "any of motivation, technique, recovery, nutrition".to_string()
    } else {
        preferences
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Give one short motivational tip about {}. Respond as JSON with keys \"message\" (string) \
         and \"category\" (one of \"motivation\", \"technique\", \"recovery\", \"nutrition\").",
        wanted
    )
}

fn analysis_prompt(records: &[ProgressRecord]) -> Result<String, AssistantError> {
    Ok(format!(
        "Progress history (newest first):\n{}\n\n\
         Give up to three short, encouraging observations. Respond as JSON with key \
         \"insights\" (array of strings).",
        serde_json::to_string_pretty(records)?
    ))
}

fn moderation_prompt(content: &str) -> String {
    format!(
        "Review this community forum post for offensive, harmful or inappropriate content:\n\n{}\n\n\
         Respond as JSON with keys \"is_appropriate\" (boolean) and \"reason\" (string, only when \
         not appropriate).",
        content
    )
}

#[async_trait]
impl Assistant for OpenAiAssistant {
    fn name(&self) -> &str {
        "openai"
    }

    async fn training_suggestion(
        &self,
        profile: &PlayerProfile,
    ) -> Result<TrainingSuggestion, AssistantError> {
        self.ask(suggestion_prompt(profile)).await
    }

    async fn motivational_tip(
        &self,
        preferences: &[TipCategory],
    ) -> Result<MotivationalTip, AssistantError> {
        self.ask(tip_prompt(preferences)).await
    }

    async fn analyze_performance(
        &self,
        records: &[ProgressRecord],
    ) -> Result<Vec<String>, AssistantError> {
        let prompt = analysis_prompt(records)?;
        let insights: Insights = self.ask(prompt).await?;
        Ok(insights.insights)
    }

    async fn moderate(&self, content: &str) -> Result<ModerationVerdict, AssistantError> {
        self.ask(moderation_prompt(content)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url() {
        let assistant = OpenAiAssistant::new("KEY").with_base_url("http://localhost:8080/v1/");
        assert_eq!(
            assistant.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(assistant.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_request_serializes_json_mode() {
        let request = ChatRequest {
            model: "gpt-4o",
            messages: vec![ChatMessage::user("hi")],
            response_format: ResponseFormat { kind: "json_object" },
            temperature: 0.7,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][0]["role"], "user");
    }

    #[test]
    fn test_tip_prompt_lists_preferences() {
        let prompt = tip_prompt(&[TipCategory::Recovery, TipCategory::Nutrition]);
        assert!(prompt.contains("recovery, nutrition"));
    }

    #[test]
    fn test_model_output_decodes_into_domain_types() {
        let tip: MotivationalTip =
            serde_json::from_str(r#"{"message": "Stretch daily", "category": "recovery"}"#)
                .unwrap();
        assert_eq!(tip.category, TipCategory::Recovery);

        let verdict: ModerationVerdict =
            serde_json::from_str(r#"{"is_appropriate": false, "reason": "insult"}"#).unwrap();
        assert!(!verdict.is_appropriate);
    }

    #[tokio::test]
    async fn test_unreachable_api_is_http_error() {
        let assistant = OpenAiAssistant::new("KEY").with_base_url("http://127.0.0.1:9/v1");
        let err = assistant.moderate("hello").await.unwrap_err();
        assert!(matches!(err, AssistantError::Http(_)));
    }
}
