use anyhow::{Context, Result};
use async_trait::async_trait;

/// Text-completion boundary. The pipeline and advisor only see this trait;
/// auth/network failures propagate through it untouched.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// One-shot completion at the given sampling temperature.
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String>;

    /// Small side-channel judgement call (classification, not generation).
    async fn judge(&self, prompt: &str) -> Result<String>;
}

pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    sub_model: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn from_env() -> Result<Self> {
        let base_url = dotenv::var("LLM_BASE_URL")
            .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string());
        let model = dotenv::var("LLM_MODEL")
            .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());
        let sub_model = dotenv::var("LLM_SUB_MODEL").unwrap_or_else(|_| model.clone());
        let api_key = dotenv::var("LLM_API_KEY").ok().filter(|k| !k.is_empty());

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            model,
            sub_model,
            api_key,
        })
    }

    /// The session credential. Tool-backed actions are skipped when absent.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Resolve the chat completions endpoint from the base URL.
    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }

    async fn chat(&self, prompt: &str, temperature: f32, model: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": temperature,
            "max_tokens": 2048,
        });

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let resp = req.send().await.context("LLM request failed")?;
        let status = resp.status();
        let text = resp.text().await.context("Failed to read LLM response")?;
        if !status.is_success() {
            anyhow::bail!("LLM returned {}: {}", status, text);
        }
        let json: serde_json::Value =
            serde_json::from_str(&text).context("Failed to parse LLM JSON")?;

        // Extract content from choices[0].message.content (handle null)
        let content = json["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .unwrap_or("")
            .to_string();

        Ok(content)
    }
}

#[async_trait]
impl TextCompletion for LlmClient {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String> {
        self.chat(prompt, temperature, &self.model).await
    }

    async fn judge(&self, prompt: &str) -> Result<String> {
        self.chat(prompt, 0.0, &self.sub_model).await
    }
}
