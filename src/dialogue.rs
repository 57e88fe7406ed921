//! Dialogue collaborator: one-shot chat exchanges against a local Ollama
//! server.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Conversational interface; each call is a single request/response exchange
/// with no conversation state carried between calls.
pub trait Dialogue {
    fn converse(&self, user_text: &str) -> Result<String>;
}

/// One message in an Ollama chat request.
#[derive(Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body for the Ollama chat endpoint.
#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

/// Response body returned by the Ollama chat endpoint.
#[derive(Deserialize)]
struct OllamaResponse {
    message: ChatMessage,
}

/// Default dialogue implementation backed by Ollama.
pub struct OllamaDialogue {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    system_prompt: String,
}

impl OllamaDialogue {
    /// Creates a dialogue adapter.
    ///
    /// # Arguments
    /// * `endpoint` - Base URL of the Ollama server (e.g. "http://localhost:11434").
    /// * `model` - Model name to chat with (e.g. "llama3.2:3b").
    /// * `system_prompt` - Persona preamble prepended to every exchange.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            system_prompt: system_prompt.into(),
        }
    }

    /// Best-effort startup probe: service responding and model present.
    ///
    /// # Details
    /// Tries to start `ollama serve` when the service is down and to pull the
    /// model when it is missing. Failures here only degrade the Converse
    /// action, so the caller logs and continues.
    ///
    /// # Errors
    /// Returns an error when the service cannot be reached after a start
    /// attempt or the model cannot be downloaded.
    pub fn ensure_ready(&self) -> Result<()> {
        if !self.is_running() {
            eprintln!("Ollama not running, attempting to start...");
            start_service()?;
            std::thread::sleep(Duration::from_secs(3));
            if !self.is_running() {
                anyhow::bail!(
                    "Failed to start Ollama service. Please install Ollama from https://ollama.ai"
                );
            }
        }
        if !self.has_model()? {
            eprintln!("Model {} not found, downloading...", self.model);
            pull_model(&self.model)?;
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.client
            .get(format!("{}/api/tags", self.endpoint))
            .timeout(Duration::from_secs(2))
            .send()
            .is_ok()
    }

    fn has_model(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.endpoint))
            .send()
            .with_context(|| "Failed to query Ollama models")?;
        let json: serde_json::Value = response
            .json()
            .with_context(|| "Failed to parse Ollama response")?;
        if let Some(models) = json["models"].as_array() {
            for model in models {
                if model["name"].as_str() == Some(self.model.as_str()) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl Dialogue for OllamaDialogue {
    fn converse(&self, user_text: &str) -> Result<String> {
        let request = OllamaRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_text.to_string(),
                },
            ],
            stream: false,
        };
        let response = self
            .client
            .post(format!("{}/api/chat", self.endpoint))
            .json(&request)
            .send()
            .with_context(|| "Failed to send request to Ollama")?;
        let reply: OllamaResponse = response
            .json()
            .with_context(|| "Failed to parse Ollama response")?;
        Ok(reply.message.content)
    }
}

/// Spawns `ollama serve` as a detached background process.
fn start_service() -> Result<()> {
    std::process::Command::new("ollama")
        .arg("serve")
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .with_context(|| "Failed to start Ollama. Please install from https://ollama.ai")?;
    Ok(())
}

/// Runs `ollama pull <model>`, showing progress to the user.
fn pull_model(model: &str) -> Result<()> {
    let status = std::process::Command::new("ollama")
        .arg("pull")
        .arg(model)
        .status()
        .with_context(|| "Failed to execute ollama pull")?;
    if !status.success() {
        anyhow::bail!("Failed to download model {}", model);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_one_shot_exchange() {
        let request = OllamaRequest {
            model: "llama3.2:3b".to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "persona".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: "hello there".to_string(),
                },
            ],
            stream: false,
        };
        let json = serde_json::to_string(&request).expect("serialize");
        assert!(json.contains("\"stream\":false"));
        assert!(json.contains("\"role\":\"system\""));
        assert!(json.contains("\"hello there\""));
    }

    #[test]
    fn response_deserializes_reply_text() {
        let raw = r#"{"message":{"role":"assistant","content":"All quiet on the subnet."}}"#;
        let response: OllamaResponse = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(response.message.content, "All quiet on the subnet.");
    }
}
