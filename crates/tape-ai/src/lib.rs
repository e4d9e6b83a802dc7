use std::sync::Arc;

use async_trait::async_trait;

pub mod gemini;

pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};

/// Wraps a free-text request in the fixed code-generation instructions.
pub fn instruction_prompt(user_prompt: &str) -> String {
    format!(
        r#"You are an expert Three.js developer. Generate ONLY JavaScript code to create a 3D object.

REQUIREMENTS:
- The final object/group MUST be assigned to a variable named 'object'
- Add an 'animate' function to 'object.userData' for smooth animation
- Use appropriate Three.js geometries, materials, and groups
- Include realistic materials with proper metalness, roughness, and color
- Add shadows with 'castShadow = true' and 'receiveShadow = true'
- Create interesting animations (rotation, scaling, position changes)
- Use advanced materials like MeshStandardMaterial or MeshPhysicalMaterial

DO NOT INCLUDE:
- Scene, camera, renderer, or lighting setup
- Import statements or external dependencies
- Markdown backticks or code blocks
- Comments or explanations

User request: "{user_prompt}"

Generate the code:
"#
    )
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model returned no text")]
    EmptyResponse,
}

/// Text-in, text-out generative model collaborator.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_content(&self, prompt: &str) -> Result<String, ModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Prompt is required")]
    MissingPrompt,
    #[error("Gemini API not configured")]
    NotConfigured,
    #[error("Generation failed: {0}")]
    Upstream(#[from] ModelError),
}

/// Forwards prompts to the configured model. Holds no per-request state;
/// share it behind an `Arc`.
#[derive(Clone, Default)]
pub struct Gateway {
    model: Option<Arc<dyn GenerativeModel>>,
}

impl Gateway {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn unconfigured() -> Self {
        Self { model: None }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// Returns the model's raw reply. The reply is not checked against the
    /// snippet contract.
    pub async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        if prompt.is_empty() {
            return Err(GatewayError::MissingPrompt);
        }
        let model = self.model.as_ref().ok_or(GatewayError::NotConfigured)?;
        let reply = model.generate_content(&instruction_prompt(prompt)).await?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::{Gateway, GatewayError, GenerativeModel, ModelError, instruction_prompt};

    #[derive(Default)]
    struct RecordingModel {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GenerativeModel for RecordingModel {
        async fn generate_content(&self, prompt: &str) -> Result<String, ModelError> {
            self.prompts
                .lock()
                .expect("prompt log lock")
                .push(prompt.to_string());
            self.reply.clone().ok_or(ModelError::EmptyResponse)
        }
    }

    #[test]
    fn instruction_prompt_carries_constraints_and_request() {
        let prompt = instruction_prompt("a spinning golden sphere");
        assert!(prompt.contains("expert Three.js developer"));
        assert!(prompt.contains("assigned to a variable named 'object'"));
        assert!(prompt.contains("'object.userData'"));
        assert!(prompt.contains("Scene, camera, renderer, or lighting setup"));
        assert!(prompt.contains("Import statements"));
        assert!(prompt.contains("Markdown backticks"));
        assert!(prompt.contains("Comments or explanations"));
        assert!(prompt.contains("User request: \"a spinning golden sphere\""));
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_before_configuration() {
        let err = Gateway::unconfigured()
            .generate("")
            .await
            .expect_err("empty prompt should fail");
        assert!(matches!(err, GatewayError::MissingPrompt));
    }

    #[tokio::test]
    async fn unconfigured_gateway_reports_configuration_error() {
        let gateway = Gateway::unconfigured();
        assert!(!gateway.is_configured());
        let err = gateway
            .generate("a red cube")
            .await
            .expect_err("missing model should fail");
        assert!(matches!(err, GatewayError::NotConfigured));
        assert_eq!(err.to_string(), "Gemini API not configured");
    }

    #[tokio::test]
    async fn reply_is_relayed_verbatim() {
        let model = Arc::new(RecordingModel {
            reply: Some("```js\nnot even code\n```".to_string()),
            ..RecordingModel::default()
        });
        let gateway = Gateway::new(model.clone());

        let reply = gateway.generate("a red cube").await.expect("model replies");
        assert_eq!(reply, "```js\nnot even code\n```");

        let prompts = model.prompts.lock().expect("prompt log lock");
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], instruction_prompt("a red cube"));
    }

    #[tokio::test]
    async fn model_failure_surfaces_as_upstream_error() {
        let gateway = Gateway::new(Arc::new(RecordingModel::default()));
        let err = gateway
            .generate("a red cube")
            .await
            .expect_err("model failure should propagate");
        assert!(matches!(err, GatewayError::Upstream(ModelError::EmptyResponse)));
        assert!(err.to_string().starts_with("Generation failed: "));
    }
}
