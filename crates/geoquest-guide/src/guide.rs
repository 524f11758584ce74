use geoquest_core::GuideContext;

use crate::client::GeminiClient;
use crate::prompt::build_prompt;

/// Answers player questions; never fails.
pub struct Guide {
    client: GeminiClient,
}

impl Guide {
    #[must_use]
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Asks the model about the secret location. Errors are logged and
    /// replaced with an in-character reply.
    pub async fn ask(&self, question: &str, context: &GuideContext) -> String {
        let prompt = build_prompt(question, context);
        match self.client.generate(&prompt).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(model = self.client.model(), error = %err, "guide request failed");
                err.fallback_reply()
            }
        }
    }
}
