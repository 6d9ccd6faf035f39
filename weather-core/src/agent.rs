//! The weather assistant: a chat model bound to [`WeatherTool`].

use std::sync::Arc;

use serde_json::json;

use crate::{
    error::{AgentError, ToolError},
    llm::{ChatModel, ChatRequest, Message, ToolCall},
    model::{AgentReply, WeatherReading},
    tool::WeatherTool,
};

pub const AGENT_NAME: &str = "weather-agent";

pub const DEFAULT_MAX_STEPS: usize = 5;

pub const INSTRUCTIONS: &str = "\
You are a professional, friendly weather assistant.

Capabilities:
- Report current weather conditions for a city using the get-weather-info tool.
- Give practical advice on clothing, travel and health based on the weather.
- Understand Chinese and English city names.

Reply rules:
1. Be concise and easy to read on a phone; keep replies under 200 words.
2. Use a clear structure, a few fitting emoji, and bold for key figures.
3. Reply in the language the user wrote in (Chinese or English).
4. Stay warm and professional.

Limits:
- Only describe current conditions; never forecast future weather.
- If a city does not exist, say so politely and suggest alternatives.
- Stay on the topic of weather.";

#[derive(Debug, Clone)]
pub struct WeatherAgent {
    model: Arc<dyn ChatModel>,
    tool: WeatherTool,
    max_steps: usize,
}

impl WeatherAgent {
    pub fn new(model: Arc<dyn ChatModel>, tool: WeatherTool) -> Self {
        Self {
            model,
            tool,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn name(&self) -> &'static str {
        AGENT_NAME
    }

    /// Answer a free-text query. The model decides whether to call the tool;
    /// the last reading it produced is returned alongside the prose.
    pub async fn generate(&self, query: &str) -> Result<AgentReply, AgentError> {
        let mut request = ChatRequest {
            messages: vec![Message::system(INSTRUCTIONS), Message::user(query)],
            tools: vec![self.tool.definition()],
        };
        let mut reading = None;

        for step in 1..=self.max_steps {
            tracing::debug!(agent = AGENT_NAME, model = self.model.name(), step, "calling model");
            let reply = self.model.complete(&request).await?;

            if reply.tool_calls.is_empty() {
                return Ok(AgentReply {
                    text: reply.content.unwrap_or_default(),
                    reading,
                });
            }

            let calls = reply.tool_calls.clone();
            request.messages.push(reply);

            for call in &calls {
                let output = match self.run_tool(call).await {
                    Ok(r) => {
                        let value = serde_json::to_string(&r).unwrap_or_default();
                        reading = Some(r);
                        value
                    }
                    Err(err) => {
                        tracing::warn!(tool = %call.function.name, error = %err, "tool call rejected");
                        json!({ "error": err.to_string() }).to_string()
                    }
                };
                request.messages.push(Message::tool_result(&call.id, output));
            }
        }

        Err(AgentError::StepLimit(self.max_steps))
    }

    async fn run_tool(&self, call: &ToolCall) -> Result<WeatherReading, ToolError> {
        if call.function.name != self.tool.name() {
            return Err(ToolError::UnknownTool(call.function.name.clone()));
        }
        self.tool.call(&call.function.arguments).await
    }
}
