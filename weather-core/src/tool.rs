//! The single tool exposed to the weather agent.

use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::ToolError,
    llm::ToolDefinition,
    model::WeatherReading,
    source::WeatherDataSource,
};

pub const TOOL_NAME: &str = "get-weather-info";

const TOOL_DESCRIPTION: &str = "Get real-time weather for a city: temperature, feels-like \
     temperature, humidity, wind speed, pressure and visibility. Accepts Chinese or English \
     city names.";

/// Arguments the model must supply.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WeatherToolInput {
    /// City to look up, e.g. 北京, 上海, 深圳, New York
    pub city: String,
}

#[derive(Debug, Clone)]
pub struct WeatherTool {
    source: WeatherDataSource,
}

impl WeatherTool {
    pub fn new(source: WeatherDataSource) -> Self {
        Self { source }
    }

    pub fn name(&self) -> &'static str {
        TOOL_NAME
    }

    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    pub fn input_schema(&self) -> Value {
        schema_value(serde_json::to_value(schema_for!(WeatherToolInput)))
    }

    pub fn output_schema(&self) -> Value {
        schema_value(serde_json::to_value(schema_for!(WeatherReading)))
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(self.name(), self.description(), self.input_schema())
    }

    pub async fn execute(&self, city: &str) -> WeatherReading {
        tracing::info!(city, "fetching weather");
        let reading = self.source.fetch(city).await;
        tracing::debug!(city, ?reading, "weather fetched");
        reading
    }

    /// Run the tool from the model's raw JSON argument string.
    pub async fn call(&self, arguments: &str) -> Result<WeatherReading, ToolError> {
        let input: WeatherToolInput = serde_json::from_str(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let city = input.city.trim();
        if city.is_empty() {
            return Err(ToolError::InvalidArguments("city must not be empty".into()));
        }

        Ok(self.execute(city).await)
    }
}

/// Strip the meta keys the chat APIs don't need.
fn schema_value(schema: serde_json::Result<Value>) -> Value {
    let mut value = schema.unwrap_or_else(|_| Value::Object(Default::default()));
    if let Some(obj) = value.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }
    value
}
