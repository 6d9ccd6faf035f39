use std::sync::Arc;

use weather_core::{
    ChatModel, Config, OpenAiChatModel, WeatherAgent, WeatherDataSource, WeatherTool,
};

use crate::error::ApiError;

/// Shared, immutable per-process state.
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
    model: Option<Arc<dyn ChatModel>>,
    source: WeatherDataSource,
}

impl AppState {
    /// Wire the OpenAI backend and weather source from configuration. A
    /// missing model key is not an error here; weather endpoints report it.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let model = OpenAiChatModel::from_config(&config.model)?
            .map(|m| Arc::new(m) as Arc<dyn ChatModel>);

        Self::build(config, model)
    }

    /// Use a caller-supplied chat model.
    pub fn with_model(config: Config, model: Arc<dyn ChatModel>) -> anyhow::Result<Self> {
        Self::build(config, Some(model))
    }

    fn build(config: Config, model: Option<Arc<dyn ChatModel>>) -> anyhow::Result<Self> {
        let source = WeatherDataSource::from_config(&config)?;

        Ok(Self {
            config: Arc::new(config),
            model,
            source,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source(&self) -> &WeatherDataSource {
        &self.source
    }

    /// A fresh agent for one request.
    pub fn agent(&self) -> Result<WeatherAgent, ApiError> {
        let model = match (&self.model, self.config.model_api_key()) {
            (Some(model), Some(_)) => model.clone(),
            _ => return Err(ApiError::missing_model_key()),
        };

        let tool = WeatherTool::new(self.source.clone());
        Ok(WeatherAgent::new(model, tool).with_max_steps(self.config.model.max_steps))
    }
}
