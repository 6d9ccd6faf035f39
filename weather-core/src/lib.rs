//! Core library for the weather agent service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Weather providers and the fault-tolerant data source
//! - The `get-weather-info` tool and the chat-model-backed agent
//! - Shared domain models (queries, readings, replies)
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod model;
pub mod provider;
pub mod source;
pub mod tool;

pub use agent::WeatherAgent;
pub use config::{Config, Environment, ModelConfig, ProviderConfig};
pub use error::{AgentError, ModelError, ToolError};
pub use llm::{ChatModel, OpenAiChatModel};
pub use model::{AgentReply, Language, WeatherQuery, WeatherReading};
pub use provider::{ProviderId, WeatherProvider};
pub use source::WeatherDataSource;
pub use tool::WeatherTool;
