use crate::theme::ThemeVariant;
use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fs;

pub const TEMPERATURE_MIN: f32 = 0.0;
pub const TEMPERATURE_MAX: f32 = 2.0;
pub const TEMPERATURE_STEP: f32 = 0.1;

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    ProviderUrl,
    ModelName,
}

/// Payload for the `/update-settings` endpoint. Built fresh from the
/// current control values on every save attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    pub provider_url: String,
    pub model_name: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub theme: ThemeVariant,
    /// Analyzer server the client talks to, e.g. "localhost:8000".
    pub server: String,
    pub provider_url: String,
    pub model_name: String,
    pub temperature: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeVariant::default(),
            server: "localhost:8000".to_string(),
            provider_url: "http://localhost:11434/v1".to_string(),
            model_name: String::new(),
            temperature: 0.7,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // This will create a default config if it doesn't exist
        let figment = Figment::new().merge(Toml::file(CONFIG_PATH));

        match figment.extract() {
            Ok(settings) => Ok(settings),
            Err(_) => {
                let default_settings = Settings::default();
                default_settings.save().unwrap_or_default();
                Ok(default_settings)
            }
        }
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        let toml_string =
            toml::to_string_pretty(self).expect("Failed to serialize settings to TOML");
        fs::write(CONFIG_PATH, toml_string)
    }

    pub fn is_valid(&self) -> Result<(), ValidationError> {
        if self.provider_url.trim().is_empty() {
            return Err(ValidationError::ProviderUrl);
        }
        if self.model_name.trim().is_empty() {
            return Err(ValidationError::ModelName);
        }
        Ok(())
    }

    /// Snapshot of the LLM fields as the settings endpoint payload.
    pub fn llm(&self) -> LlmSettings {
        LlmSettings {
            provider_url: self.provider_url.clone(),
            model_name: self.model_name.clone(),
            temperature: self.temperature,
        }
    }

    /// Moves the temperature slider by `delta`, clamped to its bounds and
    /// snapped back onto the 0.1 grid so repeated nudges stay exact.
    pub fn nudge_temperature(&mut self, delta: f32) {
        let nudged = (self.temperature + delta).clamp(TEMPERATURE_MIN, TEMPERATURE_MAX);
        self.temperature = (nudged * 10.0).round() / 10.0;
    }
}
