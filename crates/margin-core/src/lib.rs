//! # Margin Core Library
//!
//! This crate provides the core functionality for the Margin TUI client.
//! It contains the configuration layer, the HTTP client for the analyzer
//! server and the report data structures, independent of any specific
//! user interface.
//!
//! ## Modules
//!
//! - `client`: HTTP client for the analyzer server's endpoints
//! - `report`: Metrics input and analysis report types
//! - `settings`: Application configuration management
//! - `theme`: UI theming system

pub mod client;
pub mod report;
pub mod settings;
pub mod theme;

#[cfg(test)]
mod tests {
    use crate::report::{AnalysisReport, MetricsInput};
    use crate::settings::{Settings, ValidationError, TEMPERATURE_MAX, TEMPERATURE_MIN};
    use crate::theme::ThemeVariant;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.theme, ThemeVariant::EverforestDark);
        assert_eq!(settings.server, "localhost:8000");
        assert!(settings.model_name.is_empty());
        assert!((settings.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();

        // Default settings should fail validation (no model selected yet)
        assert_eq!(settings.is_valid(), Err(ValidationError::ModelName));

        settings.model_name = "llama3.2".to_string();
        assert_eq!(settings.is_valid(), Ok(()));

        settings.provider_url = "  ".to_string();
        assert_eq!(settings.is_valid(), Err(ValidationError::ProviderUrl));
    }

    #[test]
    fn test_temperature_nudging_clamps() {
        let mut settings = Settings::default();

        settings.temperature = TEMPERATURE_MAX;
        settings.nudge_temperature(0.1);
        assert!((settings.temperature - TEMPERATURE_MAX).abs() < f32::EPSILON);

        settings.temperature = TEMPERATURE_MIN;
        settings.nudge_temperature(-0.1);
        assert!((settings.temperature - TEMPERATURE_MIN).abs() < f32::EPSILON);

        settings.temperature = 0.7;
        settings.nudge_temperature(0.1);
        assert!((settings.temperature - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_settings_toml_round_trip() {
        let mut settings = Settings::default();
        settings.model_name = "qwen2.5".to_string();
        settings.temperature = 1.3;

        let toml_string = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_string).unwrap();

        assert_eq!(parsed.model_name, "qwen2.5");
        assert_eq!(parsed.server, settings.server);
        assert!((parsed.temperature - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_llm_payload_snapshot() {
        let mut settings = Settings::default();
        settings.provider_url = "https://api.example.com/v1".to_string();
        settings.model_name = "gpt-4o-mini".to_string();
        settings.temperature = 0.2;

        let payload = settings.llm();
        assert_eq!(payload.provider_url, "https://api.example.com/v1");
        assert_eq!(payload.model_name, "gpt-4o-mini");
        assert!((payload.temperature - 0.2).abs() < f32::EPSILON);

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("provider_url").is_some());
        assert!(json.get("model_name").is_some());
        assert!(json.get("temperature").is_some());
    }

    #[test]
    fn test_metrics_summary_layout() {
        let input = MetricsInput {
            daily_revenue: "100".to_string(),
            daily_cost: "40".to_string(),
            daily_customers: "10".to_string(),
            prev_revenue: "90".to_string(),
            prev_cost: "45".to_string(),
            prev_customers: "9".to_string(),
        };

        let summary = input.summary();
        assert!(summary.contains("Today:\n- Revenue: $100, Cost: $40, Customers: 10"));
        assert!(summary.contains("Previous Day:\n- Revenue: $90, Cost: $45, Customers: 9"));
        // Two paragraphs separated by a blank line
        assert_eq!(summary.matches("\n\n").count(), 1);
    }

    #[test]
    fn test_report_optional_lists_default_empty() {
        let report: AnalysisReport =
            serde_json::from_str(r#"{"profit_loss_status": "Profitable"}"#).unwrap();

        assert_eq!(report.profit_loss_status, "Profitable");
        assert!(report.alerts_or_warnings.is_empty());
        assert!(report.decision_making_recommendations.is_empty());
    }

    #[test]
    fn test_report_full_deserialization() {
        let json = r#"{
            "profit_loss_status": "Loss",
            "alerts_or_warnings": ["Profit is negative: $-5.0."],
            "decision_making_recommendations": [
                "Reduce costs or find ways to increase revenue."
            ]
        }"#;
        let report: AnalysisReport = serde_json::from_str(json).unwrap();

        assert_eq!(report.profit_loss_status, "Loss");
        assert_eq!(report.alerts_or_warnings.len(), 1);
        assert_eq!(
            report.decision_making_recommendations[0],
            "Reduce costs or find ways to increase revenue."
        );
    }
}
