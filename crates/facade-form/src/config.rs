//! Client timing and endpoint configuration
//!
//! Every field has a default, so an empty object (or no object at all) gives
//! the stock behavior of the page.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Prefix for every backend path (default: same origin)
    #[serde(default)]
    pub api_base: String,
    /// Period of the figure poll (default: 10000)
    #[serde(default = "default_figure_refresh_interval_ms")]
    pub figure_refresh_interval_ms: u32,
    /// Delay before the first figure check after start (default: 1000)
    #[serde(default = "default_initial_figure_check_delay_ms")]
    pub initial_figure_check_delay_ms: u32,
    /// Delay before the periodic poll starts (default: 2000)
    #[serde(default = "default_auto_refresh_start_delay_ms")]
    pub auto_refresh_start_delay_ms: u32,
    /// Delay before generate/report buttons come back after a report (default: 900)
    #[serde(default = "default_controls_reenable_delay_ms")]
    pub controls_reenable_delay_ms: u32,
    /// Minimum time the figure spinner stays up on success (default: 600)
    #[serde(default = "default_figure_spinner_min_ms")]
    pub figure_spinner_min_ms: u32,
    /// Minimum time the figure spinner stays up on failure (default: 1000)
    #[serde(default = "default_figure_spinner_error_min_ms")]
    pub figure_spinner_error_min_ms: u32,
}

fn default_figure_refresh_interval_ms() -> u32 {
    10_000
}

fn default_initial_figure_check_delay_ms() -> u32 {
    1_000
}

fn default_auto_refresh_start_delay_ms() -> u32 {
    2_000
}

fn default_controls_reenable_delay_ms() -> u32 {
    900
}

fn default_figure_spinner_min_ms() -> u32 {
    600
}

fn default_figure_spinner_error_min_ms() -> u32 {
    1_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            figure_refresh_interval_ms: default_figure_refresh_interval_ms(),
            initial_figure_check_delay_ms: default_initial_figure_check_delay_ms(),
            auto_refresh_start_delay_ms: default_auto_refresh_start_delay_ms(),
            controls_reenable_delay_ms: default_controls_reenable_delay_ms(),
            figure_spinner_min_ms: default_figure_spinner_min_ms(),
            figure_spinner_error_min_ms: default_figure_spinner_error_min_ms(),
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Full URL for a backend path such as `/check_figures`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    /// How much longer the figure spinner must stay visible after a check
    /// that took `elapsed_ms`.
    pub fn spinner_remaining_ms(&self, elapsed_ms: f64, success: bool) -> u32 {
        let min = if success {
            self.figure_spinner_min_ms
        } else {
            self.figure_spinner_error_min_ms
        };
        let remaining = f64::from(min) - elapsed_ms.max(0.0);
        if remaining > 0.0 {
            remaining.ceil() as u32
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = ClientConfig::from_json("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.figure_refresh_interval_ms, 10_000);
        assert_eq!(config.controls_reenable_delay_ms, 900);
    }

    #[test]
    fn test_partial_override() {
        let config =
            ClientConfig::from_json(r#"{"api_base": "http://localhost:5000/", "figure_spinner_min_ms": 0}"#)
                .unwrap();
        assert_eq!(config.url("/check_figures"), "http://localhost:5000/check_figures");
        assert_eq!(config.figure_spinner_min_ms, 0);
        assert_eq!(config.figure_spinner_error_min_ms, 1_000);
    }

    #[test]
    fn test_spinner_remaining() {
        let config = ClientConfig::default();
        assert_eq!(config.spinner_remaining_ms(200.0, true), 400);
        assert_eq!(config.spinner_remaining_ms(200.0, false), 800);
        assert_eq!(config.spinner_remaining_ms(1500.0, false), 0);
    }

    #[test]
    fn test_same_origin_url() {
        assert_eq!(ClientConfig::default().url("/get_inputs_dir"), "/get_inputs_dir");
    }
}
