use serde::{Deserialize, Serialize};

/// A session window in New York local time, `(hour, minute)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTime {
    pub name: String,
    pub start: (u32, u32),
    pub end: (u32, u32),
    pub killzone: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Model endpoint
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub analysis_model: String,
    pub fast_model: String,
    pub thinking_budget: u32,
    pub request_timeout_secs: u64,

    // Sessions, checked in order; first window containing the time wins
    pub sessions: Vec<SessionTime>,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            gemini_api_key: env("GEMINI_API_KEY", ""),
            gemini_base_url: env(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            analysis_model: env("ANALYSIS_MODEL", "gemini-3-pro-preview"),
            fast_model: env("FAST_MODEL", "gemini-3-flash-preview"),
            thinking_budget: env("THINKING_BUDGET", "32768").parse().unwrap_or(32768),
            request_timeout_secs: env("REQUEST_TIMEOUT_SECS", "120").parse().unwrap_or(120),
            sessions: default_sessions(),
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }
}

pub fn default_sessions() -> Vec<SessionTime> {
    let window = |name: &str, start: (u32, u32), end: (u32, u32), killzone: bool| SessionTime {
        name: name.to_string(),
        start,
        end,
        killzone,
    };

    vec![
        window("ASIA", (20, 0), (0, 0), false),
        window("LONDON", (2, 0), (5, 0), true),
        window("NY", (7, 0), (10, 0), true),
        window("LONDON_CLOSE", (10, 0), (12, 0), false),
        window("PM_SESSION", (14, 0), (20, 0), false),
    ]
}
