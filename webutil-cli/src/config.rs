#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Output rendering, text by default.
    pub output: OutputFormat,
    /// `EnvFilter` directives for the stderr logger, "warn" by default.
    pub log_filter: String,
    /// Host `is-safe-url` accepts for absolute URLs; unset means only relative URLs pass.
    pub allowed_host: Option<String>,
    /// Expand sequences in `urlencode` even without `--doseq`. Off by default.
    pub doseq: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputFormat::Text,
            log_filter: "warn".to_string(),
            allowed_host: None,
            doseq: false,
        }
    }
}

impl Config {
    /// - WEBUTIL_OUTPUT (text|json, default text)
    /// - WEBUTIL_LOG (tracing filter, default "warn")
    /// - WEBUTIL_ALLOWED_HOST (optional)
    /// - WEBUTIL_DOSEQ (bool, default false)
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        cfg.output = match std::env::var("WEBUTIL_OUTPUT") {
            Ok(v) if v.trim().eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => cfg.output,
        };

        if let Ok(filter) = std::env::var("WEBUTIL_LOG") {
            if !filter.trim().is_empty() {
                cfg.log_filter = filter.trim().to_string();
            }
        }

        cfg.allowed_host = std::env::var("WEBUTIL_ALLOWED_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        cfg.doseq = parse_env_bool("WEBUTIL_DOSEQ", cfg.doseq);

        cfg
    }
}

fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => {
            let s = v.trim().to_ascii_lowercase();
            matches!(s.as_str(), "1" | "true" | "yes" | "on")
        }
        Err(_) => default,
    }
}
