use std::path::{Path, PathBuf};

use clap::Parser;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Command line and environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "recipe-scout", version, about = "Recipes, photos and videos for any dish")]
pub struct Cli {
    /// Gemini API key used for recipe generation.
    #[arg(long, env = "GOOGLE_GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    /// Google API key used for the Custom Search image lookup.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: String,

    /// Programmable Search Engine id (the `cx` parameter).
    #[arg(long, env = "SEARCH_ENGINE_ID")]
    pub search_engine_id: String,

    /// YouTube Data API key.
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: String,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// File that receives diagnostic logs while the terminal UI is running.
    #[arg(long, default_value = "recipe-scout.log")]
    pub log_file: PathBuf,

    /// Prefill the dish name input.
    #[arg(long)]
    pub dish: Option<String>,

    /// Override the Gemini API host, e.g. for a proxy.
    #[arg(long, env = "GEMINI_BASE_URL", hide = true)]
    pub gemini_base_url: Option<String>,

    #[arg(long, env = "CUSTOM_SEARCH_BASE_URL", hide = true)]
    pub custom_search_base_url: Option<String>,

    #[arg(long, env = "YOUTUBE_BASE_URL", hide = true)]
    pub youtube_base_url: Option<String>,
}

impl Cli {
    /// Parses the command line after loading `.env` from the working directory, if any.
    /// Variables already set in the environment win over the file.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::parse()
    }
}

/// Base URLs of the remote services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub gemini: String,
    pub custom_search: String,
    pub youtube: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            gemini: "https://generativelanguage.googleapis.com".to_string(),
            custom_search: "https://www.googleapis.com".to_string(),
            youtube: "https://www.googleapis.com".to_string(),
        }
    }
}

/// Static configuration used throughout the application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    gemini_api_key: String,
    google_api_key: String,
    search_engine_id: String,
    youtube_api_key: String,
    model: String,
    log_file: PathBuf,
    initial_dish: Option<String>,
    endpoints: Endpoints,
    user_agent: String,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        let user_agent = format!("recipe-scout/{}", env!("CARGO_PKG_VERSION"));

        let defaults = Endpoints::default();
        let endpoints = Endpoints {
            gemini: base_url(cli.gemini_base_url, defaults.gemini),
            custom_search: base_url(cli.custom_search_base_url, defaults.custom_search),
            youtube: base_url(cli.youtube_base_url, defaults.youtube),
        };

        Self {
            gemini_api_key: cli.gemini_api_key,
            google_api_key: cli.google_api_key,
            search_engine_id: cli.search_engine_id,
            youtube_api_key: cli.youtube_api_key,
            model: cli.model,
            log_file: cli.log_file,
            initial_dish: cli.dish.filter(|dish| !dish.trim().is_empty()),
            endpoints,
            user_agent,
        }
    }
}

fn base_url(value: Option<String>, default: String) -> String {
    value
        .map(|url| url.trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn gemini_api_key(&self) -> &str {
        &self.gemini_api_key
    }

    pub fn google_api_key(&self) -> &str {
        &self.google_api_key
    }

    pub fn search_engine_id(&self) -> &str {
        &self.search_engine_id
    }

    pub fn youtube_api_key(&self) -> &str {
        &self.youtube_api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    pub fn initial_dish(&self) -> Option<&str> {
        self.initial_dish.as_deref()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(test)]
pub(crate) fn test_cli() -> Cli {
    Cli {
        gemini_api_key: "gemini-key".to_string(),
        google_api_key: "google-key".to_string(),
        search_engine_id: "engine-id".to_string(),
        youtube_api_key: "youtube-key".to_string(),
        model: DEFAULT_MODEL.to_string(),
        log_file: PathBuf::from("test.log"),
        dish: None,
        gemini_base_url: None,
        custom_search_base_url: None,
        youtube_base_url: None,
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig::from(test_cli())
}
