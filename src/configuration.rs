use serde;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub app_port: u16,
    pub app_host: String,
    pub auth_url: String,
    #[serde(default)]
    pub responder: ResponderSettings,
    #[serde(default)]
    pub chat_model: ChatModelSettings,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database_name: String,
}

/// Tuning knobs of the response heuristic. None of the cut-offs has a
/// documented derivation, so all of them stay overridable.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ResponderSettings {
    #[serde(default = "default_knowledge_base_path")]
    pub knowledge_base_path: String,
    /// A matching pattern above this ratio is answered verbatim.
    #[serde(default = "default_pattern_success_threshold")]
    pub pattern_success_threshold: f64,
    /// Patterns above this ratio may lend their opening phrase.
    #[serde(default = "default_enhancement_threshold")]
    pub enhancement_threshold: f64,
    #[serde(default = "default_knowledge_base_min_overlap")]
    pub knowledge_base_min_overlap: f64,
    #[serde(default = "default_pattern_match_limit")]
    pub pattern_match_limit: i64,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ChatModelSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_chat_model_timeout")]
    pub timeout_secs: u64,
}

fn default_knowledge_base_path() -> String {
    "data/knowledge_base.json".to_string()
}

fn default_pattern_success_threshold() -> f64 {
    0.7
}

fn default_enhancement_threshold() -> f64 {
    0.6
}

fn default_knowledge_base_min_overlap() -> f64 {
    0.5
}

fn default_pattern_match_limit() -> i64 {
    5
}

fn default_chat_model_timeout() -> u64 {
    10
}

impl Default for ResponderSettings {
    fn default() -> Self {
        Self {
            knowledge_base_path: default_knowledge_base_path(),
            pattern_success_threshold: default_pattern_success_threshold(),
            enhancement_threshold: default_enhancement_threshold(),
            knowledge_base_min_overlap: default_knowledge_base_min_overlap(),
            pattern_match_limit: default_pattern_match_limit(),
        }
    }
}

impl Default for ChatModelSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            timeout_secs: default_chat_model_timeout(),
        }
    }
}

impl DatabaseSettings {
    // Connection string: postgresql://<username>:<password>@<host>:<port>/<database_name>
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name,
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port,
        )
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // configuration.yaml first, then APP__DATABASE__HOST style overrides
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration"))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
