//! Configuration loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::{Uncased, UncasedStr},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["llm-panel.toml", ".llm-panel.toml"];
const BACKENDS: [&str; 4] = ["openai", "anthropic", "google", "perplexity"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        // Add global config (XDG or fallback)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        // Add explicit config path (highest priority for files)
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Self::env()).extract().map_err(Box::new)
    }

    /// Load defaults plus environment variables, ignoring config files (for --no-config)
    pub fn load_env_only() -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Self::env())
            .extract()
            .map_err(Box::new)
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("llm-panel").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    fn env() -> Env {
        Env::raw().filter_map(env_key)
    }
}

/// Map a recognised environment variable onto its config key.
fn env_key(key: &UncasedStr) -> Option<Uncased<'_>> {
    let key = key.as_str().to_ascii_lowercase();

    let server_field = match key.as_str() {
        "log_level" => Some("log_level"),
        "cache_ttl" => Some("cache_ttl"),
        "max_retries" => Some("max_retries"),
        "timeout" => Some("timeout_ms"),
        "enable_streaming" => Some("enable_streaming"),
        _ => None,
    };
    if let Some(field) = server_field {
        return Some(format!("server.{}", field).into());
    }

    let (backend, field) = key.split_once('_')?;
    if !BACKENDS.contains(&backend) {
        return None;
    }
    match field {
        "api_key" | "model" | "temperature" | "max_tokens" | "base_url" => {
            Some(format!("providers.{}.{}", backend, field).into())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;

    #[test]
    fn test_env_key_mapping() {
        let map = |key: &str| env_key(UncasedStr::new(key)).map(|k| k.to_string());

        assert_eq!(map("OPENAI_API_KEY").as_deref(), Some("providers.openai.api_key"));
        assert_eq!(
            map("ANTHROPIC_MAX_TOKENS").as_deref(),
            Some("providers.anthropic.max_tokens")
        );
        assert_eq!(map("TIMEOUT").as_deref(), Some("server.timeout_ms"));
        assert_eq!(map("CACHE_TTL").as_deref(), Some("server.cache_ttl"));
        assert_eq!(map("OPENAI_ORG"), None);
        assert_eq!(map("AZURE_API_KEY"), None);
        assert_eq!(map("PATH"), None);
    }

    #[test]
    fn test_explicit_file_is_merged_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[providers.google]\nmodel = \"gemini-2.5-flash\"\n\n[server]\nmax_retries = 5"
        )
        .unwrap();

        let config = ConfigLoader::load(Some(file.path())).unwrap();
        assert_eq!(
            config.providers.google.model.as_deref(),
            Some("gemini-2.5-flash")
        );
        assert_eq!(config.server.max_retries, 5);
        assert_eq!(config.server.cache_ttl, 3600);
    }

    #[test]
    fn test_env_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "llm-panel.toml",
                r#"
                [providers.openai]
                api_key = "from-file"
                model = "gpt-5-mini"

                [server]
                cache_ttl = 10
                "#,
            )?;
            jail.set_env("OPENAI_API_KEY", "from-env");
            jail.set_env("CACHE_TTL", "120");
            jail.set_env("ENABLE_STREAMING", "false");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.providers.openai.credential(), Some("from-env"));
            assert_eq!(config.providers.openai.model.as_deref(), Some("gpt-5-mini"));
            assert_eq!(config.server.cache_ttl, 120);
            assert!(!config.server.enable_streaming);
            Ok(())
        });
    }

    #[test]
    fn test_env_only_ignores_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(".llm-panel.toml", "[server]\nmax_retries = 9")?;
            jail.set_env("PERPLEXITY_API_KEY", "pplx-test");
            jail.set_env("PERPLEXITY_TEMPERATURE", "0.3");

            let config = ConfigLoader::load_env_only().map_err(|e| *e)?;
            assert_eq!(config.server.max_retries, 3);
            assert_eq!(config.providers.perplexity.credential(), Some("pplx-test"));
            assert_eq!(config.providers.perplexity.temperature, Some(0.3));
            Ok(())
        });
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("llm-panel"));
    }
}
