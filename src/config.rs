use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "strata.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory the hashed stylesheet is written to; stdout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    #[serde(default = "default_file_stem")]
    pub file_stem: String,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory relative to the config file
    pub dir: String,
    #[serde(default)]
    pub prefix: String,
}

fn default_file_stem() -> String {
    "styles".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: None,
            file_stem: default_file_stem(),
            sources: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from file, returns defaults if the file doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// File name for a stylesheet with the given fingerprint
    pub fn output_file_name(&self, hash: &str) -> String {
        format!("{}.{}.css", self.file_stem, hash)
    }
}

impl SourceConfig {
    /// Parse a `DIR[:PREFIX]` command-line source
    pub fn parse(spec: &str) -> Result<Self> {
        let (dir, prefix) = match spec.rsplit_once(':') {
            Some((dir, prefix)) => (dir, prefix),
            None => (spec, ""),
        };

        if dir.is_empty() {
            anyhow::bail!("Invalid source '{}': directory is empty", spec);
        }

        Ok(Self {
            dir: dir.to_string(),
            prefix: prefix.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();

        let config = Config::load(&temp_dir.path().join(CONFIG_FILE)).unwrap();

        assert!(config.sources.is_empty());
        assert!(config.out_dir.is_none());
        assert_eq!(config.file_stem, "styles");
    }

    #[test]
    fn test_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
out_dir = "static"

[[sources]]
dir = "css"

[[sources]]
dir = "vendor/components"
prefix = "comp"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.out_dir, Some(PathBuf::from("static")));
        assert_eq!(config.file_stem, "styles");
        assert_eq!(
            config.sources,
            vec![
                SourceConfig {
                    dir: "css".to_string(),
                    prefix: String::new(),
                },
                SourceConfig {
                    dir: "vendor/components".to_string(),
                    prefix: "comp".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_load_malformed_config_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "sources = 42").unwrap();

        let err = Config::load(&path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse config"));
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn test_output_file_name() {
        let config = Config {
            file_stem: "app".to_string(),
            ..Default::default()
        };
        assert_eq!(config.output_file_name("0123456789abcdef"), "app.0123456789abcdef.css");
    }

    #[test]
    fn test_parse_source_spec() {
        assert_eq!(
            SourceConfig::parse("css").unwrap(),
            SourceConfig {
                dir: "css".to_string(),
                prefix: String::new(),
            }
        );
        assert_eq!(
            SourceConfig::parse("vendor/components:comp").unwrap(),
            SourceConfig {
                dir: "vendor/components".to_string(),
                prefix: "comp".to_string(),
            }
        );
        assert!(SourceConfig::parse(":comp").is_err());
    }
}
