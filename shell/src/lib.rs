use std::{fs, path::Path};

use color_eyre::{Result, eyre::WrapErr as _};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub mod cli;
pub mod credentials;
pub mod session;
pub mod terminal;

pub const APP_NAME: &str = "Fusion Brain";
pub const DEFAULT_CONFIG_FILE: &str = "image_gen_config.json";

/// Persisted API key pair. Missing fields load as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub secret_key: String,
}

impl Config {
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.secret_key.trim().is_empty()
    }
}

pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let src = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&src)?)
}

pub fn save_json_file<T: Serialize>(path: &Path, x: &T) -> Result<()> {
    Ok(fs::write(path, serde_json::to_string_pretty(x)?)?)
}

pub fn load_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let src = fs::read_to_string(path)?;
    Ok(ron::from_str(&src)?)
}

pub fn save_ron_file<T: Serialize>(path: &Path, x: &T) -> Result<()> {
    Ok(fs::write(path, ron::to_string(x)?)?)
}

fn is_ron(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "ron")
}

pub fn load_config(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }
    let cfg = if is_ron(path) {
        load_ron_file(path)
    } else {
        load_json_file(path)
    };
    cfg.map(Some)
        .wrap_err_with(|| format!("Couldn't read config {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if is_ron(path) {
        save_ron_file(path, cfg)
    } else {
        save_json_file(path, cfg)
    }
    .wrap_err_with(|| format!("Couldn't write config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            api_key: "key".into(),
            secret_key: "secret".into(),
        }
    }

    #[test]
    fn missing_file_is_none() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert_eq!(load_config(&dir.path().join("nope.json"))?, None);
        Ok(())
    }

    #[test]
    fn json_and_ron_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        for name in ["cfg.json", "cfg.ron"] {
            let path = dir.path().join(name);
            save_config(&path, &config())?;
            assert_eq!(load_config(&path)?, Some(config()));
        }
        Ok(())
    }

    #[test]
    fn json_layout_matches_existing_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("image_gen_config.json");
        save_config(&path, &config())?;
        assert_eq!(
            fs::read_to_string(&path)?,
            "{\n  \"api_key\": \"key\",\n  \"secret_key\": \"secret\"\n}"
        );
        Ok(())
    }

    #[test]
    fn incomplete_and_broken_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cfg.json");

        fs::write(&path, r#"{"api_key": "key"}"#)?;
        let cfg = load_config(&path)?.unwrap();
        assert!(!cfg.is_complete());

        fs::write(&path, "{ not json")?;
        assert!(load_config(&path).is_err());
        Ok(())
    }
}
