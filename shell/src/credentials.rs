use std::path::Path;

use color_eyre::Result;
use fusion_engine::Credentials;
use log::{info, warn};

use crate::{Config, cli::Cli, load_config, save_config, terminal::Terminal};

/// Builds the credentials from flags, the config file and, as a last resort, the user.
///
/// Values collected interactively are saved back to `cli.config`. Empty values
/// are a configuration error.
pub fn resolve(cli: &Cli, term: &mut dyn Terminal) -> Result<Credentials> {
    let mut cfg = match load_config(&cli.config) {
        Ok(cfg) => cfg.unwrap_or_default(),
        Err(e) => {
            warn!("{e:#}, starting with an empty configuration");
            Config::default()
        }
    };

    if let Some(key) = &cli.api_key {
        cfg.api_key = key.clone();
    }
    if let Some(secret) = &cli.secret_key {
        cfg.secret_key = secret.clone();
    }

    if !cfg.is_complete() {
        cfg = first_time_setup(term)?;
        store(&cli.config, &cfg, term)?;
    }

    Ok(Credentials::try_new(cfg.api_key, cfg.secret_key)?)
}

fn first_time_setup(term: &mut dyn Terminal) -> Result<Config> {
    term.say(indoc::indoc! {"
        Welcome to Fusion Brain image generation!
        To get started, configure your API credentials.
        Your keys are listed at https://fusionbrain.ai
    "});

    let api_key = term.read_line("API key")?.trim().to_string();
    let secret_key = term.read_secret("Secret key")?.trim().to_string();
    Ok(Config {
        api_key,
        secret_key,
    })
}

fn store(path: &Path, cfg: &Config, term: &mut dyn Terminal) -> Result<()> {
    if !cfg.is_complete() {
        // nothing worth keeping, Credentials::try_new reports the problem
        return Ok(());
    }
    save_config(path, cfg)?;
    info!("Saved credentials to {}", path.display());
    term.say("Your keys have been saved.");
    Ok(())
}
