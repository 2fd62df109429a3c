use std::path::PathBuf;

use crate::DEFAULT_CONFIG_FILE;

/// Generate images from text prompts with the Fusion Brain API.
#[derive(Debug, clap::Parser)]
#[command(version)]
pub struct Cli {
    /// File holding the API key pair (`.ron` or JSON)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Overrides the API key stored in the config file
    #[arg(long, env = "FUSION_BRAIN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Overrides the secret key stored in the config file
    #[arg(long, env = "FUSION_BRAIN_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Directory the images are saved to
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Images generated per prompt
    #[arg(
        short = 'n',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub images: u32,
}
