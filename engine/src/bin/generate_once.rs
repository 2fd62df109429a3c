use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use color_eyre::{Result, eyre::bail};
use fusion_engine::{Credentials, FileSink, Generator, HttpTransport};
use tokio_util::sync::CancellationToken;

/// Runs a single generation job and saves its images.
#[derive(clap::Parser)]
struct Arg {
    #[arg(long, env = "FUSION_BRAIN_API_KEY")]
    api_key: String,
    #[arg(long, env = "FUSION_BRAIN_SECRET_KEY")]
    secret_key: String,
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
    #[arg(short = 'n', long, default_value_t = 1)]
    images: u32,
    prompt: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    color_eyre::install()?;
    let Arg {
        api_key,
        secret_key,
        output,
        images,
        prompt,
    } = Arg::parse();

    let credentials = Credentials::try_new(api_key, secret_key)?;
    let generator = Generator::new(HttpTransport::new(credentials));
    let mut sink = FileSink::new(output);

    let started = Local::now();
    let out = generator
        .generate(&prompt, images, &mut sink, &CancellationToken::new())
        .await?;
    println!(
        "Saved {}/{} image(s) in {}s",
        out.persisted.len(),
        out.requested,
        (Local::now() - started).num_seconds()
    );
    for id in &out.persisted {
        println!("  {id}");
    }
    if out.persisted.is_empty() {
        bail!("no image could be saved");
    }

    Ok(())
}
