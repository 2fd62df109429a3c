use clap::Parser;
use color_eyre::Result;
use fusion_brain::{cli::Cli, credentials, session::Session, terminal::Console};
use fusion_engine::{FileSink, Generator, HttpTransport};
use log::warn;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        pretty_env_logger::formatted_timed_builder()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        pretty_env_logger::init_timed();
    }
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut console = Console::default();
    let credentials = credentials::resolve(&cli, &mut console)?;

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, finishing up");
                shutdown.cancel();
            }
        }
    });

    let generator = Generator::new(HttpTransport::new(credentials));
    let mut sink = FileSink::new(cli.output.clone());
    let mut session = Session {
        generator: &generator,
        sink: &mut sink,
        image_count: cli.images,
        shutdown,
    };
    session.run(&mut console).await
}
