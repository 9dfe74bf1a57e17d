use std::{io, path::PathBuf, process};

use chat_client::{logging, ChatResult, Config, Script};
use clap::Parser;
use tracing::error;

/// Join a chat, send a few messages, print the chat and leave.
#[derive(Debug, Parser)]
#[command(name = "chat-demo", version, about)]
struct Args {
    /// Path to the TOML config file.
    #[arg(long, env = "CONFIG_PATH")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = Config::load(&args.config);
    // Without a config the failure is still logged, with the local defaults.
    logging::init(config.as_ref().map(|config| config.env).unwrap_or_default());

    let result = match config {
        Ok(config) => run(config).await,
        Err(err) => Err(err.into()),
    };
    if let Err(err) = result {
        error!("{}", err);
        process::exit(1);
    }
}

async fn run(config: Config) -> ChatResult<()> {
    let mut client = chat_client::connect(&config.rpc)?;
    let script = Script::random(&mut rand::rng(), config.rpc.timeout());

    chat_client::run(&mut client, &script, &mut io::stdout()).await?;

    Ok(())
}
