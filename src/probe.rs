use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Context as _;
use clap::Parser;
use procfile::ProcChannel;

#[derive(Parser)]
struct Command {
    /// Pseudo-file exposed by the backing driver
    #[arg(short, long, default_value = procfile::DEFAULT_PROC_PATH)]
    path: PathBuf,

    /// Payload written before reading back
    #[arg(short, long, default_value = "Hello, Kernel!")]
    data: String,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();

    let command = Command::parse();
    let channel = ProcChannel::new(&command.path);

    log::info!("probing {}", channel.path().display());

    channel
        .write_entry(&command.data)
        .with_context(|| anyhow!("Could not write to {}", command.path.display()))?;
    println!("Written to {}: {}", command.path.display(), command.data);

    let data = channel
        .read_entry()
        .with_context(|| anyhow!("Could not read from {}", command.path.display()))?;
    println!("Read from {}: {}", command.path.display(), data);

    Ok(())
}
