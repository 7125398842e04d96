use cardslide::{ControlCommand, SOCKET_PATH, SliderId};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "cardslide", version, about = "Drive the sliders of a running vitrine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control socket of the vitrine daemon
    #[arg(short = 's', long, default_value = SOCKET_PATH)]
    socket: String,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Advance a slider by one card
    Next { slider: String },
    /// Go back one card
    Prev { slider: String },
    /// Jump to an index (clamped by the slider)
    Goto {
        slider: String,
        #[arg(allow_hyphen_values = true)]
        index: isize,
    },
    /// Enable autoplay with the given interval
    Autoplay {
        slider: String,
        /// Interval in milliseconds
        #[arg(default_value_t = 5000)]
        interval_ms: u64,
    },
    /// Switch autoplay off
    Stop { slider: String },
}

impl From<Commands> for ControlCommand {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Next { slider } => ControlCommand::Next(SliderId::new(slider)),
            Commands::Prev { slider } => ControlCommand::Prev(SliderId::new(slider)),
            Commands::Goto { slider, index } => ControlCommand::GoTo(SliderId::new(slider), index),
            Commands::Autoplay {
                slider,
                interval_ms,
            } => ControlCommand::Autoplay(
                SliderId::new(slider),
                Some(Duration::from_millis(interval_ms.max(1))),
            ),
            Commands::Stop { slider } => ControlCommand::Autoplay(SliderId::new(slider), None),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    send_command(&cli.socket, &ControlCommand::from(cli.command))
}

fn send_command(socket: &str, command: &ControlCommand) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to vitrine at {}: {}. Is vitrine running?",
            socket,
            e
        )
    })?;

    log::debug!("sending '{}'", command);
    writeln!(stream, "{}", command)?;
    Ok(())
}
