use carousel::{DragPhase, Gesture, Mode, Point, PressPhase};
use clap::{Parser, Subcommand};
use orbit::command::Command;
use orbit::sys::runtime;
use orbit::{client, config, trace};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "orbit", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Socket of the running daemon (overrides the configured path)
    #[arg(short = 's', long, global = true)]
    socket: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Run the ring daemon. This is the default.
    Run,
    /// Send a drag event for one item.
    Drag {
        index: usize,
        /// began, changed, ended or cancelled
        phase: DragPhase,
        /// Cumulative horizontal translation since the drag began
        #[arg(default_value_t = 0.0, allow_negative_numbers = true)]
        dx: f64,
        /// Cumulative vertical translation since the drag began
        #[arg(default_value_t = 0.0, allow_negative_numbers = true)]
        dy: f64,
    },
    /// Send a long-press event for one item.
    Press {
        index: usize,
        /// began, changed, ended or cancelled
        phase: PressPhase,
    },
    /// Force the rotation mode.
    Mode {
        /// clockwise, counterclockwise or manual
        mode: Mode,
    },
    /// Print the daemon's latest frame.
    Query,
    /// Run the ring headless and print every frame.
    Trace {
        #[arg(long, default_value_t = 2.0)]
        seconds: f64,
        /// Defaults to the configured frame rate
        #[arg(long)]
        fps: Option<u32>,
    },
    /// Write the default config file and print its path.
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = config::load_or_default();
    let socket = cli
        .socket
        .unwrap_or_else(|| config.driver.socket_path.to_path_buf());

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => runtime::run(config),
        Commands::Drag {
            index,
            phase,
            dx,
            dy,
        } => send(
            &socket,
            Command::Gesture(Gesture::Drag {
                index,
                phase,
                translation: Point::new(dx, dy),
            }),
        ),
        Commands::Press { index, phase } => {
            send(&socket, Command::Gesture(Gesture::Press { index, phase }))
        }
        Commands::Mode { mode } => send(&socket, Command::SetMode(mode)),
        Commands::Query => {
            for line in client::query(&socket)? {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Trace { seconds, fps } => {
            let engine = config.ring.build()?;
            let fps = fps.unwrap_or(config.driver.frame_rate);
            trace::run_trace(engine, seconds, fps, &mut std::io::stdout().lock())?;
            Ok(())
        }
        Commands::InitConfig => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn send(socket: &std::path::Path, command: Command) -> anyhow::Result<()> {
    log::debug!("Sending '{}' to {}", command, socket.display());
    client::send_command(socket, &command)?;
    Ok(())
}
