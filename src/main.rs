//! ERL Comm CLI - report robot status to the competition hub by hand.
//!
//! Each subcommand maps to one hub action. See the `erl_comm` library for
//! the protocol implementation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use erl_comm::{constants, Config, ConnectionInfo, HubClient};

#[derive(Parser)]
#[command(name = "erl-comm")]
#[command(version)]
#[command(about = "Competition hub client for ERL robots")]
struct Cli {
    /// Hub endpoint URL (overrides config and ERL_HUB_URL)
    #[arg(long, global = true)]
    url: Option<String>,
    /// Robot identifier (overrides config and ERL_ROBOT_ID)
    #[arg(long, global = true)]
    robot_id: Option<String>,
    /// Competition identifier (overrides config and ERL_COMPETITION)
    #[arg(long, global = true)]
    competition: Option<String>,
    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Hub(HubCommand),
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
enum HubCommand {
    /// Tell the hub the robot is active
    Ping,
    /// Report that an episode has started
    StartEpisode {
        /// Episode number
        episode: u32,
    },
    /// Report that an episode has stopped
    StopEpisode {
        /// Episode number
        episode: u32,
    },
    /// Report that a phase has started
    StartPhase {
        /// Episode number
        episode: u32,
        /// Phase number
        phase: u32,
    },
    /// Report that a phase has stopped
    StopPhase {
        /// Episode number
        episode: u32,
        /// Phase number
        phase: u32,
    },
    /// Send a free-form message for a phase
    Info {
        /// Episode number
        episode: u32,
        /// Phase number
        phase: u32,
        /// Message text
        message: String,
    },
    /// List episodes and their phases
    Episodes,
    /// List the items of a phase
    Items {
        /// Episode number
        episode: u32,
        /// Phase number
        phase: u32,
    },
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = Config::load()?;
        if let Some(url) = &self.url {
            config.hub_url.clone_from(url);
        }
        if let Some(robot_id) = &self.robot_id {
            config.robot_id.clone_from(robot_id);
        }
        if let Some(competition) = &self.competition {
            config.competition.clone_from(competition);
        }
        if let Some(timeout) = self.timeout {
            config
                .set_request_timeout_secs(timeout)
                .context("Invalid --timeout")?;
        }
        Ok(config)
    }
}

fn init_logging() -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.format_timestamp_secs();

    if let Ok(path) = std::env::var(constants::ENV_LOG_FILE) {
        let log_file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create log file at {}", path))?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    builder.init();
    Ok(())
}

fn report(label: &str, success: bool) {
    println!("{}: {}", label, success);
}

fn run(command: &HubCommand, client: &HubClient, conn: &ConnectionInfo) -> Result<()> {
    match command {
        HubCommand::Ping => report("ping", client.ping(conn)?),
        HubCommand::StartEpisode { episode } => report(
            &format!("start episode {}", episode),
            client.start_episode(conn, *episode)?,
        ),
        HubCommand::StopEpisode { episode } => report(
            &format!("stop episode {}", episode),
            client.stop_episode(conn, *episode)?,
        ),
        HubCommand::StartPhase { episode, phase } => report(
            &format!("start ep {}, phase {}", episode, phase),
            client.start_phase(conn, *episode, *phase)?,
        ),
        HubCommand::StopPhase { episode, phase } => report(
            &format!("stop ep {}, phase {}", episode, phase),
            client.stop_phase(conn, *episode, *phase)?,
        ),
        HubCommand::Info {
            episode,
            phase,
            message,
        } => report(
            &format!("info for ep {}, phase {}", episode, phase),
            client.info(conn, *episode, *phase, message)?,
        ),
        HubCommand::Episodes => {
            for episode in client.episodes(conn)?.values() {
                println!("{}", episode);
                for phase in episode.phases().values() {
                    println!("  {}", phase);
                }
            }
        }
        HubCommand::Items { episode, phase } => {
            let items = client.items(conn, *episode, *phase)?;
            println!("found the following items:");
            for item in items.values() {
                println!("   {} @ {}", item, item.location());
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let config = cli.config()?;

    let command = match &cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            return Ok(());
        }
        Commands::Hub(command) => command,
    };

    let conn = config.connection_info()?;
    let client = HubClient::with_timeout(config.request_timeout())
        .context("Failed to create hub client")?;

    log::info!(
        "Using hub {} as robot {} ({})",
        conn.url(),
        conn.robot_id(),
        conn.competition_id()
    );

    run(command, &client, &conn)
}
