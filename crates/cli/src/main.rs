//! chathook command-line notification sender.
//!
//! Provides subcommands for posting a notification to the configured room
//! or space target, generating a starter configuration file, and validating
//! an existing one. `--dry-run` prints the finalized JSON body instead of
//! posting it.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chathook_core::config::AppConfig;
use chathook_core::{Notification, RoomNotification, SpaceNotification};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// chathook command-line notification sender.
#[derive(Parser, Debug)]
#[command(
    name = "chathook",
    version,
    about = "Send webhook notifications to room and space chat APIs"
)]
struct Cli {
    /// Path to the TOML configuration file. Defaults to
    /// `<user config dir>/chathook/config.toml`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Post a notification to the configured room.
    Room {
        /// Message body.
        #[arg(short, long)]
        message: String,

        /// Sender label shown next to the message.
        #[arg(long)]
        from: Option<String>,

        /// Background color: yellow, green, red, purple, gray, or random.
        #[arg(long)]
        color: Option<String>,

        /// Alert every member of the room.
        #[arg(long)]
        notify: bool,

        /// Send the body as plain text instead of HTML.
        #[arg(long)]
        text_format: bool,

        /// Attach the notification to an earlier message id.
        #[arg(long)]
        attach_to: Option<String>,

        /// Print the finalized JSON body instead of posting.
        #[arg(long)]
        dry_run: bool,
    },

    /// Post a notification to the configured space webhook.
    Space {
        /// Message text.
        #[arg(short, long)]
        text: String,

        /// Alert every member of the space.
        #[arg(long)]
        notify: bool,

        /// Print the finalized JSON body instead of posting.
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate a starter configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./chathook.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    // Minimal logging for CLI
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(default_config_path);

    match cli.command {
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate => cmd_validate(&config_path),
        Commands::Room {
            message,
            from,
            color,
            notify,
            text_format,
            attach_to,
            dry_run,
        } => {
            let config = load_config(&config_path)?;
            cmd_room(
                &config, &message, from, color, notify, text_format, attach_to, dry_run,
            )
            .await
        }
        Commands::Space {
            text,
            notify,
            dry_run,
        } => {
            let config = load_config(&config_path)?;
            cmd_space(&config, &text, notify, dry_run).await
        }
    }
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chathook/config.toml")
}

fn load_config(path: &PathBuf) -> Result<AppConfig> {
    AppConfig::load_from_file(path).context("failed to load configuration file")
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
async fn cmd_room(
    config: &AppConfig,
    message: &str,
    from: Option<String>,
    color: Option<String>,
    notify: bool,
    text_format: bool,
    attach_to: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let target = config
        .room
        .as_ref()
        .context("no [room] target in configuration")?;
    let token = target
        .resolve_token()
        .context("failed to resolve room API token")?;

    let mut notification = RoomNotification::new(&target.domain, &target.room_id, &token);
    notification.set_body(message);
    if let Some(from) = from {
        notification.set_sender(&from);
    }
    if let Some(color) = color {
        notification.set_color(&color);
    }
    if notify {
        notification.enable_notify_all();
    }
    if text_format {
        notification.set_text_format();
    }
    if let Some(attach_to) = attach_to {
        notification.set_attach_to(&attach_to);
    }

    deliver(&notification, dry_run).await
}

async fn cmd_space(config: &AppConfig, text: &str, notify: bool, dry_run: bool) -> Result<()> {
    let target = config
        .space
        .as_ref()
        .context("no [space] target in configuration")?;

    let mut notification = SpaceNotification::new(&target.webhook_url);
    notification.set_body(text);
    if notify {
        notification.enable_notify_all();
    }

    deliver(&notification, dry_run).await
}

async fn deliver<N: Notification + Sync>(notification: &N, dry_run: bool) -> Result<()> {
    if dry_run {
        let violations = notification.validate();
        if !violations.is_empty() {
            bail!(
                "notification failed validation:\n  - {}",
                violations.join("\n  - ")
            );
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&notification.finalize())?
        );
        return Ok(());
    }

    let outcome = notification.send().await?;
    println!("{outcome}");
    Ok(())
}

fn cmd_init(output: &PathBuf) -> Result<()> {
    let default_config = r#"# chathook configuration
# Both targets are optional; configure the ones you use.

[room]
domain = "https://chat.example.com"
room_id = "42"
token_env = "CHATHOOK_ROOM_TOKEN"

[space]
webhook_url = "https://spaces.example.com/v1/spaces/XXXX/messages?key=..."
"#;

    if output.exists() {
        bail!("refusing to overwrite existing file: {}", output.display());
    }

    std::fs::write(output, default_config).context("failed to write configuration file")?;
    println!("wrote starter configuration to {}", output.display());
    Ok(())
}

fn cmd_validate(path: &PathBuf) -> Result<()> {
    let config = load_config(path)?;

    if config.room.is_none() && config.space.is_none() {
        bail!("configuration has no [room] or [space] target");
    }

    if let Some(room) = &config.room {
        match room.resolve_token() {
            Ok(_) => println!("room target: {} (token resolved)", room.domain),
            Err(e) => println!("room target: {} (warning: {})", room.domain, e),
        }
    }
    if let Some(space) = &config.space {
        println!("space target: {}", space.webhook_url);
    }

    println!("configuration OK");
    Ok(())
}
