//! chatwidget CLI: terminal front end and headless client for a chat server

mod logging;

use chatwidget_engine::{
    ChatController, ConfigError, HttpTransport, Locale, Skip, SubmitOutcome, Transcript,
    WidgetConfig,
};
use clap::{Parser, Subcommand};
use logging::LogTarget;
use std::path::{Path, PathBuf};

/// Chat widget for a `/chat` endpoint, in your terminal
#[derive(Parser)]
#[command(name = "chatwidget")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the chat server
    #[arg(long, global = true)]
    server: Option<String>,

    /// Path to a JSON widget configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Locale of the built-in strings (fa, en)
    #[arg(long, global = true, value_parser = parse_locale)]
    locale: Option<Locale>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the terminal chat (default when no command specified)
    Tui {
        /// Use basic terminal colors
        #[arg(long)]
        high_contrast: bool,
    },

    /// Send one message and print the reply
    Ask {
        /// Message to send
        message: String,
    },

    /// Print the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Destination path
        #[arg(default_value = "chatwidget.json")]
        path: PathBuf,
    },
}

fn parse_locale(code: &str) -> Result<Locale, String> {
    Locale::from_code(code).ok_or_else(|| format!("unsupported locale: {code} (expected fa or en)"))
}

/// Merge the config file (if any) with command-line overrides.
fn resolve_config(cli: &Cli) -> Result<WidgetConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => WidgetConfig::load(path)?,
        None => WidgetConfig::default(),
    };
    if let Some(server) = &cli.server {
        config.server_url.clone_from(server);
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        None => cmd_tui(&config, cli.log_file.as_deref(), false),
        Some(Commands::Tui { high_contrast }) => {
            cmd_tui(&config, cli.log_file.as_deref(), high_contrast);
        }
        Some(Commands::Ask { message }) => {
            init_logging(cli.log_file.as_deref(), "warn");
            cmd_ask(&config, &message);
        }
        Some(Commands::Config { json }) => {
            cmd_config(&config, json);
        }
        Some(Commands::Init { path }) => {
            cmd_init(&config, &path);
        }
    }
}

fn init_logging(log_file: Option<&Path>, default_directive: &str) {
    let target = log_file.map_or(LogTarget::Stderr, LogTarget::File);
    if let Err(e) = logging::init(target, default_directive) {
        eprintln!("Failed to open log file: {e}");
        std::process::exit(1);
    }
}

fn cmd_tui(config: &WidgetConfig, log_file: Option<&Path>, high_contrast: bool) {
    // Nothing may write to the terminal while the alternate screen is up.
    if let Some(path) = log_file {
        init_logging(Some(path), "info");
    }

    let options = chatwidget_tui::TuiOptions { high_contrast };
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    if let Err(e) = rt.block_on(chatwidget_tui::run_tui(config, &options)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_ask(config: &WidgetConfig, message: &str) {
    let transport = match HttpTransport::from_config(config) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {e}");
            std::process::exit(1);
        }
    };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let mut controller = ChatController::new(Transcript::new(), config.strings());
    let outcome = rt.block_on(controller.submit(&transport, message));

    match outcome {
        SubmitOutcome::Skipped(Skip::Empty) => {
            eprintln!("Message is empty");
            std::process::exit(2);
        }
        SubmitOutcome::Skipped(Skip::Busy) => {
            eprintln!("A reply is still pending");
            std::process::exit(2);
        }
        SubmitOutcome::Finished(turn) => {
            if let Some(reply) = controller.view().last() {
                println!("{}", reply.text);
            }
            if turn.is_error() {
                std::process::exit(1);
            }
        }
    }
}

fn cmd_config(config: &WidgetConfig, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(config).expect("failed to serialize")
        );
        return;
    }

    let strings = config.strings();
    println!("Widget Configuration\n");
    println!("  Endpoint:   {}", config.endpoint_url());
    println!("  Locale:     {:?} ({})", config.locale, config.locale.direction().as_attr());
    println!("  Avatar:     {}", config.avatar_url);
    match config.request_timeout_secs {
        Some(secs) => println!("  Timeout:    {secs}s"),
        None => println!("  Timeout:    none"),
    }
    println!(
        "  DOM ids:    #{} #{} #{} #{}",
        config.dom.form, config.dom.input, config.dom.messages, config.dom.send_button
    );
    println!("\n  Greeting:   {}", strings.greeting);
    println!("  Typing:     {}", strings.typing);
}

fn cmd_init(config: &WidgetConfig, path: &Path) {
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return;
    }
    match config.save(path) {
        Ok(()) => println!("Created {}", path.display()),
        Err(e) => {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_tui() {
        let cli = Cli::try_parse_from(["chatwidget"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(resolve_config(&cli).unwrap(), WidgetConfig::default());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "chatwidget",
            "ask",
            "Hi",
            "--server",
            "http://localhost:8000",
            "--locale",
            "en",
        ])
        .unwrap();

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.server_url, "http://localhost:8000");
        assert_eq!(config.locale, Locale::En);
        assert!(matches!(cli.command, Some(Commands::Ask { ref message }) if message == "Hi"));
    }

    #[test]
    fn test_cli_rejects_unknown_locale() {
        assert!(Cli::try_parse_from(["chatwidget", "--locale", "xx"]).is_err());
    }

    #[test]
    fn test_config_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.json");
        std::fs::write(&path, r#"{"server_url":"http://file:1","locale":"en"}"#).unwrap();

        let cli = Cli::try_parse_from([
            "chatwidget",
            "--config",
            path.to_str().unwrap(),
            "--server",
            "http://flag:2",
        ])
        .unwrap();

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.server_url, "http://flag:2");
        assert_eq!(config.locale, Locale::En);
    }

    #[test]
    fn test_missing_config_file_errors() {
        let cli = Cli::try_parse_from(["chatwidget", "--config", "/nonexistent/widget.json"])
            .unwrap();
        assert!(matches!(resolve_config(&cli), Err(ConfigError::Io(_))));
    }
}
