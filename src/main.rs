mod api;
mod config;
mod selection;
mod tui;

use anyhow::Result;
use api::AdminClient;
use clap::{Command, CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};
use config::{CONFIG_KEYS, Config, ConfigError};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::fs;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tui::{app::App, notify::Severity, ui};

#[derive(Parser)]
#[command(name = "sysassign")]
#[command(about = "A TUI for bulk-assigning dashboard users to a system")]
struct Cli {
    #[arg(help = "Identifier of the system whose user assignments to edit")]
    system_id: Option<u64>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Configuration management")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(about = "Generate shell completion scripts")]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    #[command(about = "Set a configuration value")]
    Set {
        #[arg(help = "Configuration key (base_url, csrf_token, notifier, compact)")]
        key: String,
        #[arg(help = "Configuration value")]
        value: String,
    },
    #[command(about = "Get a configuration value")]
    Get {
        #[arg(help = "Configuration key")]
        key: String,
    },
    #[command(about = "List all configuration values")]
    List,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { action }) => {
            if let Err(e) = handle_config_command(action) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
        None => {
            let Some(system_id) = cli.system_id else {
                eprintln!("Error: a system id is required. Usage: sysassign <SYSTEM_ID>");
                std::process::exit(1);
            };
            if let Err(e) = run_main_app(system_id) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn handle_config_command(action: ConfigAction) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Set { key, value } => {
            let mut config = match Config::load() {
                Ok(config) => config,
                Err(ConfigError::ConfigNotFound) => Config::default(),
                Err(e) => return Err(e),
            };

            config.set(&key, &value)?;
            config.save()?;
            println!("Configuration saved successfully.");
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for key in CONFIG_KEYS {
                println!("{} = {}", key, config.get(key)?);
            }
        }
    }
    Ok(())
}

fn run_main_app(system_id: u64) -> Result<()> {
    init_logging();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let client = AdminClient::new(&config.base_url, &config.csrf_token)?;
    let members = client.fetch_system_users(system_id)?;
    let mut app = App::new(system_id, members, client, config);

    run_tui(&mut app)?;

    // A redirect-style notifier ends the view with the message in hand;
    // surface it once the terminal is back to normal.
    if let Some(notice) = app.exit_notice {
        match notice.severity {
            Severity::Success => println!("{}", notice.text),
            Severity::Danger => eprintln!("{}", notice.text),
        }
    }

    Ok(())
}

/// The terminal belongs to the TUI, so diagnostics go to a log file under
/// the user's data directory. Controlled with RUST_LOG.
fn init_logging() {
    let Some(data_dir) = dirs::data_dir() else {
        return;
    };
    let log_dir = data_dir.join("sysassign");
    if fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let Ok(file) = fs::File::options()
        .create(true)
        .append(true)
        .open(log_dir.join("sysassign.log"))
    else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
}

fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll with a timeout so submit completions and banner expiry are
        // handled even when the user is idle.
        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key_event(key)?;
            }
        }

        app.on_tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn print_completions<G: Generator>(generator: G, cmd: &mut Command) {
    generate(generator, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
