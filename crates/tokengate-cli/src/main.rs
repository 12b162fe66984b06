//! Tokengate CLI - command-line front end for the session service.
//!
//! Every invocation behaves like opening the console: the cached session
//! is loaded from disk and checked with the service, then the requested
//! action runs and its panel is printed.

mod prompt;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokengate::prelude::*;
use tokengate::{DEFAULT_BASE_URL, LoggingConfig, init_logging};
use tracing::{debug, warn};

use crate::prompt::CliConfirm;

type AppConsole = Console<HttpTransport, FileStore, CliConfirm>;

#[derive(Parser)]
#[command(name = "tokengate")]
#[command(about = "Log in, validate and log out against a token-based session service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base address of the session service
    #[arg(long, env = "TOKENGATE_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Where the session is kept between runs
    #[arg(long, env = "TOKENGATE_STORE")]
    store: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Answer "yes" to every confirmation
    #[arg(short, long)]
    yes: bool,

    /// Print HTML cards instead of text
    #[arg(long)]
    html: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and keep the session
    Login {
        /// Account email
        correo: String,

        /// Password (prompted for, hidden, when omitted)
        #[arg(short, long, env = "TOKENGATE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Ask the service whether a token is valid (defaults to the session's)
    Validate {
        token: Option<String>,
    },

    /// Log a token out (defaults to the session's)
    Logout {
        token: Option<String>,
    },

    /// Enter the admin view: check the session with the service
    Admin,

    /// Enter the admin view and clear every session on the server
    AdminClear,

    /// Show the cached session
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = if cli.verbose {
        LoggingConfig::verbose()
    } else {
        LoggingConfig::default()
    };
    if let Err(e) = init_logging(&logging) {
        eprintln!("{e}");
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, TokengateError> {
    let store_path = cli.store.clone().unwrap_or_else(default_store_path);
    debug!(path = %store_path.display(), "using session store");

    let console: AppConsole = TokengateBuilder::new()
        .base_url(&cli.base_url)
        .timeout_secs(cli.timeout)
        .build_http(FileStore::open(store_path), CliConfirm::new(cli.yes))?;

    let startup = console.start().await;
    if let Err(e) = &startup {
        warn!(error = %e, "cached session could not be checked");
    }

    let render = match cli.command {
        Commands::Login { correo, password } => {
            let password = match password {
                Some(p) => p,
                None => match prompt::password("Contraseña").await {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("❌ no se pudo leer la contraseña: {e}");
                        return Ok(ExitCode::FAILURE);
                    }
                },
            };
            Some(console.submit_login(&Credentials::new(correo, password)).await)
        }
        Commands::Validate { token } => {
            let token = token.unwrap_or(console.forms().await.validate_token);
            Some(console.submit_validate(&token).await)
        }
        Commands::Logout { token } => {
            let token = token.unwrap_or(console.forms().await.logout_token);
            console.submit_logout(&token).await
        }
        Commands::Admin => {
            let granted = console.switch_view(View::Admin).await;
            print_panel(&console, View::Admin, cli.html).await;
            print_alerts(&console).await;
            return Ok(exit_code(granted));
        }
        Commands::AdminClear => {
            if !console.switch_view(View::Admin).await {
                print_panel(&console, View::Admin, cli.html).await;
                print_alerts(&console).await;
                return Ok(ExitCode::FAILURE);
            }
            console.submit_admin_clear().await
        }
        Commands::Status => {
            print_status(&console).await;
            print_alerts(&console).await;
            return Ok(exit_code(startup.is_ok()));
        }
    };

    let Some(render) = render else {
        println!("Cancelado.");
        return Ok(ExitCode::SUCCESS);
    };
    println!("{}", if cli.html { render.html() } else { render.text() });
    print_alerts(&console).await;
    Ok(exit_code(render.severity != Severity::Error))
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("tokengate"))
        .unwrap_or_else(|| PathBuf::from(".tokengate"))
        .join("session.json")
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

async fn print_panel(console: &AppConsole, view: View, html: bool) {
    let panel = console.panel(view).await;
    println!("{}", if html { panel.html() } else { panel.text() });
}

async fn print_alerts(console: &AppConsole) {
    for alert in console.take_alerts().await {
        eprintln!("{}\n{}", alert.title(), alert.message);
    }
}

async fn print_status(console: &AppConsole) {
    let session = console.guard().snapshot().await;
    match (&session.token, &session.email) {
        (Some(token), email) => {
            println!("📧 Correo Electrónico: {}", email.as_deref().unwrap_or("-"));
            println!("🔑 Token de Sesión: {token}");
            println!("Estado: {:?}", console.guard().phase().await);
        }
        (None, _) => println!("No hay sesión activa."),
    }
}
