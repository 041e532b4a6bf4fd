//! authprobe - Auth API Diagnostic CLI

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use authprobe::config;
use authprobe::error::ProbeError;
use authprobe::flows::{auth, users, Flow, FlowEngine};
use authprobe::http::ApiClient;
use authprobe::models::ProbeConfig;
use authprobe::store::ConfigStore;

/// authprobe - issue single diagnostic requests against an auth/user API
#[derive(Parser)]
#[command(name = "authprobe", version, about, long_about = None)]
struct Cli {
    /// Base URL of the target API
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Path of the shared secrets store
    #[arg(long, global = true)]
    secrets: Option<PathBuf>,

    /// Directory for per-flow response files
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account and save its tokens
    Register {
        /// Display name for the new account
        #[arg(long, default_value = "User Example")]
        name: String,

        /// Email for the new account
        #[arg(long, default_value = "user.example@example.com")]
        email: String,

        /// Password for the new account
        #[arg(long, default_value = "password123")]
        password: String,
    },

    /// Log in and save the issued tokens
    Login {
        #[arg(long, default_value = "admin@example.com")]
        email: String,

        #[arg(long, default_value = "password123")]
        password: String,
    },

    /// Log out using the stored refresh token
    Logout,

    /// Exchange the stored refresh token for a new token pair
    Refresh,

    /// Request a password-reset email
    ForgotPassword {
        #[arg(long, default_value = "admin@example.com")]
        email: String,
    },

    /// Set a new password using a reset token from the email link
    ResetPassword {
        /// Reset token obtained out of band
        #[arg(long)]
        token: String,

        #[arg(long, default_value = "newpassword123")]
        password: String,
    },

    /// Ask the API to send a verification email (authenticated)
    SendVerification,

    /// Verify an email address using a token from the email link
    VerifyEmail {
        /// Verification token obtained out of band
        #[arg(long)]
        token: String,
    },

    /// User CRUD operations (authenticated)
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// List available flows
    Flows,
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a user as admin and save its id as the target
    Create {
        #[arg(long, default_value = "Target User")]
        name: String,

        #[arg(long, default_value = "target@example.com")]
        email: String,

        #[arg(long, default_value = "password123")]
        password: String,

        #[arg(long, default_value = "user")]
        role: String,
    },

    /// List users with pagination
    List {
        #[arg(long, default_value_t = 10)]
        limit: u32,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Sort expression, e.g. "name:asc"
        #[arg(long)]
        sort_by: Option<String>,
    },

    /// Fetch one user (defaults to the stored target id)
    Get {
        #[arg(long)]
        id: Option<String>,
    },

    /// Update a user (defaults to the stored target id)
    Update {
        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        password: Option<String>,
    },

    /// Delete a user (defaults to the stored target id)
    Delete {
        #[arg(long)]
        id: Option<String>,
    },
}

fn print_banner() {
    let banner = r#"
    ╔═══════════════════════════════════════╗
    ║  authprobe v0.1.0                     ║
    ║  Auth API Diagnostic CLI              ║
    ╚═══════════════════════════════════════╝
    "#;
    println!("{}", banner.cyan());
}

fn build_flow(command: Commands) -> Option<Box<dyn Flow>> {
    match command {
        Commands::Register {
            name,
            email,
            password,
        } => Some(Box::new(auth::RegisterFlow {
            name,
            email,
            password,
        })),
        Commands::Login { email, password } => Some(Box::new(auth::LoginFlow { email, password })),
        Commands::Logout => Some(Box::new(auth::LogoutFlow)),
        Commands::Refresh => Some(Box::new(auth::RefreshFlow)),
        Commands::ForgotPassword { email } => Some(Box::new(auth::ForgotPasswordFlow { email })),
        Commands::ResetPassword { token, password } => {
            Some(Box::new(auth::ResetPasswordFlow { token, password }))
        }
        Commands::SendVerification => Some(Box::new(auth::SendVerificationFlow)),
        Commands::VerifyEmail { token } => Some(Box::new(auth::VerifyEmailFlow { token })),
        Commands::Users { command } => Some(match command {
            UserCommands::Create {
                name,
                email,
                password,
                role,
            } => Box::new(users::CreateUserFlow {
                name,
                email,
                password,
                role,
            }),
            UserCommands::List {
                limit,
                page,
                sort_by,
            } => Box::new(users::ListUsersFlow {
                limit,
                page,
                sort_by,
            }),
            UserCommands::Get { id } => Box::new(users::GetUserFlow { id }),
            UserCommands::Update {
                id,
                name,
                email,
                password,
            } => Box::new(users::UpdateUserFlow {
                id,
                name,
                email,
                password,
            }),
            UserCommands::Delete { id } => Box::new(users::DeleteUserFlow { id }),
        }),
        Commands::Flows => None,
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "authprobe=debug"
    } else {
        "authprobe=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    print_banner();

    let mut probe_config = if let Some(ref path) = cli.config {
        config::load_config(path)?
    } else {
        let default_path = Path::new("authprobe.toml");
        if default_path.exists() {
            config::load_config(default_path)?
        } else {
            ProbeConfig::default()
        }
    };

    config::merge_cli_args(
        &mut probe_config,
        cli.base_url,
        cli.timeout,
        cli.secrets,
        cli.output_dir,
    );

    if matches!(cli.command, Commands::Flows) {
        let engine = FlowEngine::with_defaults();

        println!("  {}\n", "Available Flows:".bold());
        for (name, description) in engine.list_flows() {
            println!("    {} {}", format!("{name:20}").cyan().bold(), description);
        }
        println!();
        return Ok(());
    }

    println!("  {} {}", "Target:".bold(), probe_config.base_url.green());
    println!(
        "  {} {}\n",
        "Store:".bold(),
        probe_config.secrets_path.display().to_string().cyan()
    );

    let client = ApiClient::from_config(&probe_config)?;
    let mut store = ConfigStore::open(&probe_config.secrets_path)?;

    let flow = build_flow(cli.command).ok_or("no flow selected")?;
    match flow.run(&client, &mut store).await {
        Ok(report) => {
            if !report.success {
                std::process::exit(1);
            }
        }
        Err(ProbeError::MissingState(msg)) => {
            eprintln!("  {} {msg}", "Error:".red().bold());
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
