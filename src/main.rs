use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// lectern - courses, webinars and registrations for an independent educator
#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Course website server and administration tool", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Change the role of an existing account
    SetRole {
        email: String,
        #[arg(value_enum)]
        role: cli::user::Role,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = lectern::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    lectern::observability::init_observability(
        "lectern",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
        config.observability.json,
    )?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Migrate => cli::migrate::migrate(&config).await,
        Commands::Reset => cli::migrate::reset(&config).await,
        Commands::User {
            command: UserCommands::SetRole { email, role },
        } => cli::user::set_role(config, email, role).await,
    }
}
