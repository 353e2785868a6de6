//! Auth Service - mail delivery tooling.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "auth-service")]
#[command(about = "Onboarding and authentication tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a sandbox invitation mail through the configured SMTP server
    Mailtest {
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Name used to greet the recipient
        #[arg(long, default_value = "Test User")]
        display_name: String,
        /// Activation link embedded in the mail
        #[arg(long, default_value = "http://localhost:5173/confirm/test-token")]
        activation_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mailtest {
            to,
            display_name,
            activation_url,
        } => {
            let status =
                auth_service_lib::run_mailtest(&to, &display_name, &activation_url).await?;
            println!("sent OK, status: {}", status);
        }
    }

    Ok(())
}
