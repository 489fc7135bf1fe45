//! CanonBldr - resolve session profiles and per-turn framing from the command line.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use canonbldr_domain::{
    AxisPreferences, NarrativeFocus, PowerExpression, ProfileId, SessionId, TensionSource,
    TurnPowerInput,
};
use canonbldr_engine::infrastructure::config::{load_dotenv, EngineConfig};
use canonbldr_engine::App;

#[derive(Parser)]
#[command(name = "canonbldr")]
#[command(about = "Resolve blended source-material profiles for a session", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory of base profile JSON files
    #[arg(long, global = true)]
    profiles_dir: Option<PathBuf>,

    /// Directory of session composition JSON files
    #[arg(long, global = true)]
    compositions_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resolved profile for a session
    Resolve {
        session: String,
    },

    /// Print the power framing for one turn
    Frame {
        session: String,

        /// Character tier, e.g. T4
        #[arg(long)]
        character_tier: String,

        /// Tier of the current threat; replaces the baseline
        #[arg(long)]
        threat_tier: Option<String>,

        /// Setting tier; defaults to the resolved profile's tier
        #[arg(long)]
        baseline_tier: Option<String>,

        /// Enable overpowered-protagonist mode
        #[arg(long)]
        op: bool,

        #[arg(long)]
        tension: Option<TensionSource>,

        #[arg(long)]
        expression: Option<PowerExpression>,

        #[arg(long)]
        focus: Option<NarrativeFocus>,

        /// Print prompt guidance instead of JSON
        #[arg(long)]
        prompt: bool,
    },

    /// Print declared and derived axes for a base profile
    Classify {
        profile_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv(&std::env::current_dir().context("Failed to read working directory")?);

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canonbldr_engine=info,canonbldr_domain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::from_env();
    if let Some(dir) = cli.profiles_dir {
        config = config.with_profiles_dir(dir);
    }
    if let Some(dir) = cli.compositions_dir {
        config = config.with_compositions_dir(dir);
    }

    let app = App::from_config(&config);

    match cli.command {
        Command::Resolve { session } => {
            let profile = app
                .use_cases
                .resolve
                .execute(&SessionId::new(session))
                .await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Command::Frame {
            session,
            character_tier,
            threat_tier,
            baseline_tier,
            op,
            tension,
            expression,
            focus,
            prompt,
        } => {
            let mut input = TurnPowerInput::new(character_tier);
            if let Some(tier) = baseline_tier {
                input = input.with_baseline_tier(tier);
            }
            if let Some(tier) = threat_tier {
                input = input.with_threat_tier(tier);
            }
            if op {
                input = input.with_op_mode(AxisPreferences {
                    tension_source: tension,
                    power_expression: expression,
                    narrative_focus: focus,
                });
            }

            let framing = app
                .use_cases
                .framing
                .execute(&SessionId::new(session), input)
                .await?;
            if prompt {
                println!("{}", framing.to_prompt());
            } else {
                println!("{}", serde_json::to_string_pretty(&framing)?);
            }
        }
        Command::Classify { profile_id } => {
            let axes = app
                .use_cases
                .classify
                .execute(&ProfileId::new(profile_id))
                .await?;
            println!("{}", serde_json::to_string_pretty(&axes)?);
        }
    }

    Ok(())
}
