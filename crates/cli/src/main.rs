use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use yojana_agents::{ElicitationPort, MockApplicationGateway, SahayakAgent, VoicePort};
use yojana_core::{Locale, ProfileField, TurnInput, UserProfile};
use yojana_observability::{init_tracing, AppMetrics};
use yojana_planner::PlannerStack;
use yojana_retrieval::{catalog_path_for_locale, SchemeRetriever};
use yojana_storage::{ProfileRepository, Store};

#[derive(Debug, Parser)]
#[command(name = "sahayak")]
#[command(about = "Yojana Sahayak CLI")]
struct Cli {
    #[arg(long, default_value = "catalog")]
    catalog_dir: PathBuf,

    #[arg(long, env = "YOJANA_LANG", default_value = "mr")]
    locale: String,

    #[arg(long, default_value = "user_1")]
    user: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive conversation loop.
    Chat,
    /// Run a single turn on direct text (or on an audio file via --audio).
    Ask {
        text: Option<String>,
        #[arg(long)]
        audio: Option<PathBuf>,
    },
    /// Non-interactive run with a pre-seeded profile.
    Demo {
        #[arg(long, default_value_t = 35)]
        age: u32,
        #[arg(long, default_value_t = 180_000)]
        income: u64,
        #[arg(long)]
        farmer: bool,
        #[arg(long)]
        text: Option<String>,
    },
    Schemes {
        #[command(subcommand)]
        command: SchemesCommand,
    },
}

#[derive(Debug, Subcommand)]
enum SchemesCommand {
    Search { query: String },
}

const DEMO_TEXT: &str =
    "मला शासकीय योजनांबद्दल माहिती हवी आहे. माझे वय 35 आहे आणि माझे वार्षिक उत्पन्न 180000 आहे.";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("yojana_cli");
    let cli = Cli::parse();

    let locale = Locale::from_optional_str(Some(&cli.locale));
    let store = build_store().await?;
    let agent = build_agent(&cli.catalog_dir, locale, store.clone()).await?;

    match cli.command {
        Command::Chat => run_chat(&agent, &cli.user).await?,
        Command::Ask { text, audio } => {
            let report = if let Some(audio) = audio {
                agent.handle_audio_turn(&cli.user, &audio).await?
            } else {
                let text = match text {
                    Some(text) => text,
                    None => prompt_line(&format!("User ({}): ", locale.as_code()))?,
                };
                agent
                    .handle_turn(TurnInput {
                        user_id: cli.user.clone(),
                        text,
                    })
                    .await?
            };
            println!("{}", serde_json::to_string_pretty(&report.outcome)?);
        }
        Command::Demo {
            age,
            income,
            farmer,
            text,
        } => {
            let profile = UserProfile {
                age: Some(age),
                annual_income: Some(income),
                farmer: Some(farmer),
                ..UserProfile::default()
            };
            store.store_profile(&cli.user, &profile).await?;

            let report = agent
                .handle_turn(TurnInput {
                    user_id: cli.user.clone(),
                    text: text.unwrap_or_else(|| DEMO_TEXT.to_string()),
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&report.outcome)?);
        }
        Command::Schemes { command } => match command {
            SchemesCommand::Search { query } => {
                let hits = agent.search_schemes(&query);
                println!("{}", serde_json::to_string_pretty(&hits)?);
            }
        },
    }

    Ok(())
}

async fn run_chat(agent: &SahayakAgent<Store>, user_id: &str) -> Result<()> {
    println!("Yojana Sahayak chat mode. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }
        if message.is_empty() {
            continue;
        }

        let turn = agent
            .handle_turn(TurnInput {
                user_id: user_id.to_string(),
                text: message.to_string(),
            })
            .await;

        // a malformed elicitation reply fails only this turn; the loop
        // continues so the user can try again
        if let Err(err) = turn {
            eprintln!("turn failed: {err:#}");
        }
        println!();
    }

    Ok(())
}

async fn build_store() -> Result<Store> {
    if let Ok(database_url) = env::var("YOJANA_DATABASE_URL") {
        Store::sqlite(&database_url).await
    } else {
        Ok(Store::memory())
    }
}

async fn build_agent(
    catalog_dir: &Path,
    locale: Locale,
    store: Store,
) -> Result<SahayakAgent<Store>> {
    let metrics = AppMetrics::shared();
    let planner = PlannerStack::load_default();

    let catalog_path = catalog_path_for_locale(catalog_dir, locale);
    let retriever = Arc::new(SchemeRetriever::from_catalog_file(&catalog_path).with_context(
        || format!("failed loading scheme catalog from {}", catalog_path.display()),
    )?);

    Ok(SahayakAgent::new(
        retriever,
        planner,
        Arc::new(store),
        Arc::new(MockApplicationGateway::new(locale)),
        Arc::new(ConsoleVoice),
        Arc::new(ConsoleElicitation),
        metrics,
        locale,
    ))
}

/// Console stand-in for speech synthesis: the spoken text is printed.
struct ConsoleVoice;

#[async_trait]
impl VoicePort for ConsoleVoice {
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        // transcription stand-in: read the sidecar text; fall back to typed
        // input the way the speech boundary degrades
        match std::fs::read_to_string(audio_path) {
            Ok(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            _ => {
                println!("STT fallback: please type the user's words:");
                prompt_line("Typed user input: ")
            }
        }
    }

    async fn speak(&self, text: &str, _locale: Locale) -> Result<()> {
        println!("{text}");
        Ok(())
    }
}

struct ConsoleElicitation;

#[async_trait]
impl ElicitationPort for ConsoleElicitation {
    async fn request_field(&self, _field: ProfileField, prompt: &str) -> Result<String> {
        prompt_line(prompt)
    }
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
