use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vitae::{
    AgentRouter, Config, EvidenceFragment, GroqClient, HttpEmbedder, PineconeIndex, TextEmbedder,
    VectorIndex,
};

/// Vitae - multi-agent CV question answering
#[derive(Parser)]
#[command(name = "vitae", version, about)]
struct Cli {
    /// Path to a TOML config file (overrides the default search)
    #[arg(short, long, env = "VITAE_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a single question about one or more of the configured CVs
    Ask {
        /// The question; person names in it select whose CVs are consulted
        question: String,

        /// Print the retrieved evidence fragments after the answer
        #[arg(long)]
        evidence: bool,
    },
    /// Interactive question loop
    Chat,
    /// Chunk, embed and upload the configured CVs to the vector index
    Ingest,
    /// List the configured persons
    Persons,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,vitae=info",
        1 => "info,vitae=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Persons => {
            for person in &config.persons {
                let mark = if person.is_default { " (por defecto)" } else { "" };
                println!("- {} [{}]{mark}", person.name, person.id);
            }
            Ok(())
        }
        Command::Ingest => {
            let embedder = HttpEmbedder::new(&config.embedding);
            let index = PineconeIndex::connect(&config.pinecone, config.embedding.dimension).await?;
            let report = vitae::ingest::run(&config, &embedder, &index).await?;
            println!(
                "Ingesta completa: {} CVs, {} fragmentos.",
                report.persons, report.chunks
            );
            Ok(())
        }
        Command::Ask { question, evidence } => {
            let router = build_router(&config).await?;
            let (answer, fragments) = router.answer(&question).await?;
            println!("{answer}");
            if evidence {
                print_evidence(&fragments);
            }
            Ok(())
        }
        Command::Chat => chat_loop(&config).await,
    }
}

/// Construct the router with its shared backend handles.
///
/// Handles are created once here and shared by every agent; nothing else
/// in the process holds backend state.
async fn build_router(config: &Config) -> anyhow::Result<AgentRouter> {
    let embedder: Arc<dyn TextEmbedder> = Arc::new(HttpEmbedder::new(&config.embedding));
    let index: Arc<dyn VectorIndex> =
        Arc::new(PineconeIndex::connect(&config.pinecone, config.embedding.dimension).await?);
    let chat = Arc::new(GroqClient::new(&config.llm)?);

    Ok(AgentRouter::new(
        config.persons.clone(),
        config.top_k,
        embedder,
        index,
        chat,
    ))
}

async fn chat_loop(config: &Config) -> anyhow::Result<()> {
    let router = build_router(config).await?;

    println!("Chatbot multi-agente sobre CVs. Escribe 'salir' para terminar.");
    for person in &config.persons {
        let mark = if person.is_default { " (por defecto)" } else { "" };
        println!("- {}{mark}", person.name);
    }

    loop {
        let question: String = dialoguer::Input::new()
            .with_prompt("Pregunta")
            .allow_empty(true)
            .interact_text()?;

        let question = question.trim().to_string();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("salir") || question.eq_ignore_ascii_case("exit") {
            return Ok(());
        }

        match router.answer(&question).await {
            Ok((answer, fragments)) => {
                println!("\n{answer}\n");
                print_evidence(&fragments);
            }
            Err(e) => {
                tracing::error!("answer failed: {e}");
                println!("No se pudo responder: {e}");
            }
        }
    }
}

/// Print evidence fragments grouped by person, in retrieval order
fn print_evidence(fragments: &[EvidenceFragment]) {
    if fragments.is_empty() {
        return;
    }

    println!("Fragmentos de CV usados como contexto:");

    let mut seen: Vec<&str> = Vec::new();
    for fragment in fragments {
        if !seen.contains(&fragment.person_name.as_str()) {
            seen.push(&fragment.person_name);
        }
    }

    for name in seen {
        println!("\n### {name}");
        for (i, fragment) in fragments
            .iter()
            .filter(|f| f.person_name == name)
            .enumerate()
        {
            println!("  [{}] (score: {:.3}) {}", i + 1, fragment.score, fragment.text);
        }
    }
}
