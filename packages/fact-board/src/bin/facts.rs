// Command-line front end for the fact board

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fact_board::{
    catalog, Config, Fact, FactId, FactService, FactStore, MemoryFactService, RestFactService,
    SubmissionWorkflow, SubmitOutcome, VoteEngine, VoteKind, VoteOutcome,
};

#[derive(Parser)]
#[command(name = "facts", about = "Browse, share and vote on facts")]
struct Cli {
    /// Use an in-memory board seeded with sample facts instead of FACTS_API_URL
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List facts, optionally for one category
    List {
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Share a new fact
    Submit {
        #[arg(long)]
        text: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        category: String,
    },
    /// Vote on a fact: interesting, mindblowing or false
    Vote { id: FactId, kind: VoteKind },
    /// Show the category catalog
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,fact_board=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if cli.memory {
        run(Arc::new(demo_service()), cli.command).await
    } else {
        let config = Config::from_env().context("Failed to load configuration")?;
        run(Arc::new(RestFactService::from_config(&config)), cli.command).await
    }
}

async fn run<S: FactService>(service: Arc<S>, command: Command) -> Result<()> {
    let store = Arc::new(FactStore::new(service));

    match command {
        Command::List { category } => {
            store.select_category(&category).await?;
            for fact in store.facts() {
                print_fact(&fact);
            }
        }
        Command::Submit {
            text,
            source,
            category,
        } => {
            let workflow = SubmissionWorkflow::new(store.clone());
            match workflow.submit_fact(text, source, category).await? {
                SubmitOutcome::Created(fact) => print_fact(&fact),
                SubmitOutcome::Incomplete => {
                    anyhow::bail!("Fact needs text (max 200 characters), an http(s) source and a known category")
                }
                SubmitOutcome::AlreadyUploading => {}
            }
        }
        Command::Vote { id, kind } => {
            store.fetch().await?;
            let fact = store
                .fact(id)
                .with_context(|| format!("No fact with id {}", id))?;

            let engine = VoteEngine::new(store.clone());
            if let VoteOutcome::Recorded(updated) = engine.cast_vote(&fact, kind).await? {
                print_fact(&updated);
            }
        }
        Command::Categories => {
            for category in catalog::all() {
                let (r, g, b) = hex_rgb(category.color);
                println!("{}  {}", "■".truecolor(r, g, b), category.name);
            }
        }
    }

    Ok(())
}

fn print_fact(fact: &Fact) {
    let tag = match catalog::color_of(&fact.category) {
        Ok(color) => {
            let (r, g, b) = hex_rgb(color);
            fact.category.on_truecolor(r, g, b).white().bold()
        }
        Err(e) => {
            tracing::warn!(fact_id = %fact.id, error = %e, "Fact has no catalog category");
            fact.category.on_bright_black().white().bold()
        }
    };

    let disputed = if fact.is_disputed() {
        format!(" {}", "[⛔️ DISPUTED]".red().bold())
    } else {
        String::new()
    };

    println!("#{:<5} {}{} ({})", fact.id.get(), fact.text, disputed, fact.source.dimmed());
    let tallies: Vec<String> = VoteKind::variants()
        .iter()
        .map(|kind| format!("{} {}", kind.icon(), fact.votes(*kind)))
        .collect();
    println!("       {}  {}", tag, tallies.join("  "));
}

/// `#rrggbb` to components; anything malformed renders grey.
fn hex_rgb(color: &str) -> (u8, u8, u8) {
    let channel = |range: std::ops::Range<usize>| {
        color
            .get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .unwrap_or(128)
    };
    (channel(1..3), channel(3..5), channel(5..7))
}

fn demo_service() -> MemoryFactService {
    let fact = |id, text: &str, source: &str, category: &str, votes: (u32, u32, u32)| Fact {
        id: FactId::new(id),
        text: text.to_string(),
        source: source.to_string(),
        category: category.to_string(),
        votes_interesting: votes.0,
        votes_mindblowing: votes.1,
        votes_false: votes.2,
        created_at: None,
    };

    MemoryFactService::with_facts(vec![
        fact(
            1,
            "Octopuses have three hearts and blue blood.",
            "https://ocean.si.edu/ocean-life/invertebrates/octopus",
            "science",
            (24, 9, 4),
        ),
        fact(
            2,
            "Rust 1.0 was released in May 2015.",
            "https://blog.rust-lang.org/2015/05/15/Rust-1.0.html",
            "technology",
            (11, 2, 0),
        ),
        fact(
            3,
            "The Great Wall of China is visible from the Moon with the naked eye.",
            "https://www.nasa.gov/image-article/great-wall/",
            "history",
            (3, 1, 12),
        ),
    ])
}
