//! Tutor-0 CLI
//!
//! Usage:
//!   tutor0 --text "your text here"           # Single turn
//!   tutor0 --interactive                     # Interactive chat
//!   tutor0 --serve                           # HTTP API server
//!   tutor0 --text "text" --json              # JSON output

use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tutor0::config::TutorConfig;
use tutor0::core::{
    run_server, EmotionAnalysisEngine, HttpEmotionClassifier, HttpTextGenerator,
    ResponseOrchestrator, SessionEvent, TurnOutcome, TutorSession,
};
use tutor0::types::{ProfileSnapshot, ResponseSource};
use tutor0::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "tutor0",
    version = VERSION,
    about = "Tutor-0 - Emotion-aware learning companion",
    long_about = "Tutor-0 reads how a learner feels about what they are studying,\n\
                  picks a response strategy and answers through a text generator.\n\n\
                  Modes:\n  \
                  --text         Single message\n  \
                  --interactive  Chat session (default)\n  \
                  --serve        HTTP API server mode\n\n\
                  Chat commands:\n  \
                  help      - How the tutor can help\n  \
                  profile   - Your learning profile\n  \
                  exit      - Leave (also quit, bye, goodbye)"
)]
struct Args {
    /// Text to answer (single mode)
    #[arg(short, long)]
    text: Option<String>,

    /// Interactive chat mode - read lines from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show analysis record and response source
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tutor0=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match args.config {
        Some(ref path) => TutorConfig::from_file(path)?,
        None => TutorConfig::default(),
    };
    let (engine, orchestrator) = build_core(&config);

    if args.serve {
        println!("Tutor-0 v{} API Server", VERSION);
        run_server(&args.addr, engine, orchestrator)
            .await
            .map_err(|e| anyhow::anyhow!("server error: {}", e))?;
        return Ok(());
    }

    let session = TutorSession::new(engine, orchestrator);
    // Port calls block; run the chat on the blocking pool
    let handle = tokio::task::spawn_blocking(move || match args.text.clone() {
        Some(text) if !args.interactive => run_single(session, &text, &args),
        _ => run_interactive(session, &args),
    });
    handle.await?
}

/// Wire the HTTP ports into the engine and orchestrator
fn build_core(config: &TutorConfig) -> (Arc<EmotionAnalysisEngine>, Arc<ResponseOrchestrator>) {
    info!(
        classifier = %config.classifier.model,
        generator = %config.generator.model,
        authenticated = config.api_token().is_some(),
        "model ports configured"
    );
    let classifier = Arc::new(HttpEmotionClassifier::from_config(config));
    let generator = Arc::new(HttpTextGenerator::from_config(config));
    (
        Arc::new(EmotionAnalysisEngine::new(classifier)),
        Arc::new(ResponseOrchestrator::new(generator)),
    )
}

/// Answer a single message
fn run_single(mut session: TutorSession, text: &str, args: &Args) -> anyhow::Result<()> {
    let outcome = session.take_turn(text);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_turn(&outcome, args.verbose));
    }
    Ok(())
}

/// Run interactive chat
fn run_interactive(mut session: TutorSession, args: &Args) -> anyhow::Result<()> {
    if !args.json {
        print_welcome();
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if !args.json {
            print!("{}", "You: ".bold());
            stdout.flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            if !args.json {
                println!("\n\nSee you next time! Keep being awesome at learning!");
            }
            break;
        }

        let event = session.handle_input(&line);
        if let Some(text) = render_event(&event, args.json, args.verbose)? {
            print!("{}", text);
        }
        if matches!(event, SessionEvent::Exit(_)) {
            break;
        }
    }
    Ok(())
}

/// Stdout text for one session event. JSON mode emits one JSON line per
/// reply or profile request and nothing for the chat chrome.
fn render_event(event: &SessionEvent, json: bool, verbose: bool) -> anyhow::Result<Option<String>> {
    let text = match event {
        SessionEvent::Reply(outcome) if json => format!("{}\n", serde_json::to_string(outcome)?),
        SessionEvent::Profile(snapshot) if json => format!("{}\n", serde_json::to_string(snapshot)?),
        _ if json => return Ok(None),
        SessionEvent::Reply(outcome) => render_turn(outcome, verbose),
        SessionEvent::Profile(snapshot) => format!("\n{}\n\n", snapshot.to_display_string().cyan()),
        SessionEvent::Exit(snapshot) => render_farewell(snapshot),
        SessionEvent::Help => render_help(),
        SessionEvent::EmptyPrompt => {
            "Feel free to ask me anything about learning, homework, or how you're feeling about school!\n\n"
                .to_string()
        }
    };
    Ok(Some(text))
}

/// Print welcome banner
fn print_welcome() {
    println!("{}", format!("Tutor-0 v{} - Educational Support Chat", VERSION).bold());
    println!("{}", "=".repeat(50));
    println!("Hello! I'm your learning companion. I'm here to help you with:");
    println!("  - Homework and study questions");
    println!("  - Learning difficulties and challenges");
    println!("  - Building confidence in your abilities");
    println!("  - Finding new ways to understand topics");
    println!("  - Emotional support during learning");
    println!("\nEveryone learns differently, and I'm here to support you!");
    println!("{}", "=".repeat(50));
    println!("\nCommands: 'exit', 'quit', 'help', or 'profile' to see your learning profile\n");
}

/// Farewell with the session's turn count
fn render_farewell(snapshot: &ProfileSnapshot) -> String {
    format!(
        "\n{} You completed {} learning conversations.\n\
         Keep being curious and remember - every question helps you grow!\n",
        "Great chatting with you!".green().bold(),
        snapshot.turn_count
    )
}

fn render_help() -> String {
    format!(
        "\n{}\n  \
         - Ask me about any subject or homework problem\n  \
         - Tell me about learning challenges you're facing\n  \
         - Share how you're feeling about school or studying\n  \
         - Ask for study tips and learning strategies\n\n\
         {}\n  \
         - Be specific about what you're working on\n  \
         - Let me know if you have dyslexia, ADHD, or other learning differences\n  \
         - Tell me what's confusing or frustrating you\n\n\
         Commands: 'exit' to leave, 'help' for this message, 'profile' to see your learning profile\n\n",
        "How I can help you:".bold(),
        "Tips for better conversations:".bold()
    )
}

/// One turn: detection line, noted patterns, reply
fn render_turn(outcome: &TurnOutcome, verbose: bool) -> String {
    let analysis = &outcome.analysis;
    let mut out = format!("{}\n", format!("[Detected: {}]", analysis.summary()).dimmed());

    if !analysis.special_needs_indicators.is_empty() {
        let noted: Vec<String> = analysis
            .special_needs_indicators
            .iter()
            .map(|i| i.display_name())
            .collect();
        out.push_str(&format!(
            "{}\n",
            format!("[Learning pattern noted: {}]", noted.join(", ")).yellow()
        ));
    }

    if verbose {
        let line = format!(
            "[approach={} | template={} | source={} | turns={}]",
            analysis.recommended_approach,
            outcome
                .reply
                .template
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
            outcome.reply.source,
            outcome.profile.turn_count
        );
        out.push_str(&format!("{}\n", line.dimmed()));
    }

    let label = match outcome.reply.source {
        ResponseSource::Generated => "AI Tutor:".green().bold(),
        ResponseSource::Fallback | ResponseSource::EmptyInput => "AI Tutor:".blue().bold(),
    };
    out.push_str(&format!("{} {}\n\n", label, outcome.reply.text));
    out
}

// =============================================================================
// TESTS
// =============================================================================
