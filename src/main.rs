//! VibeCheck CLI
//!
//! Usage:
//!   vibecheck serve                                   # HTTP API server
//!   vibecheck captions -e sadness -t "rough day"      # Ranked meme captions
//!   vibecheck recommend -e fear -c 0.8 -t "exam"      # Support message
//!   vibecheck entertainment -e joy -t "promoted!"     # Movies, music, books
//!   vibecheck judge "Chai pe charcha" -e happy        # Judge one caption
//!   vibecheck analyze -e sadness -c 0.7 -t "thaka hua" # Everything for one mood
//!   vibecheck test-generator                          # One raw provider call
//!   vibecheck --offline captions -e joy -t "x"        # No network, fallbacks only
//!   vibecheck --json captions -e joy -t "x"           # JSON output

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use vibecheck::core::{
    run_server, EngineSettings, GeminiGenerator, GenerationConfig, ScriptedGenerator, TextGenerator, VibeEngine,
};
use vibecheck::types::{EntertainmentRecommendations, RankedCaption};
use vibecheck::{DEFAULT_SCORE_THRESHOLD, MAX_REFLECTION_ROUNDS, TOTAL_MAX_SCORE, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "vibecheck",
    version = VERSION,
    about = "VibeCheck - Judged and reflected mood captions and care messages",
    long_about = "VibeCheck generates Roman Urdu meme captions and empathetic support\n\
                  messages for a detected emotion.\n\n\
                  Every generated text is scored by a judge on four criteria\n\
                  (tone, relevance, appropriateness, safety; 2.5 points each).\n\
                  Text scoring below the threshold is rewritten once.\n\n\
                  Environment:\n  \
                  GEMINI_API_KEY / GOOGLE_API_KEY   Provider key\n  \
                  GEMINI_MODEL                      Primary model\n  \
                  GEMINI_API_BASE                   Provider base URL\n  \
                  VIBECHECK_GENERATION_TIMEOUT_SECS Per-call timeout\n  \
                  RUST_LOG                          Log filter (default: info)"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Total score below which a candidate is rewritten (0-10)
    #[arg(
        long,
        global = true,
        env = "VIBECHECK_SCORE_THRESHOLD",
        default_value_t = DEFAULT_SCORE_THRESHOLD,
        value_parser = parse_threshold
    )]
    threshold: f64,

    /// Reflection passes per candidate (0 disables rewriting)
    #[arg(long, global = true, default_value_t = MAX_REFLECTION_ROUNDS)]
    max_rounds: u32,

    /// Per-call generation timeout in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Generation model (overrides GEMINI_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Do not call the provider; every generation is unavailable
    #[arg(long, global = true)]
    offline: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run as HTTP API server
    Serve {
        /// Server address
        #[arg(long, env = "VIBECHECK_ADDR", default_value = "127.0.0.1:5000")]
        addr: String,
    },
    /// Generate, judge and rank meme captions
    Captions {
        #[arg(short, long)]
        emotion: String,
        #[arg(short, long, default_value = "")]
        text: String,
    },
    /// Write an empathetic support message
    Recommend {
        #[arg(short, long)]
        emotion: String,
        #[arg(short, long, default_value_t = 1.0)]
        confidence: f64,
        #[arg(short, long, default_value = "")]
        text: String,
    },
    /// Recommend movies, music and books with search links
    Entertainment {
        #[arg(short, long)]
        emotion: String,
        #[arg(short, long, default_value_t = 1.0)]
        confidence: f64,
        #[arg(short, long, default_value = "")]
        text: String,
    },
    /// Judge one caption and show the scoring breakdown
    Judge {
        caption: String,
        #[arg(short, long, default_value = "happy")]
        emotion: String,
    },
    /// Support message, entertainment and captions in one pass
    Analyze {
        #[arg(short, long)]
        emotion: String,
        #[arg(short, long, default_value_t = 1.0)]
        confidence: f64,
        #[arg(short, long, default_value = "")]
        text: String,
    },
    /// Send one prompt to the generator and print the reply
    TestGenerator,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();
    if args.no_color {
        colored::control::set_override(false);
    }

    let generator = match build_generator(&args) {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };
    let engine = Arc::new(VibeEngine::new(
        generator,
        EngineSettings {
            score_threshold: args.threshold,
            max_rounds: args.max_rounds,
        },
    ));

    match &args.command {
        Command::Serve { addr } => run_serve(addr, &engine),
        Command::Captions { emotion, text } => {
            let ranked = engine.generate_captions(emotion, text);
            print_captions(&ranked, &args)
        }
        Command::Recommend {
            emotion,
            confidence,
            text,
        } => {
            let message = engine.generate_recommendation_text(emotion, *confidence, text);
            if args.json {
                print_json(&serde_json::json!({ "emotion": emotion, "message": message }))
            } else {
                print_header("Support message");
                println!("{}", message);
                ExitCode::SUCCESS
            }
        }
        Command::Entertainment {
            emotion,
            confidence,
            text,
        } => {
            let recs = engine.recommend_entertainment(emotion, *confidence, text);
            print_entertainment(&recs, &args)
        }
        Command::Judge { caption, emotion } => {
            let outcome = engine.judge_single_detailed(caption, emotion);
            if args.json {
                return print_json(&outcome);
            }
            print_header("Judge");
            println!("{} {}", "Original:".bold(), caption);
            println!("{} {}", "Final:   ".bold(), outcome.candidate.text);
            println!();
            println!("{}", outcome.candidate.verdict.breakdown());
            println!();
            if args.no_color {
                println!("{}", outcome.to_parseable_string());
            } else {
                println!("{}", outcome.to_terminal_string());
            }
            ExitCode::SUCCESS
        }
        Command::Analyze {
            emotion,
            confidence,
            text,
        } => {
            let report = engine.analyze_complete(emotion, *confidence, text);
            if args.json {
                return print_json(&report);
            }
            print_header("Analysis");
            println!("{} {} ({:.2})", "Emotion:".bold(), report.emotion, report.confidence);
            println!();
            println!("{}", report.message);
            println!();
            print_entertainment(&report.entertainment, &args);
            println!();
            print_captions(&report.captions, &args)
        }
        Command::TestGenerator => {
            let check = engine.check_generator();
            let printed = if args.json {
                print_json(&check)
            } else {
                match &check.reply {
                    Some(reply) => println!("{} {}", "ok:".green().bold(), reply),
                    None => println!("{} no reply from the generator", "unavailable:".red().bold()),
                }
                ExitCode::SUCCESS
            };
            if check.ok {
                printed
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Clap value parser for `--threshold`: a finite total between 0 and 10
fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s.trim().parse().map_err(|_| format!("`{}` is not a number", s))?;
    if value.is_finite() && (0.0..=TOTAL_MAX_SCORE).contains(&value) {
        Ok(value)
    } else {
        Err(format!("threshold must be between 0 and {}", TOTAL_MAX_SCORE))
    }
}

/// Log to stderr, filtered by RUST_LOG (default: info)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_generator(args: &Args) -> Result<Arc<dyn TextGenerator>, Box<dyn Error>> {
    if args.offline {
        return Ok(Arc::new(ScriptedGenerator::new()));
    }

    let mut config = GenerationConfig::from_env()?;
    if let Some(model) = &args.model {
        config = config.with_model(model.clone());
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let generator = GeminiGenerator::new(config)?;
    let config = generator.config();
    if config.api_key.is_none() {
        tracing::warn!("no API key set; every generation will fall back");
    }
    tracing::info!(
        models = ?config.models(),
        timeout_secs = config.timeout.as_secs(),
        "using Gemini generator"
    );
    Ok(Arc::new(generator))
}

/// Run the HTTP server. The engine holds a blocking HTTP client, which must
/// not be dropped on a runtime thread, so the runtime is shut down first.
fn run_serve(addr: &str, engine: &Arc<VibeEngine>) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run_server(addr, Arc::clone(engine)));
    drop(runtime);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "server error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn print_captions(ranked: &[RankedCaption], args: &Args) -> ExitCode {
    if args.json {
        return print_json(ranked);
    }
    print_header("Captions");
    for (i, entry) in ranked.iter().enumerate() {
        let score = match entry.verdict.total_score {
            Some(s) => format!("{:.1}/10", s),
            None => "unjudged".to_string(),
        };
        println!("  {}. {} {}", i + 1, entry.caption.bold(), format!("({})", score).dimmed());
    }
    ExitCode::SUCCESS
}

fn print_entertainment(recs: &EntertainmentRecommendations, args: &Args) -> ExitCode {
    if args.json {
        return print_json(recs);
    }
    print_header("Entertainment");
    if recs.is_empty() {
        println!("{}", "No recommendations".dimmed());
        return ExitCode::SUCCESS;
    }
    println!("{}", "Movies/Series".cyan().bold());
    for m in &recs.movies {
        println!("  {}  {}", m.title, m.imdb.dimmed());
    }
    println!("{}", "Music".cyan().bold());
    for m in &recs.music {
        println!("  {} - {}  {}", m.title, m.artist, m.spotify.dimmed());
    }
    println!("{}", "Books".cyan().bold());
    for b in &recs.books {
        println!("  {} - {}  {}", b.title, b.author, b.goodreads.dimmed());
    }
    ExitCode::SUCCESS
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn print_header(mode: &str) {
    println!("{}", format!("VibeCheck v{} - {}", VERSION, mode).bold());
    println!();
}

// =============================================================================
// TESTS
// =============================================================================
