//! clicktrack — read beat annotations, report bars and tempo, and
//! optionally render a click track to WAV.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{info, Level};

use clicktrack::beats::lexer::Tokenizer;
use clicktrack::beats::parser::Parser as RecordParser;
use clicktrack::beats::{Outcome, SongAnalysis, Validator};
use clicktrack::click::{ClickPlan, ClickRenderer, ClickSink, PlaybackMode, WavSink};
use clicktrack::config::Config;

#[derive(Parser)]
#[command(name = "clicktrack")]
#[command(about = "Derive bars, tempo and lead-in from beat annotations")]
struct Cli {
    /// Annotation file (`-` or absent for stdin)
    input: Option<PathBuf>,

    /// Config file (defaults to ~/.clicktrack/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a click track to this WAV file
    #[arg(short, long)]
    wav: Option<PathBuf>,

    /// Bar layout for the click track (overrides the config)
    #[arg(short, long, value_enum)]
    mode: Option<PlaybackMode>,

    /// Number of bars to click (defaults to the song length)
    #[arg(short, long)]
    bars: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(cli.config.as_deref())?;
    let tokenizer = Tokenizer::from_reader(open_input(cli.input.as_deref())?)?;

    let beats = RecordParser::new(tokenizer).parse()?;
    if beats.is_empty() {
        println!("no beats in input");
        return Ok(());
    }
    info!(beats = beats.len(), "parsed annotations");

    let validation = Validator::new(config.validation).validate(&beats)?;
    let analysis = match validation.outcome {
        Outcome::Song(analysis) => analysis,
        Outcome::NoBars => {
            println!("input has no complete bars");
            return Ok(());
        }
    };

    report(&analysis);

    if let Some(path) = &cli.wav {
        let mode = cli.mode.unwrap_or(config.click.mode);
        let mut sink = WavSink::new(path, ClickRenderer::new(&config.click), mode);
        if let Some(bars) = cli.bars {
            sink = sink.with_bars(bars);
        }
        sink.deliver(&ClickPlan::from(&analysis))?;
        println!("wrote {}", path.display());
    }

    Ok(())
}

fn open_input(path: Option<&Path>) -> std::io::Result<Box<dyn Read>> {
    match path {
        Some(p) if p != Path::new("-") => Ok(Box::new(File::open(p)?)),
        _ => Ok(Box::new(std::io::stdin().lock())),
    }
}

fn report(analysis: &SongAnalysis) {
    println!("tempo:   {:.2} BPM", analysis.tempo_bpm);
    println!("lead-in: {:.3} s", analysis.lead_in.as_secs_f64());
    println!("bars:    {}", analysis.song.len());
    for (i, bar) in analysis.song.bars().iter().enumerate() {
        println!(
            "  bar {:>3}: {} beats @ {:.2} BPM",
            i + 1,
            bar.beat_count,
            bar.tempo_bpm
        );
    }
}
