use anyhow::{Context, Result};
use futures::future::try_join_all;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tripcal::cli::{self, ConvertArgs, InspectArgs};
use tripcal::clock::SystemClock;
use tripcal::config::Config;
use tripcal::context::{AppContext, StandardContext};
use tripcal::converter::Converter;
use tripcal::export;
use tripcal::model::read_calendar;

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let result = match args.get(1).map(String::as_str) {
        None | Some("--help") | Some("-h") | Some("help") => {
            cli::print_help("tripcal");
            Ok(())
        }
        Some("convert") => run_convert(&args[2..]).await,
        Some("inspect") => run_inspect(&args[2..]).await,
        Some(other) => Err(anyhow::anyhow!(
            "Unknown command '{}'. See 'tripcal --help'.",
            other
        )),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Load config and start logging. Logging problems are reported but never
/// block a conversion.
fn setup(root: Option<PathBuf>) -> Result<Config> {
    let ctx = StandardContext::new(root);
    let config = Config::load_or_default(&ctx)?;
    let log_path = ctx.get_log_file_path();
    if let Err(e) = cli::init_logging(&config.log_level, log_path.as_deref()) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }
    Ok(config)
}

async fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read itinerary from stdin")?;
        return Ok(text);
    }
    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read itinerary '{}'", input))
}

async fn run_convert(rest: &[String]) -> Result<()> {
    let args = ConvertArgs::parse(rest)?;
    let config = setup(args.root.clone())?;
    let converter = Converter::new(Arc::new(SystemClock)).with_summaries(config.summaries());

    if args.streams_to_stdout() {
        let text = read_input("-").await?;
        let bytes = converter
            .convert(&text, args.start)
            .context("Could not build the calendar; nothing was written")?;
        let mut stdout = tokio::io::stdout();
        stdout.write_all(&bytes).await?;
        stdout.flush().await?;
        return Ok(());
    }

    let converter = Arc::new(converter);
    let out_dir = args.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let file_names = export::output_names(&args.inputs, &config.output_file_name)?;
    let mut jobs = Vec::with_capacity(args.inputs.len());

    for (input, file_name) in args.inputs.iter().zip(file_names) {
        let text = read_input(input).await?;
        let converter = Arc::clone(&converter);
        let out_dir = out_dir.clone();
        let start = args.start;
        let label = input.clone();

        log::debug!("Queued {} -> {}", label, file_name);
        jobs.push(tokio::task::spawn_blocking(move || {
            export::export_itinerary(&converter, &text, start, &out_dir, &file_name)
                .with_context(|| format!("Could not convert '{}'; nothing was written", label))
        }));
    }

    let results = try_join_all(jobs).await.context("Conversion task panicked")?;

    let mut failures = 0;
    for result in results {
        match result {
            Ok(path) => println!("{}", path.display()),
            Err(e) => {
                failures += 1;
                log::error!("{:#}", e);
                eprintln!("Error: {:#}", e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} itineraries failed", failures, args.inputs.len());
    }
    Ok(())
}

async fn run_inspect(rest: &[String]) -> Result<()> {
    let args = InspectArgs::parse(rest)?;
    setup(args.root.clone())?;

    let raw = tokio::fs::read_to_string(&args.path)
        .await
        .with_context(|| format!("Failed to read '{}'", args.path.display()))?;
    let calendar = read_calendar(&raw)
        .with_context(|| format!("'{}' is not a readable calendar", args.path.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&calendar)?);
        return Ok(());
    }

    println!(
        "{} ({} event(s))",
        calendar.prod_id.as_deref().unwrap_or("unknown producer"),
        calendar.events.len()
    );
    for event in &calendar.events {
        let date = event
            .start
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "????-??-??".to_string());
        println!();
        println!("{}  {}", date, event.summary.as_deref().unwrap_or("(untitled)"));
        for line in event.description.as_deref().unwrap_or_default().lines() {
            println!("            {}", line);
        }
    }
    Ok(())
}
