use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use honyaku::{HonyakuError, JsonDocument, PathEntry};
use honyaku_mt::{
    LineOperator, LocalLlmProvider, MockMode, MockTranslator, MtError, Operator, ProviderConfig,
    ReviewInput, ReviewSession, TerminalOperator, Translator, load_review_input,
};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn cli() -> Command {
    Command::new("honyaku-review")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Review machine translations of Japanese strings in a JSON file, in place")
        .arg(
            Arg::new("file")
                .help("JSON file to translate; it is rewritten as translations are saved")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .help("Chat-completions URL (default: $HONYAKU_ENDPOINT or LM Studio on localhost:1234)"),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .help("Model name sent with each request (default: $HONYAKU_MODEL or local-model)"),
        )
        .arg(
            Arg::new("history")
                .long("history")
                .help("Previous exchanges sent as context; 0 disables history")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("keep-lines")
                .long("keep-lines")
                .help("Keep line breaks in model output instead of flattening to one line")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use a mock translator instead of the endpoint")
                .action(ArgAction::SetTrue),
        )
}

fn provider_config(matches: &ArgMatches) -> anyhow::Result<ProviderConfig> {
    let mut config = ProviderConfig::from_env()?;
    if let Some(endpoint) = matches.get_one::<String>("endpoint") {
        config.endpoint = endpoint.clone();
    }
    if let Some(model) = matches.get_one::<String>("model") {
        config.model = model.clone();
    }
    if let Some(history) = matches.get_one::<usize>("history") {
        config.history_limit = *history;
    }
    if matches.get_flag("keep-lines") {
        config.flatten = false;
    }
    if let Some(secs) = matches.get_one::<u64>("timeout") {
        config.timeout = Duration::from_secs(*secs);
    }
    Ok(config)
}

async fn run() -> anyhow::Result<ExitCode> {
    let matches = cli().get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let input_file = matches
        .get_one::<PathBuf>("file")
        .cloned()
        .context("missing input file")?;

    let (document, entries) = match load_review_input(&input_file) {
        Ok(ReviewInput::Ready { document, entries }) => (document, entries),
        Ok(ReviewInput::NothingToTranslate) => {
            println!("No Japanese text found in the file.");
            return Ok(ExitCode::SUCCESS);
        }
        Err(e @ MtError::InputNotFound(_)) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", cli().render_usage());
            return Ok(ExitCode::FAILURE);
        }
        Err(MtError::Document(HonyakuError::Parse { source, .. })) => {
            eprintln!("Error parsing JSON: {}", source);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).context("loading input file"),
    };

    println!("=================================================");
    println!(" JSON Translator (Japanese -> English)");
    println!("=================================================");
    println!("File: {}", input_file.display());
    println!("=================================================");
    println!("\nFound {} string(s) to translate.", entries.len());

    let stdin = io::stdin();
    if stdin.is_terminal() {
        let operator = TerminalOperator::new(stdin.lock());
        start(document, &entries, operator, &matches).await?;
    } else {
        let operator = LineOperator::new(stdin.lock());
        start(document, &entries, operator, &matches).await?;
    }
    Ok(ExitCode::SUCCESS)
}

async fn start<O: Operator>(
    document: JsonDocument,
    entries: &[PathEntry],
    operator: O,
    matches: &ArgMatches,
) -> anyhow::Result<()> {
    if matches.get_flag("mock") {
        review(document, entries, MockTranslator::new(MockMode::Tagged), operator).await
    } else {
        let provider = LocalLlmProvider::new(provider_config(matches)?)?;
        tracing::info!(?provider, "using completion endpoint");
        review(document, entries, provider, operator).await
    }
}

async fn review<T: Translator, O: Operator>(
    document: JsonDocument,
    entries: &[PathEntry],
    translator: T,
    operator: O,
) -> anyhow::Result<()> {
    let mut session = ReviewSession::new(document, translator, operator, io::stdout());
    let summary = session.run(entries).await?;
    tracing::info!(
        translated = summary.translated,
        skipped = summary.skipped,
        aborted = summary.aborted,
        "review finished"
    );
    Ok(())
}
