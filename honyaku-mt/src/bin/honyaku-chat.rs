use clap::{Arg, ArgAction, Command};
use honyaku_mt::{LocalLlmProvider, ProviderConfig, Translator};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("honyaku-chat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate lines typed at the prompt with the local model")
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .help("Chat-completions URL (default: $HONYAKU_ENDPOINT or LM Studio on localhost:1234)"),
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
                .help("Keep line breaks in model output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = ProviderConfig::from_env()?;
    if let Some(endpoint) = matches.get_one::<String>("endpoint") {
        config.endpoint = endpoint.clone();
    }
    if let Some(history) = matches.get_one::<usize>("history") {
        config.history_limit = *history;
    }
    if matches.get_flag("keep-lines") {
        config.flatten = false;
    }
    let mut provider = LocalLlmProvider::new(config)?;

    println!("=================================================");
    println!(" Japanese -> English (Clean Copy Mode)");
    println!("=================================================");
    println!("Type 'exit' to quit. Type 'clear' to reset memory.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let input = line.trim();
        if input.eq_ignore_ascii_case("exit") {
            break;
        }
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("clear") {
            provider.clear_history();
            println!("[Memory Cleared]");
            continue;
        }

        // Print only the translation so it is easy to select and copy
        match provider.translate(&line).await {
            Ok(translation) => println!("\n{}", translation),
            Err(e) => println!("\n{}", e),
        }
    }
    Ok(())
}
