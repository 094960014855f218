use clap::Parser;
use scanlex::read_source;
use scanlex_wc::{WcError, count};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Count lines, words and characters of a text file.
#[derive(Parser, Debug)]
#[command(name = "scanlex-wc", version)]
struct Args {
    /// File to count
    #[arg(default_value = "word_count.input")]
    path: PathBuf,
}

fn main() -> miette::Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().context_lines(2).build())
    }))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scanlex=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(&args).map_err(miette::Report::new)
}

fn run(args: &Args) -> Result<(), WcError> {
    let input = read_source(&args.path)?;
    let (counts, result) = count(&input)?;
    match result.remainder(&input) {
        None => println!(
            "lines: {}, words: {}, characters: {}",
            counts.lines, counts.words, counts.characters
        ),
        Some(rest) => {
            println!("Lexical analysis failed");
            println!("stopped at: \"{rest}\"");
        }
    }
    Ok(())
}
