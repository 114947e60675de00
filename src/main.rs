use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dictphon::cli::{Cli, Command, MapArgs, PhonetizeArgs};
use dictphon::phonetization::{
    MappingTable, PhonSummary, Phonetizer, PronunciationDictionary, SubstringGuesser,
};

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Phonetize(args) => handle_phonetize(&args),
        Command::Map(args) => handle_map(&args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn handle_phonetize(args: &PhonetizeArgs) -> Result<()> {
    let config = args
        .resolve_config()
        .context("Failed to resolve phonetizer configuration")?;
    let dictionary_path = config.dictionary_path()?;
    let dictionary = PronunciationDictionary::load(dictionary_path)
        .with_context(|| format!("Failed to load dictionary {:?}", dictionary_path))?;
    let mapping = match &config.mapping {
        Some(path) => MappingTable::load(path)
            .with_context(|| format!("Failed to load mapping table {:?}", path))?,
        None => MappingTable::new(),
    };
    let delimiter = config.delimiter_char()?;

    let phonetizer = Phonetizer::builder(&dictionary)
        .mapping(&mapping)
        .guesser(SubstringGuesser::new(&dictionary).with_max_variants(config.guess_variants))
        .build();

    let input = read_input(args.input.as_deref())?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut summary = PhonSummary::default();

    for line in input.lines() {
        let tokens =
            phonetizer.phonetize_tokens(line.split(delimiter), config.allow_unknown_guess);
        let counts = Phonetizer::summarize(&tokens);
        summary.ok += counts.ok;
        summary.warning += counts.warning;
        summary.error += counts.error;

        if args.tokens {
            serde_json::to_writer(&mut out, &tokens).context("Failed to serialize tokens")?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", Phonetizer::assemble(&tokens, delimiter))?;
        }
    }
    out.flush().context("Failed to write output")?;

    info!(
        tokens = summary.total(),
        ok = summary.ok,
        warning = summary.warning,
        error = summary.error,
        "phonetization complete"
    );
    if summary.error > 0 {
        warn!(missing = summary.error, "some tokens have no known pronunciation");
    }
    Ok(())
}

fn handle_map(args: &MapArgs) -> Result<()> {
    let table = MappingTable::load(&args.mapping)
        .with_context(|| format!("Failed to load mapping table {:?}", args.mapping))?
        .with_keep_unmapped(args.keep_unmapped);
    let separators = args.separator_chars();

    let input = read_input(args.input.as_deref())?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for line in input.lines() {
        writeln!(out, "{}", table.map_phones(line, &separators))?;
    }
    out.flush().context("Failed to write output")?;
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read input {:?}", path))
        }
        None => {
            let mut data = String::new();
            io::stdin()
                .read_to_string(&mut data)
                .context("Failed to read standard input")?;
            Ok(data)
        }
    }
}
