use std::error::Error;
use std::fs;
use std::path::PathBuf;

use atty::Stream;
use clap::{Parser, Subcommand};
use glossweave::{Lexicon, SenseRecord};
use serde_json::json;
use termimad::{FmtText, MadSkin, terminal_size};

#[derive(Parser, Debug)]
#[command(name = "glossweave", about = "Annotate prose with dictionary glosses", version)]
pub struct Cli {
    /// Emit JSON instead of human-readable output.
    #[arg(long, global = true)]
    json: bool,

    /// Phrase dictionary file.
    #[arg(long, global = true, default_value = "phrases.json")]
    phrases: PathBuf,

    /// Word dictionary file.
    #[arg(long, global = true, default_value = "dictionary.json")]
    words: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Annotate a text file and print the result.
    Annotate {
        /// Input text or markdown file.
        input: PathBuf,
        /// Emit annotated markup without rendering it to HTML.
        #[arg(long)]
        raw: bool,
    },
    /// Resolve an annotation key to its dictionary senses.
    #[command(subcommand)]
    Lookup(LookupCommand),
}

#[derive(Subcommand, Debug)]
enum LookupCommand {
    /// Resolve a clicked word surface through the fallback chain.
    Word {
        /// One or more surface words to resolve.
        #[arg(required = true)]
        surfaces: Vec<String>,
    },
    /// Resolve a phrase key by exact lowercase lookup.
    Phrase {
        /// Phrase key to resolve.
        key: String,
    },
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing();
    let lexicon = Lexicon::load_from_files(&cli.phrases, &cli.words)?;
    match cli.command {
        Command::Annotate { input, raw } => handle_annotate(&lexicon, input, raw, cli.json),
        Command::Lookup(LookupCommand::Word { surfaces }) => {
            handle_lookup_words(&lexicon, surfaces, cli.json)
        }
        Command::Lookup(LookupCommand::Phrase { key }) => {
            handle_lookup_phrase(&lexicon, &key, cli.json)
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_annotate(
    lexicon: &Lexicon,
    input: PathBuf,
    raw: bool,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(&input)?;
    let output = if raw {
        glossweave::annotate(&glossweave::normalize(&text), lexicon)
    } else {
        glossweave::process(&text, lexicon)
    };
    if as_json {
        let payload = json!({
            "input": input.display().to_string(),
            "rendered": !raw,
            "output": output,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{output}");
    }
    Ok(())
}

fn handle_lookup_words(
    lexicon: &Lexicon,
    surfaces: Vec<String>,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    if as_json {
        let payload: Vec<_> = surfaces
            .iter()
            .map(|surface| {
                json!({
                    "surface": surface,
                    "senses": lexicon.resolve_word(surface).map(senses_to_json),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }
    for surface in &surfaces {
        match lexicon.resolve_word(surface) {
            Some(senses) => print_senses(surface, senses),
            None => println!("No senses found for \"{surface}\"."),
        }
    }
    Ok(())
}

fn handle_lookup_phrase(lexicon: &Lexicon, key: &str, as_json: bool) -> Result<(), Box<dyn Error>> {
    if as_json {
        let payload = json!({
            "key": key,
            "senses": lexicon.resolve_phrase(key).map(senses_to_json),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }
    match lexicon.resolve_phrase(key) {
        Some(senses) => print_senses(key, senses),
        None => println!("No senses found for \"{key}\"."),
    }
    Ok(())
}

fn senses_to_json(senses: &[SenseRecord]) -> serde_json::Value {
    senses
        .iter()
        .map(|sense| {
            json!({
                "key": sense.key,
                "base_form": sense.base_form,
                "part_of_speech": sense.part_of_speech,
                "translation": sense.translation,
                "example": sense.example,
                "notes": sense.notes,
                "surface": sense.original_surface,
            })
        })
        .collect()
}

fn print_senses(surface: &str, senses: &[SenseRecord]) {
    println!("{} ({} sense{})", surface, senses.len(), plural(senses.len()));
    for sense in senses {
        let pos = if sense.part_of_speech.is_empty() {
            "unknown"
        } else {
            sense.part_of_speech.as_str()
        };
        println!(
            "- [{}] {} — {}",
            pos, sense.original_surface, sense.translation
        );
        if let Some(example) = &sense.example {
            render_markdown_block("    Example", example);
        }
        if let Some(notes) = &sense.notes {
            render_markdown_block("    Notes", notes);
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

fn stdout_is_tty() -> bool {
    atty::is(Stream::Stdout)
}

fn markdown_width() -> usize {
    let (width, _) = terminal_size();
    width.max(60) as usize
}

fn render_markdown_block(title: &str, body: &str) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return;
    }
    if stdout_is_tty() {
        let skin = MadSkin::default();
        let formatted = FmtText::from(&skin, trimmed, Some(markdown_width()));
        println!("{title}: {formatted}");
    } else {
        println!("{title}: {trimmed}");
    }
}
