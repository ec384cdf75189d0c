use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use dochub_core::storage::notes::NotesOutcome;
use dochub_core::storage::papers::paper_path;
use dochub_core::storage::{bibliography, inbox, notes};
use dochub_core::{AppConfig, DocHubError, ExitCode, Publication};
use dochub_science::{
    Citable, CitationCounter, PaperFetcher, Reference, Resolver, ScienceConfig, ScienceError,
};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "dochub",
    about = "Resolve arXiv IDs and DOIs into BibTeX, PDFs and notes",
    version,
    long_about = None
)]
struct Cli {
    /// arXiv ID or URL, or DOI. Read from the clipboard, then the inbox, when omitted.
    ref_id: Option<String>,

    /// Queue the reference in the inbox file instead of resolving it.
    #[arg(short = 'i', long)]
    inbox: bool,

    /// Download the PDF, to DPATH or the configured literature directory.
    #[arg(short = 'd', long, value_name = "DPATH", num_args = 0..=1)]
    download: Option<Option<PathBuf>>,

    /// Generate a notes file, in NPATH or the configured notes directory.
    #[arg(short = 'n', long, value_name = "NPATH", num_args = 0..=1)]
    notes: Option<Option<PathBuf>>,

    /// Do not append the entry to the bibliography file.
    #[arg(short = 'b', long)]
    bib_no_save: bool,

    /// Report approximate citation counts only.
    #[arg(short = 'c', long)]
    citations: bool,

    /// Output in JSON format. Also enabled by setting DOCHUB_JSON=1.
    #[arg(long)]
    json: bool,

    /// Config file to use instead of ~/.config/dochub/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug logging (otherwise RUST_LOG, default warn).
    #[arg(short, long)]
    verbose: bool,
}

/// Where the reference came from. Inbox entries are only removed once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefOrigin {
    Argument,
    Clipboard,
    Inbox,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("dochub: {err:#}");
        std::process::exit(exit_code(&err).into());
    }
}

fn run(cli: Cli) -> Result<()> {
    let json_output = cli.json || std::env::var("DOCHUB_JSON").as_deref() == Ok("1");

    let config = match &cli.config {
        Some(path) => AppConfig::load_required(path),
        None => AppConfig::load(),
    }
    .context("failed to load config")?;
    let science = ScienceConfig::from(&config.sources).with_env_overrides();

    let mut clipboard = arboard::Clipboard::new().ok();

    let Some((raw, origin)) = pick_reference(&cli, &config, clipboard.as_mut())? else {
        eprintln!("No reference given, clipboard and inbox are empty.");
        std::process::exit(ExitCode::InvalidArgs.into());
    };

    // ─── Inbox ──────────────────────────────────────────────────────────────

    if cli.inbox {
        let path = config.inbox_path();
        let added = inbox::append_to_inbox(&path, &raw)?;
        if json_output {
            print_json(&json!({ "reference": raw, "inbox": path, "added": added }))?;
        } else if added {
            println!("Added {raw} to {}", path.display());
        } else {
            println!("{raw} is already in {}", path.display());
        }
        return Ok(());
    }

    let reference = Reference::classify(&raw);
    tracing::debug!(?origin, reference = %reference, arxiv = reference.is_arxiv(), "classified");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    // ─── Citation counts ────────────────────────────────────────────────────

    if cli.citations {
        let counter = CitationCounter::new(&science)?;
        let report = runtime.block_on(counter.count(&reference))?;
        if json_output {
            print_json(&serde_json::to_value(&report)?)?;
        } else {
            let show = |n: Option<u32>| n.map_or_else(|| "n/a".to_string(), |n| n.to_string());
            println!("{}", report.reference);
            println!("  Semantic Scholar: {}", show(report.semantic_scholar));
            if !reference.is_arxiv() {
                println!("  CrossRef:         {}", show(report.crossref));
            }
        }
        return Ok(());
    }

    // ─── Resolve ────────────────────────────────────────────────────────────

    let resolver = Resolver::new(&science)?;
    let publication = runtime.block_on(resolver.resolve(&reference))?;

    if origin == RefOrigin::Inbox {
        inbox::pop_inbox(&config.inbox_path())?;
    }

    let bibtex = publication.to_bibtex();
    if !json_output {
        println!("{bibtex}");
    }
    if let Some(clipboard) = clipboard.as_mut()
        && let Err(e) = clipboard.set_text(bibtex.trim_end().to_string())
    {
        tracing::warn!(error = %e, "could not copy BibTeX to clipboard");
    }

    let bib_saved = if cli.bib_no_save {
        false
    } else {
        let path = config.bibliography_path();
        let saved = bibliography::append_entry(&path, &publication.identifier, &bibtex)?;
        if saved && !json_output {
            eprintln!("Saved {} to {}", publication.identifier, path.display());
        }
        saved
    };

    // ─── Download ───────────────────────────────────────────────────────────

    let literature_dir = target_dir(&cli.download, config.literature_dir());
    let pdf = match &cli.download {
        Some(_) => {
            let fetcher = PaperFetcher::new(&science)?;
            let outcome = runtime.block_on(fetcher.fetch(&publication, &literature_dir))?;
            if !json_output {
                if outcome.overwritten {
                    eprintln!("{} already existed, overwritten", outcome.path.display());
                }
                eprintln!("Downloaded {}", outcome.path.display());
            }
            Some(outcome.path)
        }
        None => None,
    };

    // ─── Notes ──────────────────────────────────────────────────────────────

    let notes_outcome = match &cli.notes {
        Some(_) => Some(write_notes(&cli, &config, &publication, &literature_dir, json_output)?),
        None => None,
    };

    if json_output {
        print_json(&json!({
            "publication": publication,
            "bibtex": bibtex,
            "bib_saved": bib_saved,
            "pdf": pdf,
            "notes": notes_outcome.as_ref().map(|o| o.path()),
            "notes_created": notes_outcome.as_ref().map(|o| matches!(o, NotesOutcome::Created(_))),
        }))?;
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Argument first, then a single-token clipboard, then the head of the inbox.
fn pick_reference(
    cli: &Cli,
    config: &AppConfig,
    clipboard: Option<&mut arboard::Clipboard>,
) -> Result<Option<(String, RefOrigin)>> {
    if let Some(raw) = cli.ref_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(Some((raw.to_string(), RefOrigin::Argument)));
    }

    let pasted = clipboard
        .and_then(|c| c.get_text().ok())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty() && !text.contains(char::is_whitespace));
    if let Some(raw) = pasted {
        eprintln!("Using reference from clipboard: {raw}");
        return Ok(Some((raw, RefOrigin::Clipboard)));
    }

    // Queuing an inbox entry into the inbox makes no sense
    if cli.inbox {
        return Ok(None);
    }

    let queued = inbox::read_inbox(&config.inbox_path())?;
    Ok(queued.into_iter().next().map(|raw| {
        eprintln!("Using reference from inbox: {raw}");
        (raw, RefOrigin::Inbox)
    }))
}

fn target_dir(flag: &Option<Option<PathBuf>>, default: PathBuf) -> PathBuf {
    match flag {
        Some(Some(dir)) => dir.clone(),
        _ => default,
    }
}

fn write_notes(
    cli: &Cli,
    config: &AppConfig,
    publication: &Publication,
    literature_dir: &Path,
    json_output: bool,
) -> Result<NotesOutcome> {
    let notes_dir = target_dir(&cli.notes, config.notes_dir());
    let local_pdf = paper_path(literature_dir, &publication.filename);
    let contents = publication.to_notes(&local_pdf);

    let outcome = notes::write_notes(&notes_dir, &publication.filename, &contents)?;
    if !json_output {
        match &outcome {
            NotesOutcome::Created(path) => eprintln!("Notes written to {}", path.display()),
            NotesOutcome::AlreadyExists(path) => {
                eprintln!("Notes already exist at {}, left untouched", path.display())
            }
        }
    }
    Ok(outcome)
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    if let Some(err) = err.downcast_ref::<ScienceError>() {
        return match err {
            ScienceError::QueryFailed { .. } | ScienceError::IdentifierNotFound(_) => {
                ExitCode::NotFound
            }
            ScienceError::Http(_) | ScienceError::Status { .. } => ExitCode::NetworkError,
            ScienceError::Io(_) => ExitCode::FileSystemError,
            ScienceError::InvalidDoi(_) | ScienceError::InvalidArxivId(_) => ExitCode::InvalidArgs,
            _ => ExitCode::GeneralError,
        };
    }
    match err.downcast_ref::<DocHubError>() {
        Some(DocHubError::Io(_)) => ExitCode::FileSystemError,
        Some(DocHubError::TomlParse(_) | DocHubError::ConfigError(_)) => ExitCode::InvalidArgs,
        _ => ExitCode::GeneralError,
    }
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}
