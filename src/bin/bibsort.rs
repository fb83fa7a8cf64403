//! CLI driver: classify input paths, run the pipeline, write `.sorted` files

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bibsort::registry::DEFAULT_REGISTRY_URL;
use bibsort::{
    get_ordered_citations, merge_and_serialize, parse_bibliography, resolve_and_remap,
    rewrite_citations, Error, HttpRegistry, NullLookup, Result,
};

/// Reorder and re-key a BibTeX bibliography to match citation order
#[derive(Debug, Parser)]
#[command(name = "bibsort", version, about)]
struct Cli {
    /// Input files: one .bib, one .aux, and any number of .tex files
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Registry endpoint for canonical key lookup
    #[arg(long, default_value = DEFAULT_REGISTRY_URL)]
    registry_url: String,

    /// Skip registry lookup; every record gets a synthetic key
    #[arg(long)]
    offline: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let inputs = Inputs::classify(&cli.paths)?;

    let aux_text = fs::read_to_string(&inputs.aux)?;
    let bib_text = fs::read_to_string(&inputs.bib)?;

    let old_order = get_ordered_citations(&aux_text)?;
    let records = parse_bibliography(&bib_text)?;
    info!(
        citations = old_order.len(),
        records = records.len(),
        "parsed inputs"
    );

    let (new_records, mapping) = if cli.offline {
        resolve_and_remap(&records, &NullLookup)?
    } else {
        let registry = HttpRegistry::new(&cli.registry_url)?;
        resolve_and_remap(&records, &registry)?
    };

    let (bib_out, new_order) = merge_and_serialize(&old_order, &mapping, &new_records)?;

    // Everything is computed before anything is written, so a hard error
    // never leaves a half-written output behind.
    let mut outputs = vec![(sorted_path(&inputs.bib), bib_out)];
    for tex in &inputs.tex {
        let text = fs::read_to_string(tex)?;
        outputs.push((sorted_path(tex), rewrite_citations(&text, &mapping)));
    }

    for (path, content) in &outputs {
        write_atomic(path, content)?;
        info!(path = %path.display(), "wrote");
    }
    info!(entries = new_order.len(), "bibliography reordered");

    Ok(())
}

/// Input paths classified by extension
#[derive(Debug)]
struct Inputs {
    aux: PathBuf,
    bib: PathBuf,
    tex: Vec<PathBuf>,
}

impl Inputs {
    fn classify(paths: &[PathBuf]) -> Result<Self> {
        let mut aux = None;
        let mut bib = None;
        let mut tex = Vec::new();

        for path in paths {
            if !path.exists() {
                return Err(Error::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} not found", path.display()),
                )));
            }
            match path.extension().and_then(|e| e.to_str()) {
                Some("aux") => aux = Some(path.clone()),
                Some("bib") => bib = Some(path.clone()),
                Some("tex") => tex.push(path.clone()),
                _ => info!(path = %path.display(), "ignoring unrecognized input"),
            }
        }

        let missing = |what| {
            Error::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("no {what} file among the inputs"),
            ))
        };
        Ok(Self {
            aux: aux.ok_or_else(|| missing(".aux"))?,
            bib: bib.ok_or_else(|| missing(".bib"))?,
            tex,
        })
    }
}

/// `paper.bib` -> `paper.bib.sorted`; originals are never mutated in place
fn sorted_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".sorted");
    PathBuf::from(name)
}

/// Write via a temporary sibling and rename into place
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
