use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use crystalgen::codegen::Generator;
use crystalgen::config::Options;
use crystalgen::error::CrystalgenError;
use crystalgen::request::{GenerateRequest, GenerateResponse};

#[derive(Parser, Debug)]
#[command(name = "crystalgen")]
#[command(version, about = "Generate typed Crystal data access code", long_about = None)]
struct Cli {
    /// Path to the JSON generate request ("-" reads stdin)
    request: PathBuf,

    /// Output directory for generated files
    #[arg(short, long, default_value = "./gen")]
    output: PathBuf,

    /// Print the response as JSON to stdout instead of writing files
    #[arg(long)]
    json: bool,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    if let Err(e) = run() {
        error!(error = ?e, "Fatal error");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("crystalgen v{}", env!("CARGO_PKG_VERSION"));
    info!(request = ?cli.request, output = ?cli.output, "Starting code generation");

    let request = read_request(&cli.request).context("Failed to load generate request")?;
    debug!(
        schemas = request.catalog.schemas.len(),
        queries = request.queries.len(),
        engine = ?request.settings.engine,
        "Request loaded"
    );

    let options =
        Options::from_value(request.options.clone()).context("Failed to resolve options")?;

    let generator = Generator::new(request, options);
    let response = generator.generate().context("Code generation failed")?;

    if cli.json {
        let json =
            serde_json::to_string_pretty(&response).context("Failed to encode response")?;
        println!("{}", json);
        return Ok(());
    }

    write_response(&cli.output, &response).context("Failed to write output")?;
    info!(files = response.files.len(), output = ?cli.output, "Done");

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Read and decode the full request before anything else runs
fn read_request(path: &Path) -> Result<GenerateRequest, CrystalgenError> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };

    serde_json::from_str(&text).map_err(|e| CrystalgenError::Request(e.to_string()))
}

/// Write every generated file under the output directory
fn write_response(output: &Path, response: &GenerateResponse) -> Result<(), CrystalgenError> {
    fs::create_dir_all(output)?;

    for file in &response.files {
        let path = output.join(&file.name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &file.contents)?;
        debug!(path = ?path, "Wrote file");
    }

    Ok(())
}
