//! Command-line front end for the Rosetta to DAML converter.
//!
//! Owns everything the core does not: argument handling, file I/O and the
//! process exit code. The core sees a parsed schema and returns rendered
//! text.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rosetta-daml",
    version,
    about = "Convert a Rosetta class/enum schema into DAML type declarations"
)]
struct Cli {
    /// Path to the schema JSON file
    schema: PathBuf,

    /// Name of the generated DAML module
    #[arg(long = "module-name", value_name = "NAME", default_value = "Main")]
    module_name: String,

    /// Output file; stdout when omitted
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match run(&cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<(), String> {
    let json = fs::read_to_string(&cli.schema)
        .map_err(|err| format!("Failed to read {}: {err}", cli.schema.display()))?;

    let daml = rosetta_daml::generate_from_json(&cli.module_name, &json)
        .map_err(|err| err.to_string())?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &daml)
                .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
            debug!(
                output = %path.display(),
                output_len = daml.len(),
                "DAML module written"
            );
        }
        None => print!("{daml}"),
    }
    Ok(())
}
