use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use weave::{generate_schema_with, WeaveConfig};
use weave_compiler::error::WeaveError;

#[derive(Parser)]
#[command(name = "weave")]
#[command(about = "Generate Weaviate schemas from annotated Go structs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Weaviate schema from the `+weave` structs in a Go package directory
    Schema {
        /// Directory holding the Go source files
        dir: PathBuf,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Output file for the generated schema (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file (defaults to `weave.toml` in the source directory, if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fail when two structs produce the same class name
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<(), WeaveError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Schema { dir, pretty, output, config, strict } => {
            let mut settings = WeaveConfig::discover(config.as_deref(), dir)?;
            settings.output.pretty |= *pretty;
            settings.output.strict |= *strict;

            let schema = generate_schema_with(dir, &settings)?;
            info!(classes = schema.classes.len(), dir = %dir.display(), "generated schema");
            let json = schema.to_json(settings.output.pretty)?;

            if let Some(out_path) = output {
                fs::write(out_path, &json).map_err(WeaveError::Io)?;
                println!("Schema successfully written to {}", out_path.display());
            } else {
                println!("{}", json);
            }
            Ok(())
        }
    }
}
