use std::path::PathBuf;

use clap::{ArgGroup, CommandFactory, Parser, Subcommand, error::ErrorKind};
use csvloc::{Error, options::DEFAULT_BLOB_NAME};
use csvloc_cli::{
    KeyQuery, SheetSpec, collect_view, parse_sheet_spec, print_view, run_bundle, run_lookup,
    validate_schema_file,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Bundle per-group sheets into a localization blob and its schema.
    Bundle {
        /// Supported languages, in blob column order (comma separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        languages: Vec<String>,

        /// Group sheet as GROUP=PATH; repeat in group order
        #[arg(short, long = "sheet", value_parser = parse_sheet_spec, required = true)]
        sheets: Vec<SheetSpec>,

        /// Output directory for the blob and schema.json
        #[arg(short, long)]
        out: PathBuf,

        /// Blob name; the blob is written as <out>/<name>.csv
        #[arg(long, default_value = DEFAULT_BLOB_NAME)]
        blob_name: String,
    },

    /// Validate a schema file.
    Validate {
        /// The schema file to validate
        #[arg(short, long)]
        schema: PathBuf,
    },

    /// Look up a single translation.
    #[command(group(ArgGroup::new("query").required(true).args(["key", "name"])))]
    Lookup {
        /// The schema file describing the blob
        #[arg(short, long)]
        schema: PathBuf,

        /// Directory holding the blob
        #[arg(short, long)]
        blobs: PathBuf,

        /// Language name to load
        #[arg(short, long)]
        language: String,

        /// Flat integer key
        #[arg(short, long)]
        key: Option<usize>,

        /// String key as Group.Key
        #[arg(short, long)]
        name: Option<String>,

        #[arg(long, default_value = DEFAULT_BLOB_NAME)]
        blob_name: String,
    },

    /// View the translations of one language.
    View {
        /// The schema file describing the blob
        #[arg(short, long)]
        schema: PathBuf,

        /// Directory holding the blob
        #[arg(short, long)]
        blobs: PathBuf,

        /// Language name to load
        #[arg(short, long)]
        language: String,

        /// Only show this group
        #[arg(short, long)]
        group: Option<String>,

        #[arg(long, default_value = DEFAULT_BLOB_NAME)]
        blob_name: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args.commands).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(commands: Commands) -> Result<(), Error> {
    match commands {
        Commands::Bundle {
            languages,
            sheets,
            out,
            blob_name,
        } => {
            let report = run_bundle(&languages, &sheets, &out, &blob_name)?;
            println!(
                "✅ Bundled {} keys in {} groups into {}",
                report.keys,
                report.groups,
                report.blob_path.display()
            );
            println!("   Schema written to {}", report.schema_path.display());
        }
        Commands::Validate { schema } => {
            let config = validate_schema_file(&schema)?;
            println!(
                "✅ Schema is valid: {} languages, {} groups, {} keys",
                config.language_count(),
                config.group_count(),
                config.total_keys()
            );
        }
        Commands::Lookup {
            schema,
            blobs,
            language,
            key,
            name,
            blob_name,
        } => {
            let Some(query) = KeyQuery::from_args(key, name) else {
                Args::command()
                    .error(
                        ErrorKind::MissingRequiredArgument,
                        "either --key or --name is required",
                    )
                    .exit();
            };
            let value = run_lookup(&schema, &blobs, &language, &blob_name, &query).await?;
            println!("{}", value);
        }
        Commands::View {
            schema,
            blobs,
            language,
            group,
            blob_name,
        } => {
            let entries =
                collect_view(&schema, &blobs, &language, &blob_name, group.as_deref()).await?;
            print_view(&entries);
        }
    }
    Ok(())
}
