use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "trustshacl")]
/// Trust framework membership and SHACL checks for verifiable presentations
pub struct Args {
    /// Write logs to stderr as JSON lines
    ///
    /// The log level is read from the RUST_LOG environment variable and defaults to "warn".
    #[arg(long, global = true)]
    pub json_logs: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a JSON-LD presentation against the shape of a trust framework type
    ///
    /// Prints the verdict as JSON. The exit status is 0 if the presentation conforms,
    /// 1 if it does not or if it declares types the trust framework does not implement.
    Verify {
        /// JSON-LD file to validate
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Short name of the trust framework type whose shape applies
        #[arg(short = 't', long = "type")]
        type_name: String,
        /// Namespace the registry type names live in, e.g. "https://example.org/tf#"
        #[arg(long, env = "TRUSTSHACL_NAMESPACE")]
        namespace: String,
        #[command(flatten)]
        registry: RegistryArgs,
        #[command(flatten)]
        contexts: ContextArgs,
    },
    /// Print the shape of a trust framework type as canonical N-Quads
    Shape {
        /// Short name of the trust framework type
        #[arg(short = 't', long = "type")]
        type_name: String,
        #[command(flatten)]
        registry: RegistryArgs,
        #[command(flatten)]
        contexts: ContextArgs,
    },
    /// Print the canonical N-Quads of a JSON-LD document
    Canonicalize {
        /// JSON-LD file to canonicalize
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        #[command(flatten)]
        contexts: ContextArgs,
    },
    /// Print the types a JSON-LD document declares, one per line
    Types {
        /// JSON-LD file to read
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Also print the presentation, credential and proof envelope types
        #[arg(long)]
        all: bool,
        #[command(flatten)]
        contexts: ContextArgs,
    },
}

#[derive(clap::Args)]
pub struct RegistryArgs {
    /// Base URL of the trust framework registry
    ///
    /// It must serve "/shapes/implemented" and "/shapes/{type}".
    #[arg(
        long,
        env = "TRUSTSHACL_REGISTRY",
        value_hint = ValueHint::Url,
        required_unless_present = "registry_dir",
        conflicts_with = "registry_dir"
    )]
    pub registry: Option<String>,
    /// Directory used as registry instead of a server
    ///
    /// It must contain "implemented.json", the JSON array of type names,
    /// and a "{type}.ttl" or "{type}.jsonld" shape file per type.
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub registry_dir: Option<PathBuf>,
    /// Timeout of the registry requests, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

#[derive(clap::Args)]
pub struct ContextArgs {
    /// Fetch the JSON-LD contexts that are not bundled over HTTP
    #[arg(long)]
    pub remote_contexts: bool,
}
