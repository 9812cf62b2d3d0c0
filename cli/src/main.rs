use crate::cli::{Args, Command, ContextArgs, RegistryArgs};
use anyhow::{Context, bail};
use clap::Parser;
use oxiri::Iri;
use std::fs::File;
use std::io::{self, Read, Write, stdin, stdout};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use trustshacl::{
    ContextLoader, HttpRegistry, Registry, ShapeLoadError, ShapeVerifier, StaticRegistry,
    TypeFilter, VerifierConfig, canonicalize, extract_types,
};

mod cli;

const REDIRECTION_LIMIT: usize = 5;

pub fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.json_logs);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("trustshacl worker")
        .build()?;
    match args.command {
        Command::Verify {
            file,
            type_name,
            namespace,
            registry,
            contexts,
        } => {
            Iri::parse(namespace.as_str())
                .with_context(|| format!("The namespace {namespace} is not a valid IRI"))?;
            let document: serde_json::Value = serde_json::from_slice(&read_input(file.as_deref())?)
                .context("The input is not a JSON document")?;
            let verifier =
                ShapeVerifier::new(open_registry(&registry)?, VerifierConfig::new(namespace))
                    .with_context_loader(context_loader(&contexts)?);
            let result = runtime.block_on(verifier.verify_shape(&document, &type_name))?;
            let mut stdout = stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &result)?;
            writeln!(stdout)?;
            Ok(if result.conforms {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Shape {
            type_name,
            registry,
            contexts,
        } => {
            // The namespace only matters for membership checks
            let verifier = ShapeVerifier::new(open_registry(&registry)?, VerifierConfig::new(""))
                .with_context_loader(context_loader(&contexts)?);
            let shape = runtime.block_on(verifier.get_shacl_shape(&type_name))?;
            write!(stdout().lock(), "{}", shape.to_canonical_nquads())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Canonicalize { file, contexts } => {
            let document = read_input(file.as_deref())?;
            let quads = canonicalize(&document, &context_loader(&contexts)?)?;
            write!(stdout().lock(), "{quads}")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Types {
            file,
            all,
            contexts,
        } => {
            let document = read_input(file.as_deref())?;
            let quads = canonicalize(&document, &context_loader(&contexts)?)?;
            let filter = if all {
                TypeFilter::empty()
            } else {
                TypeFilter::default()
            };
            let mut stdout = stdout().lock();
            for type_iri in extract_types(quads.as_str(), &filter) {
                writeln!(stdout, "{type_iri}")?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}

fn read_input(file: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if let Some(file) = file {
        File::open(file)
            .with_context(|| format!("Failed to open {}", file.display()))?
            .read_to_end(&mut buffer)?;
    } else {
        stdin().lock().read_to_end(&mut buffer)?;
    }
    Ok(buffer)
}

fn context_loader(args: &ContextArgs) -> anyhow::Result<ContextLoader> {
    let loader = ContextLoader::new();
    Ok(if args.remote_contexts {
        loader.with_remote(Some(Duration::from_secs(30)), REDIRECTION_LIMIT)?
    } else {
        loader
    })
}

fn open_registry(args: &RegistryArgs) -> anyhow::Result<CliRegistry> {
    Ok(match (&args.registry, &args.registry_dir) {
        (_, Some(dir)) => CliRegistry::Directory(
            StaticRegistry::from_dir(dir)
                .with_context(|| format!("Failed to read the registry in {}", dir.display()))?,
        ),
        (Some(url), None) => CliRegistry::Http(HttpRegistry::new(
            url.as_str(),
            Some(Duration::from_secs(args.timeout)),
            REDIRECTION_LIMIT,
        )?),
        (None, None) => bail!("Either --registry or --registry-dir must be set"),
    })
}

/// The registries the command line can be pointed at.
enum CliRegistry {
    Http(HttpRegistry),
    Directory(StaticRegistry),
}

impl Registry for CliRegistry {
    async fn implemented_types(&self) -> Result<Vec<String>, ShapeLoadError> {
        match self {
            Self::Http(registry) => registry.implemented_types().await,
            Self::Directory(registry) => registry.implemented_types().await,
        }
    }

    async fn fetch_shape(&self, type_name: &str) -> Result<String, ShapeLoadError> {
        match self {
            Self::Http(registry) => registry.fetch_shape(type_name).await,
            Self::Directory(registry) => registry.fetch_shape(type_name).await,
        }
    }

    fn shape_location(&self, type_name: &str) -> String {
        match self {
            Self::Http(registry) => registry.shape_location(type_name),
            Self::Directory(registry) => registry.shape_location(type_name),
        }
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::panic_in_result_fn)]

    use super::*;
    use clap::CommandFactory;
    use std::path::PathBuf;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_registry_dir_wins() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("trustshacl-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("implemented.json"), r#"["Member"]"#)?;
        let registry = open_registry(&RegistryArgs {
            registry: None,
            registry_dir: Some(PathBuf::from(&dir)),
            timeout: 1,
        })?;
        assert_eq!(registry.shape_location("Member"), "static:shapes/Member");
        std::fs::remove_dir_all(dir)?;
        Ok(())
    }
}
