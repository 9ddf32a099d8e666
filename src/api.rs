use crate::{
    config::{self, Config},
    locator::{AspectLocator, ConfiguredLocator},
    mirror::{self, MirrorError, MirrorSummary},
    preview,
    writer::{DefaultAspectWriter, WriterRegistry, DEFAULT_WRITER_NAME},
};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum AspectMirrorError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Mirror(#[from] MirrorError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] config::ConfigError),

    #[error("No aspect writer registered with name: {name}")]
    #[diagnostic(
        code(aspect_mirror::writer_not_found),
        help("Run `aspect-mirror list` to see the available writers")
    )]
    WriterNotFound { name: String },
}

/// Inputs shared by every entry point.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Explicit config file. Falls back to `aspect-mirror.toml` in the working directory.
    pub config: Option<PathBuf>,
    pub writer: String,
    pub destination: PathBuf,
}
impl WriteOptions {
    pub fn new<P: Into<PathBuf>>(destination: P) -> Self {
        Self {
            config: None,
            writer: DEFAULT_WRITER_NAME.to_string(),
            destination: destination.into(),
        }
    }
}

fn build_registry(locator: ConfiguredLocator) -> WriterRegistry {
    let mut registry = WriterRegistry::new();
    registry.register(DefaultAspectWriter::new(locator));

    registry
}

fn load_locator(config_path: Option<&Path>) -> Result<ConfiguredLocator, AspectMirrorError> {
    let config = Config::load(config_path)?;

    Ok(ConfiguredLocator::from_config(&config))
}

/// Mirrors the located aspect directory into `options.destination` using the named writer.
///
/// # Errors
///
/// Returns an [`AspectMirrorError`] if:
///
/// - The config file cannot be read or parsed.
/// - No writer is registered under `options.writer`.
/// - The aspect directory cannot be located.
/// - Any directory or file under the destination cannot be created or written.
pub fn write_aspects(options: &WriteOptions) -> Result<MirrorSummary, AspectMirrorError> {
    let registry = build_registry(load_locator(options.config.as_deref())?);

    let writer =
        registry
            .get(&options.writer)
            .ok_or_else(|| AspectMirrorError::WriterNotFound {
                name: options.writer.clone(),
            })?;

    log::debug!(
        "writing aspects with '{}' into {}",
        writer.name(),
        options.destination.display()
    );

    Ok(writer.write(&options.destination)?)
}

/// Prints what [`write_aspects`] would write without touching the destination.
pub fn preview_aspects(options: &WriteOptions) -> Result<(), AspectMirrorError> {
    let locator = load_locator(options.config.as_deref())?;

    let source = locator
        .aspect_directory()
        .ok_or(MirrorError::SourceUnavailable)?;

    let entries = mirror::plan(&source)?;

    preview::preview_as_tree(&entries, &options.destination);

    Ok(())
}

/// Names of every writer available with the given config.
pub fn writer_names(config_path: Option<&Path>) -> Result<Vec<String>, AspectMirrorError> {
    let registry = build_registry(load_locator(config_path)?);

    Ok(registry.names().map(str::to_string).collect())
}
