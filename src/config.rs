use crate::errors::{FileOperation, IoError};
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "aspect-mirror.toml";
const DEFAULT_SUBDIRECTORY: &str = "aspect";

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(aspect_mirror::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(aspect_mirror::config::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Where to look for the aspect directory.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AspectsConfig {
    /// Used as-is when set.
    pub directory: Option<PathBuf>,
    /// Roots probed in order, each joined with `subdirectory`.
    pub search_paths: Vec<PathBuf>,
    pub subdirectory: PathBuf,
}
impl Default for AspectsConfig {
    fn default() -> Self {
        Self {
            directory: None,
            search_paths: Vec::new(),
            subdirectory: PathBuf::from(DEFAULT_SUBDIRECTORY),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub aspects: AspectsConfig,
}
impl Config {
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source: err,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        Self::parse(&content, path)
    }

    /// Loads `path` if given, otherwise [`DEFAULT_CONFIG_FILE`] from the working directory.
    ///
    /// Only the defaulted file may be absent, in which case an empty config is returned.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        match fs::read_to_string(default_path) {
            Ok(content) => Self::parse(&content, default_path),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                log::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(Self::default())
            }
            Err(error) => Err(IoError::new(
                FileOperation::Read,
                default_path.to_path_buf(),
                error,
            ))?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let content = r#"
            [aspects]
            directory = "/opt/aspects"
            search_paths = ["/a", "/b"]
            subdirectory = "defs"
        "#;

        let config = Config::parse(content, Path::new("x.toml")).unwrap();

        assert_eq!(config.aspects.directory, Some(PathBuf::from("/opt/aspects")));
        assert_eq!(
            config.aspects.search_paths,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
        assert_eq!(config.aspects.subdirectory, PathBuf::from("defs"));
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = Config::parse("", Path::new("x.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.aspects.subdirectory, PathBuf::from("aspect"));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = Config::parse("[aspects\n", Path::new("broken.toml"));

        assert!(matches!(result, Err(ConfigError::ParseToml { path, .. }) if path == Path::new("broken.toml")));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = Config::load(Some(&dir.path().join("nope.toml")));

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[aspects]\ndirectory = \"/srv/aspects\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.aspects.directory, Some(PathBuf::from("/srv/aspects")));
    }
}
