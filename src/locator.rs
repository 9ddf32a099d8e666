use crate::config::Config;
use std::path::PathBuf;

/// Environment variable that overrides every configured location.
pub const ASPECT_DIR_ENV: &str = "ASPECT_MIRROR_DIR";

/// Resolves the directory aspects are mirrored from.
pub trait AspectLocator {
    /// Returns the resolved directory, or `None` if it could not be found.
    fn aspect_directory(&self) -> Option<PathBuf>;
}
impl<F> AspectLocator for F
where
    F: Fn() -> Option<PathBuf>,
{
    fn aspect_directory(&self) -> Option<PathBuf> {
        self()
    }
}

/// Probes the environment, then the configured directory, then every search path.
///
/// The first candidate that exists and is a directory wins.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocator {
    candidates: Vec<PathBuf>,
}
impl ConfiguredLocator {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::from_parts(std::env::var_os(ASPECT_DIR_ENV).map(PathBuf::from), config)
    }

    fn from_parts(env_override: Option<PathBuf>, config: &Config) -> Self {
        let aspects = &config.aspects;

        let candidates = env_override
            .into_iter()
            .chain(aspects.directory.clone())
            .chain(
                aspects
                    .search_paths
                    .iter()
                    .map(|root| root.join(&aspects.subdirectory)),
            )
            .collect();

        Self { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }
}
impl AspectLocator for ConfiguredLocator {
    fn aspect_directory(&self) -> Option<PathBuf> {
        for candidate in &self.candidates {
            if candidate.is_dir() {
                log::debug!("aspect directory resolved to {}", candidate.display());
                return Some(candidate.clone());
            }

            log::warn!("skipping aspect candidate {}", candidate.display());
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AspectsConfig;
    use std::{fs, path::Path};

    fn config(directory: Option<&Path>, search_paths: &[&Path]) -> Config {
        Config {
            aspects: AspectsConfig {
                directory: directory.map(Path::to_path_buf),
                search_paths: search_paths.iter().map(|p| p.to_path_buf()).collect(),
                ..AspectsConfig::default()
            },
        }
    }

    #[test]
    fn test_candidate_order() {
        let cfg = config(Some(Path::new("/explicit")), &[Path::new("/one"), Path::new("/two")]);

        let locator = ConfiguredLocator::from_parts(Some(PathBuf::from("/env")), &cfg);

        assert_eq!(
            locator.candidates(),
            &[
                PathBuf::from("/env"),
                PathBuf::from("/explicit"),
                PathBuf::from("/one/aspect"),
                PathBuf::from("/two/aspect"),
            ]
        );
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let root = tempfile::tempdir().unwrap();
        let second = root.path().join("second");
        fs::create_dir_all(second.join("aspect")).unwrap();
        let cfg = config(
            Some(root.path().join("missing").as_path()),
            &[root.path().join("first").as_path(), second.as_path()],
        );

        let locator = ConfiguredLocator::from_parts(None, &cfg);

        assert_eq!(locator.aspect_directory(), Some(second.join("aspect")));
    }

    #[test]
    fn test_files_are_not_directories() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("aspect.txt");
        fs::write(&file, "not a dir").unwrap();

        let locator = ConfiguredLocator::new(vec![file]);

        assert_eq!(locator.aspect_directory(), None);
    }

    #[test]
    fn test_nothing_configured() {
        let locator = ConfiguredLocator::from_parts(None, &Config::default());

        assert!(locator.candidates().is_empty());
        assert_eq!(locator.aspect_directory(), None);
    }

    #[test]
    fn test_closure_locator() {
        let locator = || Some(PathBuf::from("/somewhere"));

        assert_eq!(locator.aspect_directory(), Some(PathBuf::from("/somewhere")));
    }
}
