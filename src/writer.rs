use crate::{
    locator::AspectLocator,
    mirror::{self, MirrorError, MirrorSummary},
};
use indexmap::IndexMap;
use std::path::Path;

pub const DEFAULT_WRITER_NAME: &str = "Default Aspects";

/// A named strategy for putting aspect definitions into a destination directory.
pub trait AspectWriter {
    /// Short human readable label, unique within a [`WriterRegistry`].
    fn name(&self) -> &str;

    fn write(&self, destination: &Path) -> Result<MirrorSummary, MirrorError>;
}

/// Mirrors whatever directory its locator resolves.
#[derive(Debug, Clone)]
pub struct DefaultAspectWriter<L: AspectLocator> {
    locator: L,
}
impl<L: AspectLocator> DefaultAspectWriter<L> {
    pub fn new(locator: L) -> Self {
        Self { locator }
    }
}
impl<L: AspectLocator> AspectWriter for DefaultAspectWriter<L> {
    fn name(&self) -> &str {
        DEFAULT_WRITER_NAME
    }

    fn write(&self, destination: &Path) -> Result<MirrorSummary, MirrorError> {
        let source = self
            .locator
            .aspect_directory()
            .ok_or(MirrorError::SourceUnavailable)?;

        mirror::mirror(&source, destination)
    }
}

/// Writers keyed by [`AspectWriter::name`], kept in registration order.
#[derive(Default)]
pub struct WriterRegistry {
    writers: IndexMap<String, Box<dyn AspectWriter>>,
}
impl WriterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `writer`, replacing any writer that already has the same name.
    pub fn register<W: AspectWriter + 'static>(&mut self, writer: W) {
        let name = writer.name().to_string();

        if self.writers.insert(name.clone(), Box::new(writer)).is_some() {
            log::debug!("replaced aspect writer '{}'", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn AspectWriter> {
        self.writers.get(name).map(|writer| writer.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.writers.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf};

    struct Named(&'static str);
    impl AspectWriter for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn write(&self, _destination: &Path) -> Result<MirrorSummary, MirrorError> {
            Ok(MirrorSummary::default())
        }
    }

    #[test]
    fn test_default_writer_name() {
        let writer = DefaultAspectWriter::new(|| None::<PathBuf>);

        assert_eq!(writer.name(), "Default Aspects");
    }

    #[test]
    fn test_default_writer_mirrors_located_directory() {
        let src = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.txt"), "hello").unwrap();
        let dst = tempfile::tempdir().unwrap();
        let located = src.path().to_path_buf();

        let writer = DefaultAspectWriter::new(move || Some(located.clone()));
        let summary = writer.write(dst.path()).unwrap();

        assert_eq!(summary.files, 1);
        assert_eq!(fs::read_to_string(dst.path().join("a.txt")).unwrap(), "hello");
    }

    #[test]
    fn test_default_writer_without_source_touches_nothing() {
        let parent = tempfile::tempdir().unwrap();
        let dst = parent.path().join("dst");

        let writer = DefaultAspectWriter::new(|| None::<PathBuf>);
        let result = writer.write(&dst);

        assert!(matches!(result, Err(MirrorError::SourceUnavailable)));
        assert!(!dst.exists());
    }

    #[test]
    fn test_registry_keeps_registration_order() {
        let mut registry = WriterRegistry::new();
        registry.register(Named("zeta"));
        registry.register(DefaultAspectWriter::new(|| None::<PathBuf>));
        registry.register(Named("alpha"));

        let names: Vec<&str> = registry.names().collect();

        assert_eq!(names, vec!["zeta", "Default Aspects", "alpha"]);
        assert!(registry.get("Default Aspects").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_registry_replaces_duplicate_names() {
        let mut registry = WriterRegistry::new();
        registry.register(Named("same"));
        registry.register(Named("same"));

        assert_eq!(registry.names().count(), 1);
    }
}
