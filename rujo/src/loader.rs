use std::fs;
use std::io;
use std::path::Path;

/// Reads program text before compilation starts.
pub trait SourceLoader {
    fn load(&self, path: &Path) -> io::Result<String>;
}

/// Loads sources from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        log::debug!("loading `{}`", path.display());
        fs::read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.rujo");
        fs::write(&path, "print(\"hi\");").unwrap();

        assert_eq!(FsLoader.load(&path).unwrap(), "print(\"hi\");");
        let err = FsLoader.load(&dir.path().join("missing.rujo")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
