use std::{fs, io, path::PathBuf};

use log::debug;

use super::Sink;

/// Writes images into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

impl Sink for FileSink {
    fn persist(&mut self, name: &str, bytes: &[u8]) -> io::Result<String> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, bytes)?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_into_nested_dir() -> io::Result<()> {
        let tmp = tempfile::tempdir()?;
        let mut sink = FileSink::new(tmp.path().join("out"));

        let id = sink.persist("img.png", &[1, 2, 3])?;
        assert_eq!(fs::read(&id)?, vec![1, 2, 3]);
        assert!(id.ends_with("img.png"));
        Ok(())
    }

    #[test]
    fn unwritable_target_is_an_error() -> io::Result<()> {
        let tmp = tempfile::NamedTempFile::new()?;
        // a file where the directory should be
        let mut sink = FileSink::new(tmp.path());
        assert!(sink.persist("img.png", &[0]).is_err());
        Ok(())
    }
}
