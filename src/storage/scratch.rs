//! Short-lived local copies of remote objects.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// A temporary file that is removed when dropped, on every exit path.
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Write `content` to a new scratch file ending in `.{extension}`.
    ///
    /// The suffix matters: some parsers sniff the format from the name.
    pub fn create(dir: Option<&Path>, extension: &str, content: &[u8]) -> std::io::Result<Self> {
        let suffix = format!(".{}", extension);
        let mut builder = tempfile::Builder::new();
        builder.prefix("docingest-").suffix(&suffix);
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(content)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
