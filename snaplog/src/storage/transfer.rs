use std::fs::{self, File};
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

/// Byte-copy primitive used to move content between a working tree and a remote.
pub trait Transfer {
    /// Copies `src` to `dst`, creating parent directories. Returns the number of bytes written.
    fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64>;
}

/// Copies through a sibling temporary file that replaces `dst` only once the whole content
/// and the source modification time are on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalTransfer;

impl Transfer for LocalTransfer {
    fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64> {
        let parent = dst.parent().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("{} has no parent directory", dst.display()))
        })?;
        fs::create_dir_all(parent)?;

        let mut source = File::open(src)?;
        let metadata = source.metadata()?;

        let mut temp_file = NamedTempFile::new_in(parent)?;
        let written = io::copy(&mut source, temp_file.as_file_mut())?;
        if written != metadata.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("copied {} of {} bytes from {}", written, metadata.len(), src.display()),
            ));
        }
        temp_file.as_file().set_modified(metadata.modified()?)?;
        temp_file.as_file().sync_all()?;

        // On failure the temp file is dropped and removed; dst is untouched.
        temp_file.persist(dst).map_err(|e| e.error)?;
        Ok(written)
    }
}
