// Bounded-buffer stream copy into the storage root.

use std::io::{self, Read, Write};
use std::path::Path;

use crate::config::CopyFailurePolicy;

/// Transfer buffer size used when none is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Copy `reader` into `writer`, `chunk_size` bytes at a time.
///
/// Peak memory is one chunk regardless of source size. Interrupted reads are
/// retried; any other error ends the copy.
pub fn copy_chunked(reader: &mut dyn Read, writer: &mut dyn Write, chunk_size: usize) -> io::Result<u64> {
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;

    loop {
        let len = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(len) => len,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..len])?;
        total += len as u64;
    }

    writer.flush()?;
    Ok(total)
}

/// Copy `reader` to `dest` through a staging file in the same directory.
///
/// The staging file is renamed over `dest` only after the whole source has
/// been written and synced, so a failed copy never touches an existing file
/// and a symlink at `dest` is replaced rather than followed. On failure the
/// staged bytes are discarded, or moved to `dest` under `KeepPartial`.
pub fn copy_to_file(
    reader: &mut dyn Read,
    dest: &Path,
    chunk_size: usize,
    on_failure: CopyFailurePolicy,
) -> io::Result<u64> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = tempfile::Builder::new()
        .prefix(".import-")
        .suffix(".part")
        .tempfile_in(dir)?;

    let result = copy_chunked(reader, staged.as_file_mut(), chunk_size).and_then(|total| {
        staged.as_file().sync_all()?;
        Ok(total)
    });

    match result {
        Ok(total) => {
            staged.persist(dest)?;
            Ok(total)
        }
        Err(e) => {
            match on_failure {
                CopyFailurePolicy::RemovePartial => {
                    log::info!("Discarded partial copy of {}", dest.display());
                }
                CopyFailurePolicy::KeepPartial => match staged.persist(dest) {
                    Ok(_) => log::warn!("Leaving partial file {}", dest.display()),
                    Err(pe) => log::warn!("Failed to keep partial file {}: {}", dest.display(), pe.error),
                },
            }
            Err(e)
        }
    }
}
