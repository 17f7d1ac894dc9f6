//! Bit-exact file round-trip for a built [`Tlas`] blob. The on-disk format
//! is the in-memory blob verbatim, with no framing and no versioning, so
//! the only job here is pushing bytes across the file-descriptor boundary
//! without assuming a single `read`/`write` call moves everything.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::tlas::Tlas;

/// Write `tlas`'s blob to `path`, retrying until every byte is accepted by
/// the OS or a write fails outright.
pub fn write_tlas(tlas: &Tlas, path: impl AsRef<Path>) -> Result<()> {
    let mut file = File::create(path)?;
    write_all_tolerant(&mut file, tlas.blob())
}

fn write_all_tolerant(file: &mut File, mut bytes: &[u8]) -> Result<()> {
    while !bytes.is_empty() {
        let n = file.write(bytes)?;
        if n == 0 {
            return Err(Error::ShortRead { expected: bytes.len(), actual: 0 });
        }
        bytes = &bytes[n..];
    }
    Ok(())
}

/// Read a raw TLAS blob from `path`, retrying short reads until the full
/// file has been consumed. A read that stops producing bytes before EOF is
/// reported as expected, rather than silently truncating the blob.
pub fn read_tlas_blob(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let expected = file.metadata()?.len() as usize;
    let mut buf = vec![0u8; expected];
    let mut filled = 0usize;

    while filled < expected {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            return Err(Error::ShortRead { expected, actual: filled });
        }
        filled += n;
    }

    Ok(buf)
}
