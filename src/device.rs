//! The abstract device-memory collaborator: the core never manages GPU
//! buffers itself, it only ever allocates, writes and reads through this
//! trait. `HostMemory` is an in-process reference implementation used by
//! this crate's own tests and by `blastool`; a real binding would back
//! `write`/`read` with actual GPU buffer transfers.

use crate::error::{Error, Result};

pub type DeviceHandle = usize;

pub trait DeviceMemory {
    fn alloc(&mut self, n_bytes: usize) -> Result<DeviceHandle>;
    fn write(&mut self, handle: DeviceHandle, offset: usize, bytes: &[u8]) -> Result<()>;
    fn read(&self, handle: DeviceHandle, offset: usize, n_bytes: usize) -> Result<Vec<u8>>;
}

#[derive(Debug, Default)]
pub struct HostMemory {
    buffers: Vec<Vec<u8>>,
}

impl DeviceMemory for HostMemory {
    fn alloc(&mut self, n_bytes: usize) -> Result<DeviceHandle> {
        self.buffers.push(vec![0u8; n_bytes]);
        Ok(self.buffers.len() - 1)
    }

    fn write(&mut self, handle: DeviceHandle, offset: usize, bytes: &[u8]) -> Result<()> {
        let buf = self.buffers.get_mut(handle).ok_or_else(|| Error::invalid("unknown device handle"))?;
        if offset + bytes.len() > buf.len() {
            return Err(Error::AllocationFailure { requested: offset + bytes.len() });
        }
        buf[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    fn read(&self, handle: DeviceHandle, offset: usize, n_bytes: usize) -> Result<Vec<u8>> {
        let buf = self.buffers.get(handle).ok_or_else(|| Error::invalid("unknown device handle"))?;
        if offset + n_bytes > buf.len() {
            return Err(Error::ShortRead { expected: n_bytes, actual: buf.len().saturating_sub(offset) });
        }
        Ok(buf[offset..offset + n_bytes].to_vec())
    }
}
