// fs/src/image.rs

use crate::config::BLOCK_SIZE;
use crate::error::{FsError, Result};

/// The three regions of an image, in on-disk order:
/// [boot block][inode 0 .. inode_count][data 0 .. data_block_count]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Boot,
    Inode,
    Data,
}

/// Byte offset of block `index` of region `kind`, relative to the image base.
/// `index` is ignored for the boot block. Returns `None` on address overflow.
pub fn block_address(kind: BlockKind, index: u32, inode_count: u32) -> Option<usize> {
    let block_id = match kind {
        BlockKind::Boot => 0,
        BlockKind::Inode => 1usize.checked_add(index as usize)?,
        BlockKind::Data => 1usize
            .checked_add(inode_count as usize)?
            .checked_add(index as usize)?,
    };
    block_id.checked_mul(BLOCK_SIZE)
}

/// read a little-endian u32 at `offset`
pub fn read_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    let end = offset.checked_add(4).ok_or(FsError::CorruptImage)?;
    let field = bytes.get(offset..end).ok_or(FsError::CorruptImage)?;
    Ok(u32::from_le_bytes([field[0], field[1], field[2], field[3]]))
}

/// write a little-endian u32 at `offset`, panics if out of bounds (image building only)
pub(crate) fn write_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

// ----- Image -----

/// A memory-resident filesystem image.
/// The image is borrowed for the lifetime of the mount and never written.
#[derive(Clone, Copy)]
pub struct Image<'a> {
    data: &'a [u8],
}

impl<'a> Image<'a> {
    // ----- constructor -----
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Borrow `len` bytes starting at a raw address handed over by the boot loader.
    ///
    /// # Safety
    /// `base..base + len` must be mapped, readable and left unmodified for `'a`.
    pub unsafe fn from_raw_parts(base: usize, len: usize) -> Self {
        Self {
            data: unsafe { core::slice::from_raw_parts(base as *const u8, len) },
        }
    }

    // ----- methods -----
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Get one whole block, checked against the end of the image.
    pub fn block(&self, kind: BlockKind, index: u32, inode_count: u32) -> Result<&'a [u8]> {
        let start = block_address(kind, index, inode_count).ok_or(FsError::CorruptImage)?;
        let end = start.checked_add(BLOCK_SIZE).ok_or(FsError::CorruptImage)?;
        self.data.get(start..end).ok_or_else(|| {
            log::warn!("{:?} block {} lies outside the image ({} bytes)", kind, index, self.data.len());
            FsError::CorruptImage
        })
    }
}
