// fs/src/super_block.rs

use crate::config::{BLOCK_SIZE, MAX_DENTRIES};
use crate::error::{FsError, Result};
use crate::image::{read_u32, write_u32};

/// Header of the boot block.
/// layout: directory_count, inode_count, data_block_count, then 52 reserved bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuperBlock {
    pub directory_count: u32,
    pub inode_count: u32,
    pub data_block_count: u32,
}

impl SuperBlock {
    // ----- constructor -----
    pub fn new(directory_count: u32, inode_count: u32, data_block_count: u32) -> Self {
        Self {
            directory_count,
            inode_count,
            data_block_count,
        }
    }

    /// Parse the header at the start of the boot block.
    pub fn parse(boot_block: &[u8]) -> Result<Self> {
        let super_block = Self {
            directory_count: read_u32(boot_block, 0)?,
            inode_count: read_u32(boot_block, 4)?,
            data_block_count: read_u32(boot_block, 8)?,
        };
        if !super_block.is_valid() {
            log::warn!(
                "boot block claims {} directory entries, at most {} fit",
                super_block.directory_count,
                MAX_DENTRIES
            );
            return Err(FsError::CorruptImage);
        }
        Ok(super_block)
    }

    // ----- methods -----
    pub fn is_valid(&self) -> bool {
        self.directory_count as usize <= MAX_DENTRIES
    }

    /// total number of blocks the counts describe, boot block included
    pub fn total_blocks(&self) -> Option<usize> {
        1usize
            .checked_add(self.inode_count as usize)?
            .checked_add(self.data_block_count as usize)
    }

    /// image length in bytes implied by the counts
    pub fn image_len(&self) -> Option<usize> {
        self.total_blocks()?.checked_mul(BLOCK_SIZE)
    }

    pub(crate) fn write_to(&self, boot_block: &mut [u8]) {
        write_u32(boot_block, 0, self.directory_count);
        write_u32(boot_block, 4, self.inode_count);
        write_u32(boot_block, 8, self.data_block_count);
    }
}
