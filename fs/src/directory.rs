// fs/src/directory.rs

use alloc::vec::Vec;
use crate::config::{DENTRY_SIZE, SUPER_BLOCK_HEADER_SIZE};
use crate::dentry::DirEntry;
use crate::error::{FsError, Result};
use crate::super_block::SuperBlock;

/// The single flat directory, decoded from the boot block at mount.
/// Never changes afterwards.
#[derive(Debug, Clone)]
pub struct DirectoryTable {
    entries: Vec<DirEntry>,
}

impl DirectoryTable {
    // ----- constructor -----
    /// Decode the first `directory_count` slots and check every regular entry
    /// points at an inode that exists.
    pub fn parse(boot_block: &[u8], super_block: &SuperBlock) -> Result<Self> {
        let mut entries = Vec::with_capacity(super_block.directory_count as usize);
        for index in 0..super_block.directory_count as usize {
            let start = SUPER_BLOCK_HEADER_SIZE + index * DENTRY_SIZE;
            let slot = boot_block
                .get(start..start + DENTRY_SIZE)
                .ok_or(FsError::CorruptImage)?;
            let entry = DirEntry::parse(slot)?;
            if let Some(inode_number) = entry.inode_number() {
                if inode_number >= super_block.inode_count {
                    log::warn!(
                        "directory entry {} points at inode {}, image has {}",
                        index,
                        inode_number,
                        super_block.inode_count
                    );
                    return Err(FsError::CorruptImage);
                }
            }
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    // ----- methods -----
    pub fn len(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the first entry whose name equals `name` exactly.
    pub fn lookup_by_name(&self, name: &[u8]) -> Option<u32> {
        self.entries
            .iter()
            .position(|entry| entry.matches(name))
            .map(|index| index as u32)
    }

    /// Index of the first entry whose name starts with `name`.
    /// This reproduces the old lookup rule, where "frame" finds "frame0.txt"
    /// and an empty name finds slot 0. `open` never uses it.
    pub fn lookup_by_prefix(&self, name: &[u8]) -> Option<u32> {
        self.entries
            .iter()
            .position(|entry| entry.matches_prefix(name))
            .map(|index| index as u32)
    }

    /// Copy of slot `index`.
    pub fn lookup_by_index(&self, index: u32) -> Result<DirEntry> {
        self.entries
            .get(index as usize)
            .copied()
            .ok_or(FsError::OutOfRange)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DirEntry> + '_ {
        self.entries.iter()
    }
}
