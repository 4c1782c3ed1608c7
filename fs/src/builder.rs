// fs/src/builder.rs

use alloc::vec;
use alloc::vec::Vec;
use crate::config::{
    BLOCK_SIZE, DENTRY_SIZE, FILENAME_LEN, INODE_BLOCK_CAPACITY, MAX_DENTRIES, SUPER_BLOCK_HEADER_SIZE,
};
use crate::dentry::{DirEntry, FileType};
use crate::error::{FsError, Result};
use crate::image::{block_address, write_u32, BlockKind};
use crate::super_block::SuperBlock;

struct PendingEntry {
    name: Vec<u8>,
    file_type: FileType,
    data: Vec<u8>,
}

/// Assembles a complete image in memory.
///
/// Slot 0 is always the "." directory entry. Every regular file gets the next
/// inode and a run of consecutive data blocks; an empty file gets an inode and
/// no blocks.
pub struct ImageBuilder {
    entries: Vec<PendingEntry>,
}

impl ImageBuilder {
    // ----- constructor -----
    pub fn new() -> Self {
        Self {
            entries: vec![PendingEntry {
                name: b".".to_vec(),
                file_type: FileType::Directory,
                data: Vec::new(),
            }],
        }
    }

    // ----- methods -----
    fn push(&mut self, name: &[u8], file_type: FileType, data: &[u8]) -> Result<&mut Self> {
        // a listing reads an all-NUL name as nothing at all
        if name.is_empty() || name[0] == 0 {
            return Err(FsError::EmptyName);
        }
        if name.len() > FILENAME_LEN {
            return Err(FsError::NameTooLong);
        }
        if self.entries.len() >= MAX_DENTRIES {
            return Err(FsError::DirectoryFull);
        }
        if data.len().div_ceil(BLOCK_SIZE) > INODE_BLOCK_CAPACITY {
            return Err(FsError::FileTooLarge);
        }
        self.entries.push(PendingEntry {
            name: name.to_vec(),
            file_type,
            data: data.to_vec(),
        });
        Ok(self)
    }

    pub fn add_file(&mut self, name: impl AsRef<[u8]>, data: impl AsRef<[u8]>) -> Result<&mut Self> {
        self.push(name.as_ref(), FileType::Regular, data.as_ref())
    }

    pub fn add_device(&mut self, name: impl AsRef<[u8]>) -> Result<&mut Self> {
        self.push(name.as_ref(), FileType::Rtc, &[])
    }

    pub fn add_directory(&mut self, name: impl AsRef<[u8]>) -> Result<&mut Self> {
        self.push(name.as_ref(), FileType::Directory, &[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lay out the boot block, inode region and data region.
    pub fn build(&self) -> Result<Vec<u8>> {
        let files = || self.entries.iter().filter(|e| e.file_type == FileType::Regular);
        let inode_count = files().count() as u32;
        let data_block_count: u32 = files()
            .map(|e| e.data.len().div_ceil(BLOCK_SIZE) as u32)
            .sum();
        let super_block = SuperBlock::new(self.entries.len() as u32, inode_count, data_block_count);

        let image_len = super_block.image_len().ok_or(FsError::FileTooLarge)?;
        let mut image = vec![0u8; image_len];
        super_block.write_to(&mut image[..BLOCK_SIZE]);

        let mut next_inode = 0u32;
        let mut next_data_block = 0u32;
        for (index, entry) in self.entries.iter().enumerate() {
            let inode_number = match entry.file_type {
                FileType::Regular => {
                    let inode_number = next_inode;
                    next_inode += 1;
                    let inode_start = block_address(BlockKind::Inode, inode_number, inode_count)
                        .ok_or(FsError::OutOfRange)?;
                    write_u32(&mut image, inode_start, entry.data.len() as u32);
                    for (inner_id, chunk) in entry.data.chunks(BLOCK_SIZE).enumerate() {
                        write_u32(&mut image, inode_start + 4 + inner_id * 4, next_data_block);
                        let data_start = block_address(BlockKind::Data, next_data_block, inode_count)
                            .ok_or(FsError::OutOfRange)?;
                        image[data_start..data_start + chunk.len()].copy_from_slice(chunk);
                        next_data_block += 1;
                    }
                    inode_number
                }
                _ => 0,
            };
            let slot_start = SUPER_BLOCK_HEADER_SIZE + index * DENTRY_SIZE;
            DirEntry::new(&entry.name, entry.file_type, inode_number)?
                .write_to(&mut image[slot_start..slot_start + DENTRY_SIZE]);
        }
        log::debug!(
            "built image: {} entries, {} inodes, {} data blocks",
            self.entries.len(),
            inode_count,
            data_block_count
        );
        Ok(image)
    }
}

impl Default for ImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}
