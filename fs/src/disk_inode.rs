// fs/src/disk_inode.rs

use crate::config::{BLOCK_SIZE, INODE_BLOCK_CAPACITY, MAX_FILE_SIZE};
use crate::error::{FsError, Result};
use crate::image::{read_u32, BlockKind, Image};
use crate::super_block::SuperBlock;

// ----- Disk Inode -----

/// a DiskInode is a view of one inode block
/// layout: size u32, then data block indices, one per BLOCK_SIZE chunk of the file
pub struct DiskInode<'a> {
    block: &'a [u8],
}

impl<'a> DiskInode<'a> {
    // ----- constructor -----
    pub fn new(block: &'a [u8]) -> Self {
        Self { block }
    }

    // ----- methods -----
    /// file size in bytes
    pub fn size(&self) -> Result<u32> {
        read_u32(self.block, 0)
    }

    pub fn data_block_num(&self) -> Result<u32> {
        Ok(Self::data_block_num_(self.size()?))
    }

    fn data_block_num_(size: u32) -> u32 {
        size.div_ceil(BLOCK_SIZE as u32)
    }

    /// index of the data block holding the `inner_id`-th chunk of the file
    pub fn get_block_id(&self, inner_id: u32) -> Result<u32> {
        if inner_id >= self.data_block_num()? || inner_id as usize >= INODE_BLOCK_CAPACITY {
            return Err(FsError::OutOfRange);
        }
        read_u32(self.block, 4 + inner_id as usize * 4)
    }

    /// Read file bytes starting at `offset` into `buf`, crossing block boundaries.
    /// Returns the number of bytes copied. At or past the end of the file the whole
    /// of `buf` is zeroed and 0 is returned.
    pub fn read_at(
        &self,
        offset: usize,
        buf: &mut [u8],
        image: &Image<'_>,
        super_block: &SuperBlock,
    ) -> Result<usize> {
        let size = self.size()? as usize;
        if size > MAX_FILE_SIZE {
            log::warn!("inode claims {} bytes, at most {} can be indexed", size, MAX_FILE_SIZE);
            return Err(FsError::CorruptImage);
        }
        if offset >= size {
            buf.fill(0);
            return Ok(0);
        }

        let mut start = offset;
        let end = offset + buf.len().min(size - offset);
        let mut read_size = 0usize;

        while start < end {
            // end of the current block, or of the requested range
            let inner_id = start / BLOCK_SIZE;
            let end_current_block = ((inner_id + 1) * BLOCK_SIZE).min(end);
            let block_read_size = end_current_block - start;

            let block_id = self.get_block_id(inner_id as u32)?;
            if block_id >= super_block.data_block_count {
                log::warn!(
                    "inode references data block {}, image has {}",
                    block_id,
                    super_block.data_block_count
                );
                return Err(FsError::CorruptImage);
            }
            let data_block = image.block(BlockKind::Data, block_id, super_block.inode_count)?;

            let block_offset = start % BLOCK_SIZE;
            buf[read_size..read_size + block_read_size]
                .copy_from_slice(&data_block[block_offset..block_offset + block_read_size]);

            read_size += block_read_size;
            start = end_current_block;
        }

        Ok(read_size)
    }
}
