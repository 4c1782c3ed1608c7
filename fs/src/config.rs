// fs/src/config.rs

pub const BLOCK_SIZE: usize = 4096;

// boot block: 64-byte header followed by the directory slots
pub const SUPER_BLOCK_HEADER_SIZE: usize = 64;
pub const DENTRY_SIZE: usize = 64;
pub const FILENAME_LEN: usize = 32;
pub const MAX_DENTRIES: usize = (BLOCK_SIZE - SUPER_BLOCK_HEADER_SIZE) / DENTRY_SIZE; // 63

// dentry field offsets
pub(crate) const DENTRY_TYPE_OFFSET: usize = FILENAME_LEN;
pub(crate) const DENTRY_INODE_OFFSET: usize = FILENAME_LEN + 4;

// on-disk file type codes
pub(crate) const FILE_TYPE_RTC: u32 = 0;
pub(crate) const FILE_TYPE_DIRECTORY: u32 = 1;
pub(crate) const FILE_TYPE_REGULAR: u32 = 2;

// inode: one u32 length, then data block indices filling the rest of the block
pub const INODE_BLOCK_CAPACITY: usize = BLOCK_SIZE / 4 - 1; // 1023
pub const MAX_FILE_SIZE: usize = INODE_BLOCK_CAPACITY * BLOCK_SIZE;

// slot 0 holds "." and is skipped by directory reads
pub const FIRST_LISTED_DENTRY: u32 = 1;

// file descriptors, 0 and 1 belong to the terminal
pub const FD_TABLE_SIZE: usize = 8;
pub const FIRST_USER_FD: usize = 2;
