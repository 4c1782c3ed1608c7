//! Read-only driver for the flat boot-image filesystem.
//!
//! Image layout, in 4 KiB blocks:
//! - Boot block: counts header, then up to 63 directory slots
//! - Inode blocks: one per regular file (length + data block indices)
//! - Data blocks
//!
//! The image is borrowed from memory and never written.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod image;
pub mod super_block;
pub mod dentry;
pub mod directory;
mod disk_inode;
pub mod ffs;
pub mod file;
pub mod vfs;
pub mod builder;

extern crate alloc;

pub use builder::ImageBuilder;
pub use dentry::{DirEntry, FileKind, FileType, InodeRef};
pub use directory::DirectoryTable;
pub use error::{FsError, Result};
pub use ffs::{file_system, init, init_at, FlatFileSystem};
pub use file::{DirectoryFile, File, RegularFile};
pub use image::{block_address, BlockKind, Image};
pub use super_block::SuperBlock;
pub use vfs::{DeviceDriver, FdTable, Vfs};
