// fs/src/file.rs

use alloc::vec::Vec;
use spin::Mutex;
use crate::config::FIRST_LISTED_DENTRY;
use crate::error::{FsError, Result};
use crate::ffs::FlatFileSystem;

/// `File` trait, implemented by everything a descriptor can point at
pub trait File: Send + Sync {
    fn readable(&self) -> bool;
    fn writable(&self) -> bool;
    fn read(&self, buf: &mut [u8]) -> Result<usize>;
    fn write(&self, buf: &[u8]) -> Result<usize>;
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

// ----- RegularFile -----

/// An open regular file: the entry it came from plus a private read cursor.
pub struct RegularFile<'a> {
    fs: &'a FlatFileSystem<'a>,
    directory_index: u32,
    inode_number: u32,
    inner: Mutex<RegularFileInner>,
}

struct RegularFileInner {
    cursor: u32,
}

impl<'a> RegularFile<'a> {
    pub(crate) fn new(fs: &'a FlatFileSystem<'a>, directory_index: u32, inode_number: u32) -> Self {
        Self {
            fs,
            directory_index,
            inode_number,
            inner: Mutex::new(RegularFileInner { cursor: 0 }),
        }
    }

    pub fn directory_index(&self) -> u32 {
        self.directory_index
    }

    pub fn inode_number(&self) -> u32 {
        self.inode_number
    }

    /// bytes consumed so far
    pub fn cursor(&self) -> u32 {
        self.inner.lock().cursor
    }

    /// Read everything from the cursor to the end of the file.
    pub fn read_data(&self) -> Result<Vec<u8>> {
        let mut inner = self.inner.lock();
        let mut buffer = [0u8; 512];
        let mut v: Vec<u8> = Vec::new();
        loop {
            let len = self
                .fs
                .read_at(self.inode_number, inner.cursor as usize, &mut buffer)?;
            if len == 0 {
                break;
            }
            inner.cursor += len as u32;
            v.extend_from_slice(&buffer[..len]);
        }
        Ok(v)
    }
}

impl File for RegularFile<'_> {
    fn readable(&self) -> bool {
        true
    }
    fn writable(&self) -> bool {
        false
    }
    /// Read from the cursor and advance it by the bytes copied.
    /// At end of file `buf` is zeroed and 0 is returned, every time.
    fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        let len = self
            .fs
            .read_at(self.inode_number, inner.cursor as usize, buf)?;
        inner.cursor += len as u32;
        Ok(len)
    }
    fn write(&self, _buf: &[u8]) -> Result<usize> {
        log::debug!("write to inode {} rejected", self.inode_number);
        Err(FsError::ReadOnlyFilesystem)
    }
}

// ----- DirectoryFile -----

enum DirCursor<'a> {
    Owned(Mutex<u32>),
    Shared(&'a Mutex<u32>),
}

/// An open directory. Each read yields the name of the next entry, starting
/// after slot 0, then 0 forever once the table is exhausted.
pub struct DirectoryFile<'a> {
    fs: &'a FlatFileSystem<'a>,
    cursor: DirCursor<'a>,
}

impl<'a> DirectoryFile<'a> {
    pub(crate) fn new(fs: &'a FlatFileSystem<'a>) -> Self {
        Self {
            fs,
            cursor: DirCursor::Owned(Mutex::new(FIRST_LISTED_DENTRY)),
        }
    }

    pub(crate) fn shared(fs: &'a FlatFileSystem<'a>, cursor: &'a Mutex<u32>) -> Self {
        Self {
            fs,
            cursor: DirCursor::Shared(cursor),
        }
    }

    fn cursor(&self) -> &Mutex<u32> {
        match &self.cursor {
            DirCursor::Owned(cursor) => cursor,
            DirCursor::Shared(cursor) => *cursor,
        }
    }

    /// slot index the next read will return
    pub fn position(&self) -> u32 {
        *self.cursor().lock()
    }

    /// Copy the next entry's name into `buf` (at most 32 bytes, NUL padded
    /// within that window) and advance. Returns the bytes written, which is
    /// never 0 for a real entry, or 0 once every entry has been read. An empty
    /// `buf` does not consume an entry.
    pub fn read_next_entry(&self, buf: &mut [u8]) -> usize {
        if buf.is_empty() {
            return 0;
        }
        let mut position = self.cursor().lock();
        match self.fs.copy_entry_name(*position, buf) {
            Some(len) => {
                *position += 1;
                len
            }
            None => 0,
        }
    }
}

impl File for DirectoryFile<'_> {
    fn readable(&self) -> bool {
        true
    }
    fn writable(&self) -> bool {
        false
    }
    fn read(&self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.read_next_entry(buf))
    }
    fn write(&self, _buf: &[u8]) -> Result<usize> {
        Err(FsError::ReadOnlyFilesystem)
    }
}
