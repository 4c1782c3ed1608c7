// fs/src/vfs.rs

use alloc::sync::Arc;
use alloc::vec::Vec;
use crate::config::{FD_TABLE_SIZE, FIRST_USER_FD};
use crate::dentry::FileKind;
use crate::error::{FsError, Result};
use crate::ffs::FlatFileSystem;
use crate::file::{File, RegularFile};

/// Driver behind device entries (the RTC).
///
/// Reads on the returned file may complete at once or fail with
/// `FsError::WouldBlock`; the caller decides whether to spin, yield or give up.
pub trait DeviceDriver: Send + Sync {
    fn open(&self) -> Result<Arc<dyn File>>;
}

// ----- Vfs -----

/// Routes opens by entry type: regular files and the directory are served by
/// the filesystem, device entries by the registered driver.
pub struct Vfs<'a> {
    fs: &'a FlatFileSystem<'a>,
    rtc: Option<Arc<dyn DeviceDriver + 'a>>,
}

impl<'a> Vfs<'a> {
    // ----- constructor -----
    pub fn new(fs: &'a FlatFileSystem<'a>) -> Self {
        Self { fs, rtc: None }
    }

    pub fn with_rtc(mut self, driver: Arc<dyn DeviceDriver + 'a>) -> Self {
        self.rtc = Some(driver);
        self
    }

    // ----- methods -----
    pub fn file_system(&self) -> &'a FlatFileSystem<'a> {
        self.fs
    }

    /// what `name` would open as
    pub fn kind_of(&self, name: impl AsRef<[u8]>) -> Result<FileKind> {
        Ok(self.fs.stat(name)?.kind())
    }

    pub fn open(&self, name: impl AsRef<[u8]>) -> Result<Arc<dyn File + 'a>> {
        let (index, entry) = self.fs.find(name.as_ref())?;
        match entry.kind() {
            FileKind::Regular(inode) => Ok(Arc::new(RegularFile::new(self.fs, index, inode.number()))),
            FileKind::Directory => Ok(Arc::new(self.fs.open_directory())),
            FileKind::Device => match &self.rtc {
                Some(driver) => driver.open(),
                None => {
                    log::debug!("open: no driver registered for device entry {}", index);
                    Err(FsError::NotFound)
                }
            },
        }
    }
}

// ----- FdTable -----

/// Per-process descriptor table. Slots below `FIRST_USER_FD` belong to the
/// terminal and are filled by `install`.
pub struct FdTable<'a> {
    fd_table: Vec<Option<Arc<dyn File + 'a>>>,
}

impl<'a> FdTable<'a> {
    // ----- constructor -----
    pub fn new() -> Self {
        let mut fd_table = Vec::with_capacity(FD_TABLE_SIZE);
        fd_table.resize_with(FD_TABLE_SIZE, || None);
        Self { fd_table }
    }

    // ----- methods -----
    /// put `file` at a fixed slot, replacing whatever was there
    pub fn install(&mut self, fd: usize, file: Arc<dyn File + 'a>) -> Result<()> {
        let slot = self.fd_table.get_mut(fd).ok_or(FsError::BadDescriptor)?;
        *slot = Some(file);
        Ok(())
    }

    /// open `name` through `vfs` into the lowest free user slot
    pub fn open(&mut self, vfs: &Vfs<'a>, name: impl AsRef<[u8]>) -> Result<usize> {
        let fd = (FIRST_USER_FD..self.fd_table.len())
            .find(|&fd| self.fd_table[fd].is_none())
            .ok_or(FsError::TooManyOpenFiles)?;
        self.fd_table[fd] = Some(vfs.open(name)?);
        Ok(fd)
    }

    pub fn get(&self, fd: usize) -> Result<Arc<dyn File + 'a>> {
        match self.fd_table.get(fd) {
            Some(Some(file)) => Ok(Arc::clone(file)),
            _ => Err(FsError::BadDescriptor),
        }
    }

    pub fn read(&self, fd: usize, buf: &mut [u8]) -> Result<usize> {
        let file = self.get(fd)?;
        if !file.readable() {
            return Err(FsError::BadDescriptor);
        }
        file.read(buf)
    }

    pub fn write(&self, fd: usize, buf: &[u8]) -> Result<usize> {
        self.get(fd)?.write(buf)
    }

    /// Release a user slot. The terminal slots cannot be closed.
    pub fn close(&mut self, fd: usize) -> Result<()> {
        if fd < FIRST_USER_FD {
            return Err(FsError::BadDescriptor);
        }
        let file = self
            .fd_table
            .get_mut(fd)
            .and_then(Option::take)
            .ok_or(FsError::BadDescriptor)?;
        file.close()
    }
}

impl Default for FdTable<'_> {
    fn default() -> Self {
        Self::new()
    }
}
