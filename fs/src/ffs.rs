// fs/src/ffs.rs

use alloc::vec;
use alloc::vec::Vec;
use spin::{Mutex, Once};
use crate::config::{BLOCK_SIZE, FIRST_LISTED_DENTRY};
use crate::dentry::{DirEntry, FileKind};
use crate::directory::DirectoryTable;
use crate::disk_inode::DiskInode;
use crate::error::{FsError, Result};
use crate::file::{DirectoryFile, RegularFile};
use crate::image::{BlockKind, Image};
use crate::super_block::SuperBlock;

/// Flat File System, mounted over a memory-resident image.
/// Holds no state besides the decoded header and the shared directory cursor.
pub struct FlatFileSystem<'a> {
    image: Image<'a>,
    super_block: SuperBlock,
    directory: DirectoryTable,
    shared_dir_cursor: Mutex<u32>,
}

impl<'a> FlatFileSystem<'a> {
    // ----- constructor -----
    /// Mount an image. The header and directory are checked here, so later
    /// lookups only fail on missing names.
    pub fn mount(data: &'a [u8]) -> Result<Self> {
        let image = Image::new(data);
        let boot_block = image.block(BlockKind::Boot, 0, 0)?;
        let super_block = SuperBlock::parse(boot_block)?;

        match super_block.image_len() {
            Some(len) if len <= image.len() => {}
            _ => {
                log::warn!(
                    "image is {} bytes, header describes {} inodes and {} data blocks",
                    image.len(),
                    super_block.inode_count,
                    super_block.data_block_count
                );
                return Err(FsError::CorruptImage);
            }
        }

        let directory = DirectoryTable::parse(boot_block, &super_block)?;
        log::info!(
            "mounted flat fs: {} entries, {} inodes, {} data blocks",
            super_block.directory_count,
            super_block.inode_count,
            super_block.data_block_count
        );

        Ok(Self {
            image,
            super_block,
            directory,
            shared_dir_cursor: Mutex::new(FIRST_LISTED_DENTRY),
        })
    }

    /// Mount the image the boot loader left at `base`.
    /// Only the boot block is touched until its counts give the full length.
    ///
    /// # Safety
    /// `base` must point at a readable image that stays mapped and unmodified forever.
    pub unsafe fn mount_at(base: usize) -> Result<FlatFileSystem<'static>> {
        if base == 0 {
            return Err(FsError::CorruptImage);
        }
        let header = unsafe { Image::from_raw_parts(base, BLOCK_SIZE) };
        let super_block = SuperBlock::parse(header.as_bytes())?;
        let len = super_block.image_len().ok_or(FsError::CorruptImage)?;
        let image: Image<'static> = unsafe { Image::from_raw_parts(base, len) };
        FlatFileSystem::mount(image.as_bytes())
    }

    // ----- methods -----
    pub fn super_block(&self) -> &SuperBlock {
        &self.super_block
    }

    pub fn directory(&self) -> &DirectoryTable {
        &self.directory
    }

    pub fn image(&self) -> Image<'a> {
        self.image
    }

    /// every entry in slot order, "." included
    pub fn list(&self) -> impl Iterator<Item = &DirEntry> + '_ {
        self.directory.iter()
    }

    fn disk_inode(&self, inode_number: u32) -> Result<DiskInode<'a>> {
        if inode_number >= self.super_block.inode_count {
            return Err(FsError::InvalidInode);
        }
        let block = self
            .image
            .block(BlockKind::Inode, inode_number, self.super_block.inode_count)?;
        Ok(DiskInode::new(block))
    }

    /// size in bytes of the file behind `inode_number`
    pub fn file_size(&self, inode_number: u32) -> Result<u32> {
        self.disk_inode(inode_number)?.size()
    }

    /// Read from an explicit byte offset of a file. Stateless; see `RegularFile` for a cursor.
    pub fn read_at(&self, inode_number: u32, offset: usize, buf: &mut [u8]) -> Result<usize> {
        self.disk_inode(inode_number)?
            .read_at(offset, buf, &self.image, &self.super_block)
    }

    /// Copy a whole file to the front of `dest`, e.g. to stage a program image.
    pub fn load_into(&self, inode_number: u32, dest: &mut [u8]) -> Result<usize> {
        let size = self.file_size(inode_number)? as usize;
        let dest = dest.get_mut(..size).ok_or(FsError::OutOfRange)?;
        let mut loaded = 0usize;
        while loaded < size {
            let len = self.read_at(inode_number, loaded, &mut dest[loaded..])?;
            if len == 0 {
                break;
            }
            loaded += len;
        }
        Ok(loaded)
    }

    pub fn read_to_vec(&self, inode_number: u32) -> Result<Vec<u8>> {
        let mut v = vec![0u8; self.file_size(inode_number)? as usize];
        let len = self.load_into(inode_number, &mut v)?;
        v.truncate(len);
        Ok(v)
    }

    /// slot index and entry for an exact name
    pub(crate) fn find(&self, name: &[u8]) -> Result<(u32, DirEntry)> {
        let Some(index) = self.directory.lookup_by_name(name) else {
            log::debug!("lookup: no entry named {:?}", core::str::from_utf8(name).unwrap_or("<non-utf8>"));
            return Err(FsError::NotFound);
        };
        Ok((index, self.directory.lookup_by_index(index)?))
    }

    /// find an entry by exact name
    pub fn stat(&self, name: impl AsRef<[u8]>) -> Result<DirEntry> {
        Ok(self.find(name.as_ref())?.1)
    }

    /// Open a regular file by name. Devices and the directory are rejected
    /// with `NotFound`; they have their own open paths.
    pub fn open(&self, name: impl AsRef<[u8]>) -> Result<RegularFile<'_>> {
        let (index, entry) = self.find(name.as_ref())?;
        match entry.kind() {
            FileKind::Regular(inode) => Ok(RegularFile::new(self, index, inode.number())),
            kind => {
                log::debug!("open: entry {} is {:?}, not a regular file", index, kind);
                Err(FsError::NotFound)
            }
        }
    }

    /// Open the directory with a cursor of its own.
    pub fn open_directory(&self) -> DirectoryFile<'_> {
        DirectoryFile::new(self)
    }

    /// Open the directory on the cursor shared by the whole mount.
    /// Every handle returned here advances the same position, so two listings
    /// running at once see each other's progress.
    pub fn open_directory_shared(&self) -> DirectoryFile<'_> {
        DirectoryFile::shared(self, &self.shared_dir_cursor)
    }

    /// put the shared directory cursor back on the first listed entry
    pub fn rewind_shared_directory(&self) {
        *self.shared_dir_cursor.lock() = FIRST_LISTED_DENTRY;
    }

    /// Copy the name of entry `index` into `buf`, NUL padded, for directory
    /// reads. Returns the bytes written, `min(buf.len(), 32)`, or `None` past
    /// the last entry.
    pub(crate) fn copy_entry_name(&self, index: u32, buf: &mut [u8]) -> Option<usize> {
        let entry = self.directory.lookup_by_index(index).ok()?;
        let name = entry.name();
        let window = buf.len().min(entry.raw_name().len());
        let len = name.len().min(window);
        buf[..len].copy_from_slice(&name[..len]);
        buf[len..window].fill(0);
        Some(window)
    }
}

// ----- Global mount -----

static FILE_SYSTEM: Once<FlatFileSystem<'static>> = Once::new();

/// Mount the boot image once for the whole kernel. Later calls return the first mount.
pub fn init(image: &'static [u8]) -> Result<&'static FlatFileSystem<'static>> {
    if let Some(fs) = FILE_SYSTEM.get() {
        return Ok(fs);
    }
    let fs = FlatFileSystem::mount(image)?;
    Ok(FILE_SYSTEM.call_once(|| fs))
}

/// Like `init`, from the raw address the boot loader reported.
///
/// # Safety
/// See `FlatFileSystem::mount_at`.
pub unsafe fn init_at(base: usize) -> Result<&'static FlatFileSystem<'static>> {
    if let Some(fs) = FILE_SYSTEM.get() {
        return Ok(fs);
    }
    let fs = unsafe { FlatFileSystem::mount_at(base)? };
    Ok(FILE_SYSTEM.call_once(|| fs))
}

/// the mounted filesystem, `None` before `init`
pub fn file_system() -> Option<&'static FlatFileSystem<'static>> {
    FILE_SYSTEM.get()
}
