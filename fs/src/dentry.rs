// fs/src/dentry.rs

use crate::config::{
    DENTRY_INODE_OFFSET, DENTRY_SIZE, DENTRY_TYPE_OFFSET, FILENAME_LEN, FILE_TYPE_DIRECTORY,
    FILE_TYPE_REGULAR, FILE_TYPE_RTC,
};
use crate::error::{FsError, Result};
use crate::image::{read_u32, write_u32};

// ----- FileType -----

#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileType {
    Rtc = FILE_TYPE_RTC,
    Directory = FILE_TYPE_DIRECTORY,
    Regular = FILE_TYPE_REGULAR,
}

impl FileType {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            FILE_TYPE_RTC => Some(Self::Rtc),
            FILE_TYPE_DIRECTORY => Some(Self::Directory),
            FILE_TYPE_REGULAR => Some(Self::Regular),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}

/// An inode number taken from a regular-file entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InodeRef(u32);

impl InodeRef {
    pub fn number(self) -> u32 {
        self.0
    }
}

/// What an entry opens to, decided once at open time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Device,
    Directory,
    Regular(InodeRef),
}

// ----- DirEntry -----

/// DirEntry represents one 64-byte directory slot
/// layout: name[32] (NUL padded, not necessarily terminated), type u32, inode u32, 24 reserved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirEntry {
    name: [u8; FILENAME_LEN],
    file_type: FileType,
    inode_number: u32,
}

impl DirEntry {
    // ----- constructor -----
    pub fn new(name: &[u8], file_type: FileType, inode_number: u32) -> Result<Self> {
        if name.len() > FILENAME_LEN {
            return Err(FsError::NameTooLong);
        }
        let mut name_bytes = [0u8; FILENAME_LEN];
        name_bytes[..name.len()].copy_from_slice(name);
        Ok(Self {
            name: name_bytes,
            file_type,
            inode_number,
        })
    }

    /// Decode one slot. An unknown type code means the image is corrupt.
    pub fn parse(slot: &[u8]) -> Result<Self> {
        if slot.len() < DENTRY_SIZE {
            return Err(FsError::CorruptImage);
        }
        let code = read_u32(slot, DENTRY_TYPE_OFFSET)?;
        let file_type = FileType::from_code(code).ok_or_else(|| {
            log::warn!("directory entry has unknown file type {}", code);
            FsError::CorruptImage
        })?;
        let mut name = [0u8; FILENAME_LEN];
        name.copy_from_slice(&slot[..FILENAME_LEN]);
        Ok(Self {
            name,
            file_type,
            inode_number: read_u32(slot, DENTRY_INODE_OFFSET)?,
        })
    }

    // ----- methods -----
    pub(crate) fn write_to(&self, slot: &mut [u8]) {
        slot[..FILENAME_LEN].copy_from_slice(&self.name);
        write_u32(slot, DENTRY_TYPE_OFFSET, self.file_type.code());
        write_u32(slot, DENTRY_INODE_OFFSET, self.inode_number);
    }

    /// the name up to its first NUL, at most 32 bytes
    pub fn name(&self) -> &[u8] {
        let len = self.name.iter().position(|&b| b == 0).unwrap_or(FILENAME_LEN);
        &self.name[..len]
    }

    pub fn name_str(&self) -> Option<&str> {
        core::str::from_utf8(self.name()).ok()
    }

    /// the raw 32-byte name field, padding included
    pub fn raw_name(&self) -> &[u8; FILENAME_LEN] {
        &self.name
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// only regular files own an inode
    pub fn inode_number(&self) -> Option<u32> {
        match self.file_type {
            FileType::Regular => Some(self.inode_number),
            _ => None,
        }
    }

    pub fn kind(&self) -> FileKind {
        match self.file_type {
            FileType::Rtc => FileKind::Device,
            FileType::Directory => FileKind::Directory,
            FileType::Regular => FileKind::Regular(InodeRef(self.inode_number)),
        }
    }

    /// Exact comparison: `query` must equal the stored name with its padding removed.
    pub fn matches(&self, query: &[u8]) -> bool {
        self.name() == query
    }

    /// Comparison bounded by the query length: any stored name starting with `query` matches,
    /// and an empty query matches everything. Kept for images built against that rule.
    pub fn matches_prefix(&self, query: &[u8]) -> bool {
        query.len() <= FILENAME_LEN && self.name.starts_with(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_length_name() {
        let name = [b'x'; FILENAME_LEN];
        let entry = DirEntry::new(&name, FileType::Regular, 4).unwrap();
        assert_eq!(entry.name(), &name[..]);
        assert!(entry.matches(&name));
        assert!(!entry.matches(&name[..31]));
        assert_eq!(
            DirEntry::new(&[b'x'; FILENAME_LEN + 1], FileType::Regular, 4),
            Err(FsError::NameTooLong)
        );
    }

    #[test]
    fn test_exact_and_prefix_match() {
        let entry = DirEntry::new(b"verylargetextwithverylongname.tx", FileType::Regular, 1).unwrap();
        assert!(!entry.matches(b"verylarge"));
        assert!(entry.matches_prefix(b"verylarge"));
        assert!(entry.matches_prefix(b""));
        assert!(!entry.matches_prefix(b"verylargetextwithverylongname.txt"));

        let short = DirEntry::new(b"ls", FileType::Regular, 2).unwrap();
        assert!(short.matches(b"ls"));
        assert!(!short.matches(b"ls\0"));
        assert!(!short.matches_prefix(b"lsx"));
    }

    #[test]
    fn test_slot_layout() {
        let mut slot = [0u8; DENTRY_SIZE];
        DirEntry::new(b"rtc", FileType::Rtc, 0).unwrap().write_to(&mut slot);
        assert_eq!(&slot[..4], b"rtc\0");
        assert_eq!(slot[32], 0);
        let entry = DirEntry::parse(&slot).unwrap();
        assert_eq!(entry.kind(), FileKind::Device);
        assert_eq!(entry.inode_number(), None);

        slot[DENTRY_TYPE_OFFSET] = 7;
        assert_eq!(DirEntry::parse(&slot), Err(FsError::CorruptImage));
    }

    #[test]
    fn test_regular_kind() {
        let entry = DirEntry::new(b"frame0.txt", FileType::Regular, 3).unwrap();
        match entry.kind() {
            FileKind::Regular(inode) => assert_eq!(inode.number(), 3),
            other => panic!("unexpected kind {:?}", other),
        }
        assert_eq!(entry.name_str(), Some("frame0.txt"));
    }
}
