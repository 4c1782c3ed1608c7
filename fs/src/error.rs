// fs/src/error.rs

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("no such file")]
    NotFound,
    #[error("inode number out of range")]
    InvalidInode,
    #[error("index out of range")]
    OutOfRange,
    #[error("corrupt filesystem image")]
    CorruptImage,
    #[error("read-only filesystem")]
    ReadOnlyFilesystem,
    #[error("bad file descriptor")]
    BadDescriptor,
    #[error("too many open files")]
    TooManyOpenFiles,
    #[error("operation would block")]
    WouldBlock,
    #[error("file name is empty")]
    EmptyName,
    #[error("file name longer than 32 bytes")]
    NameTooLong,
    #[error("directory is full")]
    DirectoryFull,
    #[error("file needs more data blocks than an inode can index")]
    FileTooLarge,
}

pub type Result<T> = core::result::Result<T, FsError>;
