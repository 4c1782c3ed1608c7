//! Host-side helpers behind the `flat-fs-fuse` tool: build an image from a
//! directory, map an existing image, and render its contents.

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::Path;

use flat_fs::{FileType, FlatFileSystem, FsError, ImageBuilder};
use memmap::{Mmap, MmapOptions};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Fs(#[from] FsError),
    #[error("file name is not valid UTF-8: {0:?}")]
    BadName(OsString),
}

pub type Result<T> = std::result::Result<T, ToolError>;

/// Pack every regular file directly inside `source`, sorted by name.
/// Subdirectories are skipped; the image has a single flat directory.
pub fn pack_dir(source: &Path, with_rtc: bool) -> Result<Vec<u8>> {
    let mut files = Vec::new();
    for dir_entry in std::fs::read_dir(source)? {
        let dir_entry = dir_entry?;
        if !dir_entry.file_type()?.is_file() {
            log::debug!("skip {:?}: not a regular file", dir_entry.path());
            continue;
        }
        let name = dir_entry.file_name().into_string().map_err(ToolError::BadName)?;
        files.push((name, dir_entry.path()));
    }
    files.sort();

    let mut builder = ImageBuilder::new();
    if with_rtc {
        builder.add_device("rtc")?;
    }
    for (name, path) in files {
        let data = std::fs::read(&path)?;
        log::info!("pack {} ({} bytes)", name, data.len());
        builder.add_file(&name, &data)?;
    }
    Ok(builder.build()?)
}

pub fn write_image(image: &[u8], target: &Path) -> Result<()> {
    std::fs::write(target, image)?;
    Ok(())
}

/// Map an image file read-only. The mapping plays the role of the boot module.
pub fn map_image(path: &Path) -> Result<Mmap> {
    let file = File::open(path)?;
    let m = unsafe { MmapOptions::new().map(&file)? };
    Ok(m)
}

fn type_name(file_type: FileType) -> &'static str {
    match file_type {
        FileType::Rtc => "rtc",
        FileType::Directory => "dir",
        FileType::Regular => "file",
    }
}

/// one line per slot: index, type, inode, size, name
pub fn list(efs: &FlatFileSystem<'_>) -> Result<Vec<String>> {
    efs.list()
        .enumerate()
        .map(|(slot, entry)| {
            let name = String::from_utf8_lossy(entry.name());
            let kind = type_name(entry.file_type());
            Ok(match entry.inode_number() {
                Some(inode) => {
                    let size = efs.file_size(inode)?;
                    format!("{:>2} {:<4} {:>5} {:>8} {}", slot, kind, inode, size, name)
                }
                None => format!("{:>2} {:<4} {:>5} {:>8} {}", slot, kind, "-", "-", name),
            })
        })
        .collect()
}

/// whole contents of the regular file `name`
pub fn cat(efs: &FlatFileSystem<'_>, name: &str) -> Result<Vec<u8>> {
    let file = efs.open(name)?;
    Ok(file.read_data()?)
}
