mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::sample_image;
use flat_fs::config::{FD_TABLE_SIZE, FIRST_USER_FD};
use flat_fs::{DeviceDriver, FdTable, File, FileKind, FlatFileSystem, FsError, Result, Vfs};

/// Ticks once every other read, reporting `WouldBlock` in between.
struct FakeRtc {
    polls: AtomicUsize,
}

impl File for FakeRtc {
    fn readable(&self) -> bool {
        true
    }
    fn writable(&self) -> bool {
        true
    }
    fn read(&self, _buf: &mut [u8]) -> Result<usize> {
        if self.polls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
            Err(FsError::WouldBlock)
        } else {
            Ok(0)
        }
    }
    fn write(&self, buf: &[u8]) -> Result<usize> {
        Ok(buf.len())
    }
}

struct FakeRtcDriver;

impl DeviceDriver for FakeRtcDriver {
    fn open(&self) -> Result<Arc<dyn File>> {
        Ok(Arc::new(FakeRtc {
            polls: AtomicUsize::new(0),
        }))
    }
}

/// stands in for the terminal on fds 0 and 1
struct Console;

impl File for Console {
    fn readable(&self) -> bool {
        true
    }
    fn writable(&self) -> bool {
        true
    }
    fn read(&self, buf: &mut [u8]) -> Result<usize> {
        buf.fill(b'\n');
        Ok(buf.len().min(1))
    }
    fn write(&self, buf: &[u8]) -> Result<usize> {
        Ok(buf.len())
    }
}

#[test]
fn test_kind_of() {
    let image = sample_image();
    let fs = FlatFileSystem::mount(&image).unwrap();
    let vfs = Vfs::new(&fs);
    assert_eq!(vfs.kind_of("rtc"), Ok(FileKind::Device));
    assert_eq!(vfs.kind_of("."), Ok(FileKind::Directory));
    match vfs.kind_of("frame0.txt") {
        Ok(FileKind::Regular(inode)) => assert_eq!(inode.number(), 3),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(vfs.kind_of("nope"), Err(FsError::NotFound));
}

#[test]
fn test_dispatch_by_type() {
    let image = sample_image();
    let fs = FlatFileSystem::mount(&image).unwrap();
    let vfs = Vfs::new(&fs).with_rtc(Arc::new(FakeRtcDriver));

    let mut buf = [0u8; 32];
    let file = vfs.open("frame0.txt").unwrap();
    assert_eq!(file.read(&mut buf), Ok(5));
    assert_eq!(&buf[..5], b"hello");

    let dir = vfs.open(".").unwrap();
    assert_eq!(dir.read(&mut buf), Ok(32));
    assert_eq!(&buf[..4], b"rtc\0");

    let rtc = vfs.open("rtc").unwrap();
    assert_eq!(rtc.read(&mut buf), Err(FsError::WouldBlock));
    assert_eq!(rtc.read(&mut buf), Ok(0));
    assert_eq!(rtc.write(&[0, 0, 0, 2]), Ok(4));
}

#[test]
fn test_device_without_driver() {
    let image = sample_image();
    let fs = FlatFileSystem::mount(&image).unwrap();
    let vfs = Vfs::new(&fs);
    assert_eq!(vfs.open("rtc").err(), Some(FsError::NotFound));
}

#[test]
fn test_fd_table() {
    let image = sample_image();
    let fs = FlatFileSystem::mount(&image).unwrap();
    let vfs = Vfs::new(&fs).with_rtc(Arc::new(FakeRtcDriver));
    let mut fd_table = FdTable::new();
    fd_table.install(0, Arc::new(Console)).unwrap();
    fd_table.install(1, Arc::new(Console)).unwrap();

    let fd = fd_table.open(&vfs, "frame0.txt").unwrap();
    assert_eq!(fd, FIRST_USER_FD);
    let mut buf = [0u8; 3];
    assert_eq!(fd_table.read(fd, &mut buf), Ok(3));
    assert_eq!(&buf, b"hel");
    assert_eq!(fd_table.read(fd, &mut buf), Ok(2));
    assert_eq!(&buf[..2], b"lo");
    assert_eq!(fd_table.write(fd, b"x"), Err(FsError::ReadOnlyFilesystem));
    assert_eq!(fd_table.write(1, b"x"), Ok(1));

    // a second open gets the next slot and its own cursor
    let again = fd_table.open(&vfs, "frame0.txt").unwrap();
    assert_eq!(again, FIRST_USER_FD + 1);
    assert_eq!(fd_table.read(again, &mut buf), Ok(3));
    assert_eq!(&buf, b"hel");

    assert_eq!(fd_table.close(fd), Ok(()));
    assert_eq!(fd_table.read(fd, &mut buf), Err(FsError::BadDescriptor));
    assert_eq!(fd_table.close(fd), Err(FsError::BadDescriptor));

    // the freed slot is reused
    assert_eq!(fd_table.open(&vfs, "."), Ok(FIRST_USER_FD));
}

#[test]
fn test_fd_table_limits() {
    let image = sample_image();
    let fs = FlatFileSystem::mount(&image).unwrap();
    let vfs = Vfs::new(&fs);
    let mut fd_table = FdTable::new();

    for fd in FIRST_USER_FD..FD_TABLE_SIZE {
        assert_eq!(fd_table.open(&vfs, "large.bin"), Ok(fd));
    }
    assert_eq!(fd_table.open(&vfs, "large.bin"), Err(FsError::TooManyOpenFiles));
    assert_eq!(fd_table.open(&vfs, "missing.txt"), Err(FsError::TooManyOpenFiles));

    let mut buf = [0u8; 1];
    assert_eq!(fd_table.read(FD_TABLE_SIZE, &mut buf), Err(FsError::BadDescriptor));
    assert_eq!(fd_table.read(0, &mut buf), Err(FsError::BadDescriptor));
    assert_eq!(fd_table.close(0), Err(FsError::BadDescriptor));
    assert_eq!(fd_table.close(FD_TABLE_SIZE + 3), Err(FsError::BadDescriptor));
    assert_eq!(fd_table.install(FD_TABLE_SIZE, Arc::new(Console)), Err(FsError::BadDescriptor));
}

#[test]
fn test_failed_open_keeps_slot_free() {
    let image = sample_image();
    let fs = FlatFileSystem::mount(&image).unwrap();
    let vfs = Vfs::new(&fs);
    let mut fd_table = FdTable::new();
    assert_eq!(fd_table.open(&vfs, "missing.txt"), Err(FsError::NotFound));
    assert_eq!(fd_table.open(&vfs, "rtc"), Err(FsError::NotFound));
    assert_eq!(fd_table.open(&vfs, "frame1.txt"), Ok(FIRST_USER_FD));
}
