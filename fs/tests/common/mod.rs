//! Common image fixtures for the integration tests

#![allow(unused)]

use flat_fs::config::{BLOCK_SIZE, DENTRY_SIZE, SUPER_BLOCK_HEADER_SIZE};
use flat_fs::ImageBuilder;

pub const HELLO: &[u8] = b"hello";

/// 4100 bytes: block 0 is all 'a', the 4 bytes in block 1 are "bcde"
pub fn two_block_file() -> Vec<u8> {
    let mut data = vec![b'a'; BLOCK_SIZE];
    data.extend_from_slice(b"bcde");
    data
}

/// bytes whose value encodes their position, so misplaced reads show up
pub fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// slots: ".", "rtc", "pad0", "pad1", "pad2", "frame0.txt", "frame1.txt", "large.bin", "empty"
/// inodes: pad0..pad2 = 0..2, frame0.txt = 3, frame1.txt = 4, large.bin = 5, empty = 6
pub fn sample_image() -> Vec<u8> {
    let mut builder = ImageBuilder::new();
    builder
        .add_device("rtc")
        .unwrap()
        .add_file("pad0", b"0")
        .unwrap()
        .add_file("pad1", b"1")
        .unwrap()
        .add_file("pad2", b"2")
        .unwrap()
        .add_file("frame0.txt", HELLO)
        .unwrap()
        .add_file("frame1.txt", two_block_file())
        .unwrap()
        .add_file("large.bin", patterned(3 * BLOCK_SIZE + 17))
        .unwrap()
        .add_file("empty", b"")
        .unwrap();
    builder.build().unwrap()
}

pub const SAMPLE_ENTRIES: &[&str] = &[
    ".", "rtc", "pad0", "pad1", "pad2", "frame0.txt", "frame1.txt", "large.bin", "empty",
];

/// overwrite a little-endian u32 anywhere in the image
pub fn patch_u32(image: &mut [u8], offset: usize, value: u32) {
    image[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

pub fn inode_offset(inode_number: usize) -> usize {
    (1 + inode_number) * BLOCK_SIZE
}

pub fn slot_offset(index: usize) -> usize {
    SUPER_BLOCK_HEADER_SIZE + index * DENTRY_SIZE
}

/// Leak an image so it can back a `'static` mount.
pub fn leak(image: Vec<u8>) -> &'static [u8] {
    Box::leak(image.into_boxed_slice())
}
