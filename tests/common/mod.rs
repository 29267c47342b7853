#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const MIB: usize = 1024 * 1024;

/// 构造测试用 BMP 的参数
pub struct Bitmap {
    pub total: usize,
    pub signature: [u8; 2],
    /// `None` 表示与 `total` 一致
    pub declared_size: Option<u32>,
    pub data_offset: u32,
    pub header_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
}

impl Default for Bitmap {
    fn default() -> Self {
        Self {
            total: 2 * MIB,
            signature: *b"BM",
            declared_size: None,
            data_offset: 54,
            header_size: 40,
            width: 1000,
            height: 500,
            planes: 1,
            bits_per_pixel: 24,
            compression: 0,
            image_size: 1_500_000,
        }
    }
}

impl Bitmap {
    /// 生成文件内容，头部之后全部填 0
    pub fn bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.total.max(54)];
        buf[0..2].copy_from_slice(&self.signature);
        let declared = self.declared_size.unwrap_or(self.total as u32);
        buf[2..6].copy_from_slice(&declared.to_le_bytes());
        buf[10..14].copy_from_slice(&self.data_offset.to_le_bytes());
        buf[14..18].copy_from_slice(&self.header_size.to_le_bytes());
        buf[18..22].copy_from_slice(&self.width.to_le_bytes());
        buf[22..26].copy_from_slice(&self.height.to_le_bytes());
        buf[26..28].copy_from_slice(&self.planes.to_le_bytes());
        buf[28..30].copy_from_slice(&self.bits_per_pixel.to_le_bytes());
        buf[30..34].copy_from_slice(&self.compression.to_le_bytes());
        buf[34..38].copy_from_slice(&self.image_size.to_le_bytes());
        buf.truncate(self.total);
        buf
    }

    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        write_bytes(dir, name, &self.bytes())
    }
}

pub fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("Failed to write test bitmap.");
    path
}

/// 构造 96 字节的 COS1 描述块
pub fn descriptor(payload_size: u32, payload_offset: u32, version: &str, description: &str) -> Vec<u8> {
    let mut block = vec![0u8; 96];
    block[0..4].copy_from_slice(b"COS1");
    block[4..8].copy_from_slice(&payload_size.to_le_bytes());
    block[8..12].copy_from_slice(&payload_offset.to_le_bytes());
    block[12..16].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
    block[16..16 + version.len()].copy_from_slice(version.as_bytes());
    block[32..32 + description.len()].copy_from_slice(description.as_bytes());
    block
}
