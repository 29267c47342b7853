//! # 错误类型
//!
//! 检查过程中所有可能的失败都收敛到 [`InspectError`] 中，
//! 每个变体都携带足够的上下文 (偏移、期望值与实际值) 以便诊断。

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 一次检查的失败原因。所有错误都会立即终止检查，不做重试。
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("file too small: {actual} bytes, need at least {minimum} bytes")]
    TooSmall { actual: u64, minimum: u64 },

    #[error("truncated file header: need {needed} bytes, got {available}")]
    TruncatedHeader { needed: usize, available: usize },

    #[error("invalid BMP signature: expected \"BM\", found {found:02X?}")]
    InvalidSignature { found: [u8; 2] },

    #[error("truncated info header: need {needed} bytes, got {available}")]
    TruncatedInfoHeader { needed: usize, available: usize },

    #[error("corrupt header: {0}")]
    CorruptHeader(#[from] CorruptHeader),

    #[error("truncated embed descriptor at offset {offset}: need {needed} bytes, got {available}")]
    TruncatedDescriptor {
        offset: u64,
        needed: usize,
        available: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// 头部字段之间相互矛盾的具体情形。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CorruptHeader {
    #[error("pixel data offset {data_offset} + image size {image_size} overflows 32 bits")]
    EndOverflow { data_offset: u32, image_size: u32 },

    #[error("image data ends at {image_data_end}, beyond the file size {file_size}")]
    EndBeyondFile { image_data_end: u32, file_size: u64 },

    #[error(
        "image size is 0 and cannot be derived (width {width}, height {height}, {bits_per_pixel} bpp, compression {compression})"
    )]
    UnknownImageSize {
        width: i32,
        height: i32,
        bits_per_pixel: u16,
        compression: u32,
    },
}

pub type Result<T> = std::result::Result<T, InspectError>;
