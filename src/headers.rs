//! # 头部结构
//!
//! 把按字段表切出的字节解码成带类型的结构体。解码本身不会失败，
//! 长度与签名的校验由 [`crate::inspector`] 在读取时完成。

use crate::constants::{
    BMP_SIGNATURE, DESCRIPTOR_SIZE, EMBED_MARKER, FILE_HEADER_SIZE, INFO_HEADER_SIZE,
};
use crate::layout::{descriptor, file_header, info_header};

/// BMP 文件头。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub signature: [u8; 2],
    /// 头部声明的文件大小，仅供参考，可能与实际大小不符。
    pub declared_file_size: u32,
    pub reserved: u32,
    /// 像素数据相对文件开头的偏移。
    pub data_offset: u32,
}

impl From<&[u8; FILE_HEADER_SIZE]> for FileHeader {
    fn from(block: &[u8; FILE_HEADER_SIZE]) -> Self {
        Self {
            signature: file_header::SIGNATURE.array(block),
            declared_file_size: file_header::FILE_SIZE.u32(block),
            reserved: file_header::RESERVED.u32(block),
            data_offset: file_header::DATA_OFFSET.u32(block),
        }
    }
}

impl FileHeader {
    pub fn has_valid_signature(&self) -> bool {
        self.signature == BMP_SIGNATURE
    }
}

/// BMP 信息头 (经典 40 字节版本)。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoHeader {
    pub header_size: u32,
    pub width: i32,
    /// 负数表示自上而下的行序，此处不做其他解释。
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    /// 0 表示未压缩 (BI_RGB)。
    pub compression: u32,
    /// 像素数据大小；未压缩时允许为 0，表示“未知”。
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl From<&[u8; INFO_HEADER_SIZE]> for InfoHeader {
    fn from(block: &[u8; INFO_HEADER_SIZE]) -> Self {
        Self {
            header_size: info_header::HEADER_SIZE.u32(block),
            width: info_header::WIDTH.i32(block),
            height: info_header::HEIGHT.i32(block),
            planes: info_header::PLANES.u16(block),
            bits_per_pixel: info_header::BITS_PER_PIXEL.u16(block),
            compression: info_header::COMPRESSION.u32(block),
            image_size: info_header::IMAGE_SIZE.u32(block),
            x_pixels_per_meter: info_header::X_PIXELS_PER_METER.i32(block),
            y_pixels_per_meter: info_header::Y_PIXELS_PER_METER.i32(block),
            colors_used: info_header::COLORS_USED.u32(block),
            colors_important: info_header::COLORS_IMPORTANT.u32(block),
        }
    }
}

impl InfoHeader {
    /// 未压缩图像按尺寸推算的像素数据大小。
    ///
    /// 每行按 32 位对齐，总大小为 `行跨度 * |height|`。
    /// 宽度非正、位深为 0 或结果超出 `u32` 时返回 `None`。
    pub fn derived_image_size(&self) -> Option<u32> {
        if self.width <= 0 || self.bits_per_pixel == 0 {
            return None;
        }
        let row_bits = u64::from(self.width.unsigned_abs()) * u64::from(self.bits_per_pixel);
        let stride = row_bits.div_ceil(32) * 4;
        let size = stride.checked_mul(u64::from(self.height.unsigned_abs()))?;
        u32::try_from(size).ok()
    }
}

/// 嵌入描述块，紧跟在像素数据之后，以 `COS1` 开头。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedDescriptor {
    pub magic: u32,
    pub payload_size: u32,
    pub payload_offset: u32,
    /// 原样保存，不做校验。
    pub checksum: u32,
    pub version: String,
    pub description: String,
}

impl From<&[u8; DESCRIPTOR_SIZE]> for EmbedDescriptor {
    fn from(block: &[u8; DESCRIPTOR_SIZE]) -> Self {
        Self {
            magic: descriptor::MAGIC.u32(block),
            payload_size: descriptor::PAYLOAD_SIZE.u32(block),
            payload_offset: descriptor::PAYLOAD_OFFSET.u32(block),
            checksum: descriptor::CHECKSUM.u32(block),
            version: nul_terminated(descriptor::VERSION.bytes(block)),
            description: nul_terminated(descriptor::DESCRIPTION.bytes(block)),
        }
    }
}

impl EmbedDescriptor {
    pub fn has_valid_magic(&self) -> bool {
        self.magic == u32::from_le_bytes(EMBED_MARKER)
    }
}

/// 截取第一个 NUL 之前的内容，非 UTF-8 字节按替换字符处理。
fn nul_terminated(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
