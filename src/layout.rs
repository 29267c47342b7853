//! # 固定布局字段表
//!
//! 用一张声明式的表描述每个头部字段 (名称、偏移、宽度、符号、字节序)，
//! 解码时只按表取值，避免在各处手写偏移计算。
//! 偏移均相对于所在结构体的起始位置，所有多字节整数都是小端序。

use std::ops::Range;

/// 字段的编码方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 原样保留的字节串。
    Bytes(usize),
    U16,
    U32,
    I32,
}

impl FieldKind {
    pub const fn width(self) -> usize {
        match self {
            FieldKind::Bytes(n) => n,
            FieldKind::U16 => 2,
            FieldKind::U32 | FieldKind::I32 => 4,
        }
    }
}

/// 结构体中的一个字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
}

impl Field {
    const fn new(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self { name, offset, kind }
    }

    pub const fn end(&self) -> usize {
        self.offset + self.kind.width()
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// 取出字段对应的原始字节。
    ///
    /// # Panics
    ///
    /// 如果 `block` 比字段表描述的结构体短。调用方总是传入定长数组。
    pub fn bytes<'a>(&self, block: &'a [u8]) -> &'a [u8] {
        &block[self.range()]
    }

    pub fn array<const N: usize>(&self, block: &[u8]) -> [u8; N] {
        debug_assert_eq!(self.kind.width(), N, "field {} has a different width", self.name);
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(block));
        out
    }

    pub fn u16(&self, block: &[u8]) -> u16 {
        debug_assert_eq!(self.kind, FieldKind::U16, "field {} is not a u16", self.name);
        u16::from_le_bytes(self.array(block))
    }

    pub fn u32(&self, block: &[u8]) -> u32 {
        debug_assert_eq!(self.kind, FieldKind::U32, "field {} is not a u32", self.name);
        u32::from_le_bytes(self.array(block))
    }

    pub fn i32(&self, block: &[u8]) -> i32 {
        debug_assert_eq!(self.kind, FieldKind::I32, "field {} is not an i32", self.name);
        i32::from_le_bytes(self.array(block))
    }
}

/// BITMAPFILEHEADER (14 字节)。
pub mod file_header {
    use super::{Field, FieldKind};

    pub const SIGNATURE: Field = Field::new("signature", 0, FieldKind::Bytes(2));
    pub const FILE_SIZE: Field = Field::new("file_size", 2, FieldKind::U32);
    pub const RESERVED: Field = Field::new("reserved", 6, FieldKind::U32);
    pub const DATA_OFFSET: Field = Field::new("data_offset", 10, FieldKind::U32);

    pub const FIELDS: &[Field] = &[SIGNATURE, FILE_SIZE, RESERVED, DATA_OFFSET];
}

/// BITMAPINFOHEADER (40 字节)，紧跟在文件头之后。
pub mod info_header {
    use super::{Field, FieldKind};

    pub const HEADER_SIZE: Field = Field::new("header_size", 0, FieldKind::U32);
    pub const WIDTH: Field = Field::new("width", 4, FieldKind::I32);
    pub const HEIGHT: Field = Field::new("height", 8, FieldKind::I32);
    pub const PLANES: Field = Field::new("planes", 12, FieldKind::U16);
    pub const BITS_PER_PIXEL: Field = Field::new("bits_per_pixel", 14, FieldKind::U16);
    pub const COMPRESSION: Field = Field::new("compression", 16, FieldKind::U32);
    pub const IMAGE_SIZE: Field = Field::new("image_size", 20, FieldKind::U32);
    pub const X_PIXELS_PER_METER: Field = Field::new("x_pixels_per_meter", 24, FieldKind::I32);
    pub const Y_PIXELS_PER_METER: Field = Field::new("y_pixels_per_meter", 28, FieldKind::I32);
    pub const COLORS_USED: Field = Field::new("colors_used", 32, FieldKind::U32);
    pub const COLORS_IMPORTANT: Field = Field::new("colors_important", 36, FieldKind::U32);

    pub const FIELDS: &[Field] = &[
        HEADER_SIZE,
        WIDTH,
        HEIGHT,
        PLANES,
        BITS_PER_PIXEL,
        COMPRESSION,
        IMAGE_SIZE,
        X_PIXELS_PER_METER,
        Y_PIXELS_PER_METER,
        COLORS_USED,
        COLORS_IMPORTANT,
    ];
}

/// 嵌入描述块 (96 字节)，以 `COS1` 标记开头。
pub mod descriptor {
    use super::{Field, FieldKind};

    pub const MAGIC: Field = Field::new("magic", 0, FieldKind::U32);
    pub const PAYLOAD_SIZE: Field = Field::new("payload_size", 4, FieldKind::U32);
    pub const PAYLOAD_OFFSET: Field = Field::new("payload_offset", 8, FieldKind::U32);
    pub const CHECKSUM: Field = Field::new("checksum", 12, FieldKind::U32);
    pub const VERSION: Field = Field::new("version", 16, FieldKind::Bytes(16));
    pub const DESCRIPTION: Field = Field::new("description", 32, FieldKind::Bytes(64));

    pub const FIELDS: &[Field] = &[
        MAGIC,
        PAYLOAD_SIZE,
        PAYLOAD_OFFSET,
        CHECKSUM,
        VERSION,
        DESCRIPTION,
    ];
}

/// 字段表是否恰好连续铺满 `size` 字节。
pub fn is_contiguous(fields: &[Field], size: usize) -> bool {
    let mut cursor = 0;
    for field in fields {
        if field.offset != cursor {
            return false;
        }
        cursor = field.end();
    }
    cursor == size
}
