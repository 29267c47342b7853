/// BMP 文件头 (BITMAPFILEHEADER) 的大小 (字节)。
pub const FILE_HEADER_SIZE: usize = 14;

/// 经典信息头 (BITMAPINFOHEADER) 的大小 (字节)。
/// 其他尺寸的信息头只会产生警告，不会被进一步解析。
pub const INFO_HEADER_SIZE: usize = 40;

/// 合法 BMP 文件开头的两个字节。
pub const BMP_SIGNATURE: [u8; 2] = *b"BM";

/// 嵌入数据前的标记 (CompileOS v1)。
pub const EMBED_MARKER: [u8; 4] = *b"COS1";

/// 嵌入描述块的大小：4 个 `u32` 字段 + 16 字节版本 + 64 字节描述。
pub const DESCRIPTOR_SIZE: usize = 96;

/// 默认检查的文件名 (位于当前工作目录)。
pub const DEFAULT_IMAGE: &str = "splash.bmp";

/// 容量策略：文件至少 1 MiB 才值得继续检查。
pub const MIN_FILE_SIZE: u64 = 1024 * 1024;

/// 容量策略：预估的嵌入数据大小 (500 KiB)。
/// 剩余空间严格大于该值时判定为“充足”。
pub const PAYLOAD_ESTIMATE: u64 = 500 * 1024;
