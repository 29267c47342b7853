//! # BMP 容量检查
//!
//! 打开 BMP 文件，依次校验文件大小、文件头、签名与信息头，
//! 计算像素数据的结束位置与其后的剩余空间，并检测是否已存在嵌入标记。
//!
//! 每个操作只打开一个文件句柄，离开作用域时自动关闭；
//! 检查过程只读，不会修改文件或创建新文件。

use crate::constants::{
    DESCRIPTOR_SIZE, EMBED_MARKER, FILE_HEADER_SIZE, INFO_HEADER_SIZE, MIN_FILE_SIZE,
    PAYLOAD_ESTIMATE,
};
use crate::error::{CorruptHeader, InspectError, Result};
use crate::headers::{EmbedDescriptor, FileHeader, InfoHeader};
use std::fmt;
use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 容量策略的两个阈值。它们属于本工具的策略，与 BMP 格式本身无关。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPolicy {
    /// 小于该大小的文件直接拒绝。
    pub min_file_size: u64,
    /// 预估的嵌入数据大小，用于给出“充足/有限”的建议。
    pub payload_estimate: u64,
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self {
            min_file_size: MIN_FILE_SIZE,
            payload_estimate: PAYLOAD_ESTIMATE,
        }
    }
}

/// 剩余空间相对于预估嵌入大小的结论，仅作建议，不构成失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    Sufficient,
    Limited,
}

/// 计算所用的像素数据大小来自哪里。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSizeSource {
    /// 信息头中声明的值。
    Declared,
    /// 声明为 0，按宽、高与位深推算。
    Derived,
}

/// 不影响结果、但值得提示的头部异常。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    UnexpectedInfoHeaderSize(u32),
    UnexpectedPlanes(u16),
    DeclaredSizeMismatch { declared: u32, actual: u64 },
    ImageSizeDerived(u32),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnexpectedInfoHeaderSize(size) => write!(
                f,
                "info header size is {size}, only the {INFO_HEADER_SIZE}-byte header is interpreted"
            ),
            Warning::UnexpectedPlanes(planes) => {
                write!(f, "color planes is {planes}, expected 1")
            }
            Warning::DeclaredSizeMismatch { declared, actual } => write!(
                f,
                "header declares a file size of {declared} bytes, actual size is {actual} bytes"
            ),
            Warning::ImageSizeDerived(size) => write!(
                f,
                "image size field is 0, derived {size} bytes from the dimensions"
            ),
        }
    }
}

/// 一次检查的完整结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityReport {
    pub path: PathBuf,
    /// 文件的实际大小。
    pub file_size: u64,
    pub file_header: FileHeader,
    pub info_header: InfoHeader,
    /// 计算时实际使用的像素数据大小。
    pub image_size: u32,
    pub image_size_source: ImageSizeSource,
    /// `data_offset + image_size`。
    pub image_data_end: u32,
    /// `file_size - image_data_end`。
    pub available_space: u64,
    pub feasibility: Feasibility,
    pub marker_present: bool,
    pub policy: CapacityPolicy,
    pub warnings: Vec<Warning>,
}

/// 描述块检查的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorReport {
    pub capacity: CapacityReport,
    /// 没有 `COS1` 标记时为 `None`。
    pub payload: Option<EmbeddedPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPayload {
    pub descriptor: EmbedDescriptor,
    /// 描述块声明的数据结束位置。
    pub payload_end: u64,
    /// 声明的数据是否完整位于文件之内。
    pub payload_complete: bool,
}

/// 使用默认容量策略检查 `path`。
///
/// # Errors
///
/// 按顺序校验，遇到第一个失败立即返回：
/// * [`InspectError::NotFound`]：文件不存在。
/// * [`InspectError::TooSmall`]：文件小于 1 MiB。
/// * [`InspectError::TruncatedHeader`]：不足 14 字节的文件头。
/// * [`InspectError::InvalidSignature`]：前两个字节不是 `BM`。
/// * [`InspectError::TruncatedInfoHeader`]：不足 40 字节的信息头。
/// * [`InspectError::CorruptHeader`]：推导出的偏移互相矛盾。
/// * [`InspectError::Io`]：其他 I/O 错误。
pub fn inspect(path: impl AsRef<Path>) -> Result<CapacityReport> {
    inspect_with(path, &CapacityPolicy::default())
}

/// 与 [`inspect`] 相同，但使用给定的容量策略。
pub fn inspect_with(path: impl AsRef<Path>, policy: &CapacityPolicy) -> Result<CapacityReport> {
    let path = path.as_ref();
    let mut file = open(path)?;
    inspect_file(&mut file, path, policy)
}

/// 检查文件，并在存在 `COS1` 标记时解码其后的描述块。
///
/// 描述块中的校验和只会原样报告，不会重新计算。
///
/// # Errors
///
/// 除 [`inspect`] 的所有错误外，标记之后不足 96 字节时返回
/// [`InspectError::TruncatedDescriptor`]。
pub fn read_descriptor(
    path: impl AsRef<Path>,
    policy: &CapacityPolicy,
) -> Result<DescriptorReport> {
    let path = path.as_ref();
    let mut file = open(path)?;
    let capacity = inspect_file(&mut file, path, policy)?;

    if !capacity.marker_present {
        debug!("no embed marker, skipping descriptor");
        return Ok(DescriptorReport {
            capacity,
            payload: None,
        });
    }

    let offset = u64::from(capacity.image_data_end);
    file.seek(SeekFrom::Start(offset))?;
    let bytes = read_up_to(&mut file, DESCRIPTOR_SIZE)?;
    let block: [u8; DESCRIPTOR_SIZE] = bytes.as_slice().try_into().map_err(|_| {
        InspectError::TruncatedDescriptor {
            offset,
            needed: DESCRIPTOR_SIZE,
            available: bytes.len(),
        }
    })?;

    let descriptor = EmbedDescriptor::from(&block);
    let payload_end = offset + DESCRIPTOR_SIZE as u64 + u64::from(descriptor.payload_size);
    let payload_complete = payload_end <= capacity.file_size;
    debug!(
        payload_size = descriptor.payload_size,
        payload_end, payload_complete, "decoded embed descriptor"
    );

    Ok(DescriptorReport {
        capacity,
        payload: Some(EmbeddedPayload {
            descriptor,
            payload_end,
            payload_complete,
        }),
    })
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => InspectError::NotFound {
            path: path.to_path_buf(),
        },
        _ => InspectError::Io(err),
    })
}

/// 校验流水线。`file` 必须位于文件开头。
fn inspect_file(file: &mut File, path: &Path, policy: &CapacityPolicy) -> Result<CapacityReport> {
    let metadata = file.metadata()?;
    // 目录等非常规文件的长度没有意义
    if !metadata.is_file() {
        return Err(InspectError::Io(io::Error::new(
            ErrorKind::InvalidInput,
            format!("not a regular file: {}", path.display()),
        )));
    }
    let file_size = metadata.len();
    debug!(path = %path.display(), file_size, "opened bitmap");

    if file_size < policy.min_file_size {
        return Err(InspectError::TooSmall {
            actual: file_size,
            minimum: policy.min_file_size,
        });
    }

    let bytes = read_up_to(file, FILE_HEADER_SIZE)?;
    let block: [u8; FILE_HEADER_SIZE] = bytes.as_slice().try_into().map_err(|_| {
        InspectError::TruncatedHeader {
            needed: FILE_HEADER_SIZE,
            available: bytes.len(),
        }
    })?;
    let file_header = FileHeader::from(&block);

    if !file_header.has_valid_signature() {
        return Err(InspectError::InvalidSignature {
            found: file_header.signature,
        });
    }

    let bytes = read_up_to(file, INFO_HEADER_SIZE)?;
    let block: [u8; INFO_HEADER_SIZE] = bytes.as_slice().try_into().map_err(|_| {
        InspectError::TruncatedInfoHeader {
            needed: INFO_HEADER_SIZE,
            available: bytes.len(),
        }
    })?;
    let info_header = InfoHeader::from(&block);
    debug!(?file_header, ?info_header, "parsed headers");

    let mut warnings = Vec::new();
    if usize::try_from(info_header.header_size).ok() != Some(INFO_HEADER_SIZE) {
        warnings.push(Warning::UnexpectedInfoHeaderSize(info_header.header_size));
    }
    if info_header.planes != 1 {
        warnings.push(Warning::UnexpectedPlanes(info_header.planes));
    }
    if u64::from(file_header.declared_file_size) != file_size {
        warnings.push(Warning::DeclaredSizeMismatch {
            declared: file_header.declared_file_size,
            actual: file_size,
        });
    }

    let (image_size, image_size_source) = effective_image_size(&info_header)?;
    if image_size_source == ImageSizeSource::Derived {
        warnings.push(Warning::ImageSizeDerived(image_size));
    }
    for warning in &warnings {
        warn!(path = %path.display(), %warning, "header anomaly");
    }

    let image_data_end = file_header
        .data_offset
        .checked_add(image_size)
        .ok_or(CorruptHeader::EndOverflow {
            data_offset: file_header.data_offset,
            image_size,
        })?;

    let available_space = file_size
        .checked_sub(u64::from(image_data_end))
        .ok_or(CorruptHeader::EndBeyondFile {
            image_data_end,
            file_size,
        })?;

    let feasibility = if available_space > policy.payload_estimate {
        Feasibility::Sufficient
    } else {
        Feasibility::Limited
    };

    file.seek(SeekFrom::Start(u64::from(image_data_end)))?;
    let marker_present = read_up_to(file, EMBED_MARKER.len())? == EMBED_MARKER;
    debug!(
        image_data_end,
        available_space,
        ?feasibility,
        marker_present,
        "computed capacity"
    );

    Ok(CapacityReport {
        path: path.to_path_buf(),
        file_size,
        file_header,
        info_header,
        image_size,
        image_size_source,
        image_data_end,
        available_space,
        feasibility,
        marker_present,
        policy: *policy,
        warnings,
    })
}

/// 声明为 0 的像素数据大小只在未压缩时按尺寸推算，压缩数据的长度无法推断。
fn effective_image_size(info: &InfoHeader) -> Result<(u32, ImageSizeSource)> {
    if info.image_size != 0 {
        return Ok((info.image_size, ImageSizeSource::Declared));
    }

    let unknown = CorruptHeader::UnknownImageSize {
        width: info.width,
        height: info.height,
        bits_per_pixel: info.bits_per_pixel,
        compression: info.compression,
    };
    if info.compression != 0 {
        return Err(unknown.into());
    }
    let derived = info.derived_image_size().ok_or(unknown)?;
    Ok((derived, ImageSizeSource::Derived))
}

/// 读取至多 `len` 字节；遇到文件结尾时返回较短的结果而不是报错。
fn read_up_to(reader: &mut impl Read, len: usize) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len);
    reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
    Ok(buf)
}
