//! # 命令处理逻辑模块
//!
//! 包含处理 `inspect` 和 `descriptor` 子命令的高级逻辑。
//! 本模块负责调用检查核心、附加错误上下文并向用户报告结果。

use crate::cli::InspectArgs;
use crate::inspector::{inspect_with, read_descriptor};
use crate::report::{render_descriptor, render_report};
use anyhow::{Context, Result};
use colored::Colorize;

/// 处理 'Inspect' 命令的执行逻辑。
///
/// 检查图像并把完整报告打印到标准输出。失败时不会输出任何部分报告。
///
/// # Errors
///
/// 文件不存在、过小、头部截断、签名错误、头部自相矛盾或读取失败时返回错误。
pub fn handle_inspect(args: InspectArgs) -> Result<()> {
    let report = inspect_with(&args.image, &args.policy()).with_context(|| {
        format!(
            "Unable to inspect image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    print!("{}", render_report(&report));
    Ok(())
}

/// 处理 'Descriptor' 命令的执行逻辑。
///
/// 在容量报告之后打印 `COS1` 描述块；没有标记时只说明不存在。
///
/// # Errors
///
/// 除 [`handle_inspect`] 的错误外，描述块被截断时也会返回错误。
pub fn handle_descriptor(args: InspectArgs) -> Result<()> {
    let report = read_descriptor(&args.image, &args.policy()).with_context(|| {
        format!(
            "Unable to read the embed descriptor from: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    print!("{}", render_descriptor(&report));
    Ok(())
}
