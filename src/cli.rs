//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 不带任何参数运行时，检查当前目录下的 `splash.bmp`。

use crate::constants::{DEFAULT_IMAGE, MIN_FILE_SIZE, PAYLOAD_ESTIMATE};
use crate::inspector::CapacityPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 检查 BMP 图像像素数据之后是否有足够的空间嵌入额外数据。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "检查 BMP 图像的文件头与信息头，计算像素数据之后的剩余空间，并检测是否已经嵌入了 COS1 数据。"
)]
pub struct Cli {
    /// 在标准错误上输出调试信息。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// 可用的子命令：inspect (检查容量) 和 descriptor (查看嵌入描述块)。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 检查图像的剩余容量 (默认命令)。
    Inspect(InspectArgs),

    /// 显示已嵌入数据的描述块 (如果存在)。
    Descriptor(InspectArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Inspect(InspectArgs::default())
    }
}

/// 'inspect' 与 'descriptor' 共用的参数。
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// 要检查的 BMP 文件路径。
    #[arg(short, long, default_value = DEFAULT_IMAGE)]
    pub image: PathBuf,

    /// 文件的最小大小 (字节)，低于该值直接拒绝。
    #[arg(long, default_value_t = MIN_FILE_SIZE)]
    pub min_file_size: u64,

    /// 预估的嵌入数据大小 (字节)，用于判断空间是否充足。
    #[arg(long, default_value_t = PAYLOAD_ESTIMATE)]
    pub payload_estimate: u64,
}

impl Default for InspectArgs {
    fn default() -> Self {
        Self {
            image: PathBuf::from(DEFAULT_IMAGE),
            min_file_size: MIN_FILE_SIZE,
            payload_estimate: PAYLOAD_ESTIMATE,
        }
    }
}

impl InspectArgs {
    pub fn policy(&self) -> CapacityPolicy {
        CapacityPolicy {
            min_file_size: self.min_file_size,
            payload_estimate: self.payload_estimate,
        }
    }
}
