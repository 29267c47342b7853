use clap::Parser;
use tracing::Level;

use bmp_capacity::{
    cli::{Cli, Commands},
    handler::{handle_descriptor, handle_inspect},
};

/// 程序的主入口点
///
/// 负责解析命令行参数、初始化日志，并根据子命令（默认 `inspect`）
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 日志写到标准错误，避免混入报告
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or_default() {
        Commands::Inspect(args) => handle_inspect(args),
        Commands::Descriptor(args) => handle_descriptor(args),
    }
}
