mod common;

use bmp_capacity::{
    cli::{Cli, Commands, InspectArgs},
    constants::{DEFAULT_IMAGE, MIN_FILE_SIZE, PAYLOAD_ESTIMATE},
    handler::{handle_descriptor, handle_inspect},
};
use clap::Parser;
use common::{Bitmap, descriptor, write_bytes};
use std::path::PathBuf;
use tempfile::tempdir;

fn args_for(image: PathBuf) -> InspectArgs {
    InspectArgs {
        image,
        ..InspectArgs::default()
    }
}

/// 验证检查与描述块两个命令在正常文件上都能成功
#[test]
fn test_handle_inspect_and_descriptor_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let bitmap = Bitmap::default();
    let end = 54 + bitmap.image_size as usize;
    let mut bytes = bitmap.bytes();
    bytes[end..end + 96].copy_from_slice(&descriptor(1024, 0, "0.1.0", "test payload"));
    let path = write_bytes(dir.path(), "splash.bmp", &bytes);

    // 2. 测试 handle_inspect
    handle_inspect(args_for(path.clone()))?;

    // 3. 测试 handle_descriptor
    handle_descriptor(args_for(path.clone()))?;

    // 4. 检查是只读的
    assert_eq!(std::fs::read(&path)?, bytes, "Inspection must not modify the file.");

    Ok(())
}

/// 验证失败时错误信息包含路径和具体原因
#[test]
fn test_handle_inspect_reports_failures() -> anyhow::Result<()> {
    let dir = tempdir()?;

    let missing = dir.path().join("missing.bmp");
    let err = handle_inspect(args_for(missing)).expect_err("missing file should fail");
    let message = format!("{err:#}");
    assert!(message.contains("Unable to inspect image file"), "{message}");
    assert!(message.contains("file not found"), "{message}");

    let small = write_bytes(dir.path(), "small.bmp", &vec![0u8; 500_000]);
    let err = handle_inspect(args_for(small)).expect_err("small file should fail");
    assert!(format!("{err:#}").contains("file too small"));

    let bad = Bitmap {
        signature: *b"XX",
        ..Bitmap::default()
    }
    .write(dir.path(), "bad.bmp");
    let err = handle_inspect(args_for(bad)).expect_err("bad signature should fail");
    assert!(format!("{err:#}").contains("invalid BMP signature"));

    Ok(())
}

/// 验证非常规文件的 I/O 错误会出现在错误链中
#[test]
fn test_handle_inspect_reports_io_errors() -> anyhow::Result<()> {
    let dir = tempdir()?;

    let err = handle_inspect(args_for(dir.path().to_path_buf()))
        .expect_err("a directory should fail");
    let message = format!("{err:#}");
    assert!(message.contains("Unable to inspect image file"), "{message}");
    assert!(message.contains("I/O error"), "{message}");
    assert!(message.contains("not a regular file"), "{message}");
    assert!(!message.contains("file too small"), "{message}");

    let err = handle_descriptor(args_for(dir.path().to_path_buf()))
        .expect_err("a directory should fail");
    assert!(format!("{err:#}").contains("I/O error"));

    Ok(())
}

/// 验证描述块被截断时命令失败
#[test]
fn test_handle_descriptor_truncated() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let bitmap = Bitmap {
        image_size: (2 * common::MIB - 54 - 20) as u32,
        ..Bitmap::default()
    };
    let end = 54 + bitmap.image_size as usize;
    let mut bytes = bitmap.bytes();
    bytes[end..end + 4].copy_from_slice(b"COS1");
    let path = write_bytes(dir.path(), "cut.bmp", &bytes);

    // 容量检查本身仍然成功
    handle_inspect(args_for(path.clone()))?;

    let err = handle_descriptor(args_for(path)).expect_err("truncated descriptor should fail");
    assert!(format!("{err:#}").contains("truncated embed descriptor"));

    Ok(())
}

/// 验证不带参数时默认检查 splash.bmp
#[test]
fn test_cli_defaults() {
    let cli = Cli::try_parse_from(["bmp_capacity"]).expect("no arguments should parse");
    assert!(!cli.verbose);
    assert!(cli.command.is_none());

    match cli.command.unwrap_or_default() {
        Commands::Inspect(args) => {
            assert_eq!(args.image, PathBuf::from(DEFAULT_IMAGE));
            assert_eq!(args.min_file_size, MIN_FILE_SIZE);
            assert_eq!(args.payload_estimate, PAYLOAD_ESTIMATE);
        }
        other => panic!("unexpected default command: {other:?}"),
    }
}

#[test]
fn test_cli_arguments() {
    let cli = Cli::try_parse_from([
        "bmp_capacity",
        "inspect",
        "-i",
        "boot.bmp",
        "--payload-estimate",
        "1000",
        "-v",
    ])
    .expect("arguments should parse");
    assert!(cli.verbose);
    let Some(Commands::Inspect(args)) = cli.command else {
        panic!("expected inspect command");
    };
    assert_eq!(args.image, PathBuf::from("boot.bmp"));
    assert_eq!(args.payload_estimate, 1000);
    assert_eq!(args.min_file_size, MIN_FILE_SIZE);

    let cli = Cli::try_parse_from(["bmp_capacity", "descriptor"]).expect("arguments should parse");
    let Some(Commands::Descriptor(args)) = cli.command else {
        panic!("expected descriptor command");
    };
    assert_eq!(args.image, PathBuf::from(DEFAULT_IMAGE));
}
