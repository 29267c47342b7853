//! # bmp_capacity 库
//!
//! 本库包含 BMP 容量检查工具的核心逻辑。

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod headers;
pub mod inspector;
pub mod layout;
pub mod report;

pub use error::{CorruptHeader, InspectError};
pub use inspector::{CapacityPolicy, CapacityReport, Feasibility, inspect, inspect_with};
