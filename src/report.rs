//! # 报告输出
//!
//! 把检查结果渲染成给人看的文本。渲染只依赖报告本身，
//! 对同一个未修改的文件重复检查会得到完全相同的输出。

use crate::inspector::{CapacityReport, DescriptorReport, Feasibility, ImageSizeSource};
use colored::Colorize;
use std::fmt::{self, Write};

const MIB: f64 = 1024.0 * 1024.0;

/// 以 [`fmt::Display`] 输出容量检查报告。
pub struct ReportDisplay<'a>(pub &'a CapacityReport);

impl fmt::Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_report(f, self.0)
    }
}

/// 以 [`fmt::Display`] 输出描述块报告，容量报告在前。
pub struct DescriptorDisplay<'a>(pub &'a DescriptorReport);

impl fmt::Display for DescriptorDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_report(f, &self.0.capacity)?;
        write_descriptor(f, self.0)
    }
}

/// 渲染容量检查报告。
pub fn render_report(report: &CapacityReport) -> String {
    ReportDisplay(report).to_string()
}

/// 渲染描述块报告，容量报告在前。
pub fn render_descriptor(report: &DescriptorReport) -> String {
    DescriptorDisplay(report).to_string()
}

fn write_report(out: &mut impl Write, report: &CapacityReport) -> fmt::Result {
    let fh = &report.file_header;
    let ih = &report.info_header;

    writeln!(out, "File: {}", report.path.to_string_lossy().bold())?;
    writeln!(
        out,
        "Size: {} bytes ({:.1} MB)",
        group_digits(report.file_size),
        report.file_size as f64 / MIB
    )?;

    writeln!(out)?;
    writeln!(out, "{}", "BMP Header Analysis:".bold())?;
    writeln!(
        out,
        "   Signature: {}",
        String::from_utf8_lossy(&fh.signature).green()
    )?;
    writeln!(
        out,
        "   File Size: {} bytes",
        group_digits(u64::from(fh.declared_file_size))
    )?;
    writeln!(out, "   Reserved: {}", fh.reserved)?;
    writeln!(
        out,
        "   Data Offset: {} bytes",
        group_digits(u64::from(fh.data_offset))
    )?;

    writeln!(out)?;
    writeln!(out, "{}", "Image Information:".bold())?;
    writeln!(out, "   Header Size: {} bytes", ih.header_size)?;
    writeln!(out, "   Width: {} pixels", ih.width)?;
    writeln!(out, "   Height: {} pixels", ih.height)?;
    writeln!(out, "   Planes: {}", ih.planes)?;
    writeln!(out, "   Bits per Pixel: {}", ih.bits_per_pixel)?;
    writeln!(out, "   Compression: {}", ih.compression)?;
    let source = match report.image_size_source {
        ImageSizeSource::Declared => "",
        ImageSizeSource::Derived => " (derived from dimensions)",
    };
    writeln!(
        out,
        "   Image Size: {} bytes{}",
        group_digits(u64::from(report.image_size)),
        source
    )?;

    writeln!(out)?;
    writeln!(out, "{}", "Space Analysis:".bold())?;
    writeln!(
        out,
        "   Image Data End: {} bytes",
        group_digits(u64::from(report.image_data_end))
    )?;
    writeln!(
        out,
        "   Available Space: {} bytes ({:.1} MB)",
        group_digits(report.available_space),
        report.available_space as f64 / MIB
    )?;

    let need = group_digits(report.policy.payload_estimate);
    match report.feasibility {
        Feasibility::Sufficient => writeln!(
            out,
            "{} (need ~{} bytes)",
            "Sufficient space for embedded payload".green().bold(),
            need
        )?,
        Feasibility::Limited => writeln!(
            out,
            "{} (need ~{} bytes)",
            "Limited space for embedded payload".yellow().bold(),
            need
        )?,
    }

    if report.marker_present {
        writeln!(out, "{}", "Found existing embedded payload marker (COS1)".cyan())?;
    } else {
        writeln!(out, "No existing embedded payload found - ready for embedding")?;
    }

    if !report.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "Warnings:".yellow().bold())?;
        for warning in &report.warnings {
            writeln!(out, "   - {warning}")?;
        }
    }

    Ok(())
}

fn write_descriptor(out: &mut impl Write, report: &DescriptorReport) -> fmt::Result {
    writeln!(out)?;
    let Some(payload) = &report.payload else {
        writeln!(out, "No embed descriptor present.")?;
        return Ok(());
    };
    let d = &payload.descriptor;

    writeln!(out, "{}", "Embed Descriptor:".bold())?;
    writeln!(out, "   Magic: 0x{:08X}", d.magic)?;
    writeln!(
        out,
        "   Payload Size: {} bytes",
        group_digits(u64::from(d.payload_size))
    )?;
    writeln!(
        out,
        "   Payload Offset: {} bytes",
        group_digits(u64::from(d.payload_offset))
    )?;
    writeln!(out, "   Checksum: 0x{:08X} (not verified)", d.checksum)?;
    writeln!(out, "   Version: {}", d.version)?;
    writeln!(out, "   Description: {}", d.description)?;
    if payload.payload_complete {
        writeln!(
            out,
            "{}",
            "Declared payload lies within the file".green()
        )?;
    } else {
        writeln!(
            out,
            "{} (ends at {} bytes, file has {})",
            "Declared payload extends past the end of the file".red().bold(),
            group_digits(payload.payload_end),
            group_digits(report.capacity.file_size)
        )?;
    }

    Ok(())
}

/// 以逗号分隔千位，如 `1,500,054`。
pub fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
