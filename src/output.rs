//! CLI output formatting.
//!
//! Pure `format_*` functions returning display lines, with thin `print_*`
//! wrappers on top, so every shape of output is testable without capturing
//! stdout. The batch report leads with per-file results and closes with a
//! totals line; sizes are humanized.

use crate::batch::BatchReport;
use crate::format::Format;

/// Render a byte count with a binary unit suffix, one decimal place.
pub fn human_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes < KIB {
        format!("{} B", bytes as u64)
    } else if bytes < KIB * KIB {
        format!("{:.1} KiB", bytes / KIB)
    } else {
        format!("{:.1} MiB", bytes / (KIB * KIB))
    }
}

/// Format an info line for one loaded image.
pub fn format_info(width: u32, height: u32, pages: u32, format: Format) -> String {
    if pages > 1 {
        format!("{format} {width}x{height}, {pages} frames")
    } else {
        format!("{format} {width}x{height}")
    }
}

/// Format a full batch report as display lines.
///
/// Each file shows its relative source path, then either the output path
/// with before/after sizes or the failure message indented beneath it.
pub fn format_batch_report(report: &BatchReport) -> Vec<String> {
    let mut lines = Vec::new();

    for file in &report.files {
        lines.push(file.source.display().to_string());
        match (&file.output, &file.error) {
            (Some(output), _) => {
                lines.push(format!(
                    "    -> {} ({} -> {})",
                    output.display(),
                    human_size(file.input_bytes),
                    human_size(file.output_bytes),
                ));
            }
            (None, Some(error)) => {
                lines.push(format!("    failed: {}", error));
            }
            (None, None) => {}
        }
    }

    let processed = report.files.len() - report.failures;
    lines.push(format!(
        "{} processed, {} failed, {} -> {}",
        processed,
        report.failures,
        human_size(report.total_input_bytes),
        human_size(report.total_output_bytes),
    ));

    lines
}

pub fn print_batch_report(report: &BatchReport) {
    for line in format_batch_report(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::FileReport;
    use std::path::PathBuf;

    fn report(files: Vec<FileReport>) -> BatchReport {
        let total_input_bytes = files.iter().map(|f| f.input_bytes).sum();
        let total_output_bytes = files.iter().map(|f| f.output_bytes).sum();
        let failures = files.iter().filter(|f| f.error.is_some()).count();
        BatchReport {
            files,
            total_input_bytes,
            total_output_bytes,
            failures,
        }
    }

    // =========================================================================
    // human_size
    // =========================================================================

    #[test]
    fn human_size_bytes() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(512), "512 B");
    }

    #[test]
    fn human_size_kib() {
        assert_eq!(human_size(1024), "1.0 KiB");
        assert_eq!(human_size(1536), "1.5 KiB");
    }

    #[test]
    fn human_size_mib() {
        assert_eq!(human_size(2 * 1024 * 1024), "2.0 MiB");
    }

    // =========================================================================
    // format_info
    // =========================================================================

    #[test]
    fn info_static_image() {
        assert_eq!(format_info(800, 600, 1, Format::Jpeg), "jpeg 800x600");
    }

    #[test]
    fn info_animated_image() {
        assert_eq!(
            format_info(100, 50, 4, Format::Gif),
            "gif 100x50, 4 frames"
        );
    }

    // =========================================================================
    // format_batch_report
    // =========================================================================

    #[test]
    fn batch_report_success_lines() {
        let r = report(vec![FileReport {
            source: PathBuf::from("a.jpg"),
            output: Some(PathBuf::from("a.jpg")),
            input_bytes: 2048,
            output_bytes: 1024,
            error: None,
        }]);
        let lines = format_batch_report(&r);
        assert_eq!(lines[0], "a.jpg");
        assert_eq!(lines[1], "    -> a.jpg (2.0 KiB -> 1.0 KiB)");
        assert_eq!(lines[2], "1 processed, 0 failed, 2.0 KiB -> 1.0 KiB");
    }

    #[test]
    fn batch_report_failure_lines() {
        let r = report(vec![FileReport {
            source: PathBuf::from("bad.png"),
            output: None,
            input_bytes: 10,
            output_bytes: 0,
            error: Some("failed to decode image: bad signature".into()),
        }]);
        let lines = format_batch_report(&r);
        assert_eq!(lines[0], "bad.png");
        assert!(lines[1].starts_with("    failed: "));
        assert!(lines[2].starts_with("0 processed, 1 failed"));
    }
}
