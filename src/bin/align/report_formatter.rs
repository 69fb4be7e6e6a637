use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use ctc_forced_aligner::Alignment;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AlignmentReport {
    pub generated_at: String,
    pub audio: String,
    pub language: String,
    pub sample_rate_hz: u32,
    pub letter_wise: bool,
    pub segments: Vec<Alignment>,
}

pub fn write_report(path: Option<&Path>, report: &AlignmentReport) -> Result<(), String> {
    let mut out = open_output(path)?;
    serde_json::to_writer_pretty(&mut out, report)
        .map_err(|err| format!("Failed to serialize report JSON: {err}"))?;
    out.write_all(b"\n")
        .and_then(|_| out.flush())
        .map_err(|err| format!("Failed to finalize report: {err}"))
}

pub fn write_segments(path: Option<&Path>, report: &AlignmentReport) -> Result<(), String> {
    let mut out = open_output(path)?;
    for segment in &report.segments {
        serde_json::to_writer(&mut out, segment)
            .map_err(|err| format!("Failed to serialize segment JSON: {err}"))?;
        out.write_all(b"\n")
            .map_err(|err| format!("Failed to write segment: {err}"))?;
    }
    out.flush()
        .map_err(|err| format!("Failed to finalize segments: {err}"))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, String> {
    let Some(path) = path else {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create output directory '{}': {err}",
                parent.display()
            )
        })?;
    }
    let file = File::create(path)
        .map_err(|err| format!("Failed to create output file '{}': {err}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}
