//! File writers for processed plane output.

use crate::Result;
use log::debug;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use wirechamber_core::PlaneOutput;

/// Output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One CSV row per group.
    GroupsCsv,
    /// One CSV row per hit.
    HitsCsv,
    /// One JSON object per plane and event.
    JsonLines,
}

impl OutputFormat {
    /// Picks a format from a file extension: `jsonl`/`json` give JSON lines,
    /// anything else CSV (hits or groups as requested).
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P, hits: bool) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        match ext.as_deref() {
            Some("jsonl" | "json") => Self::JsonLines,
            _ if hits => Self::HitsCsv,
            _ => Self::GroupsCsv,
        }
    }
}

#[derive(Serialize)]
struct EventRecord<'a> {
    event: u64,
    plane: &'a str,
    #[serde(flatten)]
    output: &'a PlaneOutput,
}

/// Writer for processed plane outputs.
///
/// Every call appends the arrays of one plane for one event.
pub struct DataFileWriter {
    writer: BufWriter<File>,
    format: OutputFormat,
    wrote_header: bool,
    rows: usize,
}

impl DataFileWriter {
    /// Creates a new file writer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P, format: OutputFormat) -> Result<Self> {
        debug!("writing {:?} to {}", format, path.as_ref().display());
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            format,
            wrote_header: false,
            rows: 0,
        })
    }

    /// The output layout.
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Rows (CSV) or records (JSON lines) written so far, headers excluded.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Writes one plane's output for one event.
    ///
    /// # Errors
    /// Returns an error if writing or serialization fails.
    pub fn write_plane(&mut self, event: u64, plane: &str, output: &PlaneOutput) -> Result<()> {
        match self.format {
            OutputFormat::GroupsCsv => self.write_groups_csv(event, plane, output),
            OutputFormat::HitsCsv => self.write_hits_csv(event, plane, output),
            OutputFormat::JsonLines => self.write_json_line(event, plane, output),
        }
    }

    fn write_groups_csv(&mut self, event: u64, plane: &str, output: &PlaneOutput) -> Result<()> {
        if !self.wrote_header {
            writeln!(self.writer, "event,plane,start_wire,end_wire,span,hit_count")?;
            self.wrote_header = true;
        }
        for i in 0..output.num_groups() {
            writeln!(
                self.writer,
                "{},{},{},{},{},{}",
                event,
                plane,
                output.group_start_wire[i],
                output.group_end_wire[i],
                output.group_span[i],
                output.group_hit_count[i]
            )?;
        }
        self.rows += output.num_groups();
        Ok(())
    }

    fn write_hits_csv(&mut self, event: u64, plane: &str, output: &PlaneOutput) -> Result<()> {
        if !self.wrote_header {
            writeln!(self.writer, "event,plane,wire,pos,raw_time,time")?;
            self.wrote_header = true;
        }
        for i in 0..output.num_hits() {
            writeln!(
                self.writer,
                "{},{},{},{},{},{:e}",
                event,
                plane,
                output.hit_wire[i],
                output.hit_pos[i],
                output.hit_raw_time[i],
                output.hit_time[i]
            )?;
        }
        self.rows += output.num_hits();
        Ok(())
    }

    fn write_json_line(&mut self, event: u64, plane: &str, output: &PlaneOutput) -> Result<()> {
        let record = EventRecord {
            event,
            plane,
            output,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(self.writer)?;
        self.rows += 1;
        Ok(())
    }

    /// Flushes the writer.
    ///
    /// # Errors
    /// Returns an error if the underlying file cannot be flushed.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;
    use wirechamber_core::{Hit, HitGroup, WireTable};

    fn sample_output() -> PlaneOutput {
        let wires = WireTable::build(20, 0.0, 0.5, &[0.0; 20], 0.5e-9).unwrap();
        let hits = [
            Hit::new(10, 1000, 5e-7),
            Hit::new(11, 990, 4.95e-7),
            Hit::new(12, 980, 4.9e-7),
        ];
        let groups = [HitGroup::new(0, 3, 10, 12)];
        PlaneOutput::from_event(&wires, &hits, &groups)
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path("out.jsonl", false), OutputFormat::JsonLines);
        assert_eq!(OutputFormat::from_path("out.JSON", true), OutputFormat::JsonLines);
        assert_eq!(OutputFormat::from_path("out.csv", true), OutputFormat::HitsCsv);
        assert_eq!(OutputFormat::from_path("out", false), OutputFormat::GroupsCsv);
    }

    #[test]
    fn test_write_groups_csv() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = DataFileWriter::create(file.path(), OutputFormat::GroupsCsv).unwrap();

        let output = sample_output();
        writer.write_plane(1, "u1", &output).unwrap();
        writer.write_plane(2, "u1", &output).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.rows(), 2);

        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "event,plane,start_wire,end_wire,span,hit_count");
        assert_eq!(lines[1], "1,u1,10,12,3,3");
        assert_eq!(lines[2], "2,u1,10,12,3,3");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_hits_csv() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = DataFileWriter::create(file.path(), OutputFormat::HitsCsv).unwrap();
        writer.write_plane(7, "v1", &sample_output()).unwrap();
        writer.flush().unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.starts_with("event,plane,wire,pos,raw_time,time\n"));
        assert!(content.contains("7,v1,10,5,1000,5e-7"));
        assert_eq!(writer.rows(), 3);
    }

    #[test]
    fn test_write_json_lines() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = DataFileWriter::create(file.path(), OutputFormat::JsonLines).unwrap();
        writer.write_plane(3, "u2", &sample_output()).unwrap();
        writer.write_plane(4, "u2", &PlaneOutput::default()).unwrap();
        writer.flush().unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let records: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["event"], 3);
        assert_eq!(records[0]["plane"], "u2");
        assert_eq!(records[0]["group_span"], serde_json::json!([3]));
        assert_eq!(records[0]["hit_wire"], serde_json::json!([10, 11, 12]));
        assert_eq!(records[1]["hit_wire"], serde_json::json!([]));
    }
}
