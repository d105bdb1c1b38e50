use crate::core::{EventLevel, ExitStatus, MigrationReport};
use colored::*;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

pub trait ReportWriter {
    fn write_report(&mut self, report: &MigrationReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &MigrationReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn level_tag(level: EventLevel) -> ColoredString {
        match level {
            EventLevel::Info => "info".normal().dimmed(),
            EventLevel::Warning => "warn".yellow(),
            EventLevel::Error => "error".red().bold(),
        }
    }
}

impl<W: Write> ReportWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &MigrationReport) -> anyhow::Result<()> {
        for event in &report.events {
            let tag = Self::level_tag(event.level);
            match &event.component {
                Some(component) => writeln!(
                    self.writer,
                    "{tag:>5}  {} [{}] {}",
                    event.file.display(),
                    component.cyan(),
                    event.message
                )?,
                None => writeln!(
                    self.writer,
                    "{tag:>5}  {} {}",
                    event.file.display(),
                    event.message
                )?,
            }
        }

        let summary = &report.summary;
        let status = report.exit_status();
        let status_text = match status {
            ExitStatus::Success => "success".green().bold(),
            ExitStatus::PartialSuccess => "partial success".yellow().bold(),
            ExitStatus::HardFailure => "failure".red().bold(),
        };
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{status_text}: {} migrated, {} skipped, {} failed",
            summary.migrated.to_string().green(),
            summary.skipped,
            summary.failed.to_string().red(),
        )?;
        Ok(())
    }
}

pub fn create_writer(output: Box<dyn Write>, format: OutputFormat) -> Box<dyn ReportWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(output)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(output)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MigrationEvent;

    fn sample_report() -> MigrationReport {
        let mut report = MigrationReport::new();
        report.append(MigrationEvent::info("a.jsx", "migrated").with_component("A"));
        report.append(MigrationEvent::error("b.jsx", "UnrecognizedShape: no export"));
        report.record_migrated();
        report.record_failed();
        report
    }

    #[test]
    fn json_writer_round_trips() {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .write_report(&sample_report())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["summary"]["migrated"], 1);
        assert_eq!(parsed["events"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn terminal_writer_prints_summary_counts() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer)
            .write_report(&sample_report())
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("1 migrated, 0 skipped, 1 failed"));
        assert!(text.contains("partial success"));
    }
}
