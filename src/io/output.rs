use crate::core::{AuditEntry, AuditReport};
use crate::scoring::RankedFile;
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

/// Which per-file sections of an audit to emit. With no section selected,
/// everything is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputSections {
    pub complexity_warnings: bool,
    pub missing_tests: bool,
}

impl OutputSections {
    pub fn all() -> Self {
        Self::default()
    }

    fn is_filtered(&self) -> bool {
        self.complexity_warnings || self.missing_tests
    }

    fn keeps(&self, key: &str) -> bool {
        if !self.is_filtered() {
            return true;
        }
        match key {
            "complexity_warnings" => self.complexity_warnings,
            "missing_tests" => self.missing_tests,
            "error" => true,
            _ => false,
        }
    }
}

pub trait OutputWriter {
    fn write_audit(&mut self, report: &AuditReport, sections: OutputSections) -> anyhow::Result<()>;
    fn write_ranking(&mut self, ranking: &[RankedFile]) -> anyhow::Result<()>;
}

/// JSON form of an audit report restricted to the selected sections
pub fn audit_to_value(report: &AuditReport, sections: OutputSections) -> anyhow::Result<Value> {
    let mut value = serde_json::to_value(report)?;
    if sections.is_filtered() {
        if let Value::Object(files) = &mut value {
            for entry in files.values_mut() {
                if let Value::Object(fields) = entry {
                    fields.retain(|key, _| sections.keeps(key));
                }
            }
        }
    }
    Ok(value)
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_audit(&mut self, report: &AuditReport, sections: OutputSections) -> anyhow::Result<()> {
        let value = audit_to_value(report, sections)?;
        serde_json::to_writer_pretty(&mut self.writer, &value)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_ranking(&mut self, ranking: &[RankedFile]) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, ranking)?;
        writeln!(self.writer)?;
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

    fn write_entry(
        &mut self,
        path: &str,
        entry: &AuditEntry,
        sections: OutputSections,
    ) -> anyhow::Result<()> {
        let coverage = entry
            .coverage_pct()
            .map(|pct| format!(", coverage {:.1}%", pct))
            .unwrap_or_default();
        writeln!(
            self.writer,
            "{}  (module complexity {}{})",
            path.bold(),
            entry.module_complexity(),
            coverage
        )?;

        if let Some(error) = &entry.error {
            writeln!(self.writer, "  {} {}", "error:".red().bold(), error)?;
        }
        if let Some(diff) = entry.diff.as_ref().filter(|_| !sections.is_filtered()) {
            self.write_names("removed", &diff.missing, Color::Red)?;
            self.write_names("added", &diff.added, Color::Green)?;
        }
        if sections.keeps("complexity_warnings") {
            let warnings: Vec<String> = entry
                .complexity_warnings
                .iter()
                .map(|name| {
                    let complexity = entry
                        .methods
                        .iter()
                        .find(|m| &m.qualified_name == name)
                        .map(|m| m.complexity)
                        .unwrap_or_default();
                    format!("{} ({})", name, complexity)
                })
                .collect();
            self.write_names("high complexity", &warnings, Color::Yellow)?;
        }
        if sections.keeps("missing_tests") {
            self.write_names("missing tests", &entry.missing_tests, Color::Yellow)?;
        }
        if !sections.is_filtered() && !entry.collisions.is_empty() {
            self.write_names("name collisions", &entry.collisions, Color::Magenta)?;
        }
        Ok(())
    }

    fn write_names(&mut self, label: &str, names: &[String], color: Color) -> anyhow::Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        writeln!(
            self.writer,
            "  {} {}",
            format!("{}:", label).color(color),
            names.join(", ")
        )?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_audit(&mut self, report: &AuditReport, sections: OutputSections) -> anyhow::Result<()> {
        let errored = report.errored_count();
        let summary = format!("Audited {} files", report.len());
        if errored > 0 {
            writeln!(
                self.writer,
                "{} ({})",
                summary.bold(),
                format!("{} errored", errored).red()
            )?;
        } else {
            writeln!(self.writer, "{}", summary.bold())?;
        }

        for (path, entry) in &report.files {
            writeln!(self.writer)?;
            self.write_entry(path, entry, sections)?;
        }
        Ok(())
    }

    fn write_ranking(&mut self, ranking: &[RankedFile]) -> anyhow::Result<()> {
        if ranking.is_empty() {
            writeln!(self.writer, "No files to rank")?;
            return Ok(());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                "#", "File", "Score", "Type errors", "Lint issues", "Avg complexity", "Coverage %",
            ]);

        for (position, file) in ranking.iter().enumerate() {
            let severity = &file.severity;
            table.add_row(vec![
                Cell::new(position + 1),
                Cell::new(&file.path),
                Cell::new(format!("{:.2}", severity.score)),
                Cell::new(severity.type_errors),
                Cell::new(severity.lint_issues),
                Cell::new(format!("{:.2}", severity.avg_complexity)),
                Cell::new(format!("{:.1}", severity.coverage_pct)),
            ]);
        }

        writeln!(self.writer, "{}", table)?;
        Ok(())
    }
}

/// Writer for stdout or a file. Color is disabled when writing to a file.
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => {
            colored::control::set_override(false);
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(std::io::stdout()),
    };

    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink)),
    })
}
