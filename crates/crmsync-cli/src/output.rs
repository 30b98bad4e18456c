//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use crmsync_domain::{Contact, Deal, RecordType, Task, Timestamp};
use crmsync_extractor::ExtractionResult;
use serde_json::{json, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// A record that can be shown as a table row or a JSON object.
pub trait Printable {
    /// Column headers
    const HEADERS: &'static [&'static str];

    /// Cell values, in header order
    fn cells(&self) -> Vec<String>;

    /// JSON representation
    fn to_json(&self) -> Value;
}

impl Printable for Contact {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Email", "Phone", "Tags", "Owner"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.tags.join(", "),
            self.owner.clone(),
        ]
    }

    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
            "tags": self.tags,
            "owner": self.owner
        })
    }
}

impl Printable for Deal {
    const HEADERS: &'static [&'static str] = &["ID", "Title", "Value", "Pipeline", "Stage", "Contact", "Owner"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            format!("${:.2}", self.value),
            self.pipeline.clone(),
            self.stage.clone(),
            self.contact.clone(),
            self.owner.clone(),
        ]
    }

    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "value": self.value,
            "pipeline": self.pipeline,
            "stage": self.stage,
            "contact": self.contact,
            "owner": self.owner
        })
    }
}

impl Printable for Task {
    const HEADERS: &'static [&'static str] = &["ID", "Type", "Title", "Due", "Assignee", "Linked To"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.task_type.to_string(),
            self.title.clone(),
            self.due.clone(),
            self.assignee.clone(),
            self.linked_to.clone(),
        ]
    }

    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "type": self.task_type.as_str(),
            "title": self.title,
            "due": self.due,
            "assignee": self.assignee,
            "linkedTo": self.linked_to
        })
    }
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format records of one type.
    pub fn format_records<R: Printable>(&self, records: &[R]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<Value> = records.iter().map(Printable::to_json).collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Table => Ok(self.format_table(records)),
        }
    }

    fn format_table<R: Printable>(&self, records: &[R]) -> String {
        if records.is_empty() {
            return self.colorize("No records found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(R::HEADERS.iter().copied());
        for record in records {
            builder.push_record(record.cells());
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format the outcome of an extraction pass.
    pub fn format_result(&self, result: &ExtractionResult) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(result)?);
        }

        match result {
            ExtractionResult::Success { counts, summary } => {
                let mut lines = vec![self.success(&summary.message)];
                lines.push(format!(
                    "Stored: {} contacts, {} deals, {} tasks",
                    counts.contacts, counts.deals, counts.tasks
                ));
                let rejected = summary.rejected.total();
                let failed = summary.failed.total();
                if rejected + failed > 0 {
                    lines.push(self.info(&format!(
                        "Skipped {} incomplete and {} unreadable candidate(s)",
                        rejected, failed
                    )));
                }
                if summary.next_page_available {
                    lines.push(self.warning("More results are on the next page"));
                }
                Ok(lines.join("\n"))
            }
            ExtractionResult::Failure { error } => Ok(self.error(&format!("Extraction failed: {}", error))),
        }
    }

    /// Format stored counts and the last sync time.
    pub fn format_status(&self, counts: &[(RecordType, usize)], last_sync: Option<Timestamp>) -> Result<String> {
        if self.format == OutputFormat::Json {
            let mut value = json!({ "lastSync": last_sync });
            for (rt, n) in counts {
                value[rt.as_str()] = json!(n);
            }
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        let mut builder = Builder::default();
        builder.push_record(["Type", "Records"]);
        for (rt, n) in counts {
            builder.push_record([rt.to_string(), n.to_string()]);
        }
        let mut table = builder.build();
        table.with(Style::rounded());

        let sync = match last_sync {
            Some(ms) => format!("Last sync: {} ms since epoch", ms),
            None => "Last sync: never".to_string(),
        };
        Ok(format!("{}\n{}", table, self.info(&sync)))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format bulk operation result.
    pub fn bulk_result(&self, operation: &str, count: usize, record_type: RecordType) -> String {
        self.success(&format!("{} {} {}", operation, count, record_type))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crmsync_extractor::{ExtractionSummary, TypeCounts};
    use crmsync_domain::View;

    fn contact() -> Contact {
        Contact {
            id: "c-1".to_string(),
            name: "Ann Lee".to_string(),
            email: "ann@example.com".to_string(),
            tags: vec!["VIP".to_string(), "Lead".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_records(&[contact()]).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["email"], "ann@example.com");
        assert_eq!(value[0]["tags"], json!(["VIP", "Lead"]));
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_records(&[contact()]).unwrap();
        assert!(output.contains("Email"));
        assert!(output.contains("VIP, Lead"));
    }

    #[test]
    fn test_empty_records() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_records::<Task>(&[]).unwrap();
        assert!(output.contains("No records found"));
    }

    #[test]
    fn test_task_json_uses_linked_to_key() {
        let task = Task {
            id: "t-1".to_string(),
            title: "Follow up".to_string(),
            linked_to: "Renewal".to_string(),
            ..Default::default()
        };
        assert_eq!(task.to_json()["linkedTo"], "Renewal");
        assert_eq!(task.to_json()["type"], "other");
    }

    #[test]
    fn test_result_text() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let counts = TypeCounts {
            contacts: 2,
            deals: 0,
            tasks: 0,
        };
        let result = ExtractionResult::Success {
            counts,
            summary: ExtractionSummary {
                view: View::Contacts,
                extracted: counts,
                stored: counts,
                rejected: TypeCounts::default(),
                failed: TypeCounts::default(),
                last_sync: Some(1),
                next_page_available: true,
                fingerprint: 0,
                message: ExtractionSummary::message_for(&counts),
            },
        };
        let output = formatter.format_result(&result).unwrap();
        assert!(output.starts_with("✓ Extracted: 2 contacts, 0 deals, 0 tasks"));
        assert!(output.contains("next page"));

        let failure = ExtractionResult::Failure {
            error: "Store error: busy".to_string(),
        };
        assert_eq!(
            formatter.format_result(&failure).unwrap(),
            "✗ Extraction failed: Store error: busy"
        );
    }

    #[test]
    fn test_status_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_status(&[(RecordType::Contacts, 3), (RecordType::Deals, 1)], None)
            .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["contacts"], 3);
        assert_eq!(value["lastSync"], Value::Null);
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
