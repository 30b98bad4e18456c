use super::RecordResolvers;
use crate::document::{css, element_text, first_descendant};
use crate::error::ExtractorError;
use crate::patterns::{compile, compile_all, DUE_BATTERY, STATUS};
use crate::resolve::{Attribute, Candidate, CellAt, CellBattery, Chain, DescendantText, Field, FieldSet, FirstCell, FnStrategy};
use crmsync_domain::{Task, TaskType};

/// Resolver chains for tasks
pub struct TaskFields {
    fields: FieldSet,
}

impl TaskFields {
    /// Compile the task chains
    pub fn new() -> Result<Self, ExtractorError> {
        let badge = css(r#".badge, [class*="badge"], .label"#)?;
        let status = compile(STATUS)?;

        let fields = FieldSet::new()
            .chain(
                Chain::new("title")
                    .then(DescendantText(css(r#"a[href*="/task"], a[href*="Call"], a[href*="Email"]"#)?))
                    .then(CellAt(1)),
            )
            .chain(Chain::new("type").then(FnStrategy::new(move |c| {
                let badge_text = first_descendant(c.element, &badge)
                    .map(element_text)
                    .unwrap_or_default();
                let source = if badge_text.is_empty() { c.field("title") } else { badge_text.as_str() };
                Ok(Some(TaskType::from_keywords(source).as_str().to_string()))
            })))
            .chain(
                Chain::new("id")
                    .then(Attribute(vec!["data-task-id", "data-id", "id"]))
                    .then(FnStrategy::new(|c| {
                        let slug = c.field("title").split_whitespace().collect::<Vec<_>>().join("-");
                        Ok(Some(format!("task-{}-{}-{}", slug, c.index, c.pass_millis)))
                    })),
            )
            .chain(Chain::new("due").then(CellBattery {
                battery: compile_all(&DUE_BATTERY)?,
                whole_cell: true,
            }))
            .chain(
                Chain::new("assignee")
                    .then(DescendantText(css(r#"a[href*="/contact/"]"#)?))
                    .then(FirstCell::new(None, move |text, c| {
                        let len = text.chars().count();
                        (2..50).contains(&len)
                            && text != c.field("title")
                            && !text.contains("minute")
                            && !text.contains("hour")
                            && !status.is_match(text)
                    })),
            )
            .chain(
                Chain::new("linked_to")
                    .then(DescendantText(css(r#"a[href*="/deal/"]"#)?))
                    .then(Field("assignee")),
            );
        Ok(Self { fields })
    }
}

impl RecordResolvers for TaskFields {
    type Output = Task;

    fn resolve(&self, c: &mut Candidate<'_>) -> Result<Task, ExtractorError> {
        self.fields.resolve_all(c)?;
        Ok(Task {
            id: c.take("id"),
            task_type: c.take("type").parse().unwrap_or_default(),
            title: c.take("title"),
            due: c.take("due"),
            assignee: c.take("assignee"),
            linked_to: c.take("linked_to"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::locate::CELLS;

    fn resolve(markup: &str) -> Task {
        let doc = Document::parse("/app/tasks", markup);
        let rows = css("tr").unwrap();
        let cells = css(CELLS).unwrap();
        let element = doc.select(&rows).next().unwrap();
        let mut candidate = Candidate::new(element, 0, 99, &cells);
        TaskFields::new().unwrap().resolve(&mut candidate).unwrap()
    }

    #[test]
    fn test_linked_row() {
        let task = resolve(
            r#"<table><tbody><tr data-task-id="t-1">
                 <td><input type="checkbox"></td>
                 <td><a href="/app/task/1">Send proposal</a> <span class="badge">Email</span></td>
                 <td>Jan 17</td>
                 <td><a href="/app/contact/4">Ann Lee</a></td>
                 <td><a href="/app/deal/8">Enterprise renewal</a></td>
               </tr></tbody></table>"#,
        );
        assert_eq!(task.id, "t-1");
        assert_eq!(task.title, "Send proposal");
        assert_eq!(task.task_type, TaskType::Email);
        assert_eq!(task.due, "Jan 17");
        assert_eq!(task.assignee, "Ann Lee");
        assert_eq!(task.linked_to, "Enterprise renewal");
    }

    #[test]
    fn test_cell_fallbacks() {
        let task = resolve(
            "<table><tbody><tr>\
               <td></td> <td>Follow up call</td> <td>Incomplete</td> \
               <td>23 minutes ago</td> <td>Bo Diaz</td>\
             </tr></tbody></table>",
        );
        assert_eq!(task.title, "Follow up call");
        assert_eq!(task.task_type, TaskType::Call);
        assert_eq!(task.id, "task-Follow-up-call-0-99");
        assert_eq!(task.due, "23 minutes ago");
        assert_eq!(task.assignee, "Bo Diaz");
        assert_eq!(task.linked_to, "Bo Diaz");
    }

    #[test]
    fn test_placeholder_id_is_positional() {
        let doc = Document::parse(
            "/app/tasks",
            "<table><tbody>\
               <tr><td></td> <td>Follow up</td> <td><span class=\"badge\">Call</span></td></tr> \
               <tr><td></td> <td>Follow up</td> <td><span class=\"badge\">Email</span></td></tr>\
             </tbody></table>",
        );
        let rows = css("tr").unwrap();
        let cells = css(CELLS).unwrap();
        let fields = TaskFields::new().unwrap();
        let ids: Vec<String> = doc
            .select(&rows)
            .enumerate()
            .map(|(i, row)| fields.resolve(&mut Candidate::new(row, i, 7, &cells)).unwrap().id)
            .collect();
        assert_eq!(ids, vec!["task-Follow-up-0-7", "task-Follow-up-1-7"]);
    }

    #[test]
    fn test_type_defaults_to_other() {
        let task = resolve("<table><tbody><tr><td></td> <td>Quarterly review</td></tr></tbody></table>");
        assert_eq!(task.task_type, TaskType::Other);
        assert_eq!(task.due, "");
        assert_eq!(task.assignee, "");
    }
}
