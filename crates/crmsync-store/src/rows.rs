//! Row mapping between record types and their tables

use crate::StoreError;
use crmsync_domain::{Contact, Deal, RecordType, Task, TaskType};
use rusqlite::{params, Connection, Row};

/// Table holding the records of a type
pub(crate) fn table(record_type: RecordType) -> &'static str {
    match record_type {
        RecordType::Contacts => "contacts",
        RecordType::Deals => "deals",
        RecordType::Tasks => "tasks",
    }
}

fn conversion_error(col: usize, ty: rusqlite::types::Type, e: StoreError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, ty, Box::new(e))
}

pub(crate) fn read_contacts(conn: &Connection) -> Result<Vec<Contact>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, phone, tags, owner FROM contacts ORDER BY position",
    )?;
    let contacts = stmt
        .query_map([], |row: &Row<'_>| {
            let tags_json: String = row.get(4)?;
            let tags: Vec<String> = serde_json::from_str(&tags_json).map_err(|e| {
                conversion_error(4, rusqlite::types::Type::Text, StoreError::from(e))
            })?;

            Ok(Contact {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3)?,
                tags,
                owner: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(contacts)
}

pub(crate) fn write_contacts(conn: &Connection, contacts: &[Contact]) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "INSERT INTO contacts (id, position, name, email, phone, tags, owner)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for (position, c) in contacts.iter().enumerate() {
        let tags = serde_json::to_string(&c.tags)?;
        stmt.execute(params![
            &c.id,
            position as i64,
            &c.name,
            &c.email,
            &c.phone,
            tags,
            &c.owner,
        ])?;
    }
    Ok(())
}

pub(crate) fn read_deals(conn: &Connection) -> Result<Vec<Deal>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, value, pipeline, stage, contact, owner FROM deals ORDER BY position",
    )?;
    let deals = stmt
        .query_map([], |row| {
            Ok(Deal {
                id: row.get(0)?,
                title: row.get(1)?,
                value: row.get(2)?,
                pipeline: row.get(3)?,
                stage: row.get(4)?,
                contact: row.get(5)?,
                owner: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(deals)
}

pub(crate) fn write_deals(conn: &Connection, deals: &[Deal]) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "INSERT INTO deals (id, position, title, value, pipeline, stage, contact, owner)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    for (position, d) in deals.iter().enumerate() {
        if !d.value.is_finite() || d.value < 0.0 {
            return Err(StoreError::InvalidData(format!(
                "deal {} has invalid value {}",
                d.id, d.value
            )));
        }
        stmt.execute(params![
            &d.id,
            position as i64,
            &d.title,
            d.value,
            &d.pipeline,
            &d.stage,
            &d.contact,
            &d.owner,
        ])?;
    }
    Ok(())
}

pub(crate) fn read_tasks(conn: &Connection) -> Result<Vec<Task>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, task_type, title, due, assignee, linked_to FROM tasks ORDER BY position",
    )?;
    let tasks = stmt
        .query_map([], |row| {
            let type_str: String = row.get(1)?;
            let task_type: TaskType = type_str.parse().map_err(|e: String| {
                conversion_error(1, rusqlite::types::Type::Text, StoreError::InvalidData(e))
            })?;

            Ok(Task {
                id: row.get(0)?,
                task_type,
                title: row.get(2)?,
                due: row.get(3)?,
                assignee: row.get(4)?,
                linked_to: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub(crate) fn write_tasks(conn: &Connection, tasks: &[Task]) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "INSERT INTO tasks (id, position, task_type, title, due, assignee, linked_to)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for (position, t) in tasks.iter().enumerate() {
        stmt.execute(params![
            &t.id,
            position as i64,
            t.task_type.as_str(),
            &t.title,
            &t.due,
            &t.assignee,
            &t.linked_to,
        ])?;
    }
    Ok(())
}
