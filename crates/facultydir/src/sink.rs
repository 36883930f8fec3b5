use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::types::{FacultyRecord, NOT_PROVIDED, Teaching};

/// Missing values are empty cells, list fields are JSON arrays and the
/// teaching marker is written as `Not Provided`.
pub const COLUMNS: [&str; 13] = [
    "name",
    "profile",
    "education",
    "phone",
    "address",
    "email",
    "specialization",
    "personal_links",
    "bio",
    "teaching",
    "research_areas",
    "journal_articles",
    "conference_papers",
];

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid list value in row {row}, column '{column}': {source}")]
    InvalidList {
        row: usize,
        column: &'static str,
        source: serde_json::Error,
    },
    #[error("Missing column: {0}")]
    MissingColumn(&'static str),
    #[error("Row {row} has an empty required column '{column}'")]
    MissingValue { row: usize, column: &'static str },
}

fn text_cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn list_cell(value: &Option<Vec<String>>) -> Result<String, serde_json::Error> {
    value
        .as_ref()
        .map_or(Ok(String::new()), serde_json::to_string)
}

fn teaching_cell(value: &Option<Teaching>) -> Result<String, serde_json::Error> {
    match value {
        None => Ok(String::new()),
        Some(Teaching::NotProvided) => Ok(NOT_PROVIDED.to_string()),
        Some(Teaching::Entries(entries)) => serde_json::to_string(entries),
    }
}

fn to_row(record: &FacultyRecord) -> Result<Vec<String>, serde_json::Error> {
    Ok(vec![
        record.name.clone(),
        record.profile_url.clone(),
        text_cell(&record.education),
        text_cell(&record.phone),
        text_cell(&record.address),
        text_cell(&record.email),
        text_cell(&record.specialization),
        text_cell(&record.personal_link),
        text_cell(&record.bio),
        teaching_cell(&record.teaching)?,
        list_cell(&record.research_areas)?,
        list_cell(&record.journal_articles)?,
        list_cell(&record.conference_papers)?,
    ])
}

pub fn write_records<W: Write>(writer: W, records: &[FacultyRecord]) -> Result<(), SinkError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(COLUMNS)?;
    for record in records {
        csv_writer.write_record(to_row(record)?)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the dataset to `path`, creating parent directories as needed.
pub fn write_csv(path: &Path, records: &[FacultyRecord]) -> Result<(), SinkError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_records(file, records)?;
    log::info!("Wrote {} record(s) to {}", records.len(), path.display());
    Ok(())
}

struct RowReader<'a> {
    row: usize,
    record: &'a csv::StringRecord,
    index: &'a HashMap<&'static str, usize>,
}

impl RowReader<'_> {
    fn cell(&self, column: &'static str) -> &str {
        self.index
            .get(column)
            .and_then(|&i| self.record.get(i))
            .unwrap_or_default()
    }

    fn required(&self, column: &'static str) -> Result<String, SinkError> {
        Some(self.cell(column))
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .ok_or(SinkError::MissingValue {
                row: self.row,
                column,
            })
    }

    fn text(&self, column: &'static str) -> Option<String> {
        Some(self.cell(column))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn list(&self, column: &'static str) -> Result<Option<Vec<String>>, SinkError> {
        let cell = self.cell(column);
        if cell.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(cell)
            .map(Some)
            .map_err(|source| SinkError::InvalidList {
                row: self.row,
                column,
                source,
            })
    }

    fn teaching(&self) -> Result<Option<Teaching>, SinkError> {
        if self.cell("teaching") == NOT_PROVIDED {
            return Ok(Some(Teaching::NotProvided));
        }
        Ok(self.list("teaching")?.map(Teaching::from_entries))
    }

    fn into_record(self) -> Result<FacultyRecord, SinkError> {
        Ok(FacultyRecord {
            name: self.required("name")?,
            profile_url: self.required("profile")?,
            education: self.text("education"),
            phone: self.text("phone"),
            address: self.text("address"),
            email: self.text("email"),
            specialization: self.text("specialization"),
            personal_link: self.text("personal_links"),
            bio: self.text("bio"),
            teaching: self.teaching()?,
            research_areas: self.list("research_areas")?,
            journal_articles: self.list("journal_articles")?,
            conference_papers: self.list("conference_papers")?,
        })
    }
}

/// Reads a dataset written by [`write_records`]. Column order does not
/// matter; every column in [`COLUMNS`] must be present.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<FacultyRecord>, SinkError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut index = HashMap::new();
    for column in COLUMNS {
        let position = headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or(SinkError::MissingColumn(column))?;
        index.insert(column, position);
    }

    let mut records = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let reader = RowReader {
            row: row + 1,
            record: &record,
            index: &index,
        };
        records.push(reader.into_record()?);
    }
    Ok(records)
}

pub fn read_csv(path: &Path) -> Result<Vec<FacultyRecord>, SinkError> {
    let file = File::open(path)?;
    read_records(file)
}
