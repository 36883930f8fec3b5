use std::path::Path;

use facultydir::FacultyRecord;
use facultydir::sink::{self, SinkError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacultyRow {
    pub id: i64,
    #[serde(flatten)]
    pub record: FacultyRecord,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Read-only rows loaded once at startup. Ids are 1-based row numbers in
/// the order the rows were scraped.
#[derive(Debug, Default)]
pub struct FacultyStore {
    rows: Vec<FacultyRow>,
}

impl FacultyStore {
    pub fn new(records: Vec<FacultyRecord>) -> Self {
        let rows = records
            .into_iter()
            .zip(1..)
            .map(|(record, id)| FacultyRow { id, record })
            .collect();
        Self { rows }
    }

    pub fn load(path: &Path) -> Result<Self, SinkError> {
        Ok(Self::new(sink::read_csv(path)?))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn all(&self) -> &[FacultyRow] {
        &self.rows
    }

    /// Exact id match and case-insensitive name substring match, combined
    /// with AND. Absent parameters match everything.
    pub fn search(&self, params: &SearchParams) -> Vec<&FacultyRow> {
        let needle = params.name.as_deref().map(str::to_lowercase);
        self.rows
            .iter()
            .filter(|row| params.id.is_none_or(|id| row.id == id))
            .filter(|row| {
                needle
                    .as_deref()
                    .is_none_or(|n| row.record.name.to_lowercase().contains(n))
            })
            .collect()
    }
}
