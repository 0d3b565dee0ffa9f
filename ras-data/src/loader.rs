use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;
use thiserror::Error;

use ras_core::{EquipmentItem, PropertyRepository, RepositoryError, SpaceKind};

/// Errors that can occur when loading equipment catalog data.
#[derive(Debug, Error)]
pub enum EquipmentLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Unknown space kind: '{0}'")]
    UnknownSpaceKind(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for EquipmentLoaderError {
    fn from(err: csv::Error) -> Self {
        EquipmentLoaderError::CsvParse(err.to_string())
    }
}

/// Maps a CSV scope value to concrete space kinds.
///
/// - a space kind code (`bedroom`, `bathroom`, ...) → that kind
/// - `any` → every kind in the taxonomy
fn scope_to_kinds(scope: &str) -> Result<Vec<SpaceKind>, EquipmentLoaderError> {
    if scope == "any" {
        return Ok(SpaceKind::all().to_vec());
    }
    SpaceKind::parse(scope)
        .map(|kind| vec![kind])
        .ok_or_else(|| EquipmentLoaderError::UnknownSpaceKind(scope.to_string()))
}

/// A single record from the equipment catalog CSV file.
///
/// Columns:
/// - `space_kind`: a space kind code, or `any` for equipment offered in
///   every kind of space
/// - `code`: stable identifier referenced by space details
/// - `label`: display label
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EquipmentRecord {
    pub space_kind: String,
    pub code: String,
    pub label: String,
}

/// Loader for equipment catalog data from CSV files.
///
/// The loader reads CSV data and inserts it into the database via the
/// `PropertyRepository` trait, allowing it to work with any backend.
pub struct EquipmentCatalogLoader;

impl EquipmentCatalogLoader {
    /// Parse equipment records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<EquipmentRecord>, EquipmentLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: EquipmentRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Load equipment records into the database.
    ///
    /// Records are expanded by scope, grouped by space kind, and loaded
    /// with replace semantics: for every kind present in the input, the
    /// existing catalog rows for that kind are deleted before the new rows
    /// are inserted. Kinds absent from the input are untouched.
    ///
    /// Returns the number of inserted rows.
    pub async fn load(
        repo: &dyn PropertyRepository,
        records: &[EquipmentRecord],
    ) -> Result<usize, EquipmentLoaderError> {
        let mut per_kind: BTreeMap<SpaceKind, Vec<EquipmentItem>> = BTreeMap::new();
        for record in records {
            for kind in scope_to_kinds(&record.space_kind)? {
                per_kind.entry(kind).or_default().push(EquipmentItem {
                    kind,
                    code: record.code.clone(),
                    label: record.label.clone(),
                });
            }
        }

        let mut inserted = 0;
        for (kind, items) in &per_kind {
            repo.delete_equipment(*kind).await?;
            for item in items {
                repo.insert_equipment(item).await?;
                inserted += 1;
            }
        }

        Ok(inserted)
    }
}
