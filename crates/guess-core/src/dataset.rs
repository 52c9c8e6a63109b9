//! Tabular dataset loading.
//!
//! A dataset is a CSV file with a header row: one identifier column (`name` by
//! default) and one column per schema attribute. Extra columns are ignored.

use crate::model::{AttributeSchema, EntityRecord, EntityStore, InvalidDataset};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ID_COLUMN: &str = "name";

/// Loads and validates a CSV dataset from disk.
pub fn load_csv(
    path: impl AsRef<Path>,
    schema: AttributeSchema,
    id_column: &str,
) -> Result<EntityStore, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Open {
        source,
        path: path.to_path_buf(),
    })?;
    read_csv(BufReader::new(file), schema, id_column)
}

/// Reads a CSV dataset from any reader.
pub fn read_csv<R: Read>(
    reader: R,
    schema: AttributeSchema,
    id_column: &str,
) -> Result<EntityStore, DatasetError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    if headers.is_empty() {
        return Err(InvalidDataset::Empty.into());
    }
    let id_index = headers
        .iter()
        .position(|header| header == id_column)
        .ok_or_else(|| DatasetError::MissingIdColumn {
            column: id_column.to_string(),
        })?;

    let mut records = Vec::new();
    for row in csv.records() {
        let row = row?;
        let mut record = EntityRecord::new(row.get(id_index).unwrap_or_default());
        for (index, (header, field)) in headers.iter().zip(row.iter()).enumerate() {
            if index != id_index {
                record.values.insert(header.to_string(), field.to_string());
            }
        }
        records.push(record);
    }

    Ok(EntityStore::from_records(schema, records)?)
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path:?}: {source}")]
    Open {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV header has no '{column}' column")]
    MissingIdColumn { column: String },
    #[error("invalid dataset: {0}")]
    Invalid(#[from] InvalidDataset),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttrValue, Attribute};

    const SAMPLE: &str = "\
name,club,position,nationality,retired,ballon_dor,champions_league
Lionel Messi, Inter Miami ,Forward,Argentina,False,True,True
Zinedine Zidane,Real Madrid,Midfielder,France,true,true,true
";

    #[test]
    fn reads_players_layout() {
        let store = read_csv(SAMPLE.as_bytes(), AttributeSchema::players(), DEFAULT_ID_COLUMN)
            .expect("valid csv");
        assert_eq!(store.len(), 2);
        let messi = store.find("Lionel Messi").unwrap();
        let club = store.schema().find("club").unwrap();
        let retired = store.schema().find("retired").unwrap();
        assert_eq!(store.value(messi, club), &AttrValue::text("Inter Miami"));
        assert_eq!(store.value(messi, retired), &AttrValue::Flag(false));
    }

    #[test]
    fn custom_id_column() {
        let schema = AttributeSchema::new(vec![Attribute::categorical("club")]).unwrap();
        let csv = "player,club,shirt\nA,X,10\nB,Y,7\n";
        let store = read_csv(csv.as_bytes(), schema, "player").unwrap();
        assert!(store.find("B").is_some());
    }

    #[test]
    fn missing_id_column_is_reported() {
        let err = read_csv(SAMPLE.as_bytes(), AttributeSchema::players(), "player").unwrap_err();
        assert!(matches!(err, DatasetError::MissingIdColumn { column } if column == "player"));
    }

    #[test]
    fn header_only_file_is_empty_dataset() {
        let csv = "name,club\n";
        let schema = AttributeSchema::new(vec![Attribute::categorical("club")]).unwrap();
        let err = read_csv(csv.as_bytes(), schema, DEFAULT_ID_COLUMN).unwrap_err();
        assert!(matches!(err, DatasetError::Invalid(InvalidDataset::Empty)));
    }

    #[test]
    fn missing_schema_column_is_invalid() {
        let csv = "name,club\nA,X\n";
        let err = read_csv(csv.as_bytes(), AttributeSchema::players(), DEFAULT_ID_COLUMN)
            .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Invalid(InvalidDataset::MissingAttribute { attribute }) if attribute == "position"
        ));
    }

    #[test]
    fn open_failure_carries_path() {
        let err = load_csv(
            "definitely/not/here.csv",
            AttributeSchema::players(),
            DEFAULT_ID_COLUMN,
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::Open { .. }));
    }
}
