//! Raw CSV table reader.
//!
//! Reads the four-line preamble (`#TYPE` marker, `DATA_TYPE` declaration,
//! `UNIT` declaration, column header) and then every data line as raw text
//! fields. No numeric parsing happens here.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{TableError, TableResult};

/// One data line: ordered raw fields plus the 1-based source line number,
/// kept for diagnostics. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Untyped parse of one test-log file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub type_marker: String,
    pub data_types: Vec<String>,
    pub units: Vec<String>,
    pub header: Vec<String>,
    pub rows: Vec<RawRow>,
}

pub fn read_table_file(path: &Path) -> TableResult<RawTable> {
    let file = File::open(path)?;
    read_table(file)
}

pub fn read_table(rdr: impl Read) -> TableResult<RawTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        // Rows with the wrong field count are the validator's problem,
        // not a parse failure.
        .flexible(true)
        .from_reader(rdr);
    let mut records = rdr.into_records();

    let type_rec = match records.next() {
        Some(rec) => rec.map_err(csv_error)?,
        None => return Err(TableError::Empty),
    };
    let type_marker = type_rec.get(0).unwrap_or("").to_string();
    if !type_marker.starts_with("#TYPE") {
        return Err(TableError::MissingTypeMarker { found: type_marker });
    }

    let dt_rec = match records.next() {
        Some(rec) => rec.map_err(csv_error)?,
        None => {
            return Err(TableError::TruncatedPreamble {
                what: "DATA_TYPE",
                after: 1,
            });
        }
    };
    let data_types = tagged_fields(&dt_rec, "DATA_TYPE")?;

    let unit_rec = match records.next() {
        Some(rec) => rec.map_err(csv_error)?,
        None => {
            return Err(TableError::TruncatedPreamble {
                what: "UNIT",
                after: 2,
            });
        }
    };
    let units = tagged_fields(&unit_rec, "UNIT")?;

    let header_rec = match records.next() {
        Some(rec) => rec.map_err(csv_error)?,
        None => {
            return Err(TableError::TruncatedPreamble {
                what: "column header",
                after: 3,
            });
        }
    };
    let header: Vec<String> = header_rec.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for (i, rec) in records.enumerate() {
        let rec = rec.map_err(csv_error)?;
        if rec.iter().all(str::is_empty) {
            continue;
        }
        let line = rec
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 5);
        rows.push(RawRow {
            line,
            fields: rec.iter().map(str::to_string).collect(),
        });
    }

    Ok(RawTable {
        type_marker,
        data_types,
        units,
        header,
        rows,
    })
}

/// Split a tagged preamble record (`TAG,a,b,...`) into its payload fields.
fn tagged_fields(rec: &csv::StringRecord, expected: &'static str) -> TableResult<Vec<String>> {
    let tag = rec.get(0).unwrap_or("");
    if tag != expected {
        return Err(TableError::BadPreambleTag {
            line: rec.position().map(|p| p.line() as usize).unwrap_or(0),
            expected,
            found: tag.to_string(),
        });
    }
    Ok(rec.iter().skip(1).map(str::to_string).collect())
}

fn csv_error(e: csv::Error) -> TableError {
    let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
    TableError::Csv { line, source: e }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
#TYPE: 1
DATA_TYPE,DBL,DBL,DBL,DBL,DBL,DBL
UNIT,%,V,A,W,N,rpm
STEP,U,I,P1,T,N
100,380,10,1200,0,1500
100,380.4,10.2,1210,0,1498
";

    #[test]
    fn parses_preamble_and_rows() {
        let table = read_table(WELL_FORMED.as_bytes()).unwrap();
        assert_eq!(table.type_marker, "#TYPE: 1");
        assert_eq!(table.data_types, vec!["DBL"; 6]);
        assert_eq!(table.units, vec!["%", "V", "A", "W", "N", "rpm"]);
        assert_eq!(table.header, vec!["STEP", "U", "I", "P1", "T", "N"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].fields[1], "380");
        assert_eq!(table.rows[1].fields[3], "1210");
    }

    #[test]
    fn data_rows_carry_source_line_numbers() {
        let table = read_table(WELL_FORMED.as_bytes()).unwrap();
        assert_eq!(table.rows[0].line, 5);
        assert_eq!(table.rows[1].line, 6);
    }

    #[test]
    fn blank_trailing_lines_are_ignored() {
        let input = format!("{WELL_FORMED}\n\n\n");
        let table = read_table(input.as_bytes()).unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn empty_file_is_fatal() {
        assert!(matches!(read_table(&b""[..]), Err(TableError::Empty)));
    }

    #[test]
    fn missing_type_marker_is_fatal() {
        let input = "STEP,U,I,P1,T,N\n100,380,10,1200,0,1500\n";
        assert!(matches!(
            read_table(input.as_bytes()),
            Err(TableError::MissingTypeMarker { .. })
        ));
    }

    #[test]
    fn truncated_preamble_is_fatal() {
        let input = "#TYPE: 1\nDATA_TYPE,DBL\nUNIT,%\n";
        assert!(matches!(
            read_table(input.as_bytes()),
            Err(TableError::TruncatedPreamble {
                what: "column header",
                ..
            })
        ));
    }

    #[test]
    fn wrong_preamble_tag_is_fatal() {
        let input = "#TYPE: 1\nUNITS,%,V\nUNIT,%,V\nSTEP,U\n";
        assert!(matches!(
            read_table(input.as_bytes()),
            Err(TableError::BadPreambleTag {
                expected: "DATA_TYPE",
                ..
            })
        ));
    }

    #[test]
    fn short_rows_survive_the_reader() {
        // Field-count defects are reported by the validator, not here.
        let input = "\
#TYPE: 1
DATA_TYPE,DBL,DBL,DBL,DBL,DBL,DBL
UNIT,%,V,A,W,N,rpm
STEP,U,I,P1,T,N
100,380,10
";
        let table = read_table(input.as_bytes()).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].fields.len(), 3);
    }
}
