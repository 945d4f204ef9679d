use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

use crate::error::{PredictorError, Result};
use crate::model::StudentRecord;

/// Reads `name,hours,attendance,previous` rows from a CSV file with a header.
pub fn load_students(path: &Path) -> Result<Vec<StudentRecord>> {
    let file = std::fs::File::open(path)?;
    let students = read_students(file)?;
    tracing::debug!("Loaded {} student records from {}", students.len(), path.display());
    Ok(students)
}

pub fn read_students<R: Read>(reader: R) -> Result<Vec<StudentRecord>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut students = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() < 4 {
            return Err(PredictorError::InvalidRecord {
                line,
                message: format!("expected 4 fields, found {}", record.len()),
            });
        }

        let name = record[0].to_string();
        if name.is_empty() {
            return Err(PredictorError::InvalidRecord {
                line,
                message: "student name is empty".to_string(),
            });
        }

        students.push(StudentRecord {
            name,
            hours: parse_field(&record[1], "hours", line)?,
            attendance: parse_field(&record[2], "attendance", line)?,
            previous: parse_field(&record[3], "previous", line)?,
        });
    }

    Ok(students)
}

fn parse_field(raw: &str, field: &str, line: u64) -> Result<f64> {
    raw.parse::<f64>().map_err(|e| PredictorError::InvalidRecord {
        line,
        message: format!("{field} value '{raw}' is not a number ({e})"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_well_formed_rows() {
        let csv = "name,hours,attendance,previous\nJohn Doe, 6.5, 85.0, 70\nJane Smith,4,70,55\n";
        let students = read_students(csv.as_bytes()).unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].name, "John Doe");
        assert_eq!(students[0].hours, 6.5);
        assert_eq!(students[1].previous, 55.0);
    }

    #[test]
    fn header_only_file_is_empty() {
        let students = read_students("name,hours,attendance,previous\n".as_bytes()).unwrap();
        assert!(students.is_empty());
    }

    #[test]
    fn rejects_non_numeric_field_with_line() {
        let csv = "name,hours,attendance,previous\nOk,1,2,3\nBad,lots,90,75\n";
        let err = read_students(csv.as_bytes()).unwrap_err();

        match err {
            PredictorError::InvalidRecord { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("hours"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_short_rows() {
        let csv = "name,hours,attendance\nShort,1,2\n";
        let err = read_students(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PredictorError::InvalidRecord { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_students(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, PredictorError::IoError(_)));
    }
}
