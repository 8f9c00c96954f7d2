//! Prediction output in the `id,target` submission layout.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::error::{FlareError, Result};
use crate::ml::check_binary_labels;

/// Write `id,target` rows to `path`, one per id.
///
/// # Errors
///
/// Returns [`FlareError::InvalidLabel`] if the lengths differ or a label is
/// not 0 or 1.
pub fn write_submission<P: AsRef<Path>, S: AsRef<str>>(
    path: P,
    ids: &[S],
    labels: &[u8],
) -> Result<()> {
    let path = path.as_ref();
    check_rows(ids.len(), labels)?;
    write_submission_to(File::create(path)?, ids, labels)?;
    info!(path = %path.display(), rows = ids.len(), "wrote submission");
    Ok(())
}

/// Write `id,target` rows to any writer.
pub fn write_submission_to<W: Write, S: AsRef<str>>(
    writer: W,
    ids: &[S],
    labels: &[u8],
) -> Result<()> {
    check_rows(ids.len(), labels)?;

    let mut writer = Writer::from_writer(writer);
    writer.write_record(["id", "target"])?;
    for (id, label) in ids.iter().zip(labels) {
        let label = label.to_string();
        writer.write_record([id.as_ref(), label.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

fn check_rows(ids: usize, labels: &[u8]) -> Result<()> {
    if ids != labels.len() {
        return Err(FlareError::invalid_label(format!(
            "{} labels for {ids} ids",
            labels.len()
        )));
    }
    check_binary_labels(labels)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_submission_to() {
        let mut buffer = Vec::new();
        write_submission_to(&mut buffer, &["0", "2", "3"], &[1, 0, 1]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "id,target\n0,1\n2,0\n3,1\n");
    }

    #[test]
    fn test_write_submission_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("submission.csv");
        write_submission(&path, &["10".to_string()], &[0]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "id,target\n10,0\n");
    }

    #[test]
    fn test_bad_labels_leave_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("submission.csv");
        write_submission(&path, &["10"], &[1]).unwrap();

        assert!(matches!(
            write_submission(&path, &["10", "11"], &[1]),
            Err(FlareError::InvalidLabel(_))
        ));
        assert!(matches!(
            write_submission(&path, &["10"], &[3]),
            Err(FlareError::InvalidLabel(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "id,target
10,1
");
    }

    #[test]
    fn test_rejects_bad_labels() {
        let mut buffer = Vec::new();
        assert!(matches!(
            write_submission_to(&mut buffer, &["1", "2"], &[1]),
            Err(FlareError::InvalidLabel(_))
        ));
        assert!(matches!(
            write_submission_to(&mut buffer, &["1"], &[4]),
            Err(FlareError::InvalidLabel(_))
        ));
    }
}
