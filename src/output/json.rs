//! JSON serialization for report results.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::result::ReportResult;

/// Serialize a ReportResult to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (non-finite numbers serialize as `null`).
pub fn to_json(result: &ReportResult) -> std::result::Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

/// Serialize a ReportResult to a pretty-printed JSON string.
pub fn to_json_pretty(result: &ReportResult) -> std::result::Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Write the pretty-printed JSON of `result` to `path`.
pub fn write_json(result: &ReportResult, path: &Path) -> Result<()> {
    let json = to_json_pretty(result)?;
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "wrote JSON result");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Report;

    fn small_result() -> ReportResult {
        Report::new()
            .sample_size(15)
            .shift_bootstrap(30)
            .pairwise_bootstrap(30)
            .asymmetry_bootstrap(30)
            .weighted_ks_permutations(30)
            .run()
            .unwrap()
            .result
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&small_result()).unwrap();
        assert!(json.contains("\"welch\""));
        assert!(json.contains("\"count\":225"));
    }

    #[test]
    fn test_json_round_trip_keeps_rows() {
        let result = small_result();
        let json = to_json_pretty(&result).unwrap();
        assert!(json.contains('\n'));
        let back: ReportResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.shift.rows.len(), 9);
        assert_eq!(back.asymmetry.rows.len(), result.asymmetry.rows.len());
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json(&small_result(), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("interpretation"));
    }
}
