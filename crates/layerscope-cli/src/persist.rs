// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Writing the report to disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use layerscope_core::error::Result;
use tracing::info;

/// `PDF_Analysis_<folder>_<yyyyMMdd_HHmmss>.txt`.
pub fn report_file_name(folder: &Path, at: DateTime<Local>) -> String {
    let folder_name = display_name(folder).unwrap_or_else(|| "scan".to_string());
    format!("PDF_Analysis_{}_{}.txt", folder_name, at.format("%Y%m%d_%H%M%S"))
}

/// Last component of `folder`, resolving `.` and `..` through the
/// filesystem when needed.
fn display_name(folder: &Path) -> Option<String> {
    let name = match folder.file_name() {
        Some(name) => name.to_os_string(),
        None => folder.canonicalize().ok()?.file_name()?.to_os_string(),
    };
    Some(name.to_string_lossy().into_owned())
}

/// Write `report` to `path`.
pub fn write_report(path: &Path, report: &str) -> Result<PathBuf> {
    std::fs::write(path, report)?;
    info!(path = %path.display(), "Report saved");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_uses_folder_and_timestamp() {
        let at = Local.with_ymd_and_hms(2026, 7, 4, 18, 5, 9).unwrap();
        assert_eq!(
            report_file_name(Path::new("/srv/releases/"), at),
            "PDF_Analysis_releases_20260704_180509.txt"
        );
    }

    #[test]
    fn report_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        write_report(&path, "REPORT BODY").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "REPORT BODY");
    }
}
