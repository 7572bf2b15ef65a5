// ==========================================
// 物料成分声明质检系统 - 运行报告写入
// ==========================================

use crate::domain::QaReport;
use crate::importer::error::{QaError, QaResult};
use std::path::Path;
use tracing::debug;

/// 以格式化 JSON 写出运行报告
pub fn write_report_json(report: &QaReport, path: &Path) -> QaResult<()> {
    let body = serde_json::to_string_pretty(report)?;
    std::fs::write(path, body)
        .map_err(|e| QaError::FileWriteError(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), run_id = %report.run_id, "运行报告写入完成");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QaSummary;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_report_round_trips_through_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.report.json");
        let now = Utc::now();
        let report = QaReport {
            run_id: "run-1".to_string(),
            source_path: "bom.csv".to_string(),
            output_path: "bom_checked.csv".to_string(),
            report_path: Some(path.display().to_string()),
            started_at: now,
            finished_at: now,
            elapsed_ms: 3,
            summary: QaSummary::default(),
            dq_issues: Vec::new(),
        };

        write_report_json(&report, &path).unwrap();

        let loaded: QaReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.run_id, "run-1");
        assert_eq!(loaded.summary, QaSummary::default());
    }
}
