// ==========================================
// 物料成分声明质检系统 - CSV 输出表写入
// ==========================================
// 格式: CSV（UTF-8,表头一行,全部单元格按文本写出）
// ==========================================

use crate::domain::AnnotatedTable;
use crate::importer::error::{QaError, QaResult};
use csv::WriterBuilder;
use std::path::Path;
use tracing::debug;

/// 写出带校验列的输出表
///
/// # 说明
/// - 目标目录不存在时创建
/// - 已存在的同名文件直接覆盖
pub fn write_annotated_csv(table: &AnnotatedTable, path: &Path, delimiter: u8) -> QaResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| QaError::FileWriteError(format!("{}: {}", parent.display(), e)))?;
    }

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| QaError::FileWriteError(format!("{}: {}", path.display(), e)))?;

    writer
        .write_record(&table.headers)
        .map_err(|e| QaError::FileWriteError(e.to_string()))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|e| QaError::FileWriteError(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| QaError::FileWriteError(e.to_string()))?;

    debug!(path = %path.display(), rows = table.rows.len(), "CSV 输出表写入完成");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_annotated_csv_quotes_separator_in_comment() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let table = AnnotatedTable {
            headers: vec!["Key".to_string(), "Automated QA Comment".to_string()],
            rows: vec![vec!["A_1".to_string(), "x, y | z".to_string()]],
        };

        write_annotated_csv(&table, &path, b',').unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Key,Automated QA Comment\nA_1,\"x, y | z\"\n");
    }
}
