// ==========================================
// 物料成分声明质检系统 - XLSX 输出表写入
// ==========================================
// 格式: 单工作表,表头一行;追加列表头为红色加粗
// 数值列中可解析的单元格写为数字,其余按文本写出
// ==========================================

use crate::domain::{columns, AnnotatedTable};
use crate::importer::error::{QaError, QaResult};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};
use std::path::Path;
use tracing::{debug, warn};

/// 按数字写出的列（输入数值列 + 派生数值列）
const NUMERIC_COLUMNS: [&str; 15] = [
    columns::ROWS_COUNT,
    columns::HOMOGENEOUS_MATERIAL_MASS,
    columns::MASS,
    columns::SUBSTANCE_HM_PERCENTAGE,
    columns::SUBSTANCE_HM_PPM,
    columns::SUBSTANCE_COMPONENT_PERCENTAGE,
    columns::SUBSTANCE_COMPONENT_PPM,
    columns::TOTAL_COMPONENT_MASS_PROFILE,
    columns::TOTAL_COMPONENT_MASS_SUMMATION,
    columns::ROWS_COUNT_GAP,
    columns::HOMOGENEOUS_MASS_GAP,
    columns::HOMOGENEOUS_PERCENTAGE_SUM,
    columns::HOMOGENEOUS_PPM_SUM,
    columns::COMPONENT_PERCENTAGE_SUM,
    columns::COMPONENT_PPM_SUM,
];

/// 是否为本系统追加的列（表头高亮）
pub fn is_added_column(header: &str) -> bool {
    columns::ADDED.contains(&header.trim())
}

fn is_numeric_column(header: &str) -> bool {
    NUMERIC_COLUMNS.contains(&header.trim())
}

fn cell_index(row: usize, col: usize) -> QaResult<(u32, u16)> {
    let row = u32::try_from(row)
        .map_err(|_| QaError::FileWriteError(format!("行号超出 XLSX 上限: {}", row)))?;
    let col = u16::try_from(col)
        .map_err(|_| QaError::FileWriteError(format!("列号超出 XLSX 上限: {}", col)))?;
    Ok((row, col))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &str,
    numeric: bool,
) -> QaResult<()> {
    if value.is_empty() {
        return Ok(());
    }
    match value.parse::<f64>() {
        Ok(number) if numeric && number.is_finite() => {
            worksheet.write_number(row, col, number)?;
        }
        _ => {
            worksheet.write_string(row, col, value)?;
        }
    }
    Ok(())
}

/// 写出带校验列的 XLSX 输出表
///
/// # 参数
/// - sheet_name: 工作表名（通常沿用源工作表名）
///
/// # 说明
/// - 目标目录不存在时创建
/// - 已存在的同名文件直接覆盖
pub fn write_annotated_xlsx(
    table: &AnnotatedTable,
    path: &Path,
    sheet_name: Option<&str>,
) -> QaResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| QaError::FileWriteError(format!("{}: {}", parent.display(), e)))?;
    }

    let header_format = Format::new().set_bold();
    let added_format = Format::new().set_bold().set_font_color(Color::Red);
    let numeric: Vec<bool> = table.headers.iter().map(|h| is_numeric_column(h)).collect();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    if let Some(name) = sheet_name {
        if let Err(e) = worksheet.set_name(name) {
            warn!(sheet = %name, error = %e, "工作表名不可用,使用默认名称");
        }
    }

    // 表头
    for (idx, header) in table.headers.iter().enumerate() {
        let (_, col) = cell_index(0, idx)?;
        let format = if is_added_column(header) {
            &added_format
        } else {
            &header_format
        };
        worksheet.write_string_with_format(0, col, header.as_str(), format)?;
    }

    // 数据行
    for (row_idx, row) in table.rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = cell_index(row_idx + 1, col_idx)?;
            let numeric = numeric.get(col_idx).copied().unwrap_or(false);
            write_cell(worksheet, r, c, value, numeric)?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| QaError::FileWriteError(format!("{}: {}", path.display(), e)))?;

    debug!(path = %path.display(), rows = table.rows.len(), "XLSX 输出表写入完成");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::file_parser::ExcelParser;
    use crate::importer::qa_importer_trait::FileParser;
    use tempfile::TempDir;

    fn annotated() -> AnnotatedTable {
        AnnotatedTable {
            headers: vec![
                columns::PART_NUMBER.to_string(),
                columns::MASS.to_string(),
                columns::ROWS_COUNT_GAP.to_string(),
                columns::AUTOMATED_QA_COMMENT.to_string(),
            ],
            rows: vec![
                vec![
                    "0345".to_string(),
                    "2.5".to_string(),
                    "-1".to_string(),
                    "lot 12|13 | Rows count mismatch".to_string(),
                ],
                vec!["P9".to_string(), "n/a".to_string(), "0".to_string(), String::new()],
            ],
        }
    }

    #[test]
    fn test_added_columns_are_highlighted() {
        assert!(is_added_column(columns::AUTOMATED_QA_COMMENT));
        assert!(is_added_column(" RowsCountGap "));
        assert!(!is_added_column(columns::MASS));
    }

    #[test]
    fn test_written_workbook_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("bom_checked.xlsx");

        write_annotated_xlsx(&annotated(), &path, Some("FMD")).unwrap();

        let table = ExcelParser::new(Some("FMD".to_string()))
            .parse_to_raw_table(&path)
            .unwrap();
        assert_eq!(table.headers, annotated().headers);
        assert_eq!(table.sheet_name.as_deref(), Some("FMD"));
        assert_eq!(table.rows[0], annotated().rows[0]);
        assert_eq!(table.rows[1], vec!["P9", "n/a", "0", ""]);
    }

    #[test]
    fn test_invalid_sheet_name_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bom_checked.xlsx");

        write_annotated_xlsx(&annotated(), &path, Some("bad[name]")).unwrap();

        let table = ExcelParser::new(None).parse_to_raw_table(&path).unwrap();
        assert_eq!(table.sheet_name.as_deref(), Some("Sheet1"));
        assert_eq!(table.rows.len(), 2);
    }
}
