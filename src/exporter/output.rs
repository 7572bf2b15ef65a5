// ==========================================
// 物料成分声明质检系统 - 输出格式与命名
// ==========================================
// 命名: <源文件名主干>_checked.<扩展名>
// 格式: 工作簿输入（含 .xls/.xlsm/.ods）统一写 .xlsx,CSV 输入写 .csv
// ==========================================

use crate::domain::AnnotatedTable;
use crate::exporter::csv_writer::write_annotated_csv;
use crate::exporter::xlsx_writer::write_annotated_xlsx;
use crate::importer::error::QaResult;
use crate::importer::file_parser::{extension_of, EXCEL_EXTENSIONS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 输出文件后缀
pub const OUTPUT_SUFFIX: &str = "_checked";

// ==========================================
// OutputFormat - 输出表格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Csv,
    Xlsx,
}

impl OutputFormat {
    /// 按源文件扩展名决定输出格式
    pub fn for_source(source: &Path) -> Self {
        if EXCEL_EXTENSIONS.contains(&extension_of(source).as_str()) {
            OutputFormat::Xlsx
        } else {
            OutputFormat::Csv
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

fn stem_of(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

fn target_dir(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    }
}

/// 计算输出表路径
///
/// # 参数
/// - source: 源文件路径
/// - output_dir: 统一输出目录（None 时与源文件同目录）
pub fn output_path_for(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    target_dir(source, output_dir).join(format!(
        "{}{}.{}",
        stem_of(source),
        OUTPUT_SUFFIX,
        OutputFormat::for_source(source).extension()
    ))
}

/// 计算 JSON 报告路径（与输出表同目录同主干）
pub fn report_path_for(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    target_dir(source, output_dir).join(format!(
        "{}{}.report.json",
        stem_of(source),
        OUTPUT_SUFFIX
    ))
}

/// 按格式写出输出表
///
/// # 参数
/// - delimiter: 仅 CSV 使用
/// - sheet_name: 仅 XLSX 使用（None 时为默认工作表名）
pub fn write_annotated_table(
    table: &AnnotatedTable,
    path: &Path,
    format: OutputFormat,
    delimiter: u8,
    sheet_name: Option<&str>,
) -> QaResult<()> {
    match format {
        OutputFormat::Csv => write_annotated_csv(table, path, delimiter),
        OutputFormat::Xlsx => write_annotated_xlsx(table, path, sheet_name),
    }
}
