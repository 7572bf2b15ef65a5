// ==========================================
// 物料成分声明质检系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xls/.ods) / CSV (.csv)
// 表头: 保持原文（匹配时再 TRIM）,数据: TRIM
// ==========================================

use crate::domain::RawTable;
use crate::importer::data_cleaner::format_number;
use crate::importer::error::{QaError, QaResult};
use crate::importer::qa_importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// 支持的工作簿扩展名
pub const EXCEL_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 行长度对齐到表头长度,全空行返回 None
fn normalize_row(mut row: Vec<String>, width: usize) -> Option<Vec<String>> {
    row.resize(width, String::new());
    if row.iter().all(|v| v.is_empty()) {
        None
    } else {
        Some(row)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser {
    delimiter: u8,
}

impl CsvParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> QaResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(QaError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = extension_of(path);
        if ext != "csv" {
            return Err(QaError::UnsupportedFormat(ext));
        }

        // 打开 CSV 文件
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头（保持原文）
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(QaError::EmptySheet(path.display().to_string()));
        }

        // 读取所有行
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();
            // 跳过完全空白的行
            if let Some(row) = normalize_row(row, headers.len()) {
                rows.push(row);
            }
        }

        debug!(path = %path.display(), columns = headers.len(), rows = rows.len(), "CSV 解析完成");
        Ok(RawTable::new(headers, rows))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser {
    sheet_name: Option<String>,
}

impl ExcelParser {
    /// sheet_name 为 None 时读取第一个工作表
    pub fn new(sheet_name: Option<String>) -> Self {
        Self { sheet_name }
    }
}

impl Default for ExcelParser {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Excel 单元格文本化
///
/// 数值型单元格走 `format_number`,整数值不带 `.0`
pub fn excel_cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> QaResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(QaError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = extension_of(path);
        if !EXCEL_EXTENSIONS.contains(&ext.as_str()) {
            return Err(QaError::UnsupportedFormat(ext));
        }

        // 打开工作簿（按扩展名自动识别格式）
        let mut workbook = open_workbook_auto(path)?;

        let sheet_name = match &self.sheet_name {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| QaError::ExcelParseError("Excel 文件无工作表".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行,保持原文）
        let mut rows_iter = range.rows();
        let header_row = rows_iter
            .next()
            .ok_or_else(|| QaError::EmptySheet(format!("{} [{}]", path.display(), sheet_name)))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| match cell {
                Data::Empty => String::new(),
                other => other.to_string(),
            })
            .collect();

        // 读取数据行
        let mut rows = Vec::new();
        for data_row in rows_iter {
            let row: Vec<String> = data_row.iter().map(excel_cell_to_text).collect();
            // 跳过完全空白的行
            if let Some(row) = normalize_row(row, headers.len()) {
                rows.push(row);
            }
        }

        debug!(
            path = %path.display(),
            sheet = %sheet_name,
            columns = headers.len(),
            rows = rows.len(),
            "Excel 解析完成"
        );
        Ok(RawTable::new(headers, rows).with_sheet_name(sheet_name))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Default)]
pub struct UniversalFileParser {
    csv: CsvParser,
    excel: ExcelParser,
}

impl UniversalFileParser {
    pub fn new(delimiter: u8, sheet_name: Option<String>) -> Self {
        Self {
            csv: CsvParser::new(delimiter),
            excel: ExcelParser::new(sheet_name),
        }
    }

    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> QaResult<RawTable> {
        let path = file_path.as_ref();
        let ext = extension_of(path);

        match ext.as_str() {
            "csv" => self.csv.parse_to_raw_table(path),
            e if EXCEL_EXTENSIONS.contains(&e) => self.excel.parse_to_raw_table(path),
            _ => Err(QaError::UnsupportedFormat(ext)),
        }
    }
}
