// ==========================================
// 物料成分声明质检系统 - 错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 规则违规不是错误,只写入备注列;仅结构错误中止运行
// ==========================================

use thiserror::Error;

/// 质检模块错误类型
#[derive(Error, Debug)]
pub enum QaError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xlsm/.xls/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("文件写入失败: {0}")]
    FileWriteError(String),

    #[error("输出文件与同批 {other} 冲突: {output}")]
    OutputConflict { output: String, other: String },

    // ===== 结构错误（致命） =====
    #[error("缺少必填列: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("工作表为空（无表头）: {0}")]
    EmptySheet(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for QaError {
    fn from(err: std::io::Error) -> Self {
        QaError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for QaError {
    fn from(err: csv::Error) -> Self {
        QaError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for QaError {
    fn from(err: calamine::Error) -> Self {
        QaError::ExcelParseError(err.to_string())
    }
}

// 实现 From<rust_xlsxwriter::XlsxError>
impl From<rust_xlsxwriter::XlsxError> for QaError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        QaError::FileWriteError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for QaError {
    fn from(err: serde_json::Error) -> Self {
        QaError::InternalError(format!("JSON 处理失败: {}", err))
    }
}

/// Result 类型别名
pub type QaResult<T> = Result<T, QaError>;
