// ==========================================
// 物料成分声明质检系统 - 导入层
// ==========================================
// 职责: 文件解析、字段映射、数值清洗
// 支持: Excel (.xlsx/.xlsm/.xls/.ods), CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod qa_importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{QaError, QaResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};

// 重导出 Trait 接口
pub use qa_importer_trait::{DataCleaner, FieldMapper, FileParser};
