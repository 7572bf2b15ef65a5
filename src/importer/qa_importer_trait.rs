// ==========================================
// 物料成分声明质检系统 - 导入管道 Trait
// ==========================================
// 职责: 定义文件解析/字段映射/数据清洗接口（不包含实现）
// ==========================================

use crate::domain::{CompositionRecord, DqIssue, RawTable};
use crate::importer::error::QaResult;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表（表头原文 + 数据行）
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(RawTable): 表头与数据行,已跳过全空行
    /// - Err: 文件读取错误、格式错误
    fn parse_to_raw_table(&self, file_path: &Path) -> QaResult<RawTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 列名解析 + 行映射
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    /// 将原始表映射为成分记录
    ///
    /// # 返回
    /// - Ok((records, issues)): 记录与数据质量问题
    /// - Err(MissingColumns): 缺少必填列（致命,不执行任何规则）
    fn map_records(&self, table: &RawTable) -> QaResult<(Vec<CompositionRecord>, Vec<DqIssue>)>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格清洗接口
// 实现者: DataCleanerImpl
pub trait DataCleaner: Send + Sync {
    /// 解析数值（空值/非数值 → None）
    fn parse_numeric(&self, value: &str) -> Option<f64>;

    /// 标识字段文本化（空值 → "None"）
    fn normalize_identifier(&self, value: &str) -> String;

    /// 均质材料名称分组键（小写）
    fn normalize_material_name(&self, value: &str) -> String;

    /// 判断单元格是否视为空值
    fn is_null_like(&self, value: &str) -> bool;
}
