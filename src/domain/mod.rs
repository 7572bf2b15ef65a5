// ==========================================
// 物料成分声明质检系统 - 领域模型层
// ==========================================
// 职责: 定义成分记录、规则目录、报告类型
// 红线: 不含文件读写逻辑,不含规则计算逻辑
// ==========================================

pub mod record;
pub mod report;
pub mod types;

// 重导出核心类型
pub use record::{columns, AnnotatedTable, CompositionRecord, ComputedColumns, RawTable};
pub use report::{DqIssue, QaReport, QaSummary, RuleHitCount};
pub use types::{DqLevel, FmdRevFlag, QaRule};
