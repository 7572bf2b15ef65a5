// ==========================================
// 物料成分声明质检系统 - 核心库
// ==========================================
// 输入: 供应商物料成分声明表（Excel / CSV）
// 输出: 原表 + 诊断列 + Automated QA Comment
// 系统定位: 批量质检工具（规则违规只标注,不拒收）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与规则目录
pub mod domain;

// 导入层 - 文件解析与字段映射
pub mod importer;

// 引擎层 - 聚合与规则
pub mod engine;

// 输出层 - 输出表与运行报告
pub mod exporter;

// 配置层 - 运行配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AnnotatedTable, CompositionRecord, ComputedColumns, DqIssue, DqLevel, FmdRevFlag, QaReport,
    QaRule, QaSummary, RawTable,
};

// 引擎
pub use engine::{derive_key, QaChecker, QaFileChecker, QaOrchestrator, QaOutcome};

// 导入与配置
pub use config::{ConfigManager, QaConfigReader};
pub use importer::{QaError, QaResult, UniversalFileParser};

// ==========================================
// 系统常量
// ==========================================

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 系统名称
pub const APP_NAME: &str = "物料成分声明质检系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_app_name() {
        assert_eq!(APP_NAME, "物料成分声明质检系统");
    }
}
