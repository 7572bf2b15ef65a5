// ==========================================
// 物料成分声明质检系统 - 配置层
// ==========================================
// 职责: 运行配置管理（输出目录/工作表/分隔符/报告开关）
// 存储: 内存 key-value,可由 JSON 文件与命令行参数覆写
// ==========================================

pub mod config_manager;
pub mod qa_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use qa_config_trait::QaConfigReader;
