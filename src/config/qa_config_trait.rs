// ==========================================
// 物料成分声明质检系统 - 运行配置读取 Trait
// ==========================================
// 职责: 定义校验运行所需的配置读取接口（不包含实现）
// 红线: 规则阈值为固定常量,不经配置读取
// ==========================================

use crate::importer::error::QaResult;
use std::path::PathBuf;

// ==========================================
// QaConfigReader Trait
// ==========================================
// 用途: 文件解析与输出所需的配置读取接口
// 实现者: ConfigManager
pub trait QaConfigReader: Send + Sync {
    /// 获取输出目录
    ///
    /// # 返回
    /// - Some(PathBuf): 统一输出目录
    /// - None: 输出到源文件所在目录
    fn get_output_dir(&self) -> QaResult<Option<PathBuf>>;

    /// 获取工作表名称
    ///
    /// # 返回
    /// - Some(String): 指定工作表
    /// - None: 读取第一个工作表
    fn get_sheet_name(&self) -> QaResult<Option<String>>;

    /// 获取 CSV 分隔符
    ///
    /// # 默认值
    /// - b','
    fn get_csv_delimiter(&self) -> QaResult<u8>;

    /// 是否输出 JSON 运行报告
    ///
    /// # 默认值
    /// - true
    fn get_write_report(&self) -> QaResult<bool>;
}
