// ==========================================
// 物料成分声明质检系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: 内存 key-value（可从 JSON 文件加载）
// ==========================================

use crate::config::qa_config_trait::QaConfigReader;
use crate::importer::error::{QaError, QaResult};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    values: RwLock<BTreeMap<String, String>>,
}

impl ConfigManager {
    /// 创建空配置（全部取默认值）
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
        }
    }

    /// 从键值对创建
    pub fn from_map(values: BTreeMap<String, String>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    /// 从 JSON 文件加载（顶层必须是对象）
    ///
    /// # 说明
    /// - 字符串值原样保存,其他标量转为文本
    /// - 未知键保留但不使用
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> QaResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(QaError::FileNotFound(path.display().to_string()));
        }

        let raw = std::fs::read_to_string(path)?;
        let manager = Self::from_json_str(&raw)?;
        info!(path = %path.display(), keys = manager.len(), "配置文件加载完成");
        Ok(manager)
    }

    /// 从 JSON 文本加载
    pub fn from_json_str(raw: &str) -> QaResult<Self> {
        let parsed: Value = serde_json::from_str(raw)?;
        let object = parsed.as_object().ok_or_else(|| QaError::ConfigReadError {
            key: "<root>".to_string(),
            message: "配置文件顶层必须是 JSON 对象".to_string(),
        })?;

        let values = object
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), text)
            })
            .collect();

        Ok(Self::from_map(values))
    }

    fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> QaResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| QaError::InternalError(format!("锁获取失败: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    /// 读取配置值（公开方法,供 CLI 回显）
    pub fn get_global_config_value(&self, key: &str) -> QaResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 覆写配置值（CLI 参数优先于配置文件）
    pub fn set_config_value(&self, key: &str, value: &str) -> QaResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| QaError::InternalError(format!("锁获取失败: {}", e)))?;
        debug!(key = key, value = value, "覆写配置");
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// 读取配置值,带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> QaResult<String> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 写入运行日志,便于复现
    pub fn get_config_snapshot(&self) -> QaResult<String> {
        let values = self
            .values
            .read()
            .map_err(|e| QaError::InternalError(format!("锁获取失败: {}", e)))?;
        Ok(serde_json::to_string(&json!(*values))?)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl QaConfigReader for ConfigManager {
    fn get_output_dir(&self) -> QaResult<Option<PathBuf>> {
        Ok(self
            .get_config_value(config_keys::OUTPUT_DIR)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from))
    }

    fn get_sheet_name(&self) -> QaResult<Option<String>> {
        Ok(self
            .get_config_value(config_keys::SHEET_NAME)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    fn get_csv_delimiter(&self) -> QaResult<u8> {
        let value = self.get_config_or_default(config_keys::CSV_DELIMITER, ",")?;
        match value.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ if value == "\\t" => Ok(b'\t'),
            _ => Err(QaError::ConfigValueError {
                key: config_keys::CSV_DELIMITER.to_string(),
                value,
                message: "分隔符必须是单个 ASCII 字符".to_string(),
            }),
        }
    }

    fn get_write_report(&self) -> QaResult<bool> {
        let value = self.get_config_or_default(config_keys::WRITE_REPORT, "true")?;
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "y" | "on" => Ok(true),
            "0" | "false" | "no" | "n" | "off" => Ok(false),
            _ => Err(QaError::ConfigValueError {
                key: config_keys::WRITE_REPORT.to_string(),
                value,
                message: "期望布尔值".to_string(),
            }),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 输出
    pub const OUTPUT_DIR: &str = "output_dir";
    pub const WRITE_REPORT: &str = "write_report";

    // 解析
    pub const SHEET_NAME: &str = "sheet_name";
    pub const CSV_DELIMITER: &str = "csv_delimiter";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConfigManager::new();
        assert_eq!(config.get_output_dir().unwrap(), None);
        assert_eq!(config.get_sheet_name().unwrap(), None);
        assert_eq!(config.get_csv_delimiter().unwrap(), b',');
        assert!(config.get_write_report().unwrap());
    }

    #[test]
    fn test_from_json_str() {
        let config = ConfigManager::from_json_str(
            r#"{"output_dir": "/tmp/qa", "csv_delimiter": ";", "write_report": false, "sheet_name": null}"#,
        )
        .unwrap();

        assert_eq!(config.get_output_dir().unwrap(), Some(PathBuf::from("/tmp/qa")));
        assert_eq!(config.get_csv_delimiter().unwrap(), b';');
        assert!(!config.get_write_report().unwrap());
        assert_eq!(config.get_sheet_name().unwrap(), None);
    }

    #[test]
    fn test_from_json_str_rejects_non_object() {
        assert!(matches!(
            ConfigManager::from_json_str("[1, 2]"),
            Err(QaError::ConfigReadError { .. })
        ));
    }

    #[test]
    fn test_invalid_delimiter() {
        let config = ConfigManager::new();
        config.set_config_value(config_keys::CSV_DELIMITER, ";;").unwrap();
        assert!(matches!(
            config.get_csv_delimiter(),
            Err(QaError::ConfigValueError { .. })
        ));
    }

    #[test]
    fn test_tab_delimiter_escape() {
        let config = ConfigManager::new();
        config.set_config_value(config_keys::CSV_DELIMITER, "\\t").unwrap();
        assert_eq!(config.get_csv_delimiter().unwrap(), b'\t');
    }

    #[test]
    fn test_snapshot_is_sorted_json() {
        let config = ConfigManager::new();
        config.set_config_value(config_keys::WRITE_REPORT, "false").unwrap();
        config.set_config_value(config_keys::OUTPUT_DIR, "out").unwrap();

        assert_eq!(
            config.get_config_snapshot().unwrap(),
            r#"{"output_dir":"out","write_report":"false"}"#
        );
    }
}
