// ==========================================
// 物料成分声明质检系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值解析 / 标识文本化
// 口径: 空值与非数值一律视为缺失（求和按 0, 去重时剔除）
// ==========================================

use crate::importer::qa_importer_trait::DataCleaner as DataCleanerTrait;

/// 缺失标识在 Key 中的占位文本
pub const MISSING_IDENTIFIER: &str = "None";

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn parse_numeric(&self, value: &str) -> Option<f64> {
        if self.is_null_like(value) {
            return None;
        }
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    fn normalize_identifier(&self, value: &str) -> String {
        if self.is_null_like(value) {
            MISSING_IDENTIFIER.to_string()
        } else {
            value.trim().to_string()
        }
    }

    fn normalize_material_name(&self, value: &str) -> String {
        value.trim().to_lowercase()
    }

    fn is_null_like(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("null")
    }
}

/// 数值文本化
///
/// 整数值不带小数点（`3.0` → `"3"`），避免 Excel 数值型 ID 出现 `.0` 尾巴;
/// 其他值使用最短往返表示（不出现科学计数法）。
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        // -0.0 也输出为 "0"
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_valid() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_numeric("2.5"), Some(2.5));
        assert_eq!(cleaner.parse_numeric("  10 "), Some(10.0));
        assert_eq!(cleaner.parse_numeric("-0.25"), Some(-0.25));
    }

    #[test]
    fn test_parse_numeric_missing_and_invalid() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_numeric(""), None);
        assert_eq!(cleaner.parse_numeric("   "), None);
        assert_eq!(cleaner.parse_numeric("NaN"), None);
        assert_eq!(cleaner.parse_numeric("None"), None);
        assert_eq!(cleaner.parse_numeric("abc"), None);
        assert_eq!(cleaner.parse_numeric("inf"), None);
    }

    #[test]
    fn test_normalize_identifier() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_identifier(" CAS-7440 "), "CAS-7440");
        assert_eq!(cleaner.normalize_identifier(""), "None");
        assert_eq!(cleaner.normalize_identifier("nan"), "None");
    }

    #[test]
    fn test_normalize_material_name_lowercase() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_material_name(" Copper Alloy "), "copper alloy");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(12345678.0), "12345678");
        assert_eq!(format_number(f64::NAN), "");
    }
}
