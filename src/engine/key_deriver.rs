// ==========================================
// 物料成分声明质检系统 - Key 派生
// ==========================================
// 规则: Key = ChemicalID + "_" + PartNumber（文本拼接）
// ==========================================

/// 派生分组 Key
///
/// 两侧均为已文本化的标识（缺失时为 `None` 占位）,不做任何数值转换。
pub fn derive_key(chemical_id: &str, part_number: &str) -> String {
    format!("{}_{}", chemical_id, part_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key() {
        assert_eq!(derive_key("A", "1"), "A_1");
        assert_eq!(derive_key("7440-50-8", "PN_01"), "7440-50-8_PN_01");
        assert_eq!(derive_key("None", "P1"), "None_P1");
    }
}
