// ==========================================
// 物料成分声明质检系统 - 分组聚合器
// ==========================================
// 职责: 按 Key / (Key, 材料) 两级分组计算计数、合计、去重计数
// 红线: 聚合在任何规则读取之前一次性算完,之后只读
// 口径: 缺失数值求和按 0, 去重时剔除
// ==========================================

use crate::domain::CompositionRecord;
use std::collections::{HashMap, HashSet};
use tracing::debug;

// ==========================================
// NumericField - 可聚合数值字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    RowsCount,
    HomogeneousMaterialMass,
    Mass,
    SubstanceHmPercentage,
    SubstanceHmPpm,
    SubstanceComponentPercentage,
    SubstanceComponentPpm,
    TotalComponentMassProfile,
    TotalComponentMassSummation,
}

impl NumericField {
    pub fn value(&self, record: &CompositionRecord) -> Option<f64> {
        match self {
            NumericField::RowsCount => record.rows_count,
            NumericField::HomogeneousMaterialMass => record.homogeneous_material_mass,
            NumericField::Mass => record.mass,
            NumericField::SubstanceHmPercentage => record.substance_hm_percentage,
            NumericField::SubstanceHmPpm => record.substance_hm_ppm,
            NumericField::SubstanceComponentPercentage => record.substance_component_percentage,
            NumericField::SubstanceComponentPpm => record.substance_component_ppm,
            NumericField::TotalComponentMassProfile => record.total_component_mass_profile,
            NumericField::TotalComponentMassSummation => record.total_component_mass_summation,
        }
    }
}

// ==========================================
// GroupLevel / GroupKey - 分组粒度
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupLevel {
    Key,            // 按 Key
    KeyAndMaterial, // 按 (Key, 小写材料名)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub key: String,
    pub material: Option<String>,
}

impl GroupKey {
    pub fn of(record: &CompositionRecord, level: GroupLevel) -> Self {
        Self {
            key: record.key.clone(),
            material: match level {
                GroupLevel::Key => None,
                GroupLevel::KeyAndMaterial => Some(record.material_key.clone()),
            },
        }
    }
}

// ==========================================
// CompensatedSum - 补偿求和（Neumaier）
// ==========================================
// 按输入行顺序累加,降低 0.1 级小数累加误差对边界判定的影响
#[derive(Debug, Clone, Copy, Default)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    pub fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// 去重用的数值键（-0.0 与 0.0 视为同值）
fn distinct_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

// ==========================================
// 纯函数聚合操作
// ==========================================

/// 每个 Key 的记录数
pub fn count_by_key(records: &[CompositionRecord]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for record in records {
        *counts.entry(record.key.clone()).or_insert(0) += 1;
    }
    counts
}

/// 任意粒度的字段合计（缺失按 0）
pub fn sum_by(
    records: &[CompositionRecord],
    field: NumericField,
    level: GroupLevel,
) -> HashMap<GroupKey, f64> {
    let mut sums: HashMap<GroupKey, CompensatedSum> = HashMap::new();
    for record in records {
        let entry = sums.entry(GroupKey::of(record, level)).or_default();
        entry.add(field.value(record).unwrap_or(0.0));
    }
    sums.into_iter().map(|(k, s)| (k, s.value())).collect()
}

/// Key 级字段合计
pub fn sum_by_key(records: &[CompositionRecord], field: NumericField) -> HashMap<String, f64> {
    sum_by(records, field, GroupLevel::Key)
        .into_iter()
        .map(|(group, sum)| (group.key, sum))
        .collect()
}

/// (Key, 材料) 级字段合计
pub fn sum_by_key_and_material(
    records: &[CompositionRecord],
    field: NumericField,
) -> HashMap<(String, String), f64> {
    sum_by(records, field, GroupLevel::KeyAndMaterial)
        .into_iter()
        .map(|(group, sum)| ((group.key, group.material.unwrap_or_default()), sum))
        .collect()
}

/// 分组内字段去重计数（缺失值不计入）
pub fn distinct_count(
    records: &[CompositionRecord],
    field: NumericField,
    level: GroupLevel,
) -> HashMap<GroupKey, usize> {
    let mut sets: HashMap<GroupKey, HashSet<u64>> = HashMap::new();
    for record in records {
        let set = sets.entry(GroupKey::of(record, level)).or_default();
        if let Some(value) = field.value(record) {
            set.insert(distinct_bits(value));
        }
    }
    sets.into_iter().map(|(k, s)| (k, s.len())).collect()
}

/// 每个 Key 首行（输入顺序）的字段取值
pub fn first_by_key(
    records: &[CompositionRecord],
    field: NumericField,
) -> HashMap<String, Option<f64>> {
    let mut firsts = HashMap::new();
    for record in records {
        firsts
            .entry(record.key.clone())
            .or_insert_with(|| field.value(record));
    }
    firsts
}

// ==========================================
// 分组统计视图
// ==========================================

/// Key 级统计
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyGroupStats {
    pub row_count: usize,
    pub mass_sum: f64,
    pub component_percentage_sum: f64,
    pub component_ppm_sum: f64,
    /// 首行申报的 TotalComponentMassSummation
    pub declared_summation: Option<f64>,
    /// 组内申报合计不一致
    pub summation_diverges: bool,
}

/// (Key, 材料) 级统计
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaterialGroupStats {
    pub row_count: usize,
    pub mass_sum: f64,
    pub hm_percentage_sum: f64,
    pub hm_ppm_sum: f64,
    pub distinct_material_masses: usize,
}

// ==========================================
// GroupAggregates - 聚合结果（只读）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct GroupAggregates {
    key_groups: HashMap<String, KeyGroupStats>,
    material_groups: HashMap<(String, String), MaterialGroupStats>,
}

impl GroupAggregates {
    /// 一次性构建全部聚合
    pub fn build(records: &[CompositionRecord]) -> Self {
        let counts = count_by_key(records);
        let mass_by_key = sum_by_key(records, NumericField::Mass);
        let pct_by_key = sum_by_key(records, NumericField::SubstanceComponentPercentage);
        let ppm_by_key = sum_by_key(records, NumericField::SubstanceComponentPpm);
        let first_summation = first_by_key(records, NumericField::TotalComponentMassSummation);

        let mut divergent: HashSet<String> = HashSet::new();
        for record in records {
            let declared = first_summation.get(&record.key).copied().flatten();
            if declared != record.total_component_mass_summation {
                divergent.insert(record.key.clone());
            }
        }

        let key_groups: HashMap<String, KeyGroupStats> = counts
            .into_iter()
            .map(|(key, row_count)| {
                let stats = KeyGroupStats {
                    row_count,
                    mass_sum: mass_by_key.get(&key).copied().unwrap_or(0.0),
                    component_percentage_sum: pct_by_key.get(&key).copied().unwrap_or(0.0),
                    component_ppm_sum: ppm_by_key.get(&key).copied().unwrap_or(0.0),
                    declared_summation: first_summation.get(&key).copied().flatten(),
                    summation_diverges: divergent.contains(&key),
                };
                (key, stats)
            })
            .collect();

        let mass_by_material = sum_by_key_and_material(records, NumericField::Mass);
        let pct_by_material =
            sum_by_key_and_material(records, NumericField::SubstanceHmPercentage);
        let ppm_by_material = sum_by_key_and_material(records, NumericField::SubstanceHmPpm);
        let distinct_masses = distinct_count(
            records,
            NumericField::HomogeneousMaterialMass,
            GroupLevel::KeyAndMaterial,
        );

        let mut material_groups: HashMap<(String, String), MaterialGroupStats> = HashMap::new();
        for record in records {
            let group = (record.key.clone(), record.material_key.clone());
            material_groups.entry(group).or_default().row_count += 1;
        }
        for (group, stats) in material_groups.iter_mut() {
            stats.mass_sum = mass_by_material.get(group).copied().unwrap_or(0.0);
            stats.hm_percentage_sum = pct_by_material.get(group).copied().unwrap_or(0.0);
            stats.hm_ppm_sum = ppm_by_material.get(group).copied().unwrap_or(0.0);
            stats.distinct_material_masses = distinct_masses
                .get(&GroupKey {
                    key: group.0.clone(),
                    material: Some(group.1.clone()),
                })
                .copied()
                .unwrap_or(0);
        }

        debug!(
            key_groups = key_groups.len(),
            material_groups = material_groups.len(),
            "分组聚合完成"
        );

        Self {
            key_groups,
            material_groups,
        }
    }

    pub fn key_stats(&self, key: &str) -> KeyGroupStats {
        self.key_groups.get(key).copied().unwrap_or_default()
    }

    pub fn material_stats(&self, key: &str, material_key: &str) -> MaterialGroupStats {
        self.material_groups
            .get(&(key.to_string(), material_key.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// 组内申报合计不一致的 Key（排序后返回）
    pub fn divergent_summation_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .key_groups
            .iter()
            .filter(|(_, stats)| stats.summation_diverges)
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn key_group_count(&self) -> usize {
        self.key_groups.len()
    }

    pub fn material_group_count(&self) -> usize {
        self.material_groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::RecordBuilder;

    #[test]
    fn test_count_by_key_matches_partition() {
        let records = vec![
            RecordBuilder::new("A", "1").build(),
            RecordBuilder::new("A", "1").build(),
            RecordBuilder::new("B", "1").build(),
        ];

        let counts = count_by_key(&records);

        assert_eq!(counts.get("A_1"), Some(&2));
        assert_eq!(counts.get("B_1"), Some(&1));
        assert_eq!(counts.values().sum::<usize>(), records.len());
    }

    #[test]
    fn test_sum_treats_missing_as_zero() {
        let records = vec![
            RecordBuilder::new("A", "1").mass(Some(4.0)).build(),
            RecordBuilder::new("A", "1").mass(None).build(),
            RecordBuilder::new("A", "1").mass(Some(5.0)).build(),
        ];

        let sums = sum_by_key(&records, NumericField::Mass);

        assert_eq!(sums.get("A_1"), Some(&9.0));
    }

    #[test]
    fn test_sum_by_key_and_material_is_case_insensitive() {
        let records = vec![
            RecordBuilder::new("A", "1").material("Copper").mass(Some(1.5)).build(),
            RecordBuilder::new("A", "1").material("copper").mass(Some(2.5)).build(),
            RecordBuilder::new("A", "1").material("Tin").mass(Some(7.0)).build(),
        ];

        let sums = sum_by_key_and_material(&records, NumericField::Mass);

        assert_eq!(sums.get(&("A_1".to_string(), "copper".to_string())), Some(&4.0));
        assert_eq!(sums.get(&("A_1".to_string(), "tin".to_string())), Some(&7.0));
    }

    #[test]
    fn test_distinct_count_excludes_missing() {
        let records = vec![
            RecordBuilder::new("A", "1").material_mass(Some(2.0)).build(),
            RecordBuilder::new("A", "1").material_mass(None).build(),
            RecordBuilder::new("A", "1").material_mass(Some(2.0)).build(),
        ];

        let counts = distinct_count(
            &records,
            NumericField::HomogeneousMaterialMass,
            GroupLevel::KeyAndMaterial,
        );

        let group = GroupKey {
            key: "A_1".to_string(),
            material: Some("copper".to_string()),
        };
        assert_eq!(counts.get(&group), Some(&1));
    }

    #[test]
    fn test_distinct_count_signed_zero_is_one_value() {
        let records = vec![
            RecordBuilder::new("A", "1").material_mass(Some(0.0)).build(),
            RecordBuilder::new("A", "1").material_mass(Some(-0.0)).build(),
        ];

        let counts = distinct_count(
            &records,
            NumericField::HomogeneousMaterialMass,
            GroupLevel::Key,
        );

        let group = GroupKey {
            key: "A_1".to_string(),
            material: None,
        };
        assert_eq!(counts.get(&group), Some(&1));
    }

    #[test]
    fn test_compensated_sum_of_tenths() {
        let mut sum = CompensatedSum::default();
        for _ in 0..1000 {
            sum.add(0.1);
        }
        assert_eq!(sum.value(), 100.0);
    }

    #[test]
    fn test_build_flags_divergent_summation() {
        let records = vec![
            RecordBuilder::new("A", "1").summation(Some(2.0)).build(),
            RecordBuilder::new("A", "1").summation(Some(3.0)).build(),
            RecordBuilder::new("B", "1").summation(Some(3.0)).build(),
        ];

        let aggregates = GroupAggregates::build(&records);

        assert_eq!(aggregates.key_stats("A_1").declared_summation, Some(2.0));
        assert_eq!(aggregates.divergent_summation_keys(), vec!["A_1"]);
        assert_eq!(aggregates.key_group_count(), 2);
        assert_eq!(aggregates.material_group_count(), 2);
    }
}
