// ==========================================
// 物料成分声明质检系统 - 校验规则
// ==========================================
// 职责: 十条规则的判定 + 派生诊断列计算
// 红线: 规则互相独立,只读聚合结果,不读已有备注
// 红线: 阈值为固定常量,两端均为闭区间
// ==========================================

use crate::domain::{CompositionRecord, ComputedColumns, QaRule};
use crate::engine::aggregator::{GroupAggregates, KeyGroupStats, MaterialGroupStats};

// ==========================================
// 固定阈值
// ==========================================

/// 均质材料质量平衡容差（|Σ质量 - 均质材料质量| >= 1 判为失败）
pub const MASS_BALANCE_TOLERANCE: f64 = 1.0;

/// 均质材料百分比合计允许区间
pub const HOMOGENEOUS_PERCENTAGE_RANGE: (f64, f64) = (99.9, 100.10);

/// 均质材料 PPM 合计允许区间
pub const HOMOGENEOUS_PPM_RANGE: (f64, f64) = (999_000.0, 1_001_000.0);

/// 部件级百分比合计允许区间
pub const COMPONENT_PERCENTAGE_RANGE: (f64, f64) = (99.0, 101.0);

/// 部件级 PPM 合计允许区间
pub const COMPONENT_PPM_RANGE: (f64, f64) = (990_000.0, 1_010_000.0);

/// 申报总质量与合计质量差距上限（%）
pub const PROFILE_GAP_LIMIT_PCT: f64 = 50.0;

/// 软件校验的舍入位数
pub const SOFTWARE_CHECK_DECIMALS: i32 = 4;

/// 闭区间判定
pub fn within(value: f64, range: (f64, f64)) -> bool {
    value >= range.0 && value <= range.1
}

/// 按小数位舍入（四舍五入,.5 远离零）
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// 申报总质量与合计质量的相对差距（%）
///
/// 申报总质量为 0 时返回 None（跳过判定,不视为违规）
pub fn profile_gap_pct(profile: f64, summation: f64) -> Option<f64> {
    if profile == 0.0 {
        return None;
    }
    Some((profile - summation).abs() / profile * 100.0)
}

// ==========================================
// RuleInput - 单行规则输入
// ==========================================
// 行字段 + 所在分组的聚合统计
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub record: &'a CompositionRecord,
    pub key_stats: KeyGroupStats,
    pub material_stats: MaterialGroupStats,
}

impl<'a> RuleInput<'a> {
    pub fn new(record: &'a CompositionRecord, aggregates: &GroupAggregates) -> Self {
        Self {
            record,
            key_stats: aggregates.key_stats(&record.key),
            material_stats: aggregates.material_stats(&record.key, &record.material_key),
        }
    }

    /// 派生诊断列
    pub fn computed_columns(&self) -> ComputedColumns {
        let record = self.record;
        ComputedColumns {
            rows_count_gap: record.rows_count.unwrap_or(0.0) - self.key_stats.row_count as f64,
            homogeneous_mass_gap: self.material_stats.mass_sum
                - record.homogeneous_material_mass.unwrap_or(0.0),
            homogeneous_percentage_sum: self.material_stats.hm_percentage_sum,
            homogeneous_ppm_sum: self.material_stats.hm_ppm_sum,
            component_percentage_sum: self.key_stats.component_percentage_sum,
            component_ppm_sum: self.key_stats.component_ppm_sum,
        }
    }
}

// ==========================================
// 规则判定
// ==========================================
impl QaRule {
    /// 判定是否违规
    pub fn is_violated(&self, input: &RuleInput<'_>) -> bool {
        let record = input.record;
        match self {
            QaRule::RowsCount => input.computed_columns().rows_count_gap != 0.0,
            QaRule::RevisionFlag => record.fmd_rev_flag.is_not_latest(),
            QaRule::HomogeneousMassUniformity => input.material_stats.distinct_material_masses > 1,
            QaRule::HomogeneousMassBalance => {
                input.computed_columns().homogeneous_mass_gap.abs() >= MASS_BALANCE_TOLERANCE
            }
            QaRule::HomogeneousPercentageSum => {
                !within(input.material_stats.hm_percentage_sum, HOMOGENEOUS_PERCENTAGE_RANGE)
            }
            QaRule::HomogeneousPpmSum => {
                !within(input.material_stats.hm_ppm_sum, HOMOGENEOUS_PPM_RANGE)
            }
            QaRule::ComponentPercentageSum => {
                !within(input.key_stats.component_percentage_sum, COMPONENT_PERCENTAGE_RANGE)
            }
            QaRule::ComponentPpmSum => {
                !within(input.key_stats.component_ppm_sum, COMPONENT_PPM_RANGE)
            }
            QaRule::ProfileSummationGap => profile_gap_pct(
                record.total_component_mass_profile.unwrap_or(0.0),
                record.total_component_mass_summation.unwrap_or(0.0),
            )
            .is_some_and(|gap| gap >= PROFILE_GAP_LIMIT_PCT),
            QaRule::MassSumSoftwareCheck => {
                round_to(input.key_stats.mass_sum, SOFTWARE_CHECK_DECIMALS)
                    != input.key_stats.declared_summation.unwrap_or(0.0)
            }
        }
    }

    /// 判定并返回诊断文本
    pub fn evaluate(&self, input: &RuleInput<'_>) -> Option<&'static str> {
        self.is_violated(input).then(|| self.message())
    }
}
