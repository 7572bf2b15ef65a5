// ==========================================
// 物料成分声明质检系统 - 领域类型定义
// ==========================================
// 职责: 修订标志、校验规则目录、数据质量级别
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 修订标志 (FMD Revision Flag)
// ==========================================
// 只有 "Not Latest" 参与校验, 其他取值原样保留
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FmdRevFlag {
    Latest,         // 最新版本
    NotLatest,      // 非最新版本
    Other(String),  // 其他取值
    Missing,        // 空值
}

impl FmdRevFlag {
    /// 从单元格文本解析（已 TRIM）
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" => FmdRevFlag::Missing,
            "Latest" => FmdRevFlag::Latest,
            "Not Latest" => FmdRevFlag::NotLatest,
            other => FmdRevFlag::Other(other.to_string()),
        }
    }

    pub fn is_not_latest(&self) -> bool {
        matches!(self, FmdRevFlag::NotLatest)
    }
}

impl fmt::Display for FmdRevFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FmdRevFlag::Latest => write!(f, "Latest"),
            FmdRevFlag::NotLatest => write!(f, "Not Latest"),
            FmdRevFlag::Other(v) => write!(f, "{}", v),
            FmdRevFlag::Missing => write!(f, ""),
        }
    }
}

// ==========================================
// 校验规则目录 (QA Rule Catalogue)
// ==========================================
// 红线: 目录顺序即备注拼接顺序（1 → 10）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QaRule {
    RowsCount,                  // 1 行数一致
    RevisionFlag,               // 2 修订标志
    HomogeneousMassUniformity,  // 3 均质材料质量唯一
    HomogeneousMassBalance,     // 4 均质材料质量平衡
    HomogeneousPercentageSum,   // 5 均质材料百分比合计
    HomogeneousPpmSum,          // 6 均质材料 PPM 合计
    ComponentPercentageSum,     // 7 部件级百分比合计
    ComponentPpmSum,            // 8 部件级 PPM 合计
    ProfileSummationGap,        // 9 申报总质量与合计质量差距
    MassSumSoftwareCheck,       // 10 质量合计软件校验
}

impl QaRule {
    /// 固定执行顺序
    pub const CATALOGUE: [QaRule; 10] = [
        QaRule::RowsCount,
        QaRule::RevisionFlag,
        QaRule::HomogeneousMassUniformity,
        QaRule::HomogeneousMassBalance,
        QaRule::HomogeneousPercentageSum,
        QaRule::HomogeneousPpmSum,
        QaRule::ComponentPercentageSum,
        QaRule::ComponentPpmSum,
        QaRule::ProfileSummationGap,
        QaRule::MassSumSoftwareCheck,
    ];

    /// 目录序号（从 1 开始）
    pub fn ordinal(&self) -> usize {
        match self {
            QaRule::RowsCount => 1,
            QaRule::RevisionFlag => 2,
            QaRule::HomogeneousMassUniformity => 3,
            QaRule::HomogeneousMassBalance => 4,
            QaRule::HomogeneousPercentageSum => 5,
            QaRule::HomogeneousPpmSum => 6,
            QaRule::ComponentPercentageSum => 7,
            QaRule::ComponentPpmSum => 8,
            QaRule::ProfileSummationGap => 9,
            QaRule::MassSumSoftwareCheck => 10,
        }
    }

    /// 写入备注列的固定诊断文本
    pub fn message(&self) -> &'static str {
        match self {
            QaRule::RowsCount => "Rows count mismatch",
            QaRule::RevisionFlag => "FMDRevFlag is Not Latest",
            QaRule::HomogeneousMassUniformity => {
                "Multiple masses for the same homogeneous material"
            }
            QaRule::HomogeneousMassBalance => "Fail: Mass mismatch",
            QaRule::HomogeneousPercentageSum => "Fail: homogeneousPercentage sum != 100",
            QaRule::HomogeneousPpmSum => "Fail: homogeneousPPM sum != 1000000",
            QaRule::ComponentPercentageSum => "Fail: Component level percentage sum != 100",
            QaRule::ComponentPpmSum => "Fail: Component level PPM sum != 1000000",
            QaRule::ProfileSummationGap => "Total VS Summation Gap is more than 50%",
            QaRule::MassSumSoftwareCheck => "Software issue",
        }
    }

    /// 反查: 诊断文本 → 规则
    pub fn from_message(message: &str) -> Option<QaRule> {
        QaRule::CATALOGUE
            .iter()
            .copied()
            .find(|rule| rule.message() == message)
    }
}

impl fmt::Display for QaRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QaRule::RowsCount => write!(f, "ROWS_COUNT"),
            QaRule::RevisionFlag => write!(f, "REVISION_FLAG"),
            QaRule::HomogeneousMassUniformity => write!(f, "HOMOGENEOUS_MASS_UNIFORMITY"),
            QaRule::HomogeneousMassBalance => write!(f, "HOMOGENEOUS_MASS_BALANCE"),
            QaRule::HomogeneousPercentageSum => write!(f, "HOMOGENEOUS_PERCENTAGE_SUM"),
            QaRule::HomogeneousPpmSum => write!(f, "HOMOGENEOUS_PPM_SUM"),
            QaRule::ComponentPercentageSum => write!(f, "COMPONENT_PERCENTAGE_SUM"),
            QaRule::ComponentPpmSum => write!(f, "COMPONENT_PPM_SUM"),
            QaRule::ProfileSummationGap => write!(f, "PROFILE_SUMMATION_GAP"),
            QaRule::MassSumSoftwareCheck => write!(f, "MASS_SUM_SOFTWARE_CHECK"),
        }
    }
}

// ==========================================
// 数据质量级别 (DQ Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Warning, // 警告（按缺失处理，继续校验）
    Info,    // 提示（仅记录）
}

impl fmt::Display for DqLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqLevel::Warning => write!(f, "WARNING"),
            DqLevel::Info => write!(f, "INFO"),
        }
    }
}
