// ==========================================
// 物料成分声明质检系统 - 运行报告
// ==========================================

use crate::domain::types::{DqLevel, QaRule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// DqIssue - 数据质量问题（不影响备注列）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqIssue {
    pub row_number: usize,      // 源文件行号（0 表示组级问题）
    pub key: Option<String>,    // 所属 Key（如已派生）
    pub level: DqLevel,
    pub field: String,
    pub message: String,
}

// ==========================================
// RuleHitCount - 单条规则命中行数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleHitCount {
    pub rule: QaRule,
    pub message: String,
    pub rows: usize,
}

// ==========================================
// QaSummary - 汇总统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QaSummary {
    pub total_rows: usize,       // 数据行数
    pub flagged_rows: usize,     // 至少命中一条规则
    pub clean_rows: usize,       // 无命中
    pub key_groups: usize,       // Key 分组数
    pub material_groups: usize,  // (Key, 材料) 分组数
    pub rule_hits: Vec<RuleHitCount>, // 目录顺序
}

// ==========================================
// QaReport - 单文件校验结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaReport {
    pub run_id: String,
    pub source_path: String,
    pub output_path: String,
    pub report_path: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub summary: QaSummary,
    pub dq_issues: Vec<DqIssue>,
}

impl QaReport {
    /// 指定规则命中行数
    pub fn hits_for(&self, rule: QaRule) -> usize {
        self.summary
            .rule_hits
            .iter()
            .find(|h| h.rule == rule)
            .map(|h| h.rows)
            .unwrap_or(0)
    }
}
