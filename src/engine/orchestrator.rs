// ==========================================
// 物料成分声明质检系统 - 规则编排器
// ==========================================
// 用途: 字段映射 → 分组聚合 → 按目录顺序执行十条规则 → 输出投影
// 红线: 聚合先于任何规则计算完成
// 红线: 单行备注只由该行自身的评估写入,拼接顺序 = 目录顺序
// ==========================================

use crate::domain::{
    columns, AnnotatedTable, CompositionRecord, ComputedColumns, DqIssue, DqLevel, QaRule,
    QaSummary, RawTable, RuleHitCount,
};
use crate::engine::aggregator::GroupAggregates;
use crate::engine::comment::CommentAccumulator;
use crate::engine::rules::RuleInput;
use crate::importer::data_cleaner::format_number;
use crate::importer::error::QaResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::qa_importer_trait::FieldMapper as _;
use tracing::{debug, info, warn};

// ==========================================
// RowEvaluation - 单行评估结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RowEvaluation {
    pub row_number: usize,
    pub key: String,
    pub computed: ComputedColumns,
    pub hits: Vec<QaRule>,
    pub comment: String,
}

// ==========================================
// QaOutcome - 单表校验结果
// ==========================================
#[derive(Debug, Clone)]
pub struct QaOutcome {
    pub table: AnnotatedTable,
    pub evaluations: Vec<RowEvaluation>,
    pub dq_issues: Vec<DqIssue>,
    pub summary: QaSummary,
}

// ==========================================
// QaOrchestrator - 规则编排器
// ==========================================
pub struct QaOrchestrator {
    mapper: FieldMapper,
}

impl QaOrchestrator {
    pub fn new() -> Self {
        Self {
            mapper: FieldMapper::new(),
        }
    }

    /// 执行完整校验
    ///
    /// # 返回
    /// - Ok(QaOutcome): 输出表 + 逐行评估 + DQ 问题 + 汇总
    /// - Err(MissingColumns): 缺少必填列,未执行任何规则
    pub fn run(&self, table: &RawTable) -> QaResult<QaOutcome> {
        info!(
            rows = table.row_count(),
            columns = table.headers.len(),
            "开始执行成分表校验"
        );

        // 步骤1: 字段映射（结构错误在此中止）
        let (records, mut dq_issues) = self.mapper.map_records(table)?;

        // 步骤2: 分组聚合
        let aggregates = GroupAggregates::build(&records);
        for key in aggregates.divergent_summation_keys() {
            warn!(key = key, "同一 Key 下 TotalComponentMassSummation 不一致,按首行取值");
            dq_issues.push(DqIssue {
                row_number: 0,
                key: Some(key.to_string()),
                level: DqLevel::Warning,
                field: columns::TOTAL_COMPONENT_MASS_SUMMATION.to_string(),
                message: "组内申报合计不一致,软件校验按首行取值".to_string(),
            });
        }

        // 步骤3: 规则评估
        let evaluations = self.evaluate_records(&records, &aggregates);

        // 步骤4: 输出投影
        let annotated = project(table, &evaluations);
        let summary = summarize(&evaluations, &aggregates);

        info!(
            total_rows = summary.total_rows,
            flagged_rows = summary.flagged_rows,
            key_groups = summary.key_groups,
            dq_issues = dq_issues.len(),
            "成分表校验完成"
        );

        Ok(QaOutcome {
            table: annotated,
            evaluations,
            dq_issues,
            summary,
        })
    }

    /// 按目录顺序逐条规则评估全部记录
    pub fn evaluate_records(
        &self,
        records: &[CompositionRecord],
        aggregates: &GroupAggregates,
    ) -> Vec<RowEvaluation> {
        let inputs: Vec<RuleInput<'_>> = records
            .iter()
            .map(|record| RuleInput::new(record, aggregates))
            .collect();
        let mut accumulators: Vec<CommentAccumulator> = records
            .iter()
            .map(|record| CommentAccumulator::from_existing(&record.existing_comment))
            .collect();

        for rule in QaRule::CATALOGUE {
            let mut hits = 0usize;
            for (input, acc) in inputs.iter().zip(accumulators.iter_mut()) {
                if rule.is_violated(input) {
                    acc.append(rule);
                    hits += 1;
                }
            }
            debug!(rule = %rule, hits = hits, "规则执行完成");
        }

        inputs
            .iter()
            .zip(accumulators)
            .map(|(input, acc)| RowEvaluation {
                row_number: input.record.row_number,
                key: input.record.key.clone(),
                computed: input.computed_columns(),
                hits: acc.hits().to_vec(),
                comment: acc.render(),
            })
            .collect()
    }
}

impl Default for QaOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// 输出投影: 输入列（剔除旧的追加列）+ 固定追加列
pub fn project(table: &RawTable, evaluations: &[RowEvaluation]) -> AnnotatedTable {
    let kept: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, header)| !columns::ADDED.contains(&header.trim()))
        .map(|(idx, _)| idx)
        .collect();

    let headers = kept
        .iter()
        .map(|&idx| table.headers[idx].clone())
        .chain(columns::ADDED.iter().map(|name| name.to_string()))
        .collect();

    let rows = table
        .rows
        .iter()
        .zip(evaluations)
        .map(|(row, evaluation)| {
            let computed = &evaluation.computed;
            kept.iter()
                .map(|&idx| row.get(idx).cloned().unwrap_or_default())
                .chain([
                    format_number(computed.rows_count_gap),
                    format_number(computed.homogeneous_mass_gap),
                    format_number(computed.homogeneous_percentage_sum),
                    format_number(computed.homogeneous_ppm_sum),
                    format_number(computed.component_percentage_sum),
                    format_number(computed.component_ppm_sum),
                    evaluation.comment.clone(),
                ])
                .collect()
        })
        .collect();

    AnnotatedTable { headers, rows }
}

/// 汇总统计
pub fn summarize(evaluations: &[RowEvaluation], aggregates: &GroupAggregates) -> QaSummary {
    let flagged_rows = evaluations.iter().filter(|e| !e.hits.is_empty()).count();
    let rule_hits = QaRule::CATALOGUE
        .into_iter()
        .map(|rule| RuleHitCount {
            rule,
            message: rule.message().to_string(),
            rows: evaluations.iter().filter(|e| e.hits.contains(&rule)).count(),
        })
        .collect();

    QaSummary {
        total_rows: evaluations.len(),
        flagged_rows,
        clean_rows: evaluations.len() - flagged_rows,
        key_groups: aggregates.key_group_count(),
        material_groups: aggregates.material_group_count(),
        rule_hits,
    }
}
