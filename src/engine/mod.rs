// ==========================================
// 物料成分声明质检系统 - 引擎层
// ==========================================
// 职责: Key 派生、分组聚合、十条规则、备注拼接、文件级编排
// 红线: 引擎不做文件格式判断,读写交给 importer/exporter
// 红线: 规则只读聚合结果,不回写记录
// ==========================================

pub mod aggregator;
pub mod checker;
pub mod comment;
pub mod key_deriver;
pub mod orchestrator;
pub mod rules;

#[cfg(test)]
pub(crate) mod test_support;

// 重导出核心引擎
pub use aggregator::{GroupAggregates, KeyGroupStats, MaterialGroupStats};
pub use checker::{QaChecker, QaFileChecker};
pub use comment::{CommentAccumulator, COMMENT_SEPARATOR};
pub use key_deriver::derive_key;
pub use orchestrator::{QaOrchestrator, QaOutcome, RowEvaluation};
pub use rules::RuleInput;
