// ==========================================
// 物料成分声明质检系统 - 备注累加器
// ==========================================
// 职责: 按规则目录顺序拼接单行诊断文本
// 格式: "msg1 | msg2",空列表为空串,无首尾分隔符
// ==========================================

use crate::domain::QaRule;

/// 备注分隔符
pub const COMMENT_SEPARATOR: &str = " | ";

// ==========================================
// CommentAccumulator - 单行备注缓冲
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentAccumulator {
    manual_notes: Vec<String>,
    hits: Vec<QaRule>,
}

impl CommentAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已有备注为种子
    ///
    /// 只按完整分隔符 " | " 切分,人工备注内部的裸 `|` 原样保留。
    /// 已有备注中与规则诊断文本相同的片段是上次运行的产物,丢弃;
    /// 其余片段作为人工备注按原顺序保留在最前面。
    pub fn from_existing(existing: &str) -> Self {
        let manual_notes = existing
            .trim()
            .split(COMMENT_SEPARATOR)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .filter(|segment| QaRule::from_message(segment).is_none())
            .map(str::to_string)
            .collect();

        Self {
            manual_notes,
            hits: Vec::new(),
        }
    }

    /// 记录一条规则命中
    ///
    /// 同一规则重复追加无效;输出顺序始终为目录顺序,与调用顺序无关。
    pub fn append(&mut self, rule: QaRule) {
        if !self.hits.contains(&rule) {
            self.hits.push(rule);
            self.hits.sort_unstable_by_key(|r| r.ordinal());
        }
    }

    /// 本次运行命中的规则（目录顺序）
    pub fn hits(&self) -> &[QaRule] {
        &self.hits
    }

    pub fn is_empty(&self) -> bool {
        self.manual_notes.is_empty() && self.hits.is_empty()
    }

    /// 渲染备注文本
    pub fn render(&self) -> String {
        self.manual_notes
            .iter()
            .map(String::as_str)
            .chain(self.hits.iter().map(|rule| rule.message()))
            .collect::<Vec<_>>()
            .join(COMMENT_SEPARATOR)
    }
}
