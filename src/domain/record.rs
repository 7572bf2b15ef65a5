// ==========================================
// 物料成分声明质检系统 - 成分记录领域模型
// ==========================================
// 职责: 原始表、单行成分记录、派生诊断列
// 生命周期: 仅在单次校验内,不跨运行持久化
// ==========================================

use crate::domain::types::FmdRevFlag;
use serde::{Deserialize, Serialize};

// ==========================================
// 列名常量
// ==========================================
pub mod columns {
    pub const CHEMICAL_ID: &str = "ChemicalID";
    pub const PART_NUMBER: &str = "PartNumber";
    pub const ROWS_COUNT: &str = "RowsCount";
    pub const FMD_REV_FLAG: &str = "FMDRevFlag";
    pub const HOMOGENEOUS_MATERIAL_NAME: &str = "HomogeneousMaterialName";
    pub const HOMOGENEOUS_MATERIAL_MASS: &str = "HomogeneousMaterialMass";
    pub const MASS: &str = "Mass";
    pub const SUBSTANCE_HM_PERCENTAGE: &str = "SubstanceHomogeneousMaterialPercentage";
    pub const SUBSTANCE_HM_PPM: &str = "SubstanceHomogeneousMaterialPercentagePPM";
    pub const SUBSTANCE_COMPONENT_PERCENTAGE: &str = "SubstanceComponentLevelPercentage";
    pub const SUBSTANCE_COMPONENT_PPM: &str = "SubstanceComponentLevelPPM";
    pub const TOTAL_COMPONENT_MASS_PROFILE: &str = "TotalComponentMassProfile";
    pub const TOTAL_COMPONENT_MASS_SUMMATION: &str = "TotalComponentMassSummation";

    // 可选列（缺失时按空备注创建）
    pub const AUTOMATED_QA_COMMENT: &str = "Automated QA Comment";

    // 派生诊断列（固定追加顺序）
    pub const ROWS_COUNT_GAP: &str = "RowsCountGap";
    pub const HOMOGENEOUS_MASS_GAP: &str = "Homogeneous Mass Gap";
    pub const HOMOGENEOUS_PERCENTAGE_SUM: &str = "homogeneousPercentageSum";
    pub const HOMOGENEOUS_PPM_SUM: &str = "homogeneousPPMSum";
    pub const COMPONENT_PERCENTAGE_SUM: &str = "ComponentPercentageSum";
    pub const COMPONENT_PPM_SUM: &str = "ComponentPPMSum";

    /// 必填列（缺任一列即为结构错误）
    pub const REQUIRED: [&str; 13] = [
        CHEMICAL_ID,
        PART_NUMBER,
        ROWS_COUNT,
        FMD_REV_FLAG,
        HOMOGENEOUS_MATERIAL_NAME,
        HOMOGENEOUS_MATERIAL_MASS,
        MASS,
        SUBSTANCE_HM_PERCENTAGE,
        SUBSTANCE_HM_PPM,
        SUBSTANCE_COMPONENT_PERCENTAGE,
        SUBSTANCE_COMPONENT_PPM,
        TOTAL_COMPONENT_MASS_PROFILE,
        TOTAL_COMPONENT_MASS_SUMMATION,
    ];

    /// 追加列（输入列之后的固定顺序）
    pub const ADDED: [&str; 7] = [
        ROWS_COUNT_GAP,
        HOMOGENEOUS_MASS_GAP,
        HOMOGENEOUS_PERCENTAGE_SUM,
        HOMOGENEOUS_PPM_SUM,
        COMPONENT_PERCENTAGE_SUM,
        COMPONENT_PPM_SUM,
        AUTOMATED_QA_COMMENT,
    ];
}

// ==========================================
// RawTable - 文件解析产物
// ==========================================
// 表头保持原文（含空格等格式瑕疵），列顺序与源文件一致
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    #[serde(default)]
    pub sheet_name: Option<String>, // 工作簿来源的工作表名,CSV 为 None
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers,
            rows,
            sheet_name: None,
        }
    }

    pub fn with_sheet_name(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = Some(sheet_name.into());
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 按 TRIM 后的列名查找列下标
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }
}

// ==========================================
// CompositionRecord - 单行成分记录
// ==========================================
// 用途: 字段映射产物,规则引擎只读
// 数值字段: None 表示缺失或无法解析（求和按 0, 去重时剔除）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionRecord {
    // ===== 元信息 =====
    pub row_number: usize, // 源文件行号（表头为第 1 行）

    // ===== 标识 =====
    pub chemical_id: String,  // 化学物质标识（文本）
    pub part_number: String,  // 零件号（文本）
    pub key: String,          // 派生: ChemicalID_PartNumber

    // ===== 申报信息 =====
    pub rows_count: Option<f64>,   // 申报行数
    pub fmd_rev_flag: FmdRevFlag,  // 修订标志

    // ===== 均质材料 =====
    pub material_name: String,               // 原文
    pub material_key: String,                // 小写化后用于分组
    pub homogeneous_material_mass: Option<f64>,

    // ===== 物质 =====
    pub mass: Option<f64>,
    pub substance_hm_percentage: Option<f64>,
    pub substance_hm_ppm: Option<f64>,
    pub substance_component_percentage: Option<f64>,
    pub substance_component_ppm: Option<f64>,

    // ===== 部件总质量 =====
    pub total_component_mass_profile: Option<f64>,
    pub total_component_mass_summation: Option<f64>,

    // ===== 已有备注 =====
    pub existing_comment: String,
}

// ==========================================
// ComputedColumns - 派生诊断列
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputedColumns {
    pub rows_count_gap: f64,               // 申报行数 - 实际行数
    pub homogeneous_mass_gap: f64,         // Σ质量 - 均质材料质量
    pub homogeneous_percentage_sum: f64,   // (Key, 材料) 百分比合计
    pub homogeneous_ppm_sum: f64,          // (Key, 材料) PPM 合计
    pub component_percentage_sum: f64,     // Key 百分比合计
    pub component_ppm_sum: f64,            // Key PPM 合计
}

// ==========================================
// AnnotatedTable - 校验输出表
// ==========================================
// 列顺序: 输入列 + 固定追加列
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl AnnotatedTable {
    /// 读取某行某列（按 TRIM 后列名）
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|h| h.trim() == column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }

    /// 备注列全部取值
    pub fn comments(&self) -> Vec<&str> {
        (0..self.rows.len())
            .map(|row| self.cell(row, columns::AUTOMATED_QA_COMMENT).unwrap_or(""))
            .collect()
    }
}
