// ==========================================
// 物料成分声明质检系统 - 字段映射器实现
// ==========================================
// 职责: 列名解析（TRIM 匹配）+ 行 → CompositionRecord + 类型转换
// 红线: 缺少必填列立即失败,任何规则都不执行
// ==========================================

use crate::domain::{columns, CompositionRecord, DqIssue, DqLevel, FmdRevFlag, RawTable};
use crate::engine::key_deriver::derive_key;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{QaError, QaResult};
use crate::importer::qa_importer_trait::{DataCleaner as _, FieldMapper as FieldMapperTrait};
use tracing::warn;

// ==========================================
// ColumnLayout - 必填列下标
// ==========================================
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    chemical_id: usize,
    part_number: usize,
    rows_count: usize,
    fmd_rev_flag: usize,
    material_name: usize,
    material_mass: usize,
    mass: usize,
    hm_percentage: usize,
    hm_ppm: usize,
    component_percentage: usize,
    component_ppm: usize,
    mass_profile: usize,
    mass_summation: usize,
    comment: Option<usize>,
}

impl ColumnLayout {
    fn resolve(table: &RawTable) -> QaResult<Self> {
        let missing: Vec<String> = columns::REQUIRED
            .iter()
            .filter(|name| table.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(QaError::MissingColumns(missing));
        }

        let idx = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| QaError::MissingColumns(vec![name.to_string()]))
        };

        Ok(Self {
            chemical_id: idx(columns::CHEMICAL_ID)?,
            part_number: idx(columns::PART_NUMBER)?,
            rows_count: idx(columns::ROWS_COUNT)?,
            fmd_rev_flag: idx(columns::FMD_REV_FLAG)?,
            material_name: idx(columns::HOMOGENEOUS_MATERIAL_NAME)?,
            material_mass: idx(columns::HOMOGENEOUS_MATERIAL_MASS)?,
            mass: idx(columns::MASS)?,
            hm_percentage: idx(columns::SUBSTANCE_HM_PERCENTAGE)?,
            hm_ppm: idx(columns::SUBSTANCE_HM_PPM)?,
            component_percentage: idx(columns::SUBSTANCE_COMPONENT_PERCENTAGE)?,
            component_ppm: idx(columns::SUBSTANCE_COMPONENT_PPM)?,
            mass_profile: idx(columns::TOTAL_COMPONENT_MASS_PROFILE)?,
            mass_summation: idx(columns::TOTAL_COMPONENT_MASS_SUMMATION)?,
            comment: table.column_index(columns::AUTOMATED_QA_COMMENT),
        })
    }
}

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
        row.get(idx).map(String::as_str).unwrap_or("")
    }

    /// 解析数值字段;非空但无法解析时记录 DQ 问题
    fn numeric(
        &self,
        row: &[String],
        idx: usize,
        field: &str,
        row_number: usize,
        key: &str,
        issues: &mut Vec<DqIssue>,
    ) -> Option<f64> {
        let raw = Self::cell(row, idx);
        let parsed = self.cleaner.parse_numeric(raw);
        if parsed.is_none() && !self.cleaner.is_null_like(raw) {
            warn!(row = row_number, field = field, value = raw, "数值无法解析,按缺失处理");
            issues.push(DqIssue {
                row_number,
                key: Some(key.to_string()),
                level: DqLevel::Warning,
                field: field.to_string(),
                message: format!("无法解析为数值,按缺失处理: {}", raw),
            });
        }
        parsed
    }

    fn map_row(
        &self,
        layout: &ColumnLayout,
        row: &[String],
        row_number: usize,
        issues: &mut Vec<DqIssue>,
    ) -> CompositionRecord {
        let chemical_raw = Self::cell(row, layout.chemical_id);
        let part_raw = Self::cell(row, layout.part_number);
        let chemical_id = self.cleaner.normalize_identifier(chemical_raw);
        let part_number = self.cleaner.normalize_identifier(part_raw);
        let key = derive_key(&chemical_id, &part_number);

        // 标识缺失: Key 仍然有效,仅提示
        for (field, raw) in [
            (columns::CHEMICAL_ID, chemical_raw),
            (columns::PART_NUMBER, part_raw),
        ] {
            if self.cleaner.is_null_like(raw) {
                issues.push(DqIssue {
                    row_number,
                    key: Some(key.clone()),
                    level: DqLevel::Info,
                    field: field.to_string(),
                    message: "标识字段为空,Key 中以 None 占位".to_string(),
                });
            }
        }

        let material_name = Self::cell(row, layout.material_name).to_string();
        let material_key = self.cleaner.normalize_material_name(&material_name);

        let mut numeric = |idx: usize, field: &str| {
            self.numeric(row, idx, field, row_number, &key, issues)
        };

        let rows_count = numeric(layout.rows_count, columns::ROWS_COUNT);
        let homogeneous_material_mass =
            numeric(layout.material_mass, columns::HOMOGENEOUS_MATERIAL_MASS);
        let mass = numeric(layout.mass, columns::MASS);
        let substance_hm_percentage =
            numeric(layout.hm_percentage, columns::SUBSTANCE_HM_PERCENTAGE);
        let substance_hm_ppm = numeric(layout.hm_ppm, columns::SUBSTANCE_HM_PPM);
        let substance_component_percentage = numeric(
            layout.component_percentage,
            columns::SUBSTANCE_COMPONENT_PERCENTAGE,
        );
        let substance_component_ppm =
            numeric(layout.component_ppm, columns::SUBSTANCE_COMPONENT_PPM);
        let total_component_mass_profile =
            numeric(layout.mass_profile, columns::TOTAL_COMPONENT_MASS_PROFILE);
        let total_component_mass_summation =
            numeric(layout.mass_summation, columns::TOTAL_COMPONENT_MASS_SUMMATION);

        CompositionRecord {
            row_number,
            chemical_id,
            part_number,
            key,
            rows_count,
            fmd_rev_flag: FmdRevFlag::parse(Self::cell(row, layout.fmd_rev_flag)),
            material_name,
            material_key,
            homogeneous_material_mass,
            mass,
            substance_hm_percentage,
            substance_hm_ppm,
            substance_component_percentage,
            substance_component_ppm,
            total_component_mass_profile,
            total_component_mass_summation,
            existing_comment: layout
                .comment
                .map(|idx| Self::cell(row, idx).to_string())
                .unwrap_or_default(),
        }
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_records(&self, table: &RawTable) -> QaResult<(Vec<CompositionRecord>, Vec<DqIssue>)> {
        let layout = ColumnLayout::resolve(table)?;

        let mut issues = Vec::new();
        let records = table
            .rows
            .iter()
            .enumerate()
            // 行号: 表头为第 1 行
            .map(|(idx, row)| self.map_row(&layout, row, idx + 2, &mut issues))
            .collect();

        Ok((records, issues))
    }
}
