// 单元测试用记录构造器（默认值为一条完全合规的单行记录）

use crate::domain::{CompositionRecord, FmdRevFlag};
use crate::engine::key_deriver::derive_key;

pub struct RecordBuilder {
    record: CompositionRecord,
}

impl RecordBuilder {
    pub fn new(chemical_id: &str, part_number: &str) -> Self {
        Self {
            record: CompositionRecord {
                row_number: 2,
                chemical_id: chemical_id.to_string(),
                part_number: part_number.to_string(),
                key: derive_key(chemical_id, part_number),
                rows_count: Some(1.0),
                fmd_rev_flag: FmdRevFlag::Latest,
                material_name: "copper".to_string(),
                material_key: "copper".to_string(),
                homogeneous_material_mass: Some(10.0),
                mass: Some(10.0),
                substance_hm_percentage: Some(100.0),
                substance_hm_ppm: Some(1_000_000.0),
                substance_component_percentage: Some(100.0),
                substance_component_ppm: Some(1_000_000.0),
                total_component_mass_profile: Some(10.0),
                total_component_mass_summation: Some(10.0),
                existing_comment: String::new(),
            },
        }
    }

    pub fn row_number(mut self, row_number: usize) -> Self {
        self.record.row_number = row_number;
        self
    }

    pub fn rows_count(mut self, value: Option<f64>) -> Self {
        self.record.rows_count = value;
        self
    }

    pub fn rev_flag(mut self, value: &str) -> Self {
        self.record.fmd_rev_flag = FmdRevFlag::parse(value);
        self
    }

    pub fn material(mut self, name: &str) -> Self {
        self.record.material_name = name.to_string();
        self.record.material_key = name.trim().to_lowercase();
        self
    }

    pub fn material_mass(mut self, value: Option<f64>) -> Self {
        self.record.homogeneous_material_mass = value;
        self
    }

    pub fn mass(mut self, value: Option<f64>) -> Self {
        self.record.mass = value;
        self
    }

    pub fn hm_percentage(mut self, value: Option<f64>) -> Self {
        self.record.substance_hm_percentage = value;
        self
    }

    pub fn hm_ppm(mut self, value: Option<f64>) -> Self {
        self.record.substance_hm_ppm = value;
        self
    }

    pub fn component_percentage(mut self, value: Option<f64>) -> Self {
        self.record.substance_component_percentage = value;
        self
    }

    pub fn component_ppm(mut self, value: Option<f64>) -> Self {
        self.record.substance_component_ppm = value;
        self
    }

    pub fn profile(mut self, value: Option<f64>) -> Self {
        self.record.total_component_mass_profile = value;
        self
    }

    pub fn summation(mut self, value: Option<f64>) -> Self {
        self.record.total_component_mass_summation = value;
        self
    }

    pub fn comment(mut self, value: &str) -> Self {
        self.record.existing_comment = value.to_string();
        self
    }

    pub fn build(self) -> CompositionRecord {
        self.record
    }
}
