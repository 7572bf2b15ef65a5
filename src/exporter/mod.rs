// ==========================================
// 物料成分声明质检系统 - 输出层
// ==========================================
// 职责: 输出表（CSV / XLSX）与运行报告落盘
// ==========================================

pub mod csv_writer;
pub mod output;
pub mod report_writer;
pub mod xlsx_writer;

pub use csv_writer::write_annotated_csv;
pub use output::{
    output_path_for, report_path_for, write_annotated_table, OutputFormat, OUTPUT_SUFFIX,
};
pub use report_writer::write_report_json;
pub use xlsx_writer::write_annotated_xlsx;
