// ==========================================
// 物料成分声明质检系统 - 文件校验集成测试
// ==========================================
// 覆盖: CSV / XLSX 输入 → 输出表落盘、命名规则、运行报告、批量失败隔离与输出冲突
// ==========================================


use fmd_qa::domain::columns;
use fmd_qa::{QaChecker, QaConfigReader, QaError, QaFileChecker, QaReport, QaResult, QaRule};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use test_helpers::{
    read_csv, read_xlsx, required_headers, row, write_csv, write_rows_csv, write_rows_xlsx,
    write_text,
};

// ==========================================
// MockConfigReader - 测试用配置读取器
// ==========================================
struct MockConfigReader {
    output_dir: Option<PathBuf>,
    write_report: bool,
}

impl QaConfigReader for MockConfigReader {
    fn get_output_dir(&self) -> QaResult<Option<PathBuf>> {
        Ok(self.output_dir.clone())
    }

    fn get_sheet_name(&self) -> QaResult<Option<String>> {
        Ok(None)
    }

    fn get_csv_delimiter(&self) -> QaResult<u8> {
        Ok(b',')
    }

    fn get_write_report(&self) -> QaResult<bool> {
        Ok(self.write_report)
    }
}

fn checker(output_dir: Option<&Path>, write_report: bool) -> QaFileChecker<MockConfigReader> {
    fmd_qa::logging::init_test();
    QaFileChecker::new(Arc::new(MockConfigReader {
        output_dir: output_dir.map(Path::to_path_buf),
        write_report,
    }))
}

#[tokio::test]
async fn test_output_written_next_to_source() {
    let dir = TempDir::new().unwrap();
    let source = write_rows_csv(
        dir.path(),
        "supplier_bom.csv",
        &[
            row("A", "1").rev_flag("Not Latest").component_percentage("50"),
            row("B", "2"),
        ],
    );

    let report = checker(None, false).check_file(&source).await.unwrap();

    let output = dir.path().join("supplier_bom_checked.csv");
    assert_eq!(report.output_path, output.display().to_string());
    assert_eq!(report.report_path, None);

    let (headers, rows) = read_csv(&output);
    let mut expected = required_headers();
    expected.extend(columns::ADDED.iter().map(|h| h.to_string()));
    assert_eq!(headers, expected);
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0].last().map(String::as_str),
        Some("FMDRevFlag is Not Latest | Fail: Component level percentage sum != 100")
    );
    assert_eq!(rows[1].last().map(String::as_str), Some(""));
}

#[tokio::test]
async fn test_report_json_matches_returned_report() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("qa");
    let source = write_rows_csv(
        dir.path(),
        "bom.csv",
        &[row("A", "1").profile("10").summation("4").mass("4")],
    );

    let report = checker(Some(&out_dir), true)
        .check_file(&source)
        .await
        .unwrap();

    let report_path = out_dir.join("bom_checked.report.json");
    let saved: QaReport =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(saved.run_id, report.run_id);
    assert_eq!(saved.summary, report.summary);
    assert_eq!(saved.report_path, Some(report_path.display().to_string()));
    assert_eq!(report.hits_for(QaRule::ProfileSummationGap), 1);
    assert!(out_dir.join("bom_checked.csv").exists());
}

#[tokio::test]
async fn test_rerun_on_checked_output_keeps_comments() {
    let dir = TempDir::new().unwrap();
    let source = write_rows_csv(
        dir.path(),
        "bom.csv",
        &[row("A", "1").rows_count("2"), row("B", "2").rev_flag("Not Latest")],
    );
    let checker = checker(None, false);

    checker.check_file(&source).await.unwrap();
    let first_output = dir.path().join("bom_checked.csv");
    let (first_headers, first_rows) = read_csv(&first_output);

    checker.check_file(&first_output).await.unwrap();
    let (second_headers, second_rows) = read_csv(&dir.path().join("bom_checked_checked.csv"));

    assert_eq!(second_headers, first_headers);
    assert_eq!(second_rows, first_rows);
}

#[tokio::test]
async fn test_missing_columns_reported_as_error() {
    let dir = TempDir::new().unwrap();
    let headers: Vec<String> = required_headers()
        .into_iter()
        .filter(|h| h != columns::TOTAL_COMPONENT_MASS_PROFILE)
        .collect();
    let source = write_csv(dir.path(), "broken.csv", &headers, &[]);

    let result = checker(None, false).check_file(&source).await;

    match result {
        Err(QaError::MissingColumns(missing)) => {
            assert_eq!(missing, vec![columns::TOTAL_COMPONENT_MASS_PROFILE]);
        }
        other => panic!("期望 MissingColumns,实际: {:?}", other.map(|r| r.run_id)),
    }
    assert!(!dir.path().join("broken_checked.csv").exists());
}

#[tokio::test]
async fn test_batch_continues_after_failures() {
    let dir = TempDir::new().unwrap();
    let good = write_rows_csv(dir.path(), "good.csv", &[row("A", "1")]);
    let unsupported = write_text(dir.path(), "notes.txt", "not a table");
    let missing = dir.path().join("absent.csv");

    let results = checker(None, false)
        .check_files(vec![unsupported, good, missing])
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].as_ref().unwrap_err().contains("notes.txt"));
    assert_eq!(results[1].as_ref().unwrap().summary.clean_rows, 1);
    assert!(results[2].as_ref().unwrap_err().contains("absent.csv"));
    assert!(dir.path().join("good_checked.csv").exists());
}

#[tokio::test]
async fn test_batch_same_stem_in_shared_output_dir_keeps_first() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("qa");
    for sub in ["a", "b"] {
        std::fs::create_dir_all(dir.path().join(sub)).unwrap();
    }
    let first = write_rows_csv(
        &dir.path().join("a"),
        "bom.csv",
        &[row("A", "1").rev_flag("Not Latest")],
    );
    let second = write_rows_csv(&dir.path().join("b"), "bom.csv", &[row("B", "2"), row("C", "3")]);
    let second_name = second.display().to_string();

    let results = checker(Some(&out_dir), false)
        .check_files(vec![first, second])
        .await;

    assert_eq!(results[0].as_ref().unwrap().summary.total_rows, 1);
    let err = results[1].as_ref().unwrap_err();
    assert!(err.starts_with(&second_name), "{}", err);
    assert!(err.contains("bom_checked.csv"), "{}", err);

    let (_, rows) = read_csv(&out_dir.join("bom_checked.csv"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].last().map(String::as_str), Some("FMDRevFlag is Not Latest"));
}

// ==========================================
// 工作簿输入
// ==========================================

#[tokio::test]
async fn test_workbook_input_writes_checked_xlsx() {
    let dir = TempDir::new().unwrap();
    let source = write_rows_xlsx(
        dir.path(),
        "bom.xlsx",
        "FMD",
        &[
            row("A", "1").rev_flag("Not Latest").component_percentage("50"),
            row("B", "2"),
        ],
    );

    let report = checker(None, false).check_file(&source).await.unwrap();

    let output = dir.path().join("bom_checked.xlsx");
    assert_eq!(report.output_path, output.display().to_string());
    assert!(!dir.path().join("bom_checked.csv").exists());

    let (sheet, headers, rows) = read_xlsx(&output);
    let mut expected = required_headers();
    expected.extend(columns::ADDED.iter().map(|h| h.to_string()));
    assert_eq!(sheet, "FMD");
    assert_eq!(headers, expected);
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0].last().map(String::as_str),
        Some("FMDRevFlag is Not Latest | Fail: Component level percentage sum != 100")
    );
    assert_eq!(rows[1].last().map(String::as_str), Some(""));
}

#[tokio::test]
async fn test_rerun_on_checked_workbook_keeps_comments() {
    let dir = TempDir::new().unwrap();
    let source = write_rows_xlsx(
        dir.path(),
        "bom.xlsx",
        "FMD",
        &[row("A", "1").rows_count("2"), row("B", "2").profile("10").summation("4")],
    );
    let checker = checker(None, false);

    checker.check_file(&source).await.unwrap();
    let first_output = dir.path().join("bom_checked.xlsx");
    let (_, first_headers, first_rows) = read_xlsx(&first_output);

    checker.check_file(&first_output).await.unwrap();
    let (_, second_headers, second_rows) =
        read_xlsx(&dir.path().join("bom_checked_checked.xlsx"));

    assert_eq!(second_headers, first_headers);
    assert_eq!(second_rows, first_rows);
}
