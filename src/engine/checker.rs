// ==========================================
// 物料成分声明质检系统 - 文件校验引擎
// ==========================================
// 职责: 文件解析 → 规则编排 → 输出表落盘 → 运行报告
// 红线: 单文件失败不影响同批其他文件
// 红线: 同批输入的输出文件不得互相覆盖（后出现者报错,不执行）
// 红线: 规则违规只写入备注列,不作为错误返回
// ==========================================

use crate::config::QaConfigReader;
use crate::domain::QaReport;
use crate::engine::orchestrator::QaOrchestrator;
use crate::exporter::{
    output_path_for, report_path_for, write_annotated_table, write_report_json, OutputFormat,
};
use crate::importer::error::{QaError, QaResult};
use crate::importer::file_parser::UniversalFileParser;
use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

// ==========================================
// QaChecker Trait
// ==========================================
// 用途: 文件级校验入口
// 实现者: QaFileChecker
#[async_trait]
pub trait QaChecker: Send + Sync {
    /// 校验单个文件
    ///
    /// # 返回
    /// - Ok(QaReport): 输出表已写出
    /// - Err: 文件不可读、格式不支持、缺少必填列、写出失败
    async fn check_file<P: AsRef<Path> + Send>(&self, file_path: P) -> QaResult<QaReport>;

    /// 批量校验（并发执行,结果顺序与输入一致）
    ///
    /// # 说明
    /// - 输出表或报告路径与前面某个输入相同的文件不执行,直接报冲突
    ///
    /// # 返回
    /// - 每个文件一项: Ok(QaReport) 或 Err(带文件路径的错误描述)
    async fn check_files(&self, file_paths: Vec<PathBuf>) -> Vec<Result<QaReport, String>>;
}

// ==========================================
// QaFileChecker - 文件校验引擎
// ==========================================
pub struct QaFileChecker<C>
where
    C: QaConfigReader + 'static,
{
    config: Arc<C>,
}

impl<C> QaFileChecker<C>
where
    C: QaConfigReader + 'static,
{
    /// 创建新的 QaFileChecker 实例
    ///
    /// # 参数
    /// - config: 配置读取器
    pub fn new(config: Arc<C>) -> Self {
        Self { config }
    }

    /// 同步执行单文件校验
    pub fn check_file_blocking(&self, file_path: &Path) -> QaResult<QaReport> {
        run_check(self.config.as_ref(), file_path)
    }

    /// 按输入顺序为每个文件分配输出路径
    ///
    /// # 返回
    /// - 每个文件一项: None 表示可执行,Some 为与前序文件的冲突
    fn claim_outputs(&self, file_paths: &[PathBuf]) -> Vec<Option<QaError>> {
        let mut owners: HashMap<PathBuf, &Path> = HashMap::new();

        file_paths
            .iter()
            .map(|path| {
                // 配置读取失败交给 run_check 报告
                let artifacts = planned_outputs(self.config.as_ref(), path).ok()?;
                if let Some((output, owner)) = artifacts
                    .iter()
                    .find_map(|a| owners.get(a).map(|owner| (a, *owner)))
                {
                    return Some(QaError::OutputConflict {
                        output: output.display().to_string(),
                        other: owner.display().to_string(),
                    });
                }
                for artifact in artifacts {
                    owners.insert(artifact, path.as_path());
                }
                None
            })
            .collect()
    }
}

#[async_trait]
impl<C> QaChecker for QaFileChecker<C>
where
    C: QaConfigReader + 'static,
{
    async fn check_file<P: AsRef<Path> + Send>(&self, file_path: P) -> QaResult<QaReport> {
        let config = Arc::clone(&self.config);
        let path = file_path.as_ref().to_path_buf();

        tokio::task::spawn_blocking(move || run_check(config.as_ref(), &path))
            .await
            .map_err(|e| QaError::InternalError(format!("校验任务异常终止: {}", e)))?
    }

    async fn check_files(&self, file_paths: Vec<PathBuf>) -> Vec<Result<QaReport, String>> {
        info!(files = file_paths.len(), "开始批量校验");

        let conflicts = self.claim_outputs(&file_paths);
        let tasks = file_paths
            .iter()
            .zip(conflicts)
            .map(|(path, conflict)| async move {
                if let Some(e) = conflict {
                    warn!(path = %path.display(), error = %e, "输出路径冲突,跳过");
                    return Err(format!("{}: {}", path.display(), e));
                }
                self.check_file(path).await.map_err(|e| {
                    error!(path = %path.display(), error = %e, "文件校验失败");
                    format!("{}: {}", path.display(), e)
                })
            });
        let results = join_all(tasks).await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(
            files = results.len(),
            succeeded = results.len() - failed,
            failed = failed,
            "批量校验完成"
        );
        results
    }
}

/// 单文件运行会写出的全部文件路径
fn planned_outputs<C>(config: &C, source: &Path) -> QaResult<Vec<PathBuf>>
where
    C: QaConfigReader + ?Sized,
{
    let output_dir = config.get_output_dir()?;
    let mut paths = vec![output_path_for(source, output_dir.as_deref())];
    if config.get_write_report()? {
        paths.push(report_path_for(source, output_dir.as_deref()));
    }
    Ok(paths)
}

/// 单文件校验主流程
fn run_check<C>(config: &C, source: &Path) -> QaResult<QaReport>
where
    C: QaConfigReader + ?Sized,
{
    let run_id = Uuid::new_v4().to_string();
    let started_at = Utc::now();
    let timer = Instant::now();
    info!(run_id = %run_id, path = %source.display(), "开始校验文件");

    // 步骤1: 读取配置
    let output_dir = config.get_output_dir()?;
    let delimiter = config.get_csv_delimiter()?;
    let write_report = config.get_write_report()?;

    // 步骤2: 解析文件
    let parser = UniversalFileParser::new(delimiter, config.get_sheet_name()?);
    let table = parser.parse(source)?;

    // 步骤3: 规则编排
    let outcome = QaOrchestrator::new().run(&table)?;

    // 步骤4: 输出表落盘（工作簿输入写 XLSX,沿用源工作表名）
    let output_path = output_path_for(source, output_dir.as_deref());
    write_annotated_table(
        &outcome.table,
        &output_path,
        OutputFormat::for_source(source),
        delimiter,
        table.sheet_name.as_deref(),
    )?;

    let mut report = QaReport {
        run_id,
        source_path: source.display().to_string(),
        output_path: output_path.display().to_string(),
        report_path: None,
        started_at,
        finished_at: Utc::now(),
        elapsed_ms: timer.elapsed().as_millis() as u64,
        summary: outcome.summary,
        dq_issues: outcome.dq_issues,
    };

    // 步骤5: 运行报告
    if write_report {
        let report_path = report_path_for(source, output_dir.as_deref());
        report.report_path = Some(report_path.display().to_string());
        write_report_json(&report, &report_path)?;
    }

    info!(
        run_id = %report.run_id,
        output = %report.output_path,
        flagged_rows = report.summary.flagged_rows,
        elapsed_ms = report.elapsed_ms,
        "文件校验完成"
    );
    Ok(report)
}
