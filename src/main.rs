// ==========================================
// 物料成分声明质检系统 - 命令行入口
// ==========================================
// 用法: fmd-qa [OPTIONS] <INPUT>...
// 退出码: 全部成功为 0,任一文件失败为 1
// ==========================================

use anyhow::{Context, Result};
use clap::Parser;
use fmd_qa::config::{config_keys, ConfigManager};
use fmd_qa::{logging, QaChecker, QaFileChecker};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "fmd-qa",
    version,
    about = "Full Material Declaration QA: annotates composition sheets with rule diagnostics"
)]
struct Cli {
    /// 待校验文件（.xlsx/.xlsm/.xls/.ods/.csv）
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// JSON 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 输出目录（默认与源文件同目录）
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// 工作表名称（默认第一个）
    #[arg(short, long)]
    sheet: Option<String>,

    /// 不输出 JSON 运行报告
    #[arg(long)]
    no_report: bool,

    /// 日志级别（RUST_LOG 优先）
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn load_config(cli: &Cli) -> Result<ConfigManager> {
    let config = match &cli.config {
        Some(path) => ConfigManager::from_json_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => ConfigManager::new(),
    };

    // 命令行参数覆盖配置文件
    if let Some(dir) = &cli.output_dir {
        config.set_config_value(config_keys::OUTPUT_DIR, &dir.display().to_string())?;
    }
    if let Some(sheet) = &cli.sheet {
        config.set_config_value(config_keys::SHEET_NAME, sheet)?;
    }
    if cli.no_report {
        config.set_config_value(config_keys::WRITE_REPORT, "false")?;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_with_level(&cli.log_level);

    tracing::info!("==================================================");
    tracing::info!("{} v{}", fmd_qa::APP_NAME, fmd_qa::VERSION);
    tracing::info!("==================================================");

    let config = load_config(&cli)?;
    tracing::debug!(config = %config.get_config_snapshot()?, "生效配置");

    let checker = QaFileChecker::new(Arc::new(config));
    let results = checker.check_files(cli.inputs.clone()).await;

    let mut failed = 0usize;
    for result in &results {
        match result {
            Ok(report) => println!(
                "OK    {} -> {} ({} rows, {} flagged)",
                report.source_path,
                report.output_path,
                report.summary.total_rows,
                report.summary.flagged_rows
            ),
            Err(message) => {
                failed += 1;
                eprintln!("FAIL  {}", message);
            }
        }
    }

    if failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
