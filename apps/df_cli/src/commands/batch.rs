// apps/df_cli/src/commands/batch.rs

//! 批量提取命令

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use df_config::{PatternSelection, TimeStepSelector};
use df_extract::{CaseOutcome, ExtractionDriver};
use df_io::export::write_json;
use tracing::info;

use super::extract::print_report;
use super::load_config;

/// 批处理参数
#[derive(Args)]
pub struct BatchArgs {
    /// 算例根目录（包含 pattern_{id}/debrisCase）
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// 模式编号，如 1-5 或 1,3,5
    #[arg(short, long)]
    pub patterns: Option<PatternSelection>,

    /// 时间步 (latest 或目录名)
    #[arg(short, long)]
    pub time: Option<TimeStepSelector>,

    /// 输出目录
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 报告 JSON 输出路径
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// 并行处理各算例
    #[arg(long)]
    pub parallel: bool,
}

/// 执行批处理命令
pub fn execute(args: BatchArgs) -> Result<()> {
    info!("=== DebrisFlow 批量提取 ===");

    let mut config = load_config(args.config.as_deref())?;
    if let Some(root) = args.root {
        config.case.case_root = root;
    }
    if let Some(patterns) = args.patterns {
        config.case.patterns = patterns;
    }
    if let Some(time) = args.time {
        config.time_step = time;
    }
    if let Some(dir) = args.output_dir {
        config.output.directory = dir;
    }
    config.parallel |= args.parallel;

    let report = ExtractionDriver::new(config).run_batch();

    for case in &report.cases {
        match case {
            CaseOutcome::Success { report, .. } => print_report(report),
            CaseOutcome::Failure {
                pattern_id,
                case_dir,
                reason,
            } => {
                println!("\n=== 模式 {pattern_id} 失败 ===");
                println!("目录: {}", case_dir.display());
                println!("原因: {reason}");
            }
        }
    }

    println!(
        "\n共 {} 个算例: 成功 {}，失败 {}",
        report.cases.len(),
        report.succeeded(),
        report.failed()
    );

    if let Some(path) = &args.report {
        write_json(path, &report).context("无法写出批处理报告")?;
        println!("报告: {}", path.display());
    }

    if !report.any_succeeded() {
        bail!("没有任何算例产出结果");
    }
    Ok(())
}
