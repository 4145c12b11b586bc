// apps/df_cli/src/commands/extract.rs

//! 单算例提取命令

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use df_config::TimeStepSelector;
use df_extract::{CaseReport, ExtractionDriver};
use df_io::export::write_json;
use tracing::info;

use super::load_config;

/// 提取参数
#[derive(Args)]
pub struct ExtractArgs {
    /// 算例目录
    #[arg(long)]
    pub case: PathBuf,

    /// 时间步 (latest 或目录名)
    #[arg(short, long)]
    pub time: Option<TimeStepSelector>,

    /// 输出 CSV 路径
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 不输出 patch_id / patch_name 列
    #[arg(long)]
    pub no_patches: bool,

    /// 报告 JSON 输出路径
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// 执行提取命令
pub fn execute(args: ExtractArgs) -> Result<()> {
    info!("=== DebrisFlow 单算例提取 ===");

    let mut config = load_config(args.config.as_deref())?;
    if let Some(time) = args.time {
        config.time_step = time;
    }
    if args.no_patches {
        config.output.include_patches = false;
    }

    let output = args.output.unwrap_or_else(|| {
        let name = args
            .case
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "case".to_string());
        config.output.directory.join(format!("{name}_results.csv"))
    });

    let driver = ExtractionDriver::new(config);
    let report = driver
        .extract_case(&args.case, &output)
        .with_context(|| format!("提取算例 {} 失败", args.case.display()))?;

    print_report(&report);

    if let Some(path) = &args.report {
        write_json(path, &report).context("无法写出报告")?;
        println!("报告: {}", path.display());
    }
    Ok(())
}

/// 打印单算例摘要
pub fn print_report(report: &CaseReport) {
    println!("\n=== {} ===", report.case_dir.display());
    println!("时间步: {}", report.time_step);
    println!("记录数: {}", report.record_count);
    println!("输出: {}", report.output.display());
    println!("坐标来源: {:?}", report.coordinate_source);
    for (field, source) in &report.fields {
        println!("  场 {field}: {source:?}");
    }
    if !report.patch_counts.is_empty() {
        println!("面片统计:");
        for (name, count) in &report.patch_counts {
            println!("  {name:<14} {count}");
        }
    }
    if !report.diagnostics.is_empty() {
        println!("警告 ({}):", report.diagnostics.len());
        for d in &report.diagnostics {
            println!("  - {d}");
        }
    }
}
