// apps/df_cli/src/commands/export_json.rs

//! 示踪剂浓度 JSON 导出命令

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use df_config::TimeStepSelector;
use df_extract::{export_tracer, ExtractionDriver};
use df_io::export::write_json;
use tracing::{info, warn};

use super::load_config;

/// 导出参数
#[derive(Args)]
pub struct ExportJsonArgs {
    /// 算例目录
    #[arg(long)]
    pub case: PathBuf,

    /// 输出 JSON 路径
    #[arg(short, long)]
    pub output: PathBuf,

    /// 标量场名称
    #[arg(short, long)]
    pub field: Option<String>,

    /// 时间步 (latest 或目录名)
    #[arg(short, long)]
    pub time: Option<TimeStepSelector>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// 执行导出命令
pub fn execute(args: ExportJsonArgs) -> Result<()> {
    info!("=== DebrisFlow 示踪剂导出 ===");

    let mut config = load_config(args.config.as_deref())?;
    if let Some(time) = args.time {
        config.time_step = time;
    }
    if let Some(field) = args.field {
        config.tracer.field = field;
    }

    let tracer = config.tracer.clone();
    let driver = ExtractionDriver::new(config);
    let doc = export_tracer(&driver, &args.case, &tracer)
        .with_context(|| format!("无法导出 {}", args.case.display()))?;
    if doc.is_synthetic() {
        warn!("未找到模拟数据，已导出合成羽流");
    }

    write_json(&args.output, &doc).context("无法写出 JSON")?;

    println!("已写出 {}", args.output.display());
    println!("  时间步: {}", doc.metadata.time_step);
    println!("  单元数: {}", doc.metadata.total_cells);
    println!("  显示点数: {}", doc.metadata.displayed_points);
    println!("  最大浓度: {}", doc.metadata.max_concentration);
    println!("  释放源: {:?}", doc.source_location);
    Ok(())
}
