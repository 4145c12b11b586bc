// apps/df_cli/src/commands/probe.rs

//! 采样点时间序列命令

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use df_extract::{probe_case, ExtractionDriver};
use df_io::export::write_rows;
use tracing::info;

use super::load_config;

/// 采样参数
#[derive(Args)]
pub struct ProbeArgs {
    /// 算例目录
    #[arg(long)]
    pub case: PathBuf,

    /// 输出 CSV 路径
    #[arg(short, long)]
    pub output: PathBuf,

    /// 配置文件路径（采样点定义在 probes.points）
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// 执行采样命令
pub fn execute(args: ProbeArgs) -> Result<()> {
    info!("=== DebrisFlow 采样点时间序列 ===");

    let config = load_config(args.config.as_deref())?;
    let driver = ExtractionDriver::new(config);

    let rows = probe_case(&driver, &args.case)
        .with_context(|| format!("无法读取算例 {}", args.case.display()))?;
    if rows.is_empty() {
        bail!("算例 {} 没有可采样的时间步", args.case.display());
    }

    let n = write_rows(&args.output, &rows).context("无法写出采样结果")?;
    println!("写出 {} 行 → {}", n, args.output.display());
    Ok(())
}
