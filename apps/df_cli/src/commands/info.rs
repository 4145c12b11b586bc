// apps/df_cli/src/commands/info.rs

//! 算例信息命令
//!
//! 显示时间步、各场的声明单元数与网格边界面片。

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use df_foundation::Outcome;
use df_io::foam::{read_boundary, read_field};
use df_io::CaseLayout;
use tracing::{info, warn};

use super::load_config;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 算例目录
    #[arg(long)]
    pub case: PathBuf,

    /// 配置文件路径（网格目录）
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== DebrisFlow 算例信息 ===");

    let config = load_config(args.config.as_deref())?;
    let layout = CaseLayout::new(&args.case, &config.case.mesh_dir);

    let steps = layout
        .time_steps()
        .with_context(|| format!("无法读取算例 {}", args.case.display()))?;

    println!("算例: {}", args.case.display());
    println!("\n=== 时间步 ({}) ===", steps.len());
    for step in &steps {
        println!("  {}", step.label);
    }

    if let Some(latest) = steps.last() {
        println!("\n=== 最新时间步 {} 的场 ===", latest.label);
        for name in layout.fields_in(latest)? {
            match read_field(&layout.field_file(latest, &name)) {
                Outcome::Failure(e) => println!("  {name:<8} 无法解析: {e}"),
                outcome => {
                    if let Some(field) = outcome.value() {
                        let declared = field
                            .declared_count
                            .map(|n| n.to_string())
                            .unwrap_or_else(|| "uniform".to_string());
                        println!("  {name:<8} {:<7} 声明 {declared}", field.kind().name());
                    }
                }
            }
        }
    }

    println!("\n=== 边界面片 ===");
    match read_boundary(&layout.boundary_file()) {
        Ok(patches) => {
            for p in &patches {
                println!(
                    "  {:<16} {:<14} nFaces={:<8} startFace={}",
                    p.name, p.patch_type, p.n_faces, p.start_face
                );
            }
        }
        Err(e) => warn!("无法读取边界文件: {e}"),
    }

    Ok(())
}
