// apps/df_cli/src/commands/config.rs

//! 配置文件命令
//!
//! - `config init <path>`: 写出默认配置
//! - `config validate <path>`: 加载并验证配置

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use df_config::ExtractionConfig;
use tracing::info;

/// 配置子命令
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// 写出默认配置
    Init {
        /// 输出路径
        path: PathBuf,

        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
    /// 验证配置文件
    Validate {
        /// 配置文件路径
        path: PathBuf,
    },
}

/// 执行配置命令
pub fn execute(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Init { path, force } => {
            if path.exists() && !force {
                bail!("{} 已存在，使用 --force 覆盖", path.display());
            }
            ExtractionConfig::default()
                .save_to_file(&path)
                .with_context(|| format!("无法写出 {}", path.display()))?;
            info!("已写出默认配置 {}", path.display());
            println!("已写出默认配置: {}", path.display());
            Ok(())
        }
        ConfigCommand::Validate { path } => {
            println!("\n检查配置文件: {}", path.display());
            let config = ExtractionConfig::from_file(&path)
                .with_context(|| format!("配置无效: {}", path.display()))?;
            println!("  ✓ 配置文件有效");
            println!("  算例根目录: {}", config.case.case_root.display());
            println!("  模式: {}", config.case.patterns);
            println!("  时间步: {}", config.time_step);
            println!("  坐标模式: {:?}", config.coordinates.mode);
            if !config.case.case_root.exists() {
                println!("  ⚠ 算例根目录不存在");
            }
            Ok(())
        }
    }
}
