// apps/df_cli/src/commands/mod.rs

//! 子命令实现

pub mod batch;
pub mod config;
pub mod export_json;
pub mod extract;
pub mod info;
pub mod probe;

use std::path::Path;

use anyhow::{Context, Result};
use df_config::ExtractionConfig;
use tracing::debug;

/// 加载配置文件，未指定时使用默认配置
pub fn load_config(path: Option<&Path>) -> Result<ExtractionConfig> {
    match path {
        Some(p) => {
            let config = ExtractionConfig::from_file(p)
                .with_context(|| format!("无法加载配置文件 {}", p.display()))?;
            debug!("已加载配置 {}", p.display());
            Ok(config)
        }
        None => Ok(ExtractionConfig::default()),
    }
}
