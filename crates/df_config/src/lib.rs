// crates/df_config/src/lib.rs

//! DebrisFlow Config Layer (Layer 2)
//!
//! 配置层，提供提取流程的全部可注入参数。
//!
//! # 模块概览
//!
//! - [`extraction`]: `ExtractionConfig` 及各子配置
//! - [`selection`]: 模式编号集合与时间步选择器
//! - [`error`]: 配置错误类型
//!
//! # 设计原则
//!
//! 1. **显式注入**: 路径与阈值全部来自配置，不依赖硬编码绝对路径
//! 2. **可部分覆盖**: JSON 中缺省的字段使用默认值
//! 3. **先验证后使用**: `from_file` 加载后立即 `validate`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod extraction;
pub mod selection;

/// 层级标识
pub const LAYER: u8 = 2;

// 重导出核心类型
pub use error::ConfigError;
pub use extraction::{
    expand_template, CaseConfig, CoordinateConfig, CoordinateMode, DomainConfig,
    ExtractionConfig, OutputConfig, PatchConfig, PlaceholderConfig, ProbeConfig, SamplePoint,
    TracerConfig,
};
pub use selection::{PatternSelection, TimeStepSelector};
