// crates/df_extract/src/lib.rs

//! DebrisFlow Extract Layer (Layer 4)
//!
//! 把 OpenFOAM 算例转换为逐单元的 CSV 记录。
//!
//! # 模块
//!
//! - [`coords`]: 网格点 / 格点 / 随机坐标解析
//! - [`assembler`]: 按最短长度规则组装记录
//! - [`classifier`]: 基于阈值的边界面片分类
//! - [`placeholder`]: 缺失场的解析式占位剖面
//! - [`stats`]: 输出列统计
//! - [`driver`]: 单算例与批处理驱动、报告
//! - [`probe`]: 采样点时间序列
//! - [`tracer`]: 示踪剂浓度 JSON 导出
//!
//! # 可选特性
//!
//! - `parallel`（默认启用）: 批处理可使用 rayon 并行执行各算例
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use df_config::ExtractionConfig;
//! use df_extract::ExtractionDriver;
//!
//! let config = ExtractionConfig::from_file("extract.json")?;
//! let report = ExtractionDriver::new(config).run_batch();
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assembler;
pub mod classifier;
pub mod coords;
pub mod driver;
pub mod placeholder;
pub mod probe;
pub mod stats;
pub mod tracer;

/// 层级标识
pub const LAYER: u8 = 4;

pub use assembler::{assemble, AssemblyInput};
pub use classifier::{BoundaryClassifier, PatchCounts};
pub use coords::{CoordinateResolver, CoordinateSet, CoordinateSource, GridDims};
pub use driver::{
    BatchReport, CaseOutcome, CaseReport, ExtractionDriver, FieldProvenance, StepData,
};
pub use probe::{probe_case, ProbeRow};
pub use tracer::{export_tracer, synthetic_plume, TracerDocument};
