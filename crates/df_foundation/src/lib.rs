// crates/df_foundation/src/lib.rs

//! DebrisFlow Foundation Layer (Layer 1)
//!
//! 基础层，提供整个工作区共享的最小抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 `DfError`
//! - [`outcome`]: 阶段结果 `Outcome` 与诊断原因 `Diagnostic`
//! - [`geometry`]: 轴对齐包围盒 `Aabb`
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: df_cli        ─> 命令行
//! Layer 4: df_extract    ─> 坐标解析、记录组装、边界分类、驱动
//! Layer 3: df_io         ─> OpenFOAM 文本读取、CSV/JSON 写出
//! Layer 2: df_config     ─> 提取配置
//! Layer 1: df_foundation ─> 错误、阶段结果、几何 (本层)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod geometry;
pub mod outcome;

/// 层级标识
pub const LAYER: u8 = 1;

// 重导出常用类型
pub use error::{DfError, DfResult};
pub use geometry::Aabb;
pub use outcome::{Diagnostic, Outcome};

/// 重导出向量类型，避免下游直接依赖 glam 版本
pub use glam::DVec3;
