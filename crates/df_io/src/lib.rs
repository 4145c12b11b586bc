// crates/df_io/src/lib.rs

//! DebrisFlow IO Layer (Layer 3)
//!
//! 读取 OpenFOAM 算例目录并写出提取结果。
//!
//! # 模块
//!
//! - [`foam`]: 场文件、网格点与边界文件解析
//! - [`case`]: 算例布局与时间步发现
//! - [`record`]: 输出记录与面片标签
//! - [`export`]: CSV / JSON 写出
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use df_io::foam::read_field;
//!
//! let (field, diagnostics) = read_field(Path::new("case/5/U")).into_parts()?;
//! for d in &diagnostics {
//!     tracing::warn!("{d}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod case;
pub mod export;
pub mod foam;
pub mod record;

/// 层级标识
pub const LAYER: u8 = 3;

// 重导出常用类型
pub use case::{is_time_dir_name, list_time_steps, select_time_step, CaseLayout, TimeStep};
pub use foam::{FieldKind, FieldValues, ParsedField};
pub use record::{PatchLabel, Record};
