// crates/df_io/src/export/mod.rs

//! 结果写出
//!
//! - [`csv`]: 单元记录与探针时序的 CSV 写出
//! - [`json`]: JSON 文档写出（示踪剂导出、批处理报告）

pub mod csv;
pub mod json;

pub use self::csv::{write_records, write_rows, RecordCsvWriter, RECORD_HEADER};
pub use self::json::{read_json, write_json};
