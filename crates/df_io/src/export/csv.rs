// crates/df_io/src/export/csv.rs

//! CSV 写出
//!
//! 记录文件表头：
//!
//! ```text
//! x,y,z,Ux,Uy,Uz,pressure,velocity_magnitude[,patch_id,patch_name]
//! ```
//!
//! 浮点数使用十进制表示，不使用科学计数法。

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use df_foundation::{DfError, DfResult};
use serde::Serialize;

use crate::record::Record;

/// 记录表头（不含面片列）
pub const RECORD_HEADER: [&str; 8] = [
    "x",
    "y",
    "z",
    "Ux",
    "Uy",
    "Uz",
    "pressure",
    "velocity_magnitude",
];

const PATCH_HEADER: [&str; 2] = ["patch_id", "patch_name"];

/// 记录 CSV 写出器
pub struct RecordCsvWriter {
    writer: ::csv::Writer<BufWriter<File>>,
    path: PathBuf,
    include_patches: bool,
    rows: usize,
}

impl RecordCsvWriter {
    /// 创建文件并写入表头，父目录不存在时自动创建
    pub fn create(path: impl AsRef<Path>, include_patches: bool) -> DfResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = create_file(&path)?;
        let mut writer = ::csv::Writer::from_writer(BufWriter::new(file));

        let mut header: Vec<&str> = RECORD_HEADER.to_vec();
        if include_patches {
            header.extend(PATCH_HEADER);
        }
        writer
            .write_record(&header)
            .map_err(|e| csv_error(&path, e))?;

        Ok(Self {
            writer,
            path,
            include_patches,
            rows: 0,
        })
    }

    /// 写入一条记录
    pub fn write(&mut self, record: &Record) -> DfResult<()> {
        let mut row: Vec<String> = [
            record.position.x,
            record.position.y,
            record.position.z,
            record.velocity.x,
            record.velocity.y,
            record.velocity.z,
            record.pressure,
            record.velocity_magnitude,
        ]
        .iter()
        .map(|v| v.to_string())
        .collect();

        if self.include_patches {
            match record.patch {
                Some(label) => {
                    row.push(label.id().to_string());
                    row.push(label.name().to_string());
                }
                None => {
                    row.push(String::new());
                    row.push(String::new());
                }
            }
        }

        self.writer
            .write_record(&row)
            .map_err(|e| csv_error(&self.path, e))?;
        self.rows += 1;
        Ok(())
    }

    /// 刷新并关闭，返回写入行数
    pub fn finish(mut self) -> DfResult<usize> {
        self.writer
            .flush()
            .map_err(|e| DfError::io_with_source(format!("刷新 {} 失败", self.path.display()), e))?;
        Ok(self.rows)
    }
}

/// 将全部记录写入 `path`，返回行数
pub fn write_records(
    path: impl AsRef<Path>,
    records: &[Record],
    include_patches: bool,
) -> DfResult<usize> {
    let mut writer = RecordCsvWriter::create(path, include_patches)?;
    for record in records {
        writer.write(record)?;
    }
    writer.finish()
}

/// 按 serde 字段名写出任意行类型（表头由第一行推导）
pub fn write_rows<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> DfResult<usize> {
    let path = path.as_ref();
    let file = create_file(path)?;
    let mut writer = ::csv::Writer::from_writer(BufWriter::new(file));
    for row in rows {
        writer.serialize(row).map_err(|e| csv_error(path, e))?;
    }
    writer
        .flush()
        .map_err(|e| DfError::io_with_source(format!("刷新 {} 失败", path.display()), e))?;
    Ok(rows.len())
}

fn create_file(path: &Path) -> DfResult<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| DfError::io_with_source(format!("无法创建目录 {}", parent.display()), e))?;
    }
    File::create(path)
        .map_err(|e| DfError::io_with_source(format!("无法创建 {}", path.display()), e))
}

fn csv_error(path: &Path, e: ::csv::Error) -> DfError {
    DfError::io(format!("写入 {} 失败: {e}", path.display()))
}
