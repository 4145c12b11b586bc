// crates/df_io/src/export/json.rs

//! JSON 文档读写

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use df_foundation::{DfError, DfResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// 以缩进格式写出 JSON，父目录不存在时自动创建
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> DfResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)
        .map_err(|e| DfError::io_with_source(format!("无法创建 {}", path.display()), e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| DfError::serialization(format!("{}: {e}", path.display())))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// 读取 JSON 文档
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> DfResult<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DfError::file_not_found(path)
        } else {
            DfError::io_with_source(format!("无法打开 {}", path.display()), e)
        }
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| DfError::serialization(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        points: Vec<[f64; 3]>,
        description: String,
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("web/tracer.json");
        let doc = Doc {
            points: vec![[1.0, 2.0, 0.5]],
            description: "plume".into(),
        };
        write_json(&path, &doc).unwrap();
        let back: Doc = read_json(&path).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_read_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = read_json::<Doc>(&path).unwrap_err();
        assert!(matches!(err, DfError::Serialization { .. }));
    }
}
