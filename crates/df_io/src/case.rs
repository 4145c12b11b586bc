// crates/df_io/src/case.rs

//! 算例目录布局与时间步发现
//!
//! 一个 OpenFOAM 算例目录包含若干以数值命名的时间目录（`0`、`0.5`、`5` ...），
//! 每个时间目录下是各个场文件；网格点位于 `constant/polyMesh/points`。

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use df_config::TimeStepSelector;
use df_foundation::{DfError, DfResult};
use serde::Serialize;
use tracing::trace;

/// 时间步目录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStep {
    /// 目录名
    pub label: String,
    /// 数值
    pub value: f64,
    /// 绝对路径
    pub path: PathBuf,
}

/// 目录名是否为时间步：仅数字且至多一个 `.`
pub fn is_time_dir_name(name: &str) -> bool {
    let mut dots = 0;
    let mut digits = 0;
    for c in name.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

/// 列出算例中的全部时间步，按数值升序
pub fn list_time_steps(case_dir: &Path) -> DfResult<Vec<TimeStep>> {
    if !case_dir.is_dir() {
        return Err(DfError::case_not_found(case_dir));
    }
    let entries = fs::read_dir(case_dir)
        .map_err(|e| DfError::io_with_source(format!("无法读取 {}", case_dir.display()), e))?;

    let mut steps = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_time_dir_name(&name) || !entry.path().is_dir() {
            continue;
        }
        if let Ok(value) = name.parse::<f64>() {
            steps.push(TimeStep {
                label: name,
                value,
                path: entry.path(),
            });
        }
    }
    steps.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal));
    trace!("{}: 发现 {} 个时间步", case_dir.display(), steps.len());
    Ok(steps)
}

/// 按选择器定位时间步
///
/// `Named` 先按目录名精确匹配，再按数值匹配（`5` 与 `5.0` 等价）。
pub fn select_time_step(case_dir: &Path, selector: &TimeStepSelector) -> DfResult<TimeStep> {
    let steps = list_time_steps(case_dir)?;
    let not_found = || DfError::time_step_not_found(case_dir, selector.to_string());
    match selector {
        TimeStepSelector::Latest => steps.into_iter().last().ok_or_else(not_found),
        TimeStepSelector::Named(label) => {
            if let Some(step) = steps.iter().find(|s| &s.label == label) {
                return Ok(step.clone());
            }
            let wanted: f64 = label.parse().map_err(|_| not_found())?;
            steps
                .into_iter()
                .find(|s| s.value == wanted)
                .ok_or_else(not_found)
        }
    }
}

/// 算例目录中各文件的位置
#[derive(Debug, Clone)]
pub struct CaseLayout {
    root: PathBuf,
    mesh_dir: PathBuf,
}

impl CaseLayout {
    /// 创建，`mesh_dir` 相对于算例根目录
    pub fn new(root: impl Into<PathBuf>, mesh_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mesh_dir: mesh_dir.into(),
        }
    }

    /// 算例根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 网格点文件
    pub fn points_file(&self) -> PathBuf {
        self.root.join(&self.mesh_dir).join("points")
    }

    /// 边界定义文件
    pub fn boundary_file(&self) -> PathBuf {
        self.root.join(&self.mesh_dir).join("boundary")
    }

    /// 时间步下的场文件
    pub fn field_file(&self, step: &TimeStep, field: &str) -> PathBuf {
        step.path.join(field)
    }

    /// 列出时间步
    pub fn time_steps(&self) -> DfResult<Vec<TimeStep>> {
        list_time_steps(&self.root)
    }

    /// 选择时间步
    pub fn select(&self, selector: &TimeStepSelector) -> DfResult<TimeStep> {
        select_time_step(&self.root, selector)
    }

    /// 时间步目录下的文件名（升序）
    pub fn fields_in(&self, step: &TimeStep) -> DfResult<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(&step.path)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_case(dirs: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for d in dirs {
            fs::create_dir_all(tmp.path().join(d)).unwrap();
        }
        tmp
    }

    #[test]
    fn test_time_dir_names() {
        assert!(is_time_dir_name("0"));
        assert!(is_time_dir_name("0.5"));
        assert!(is_time_dir_name("100"));
        assert!(!is_time_dir_name("constant"));
        assert!(!is_time_dir_name("1.2.3"));
        assert!(!is_time_dir_name("."));
        assert!(!is_time_dir_name("1e-3"));
    }

    #[test]
    fn test_list_sorted_numerically() {
        let tmp = make_case(&["0", "10", "2", "0.5", "constant", "system"]);
        fs::write(tmp.path().join("3"), "not a dir").unwrap();
        let labels: Vec<String> = list_time_steps(tmp.path())
            .unwrap()
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert_eq!(labels, vec!["0", "0.5", "2", "10"]);
    }

    #[test]
    fn test_select_latest_and_named() {
        let tmp = make_case(&["0", "5", "10"]);
        let latest = select_time_step(tmp.path(), &TimeStepSelector::Latest).unwrap();
        assert_eq!(latest.label, "10");

        let named = select_time_step(tmp.path(), &TimeStepSelector::Named("5".into())).unwrap();
        assert_eq!(named.label, "5");

        let numeric = select_time_step(tmp.path(), &TimeStepSelector::Named("5.0".into())).unwrap();
        assert_eq!(numeric.label, "5");
    }

    #[test]
    fn test_select_missing() {
        let tmp = make_case(&["constant"]);
        let err = select_time_step(tmp.path(), &TimeStepSelector::Latest).unwrap_err();
        assert!(matches!(err, DfError::TimeStepNotFound { .. }));

        let err = select_time_step(&tmp.path().join("nope"), &TimeStepSelector::Latest).unwrap_err();
        assert!(matches!(err, DfError::CaseNotFound { .. }));

        let tmp = make_case(&["0"]);
        let err = select_time_step(tmp.path(), &TimeStepSelector::Named("7".into())).unwrap_err();
        assert!(err.is_case_fatal());
    }

    #[test]
    fn test_layout_paths() {
        let layout = CaseLayout::new("/sim/pattern_1/debrisCase", "constant/polyMesh");
        assert_eq!(
            layout.points_file(),
            PathBuf::from("/sim/pattern_1/debrisCase/constant/polyMesh/points")
        );
        let step = TimeStep {
            label: "5".into(),
            value: 5.0,
            path: layout.root().join("5"),
        };
        assert_eq!(
            layout.field_file(&step, "U"),
            PathBuf::from("/sim/pattern_1/debrisCase/5/U")
        );
    }
}
