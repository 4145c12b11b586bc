// crates/df_extract/src/driver.rs

//! 提取驱动
//!
//! 单个算例的流程：
//!
//! ```text
//! 选择时间步 → 解析 U / p → 解析坐标 → 缺失场占位 → 组装 → 边界分类 → 写 CSV
//! ```
//!
//! 批处理中单个算例失败不会中断整体，所有结果按模式编号升序汇总到 [`BatchReport`]。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use df_config::ExtractionConfig;
use df_foundation::{DfError, DfResult, Diagnostic, Outcome};
use df_io::case::{CaseLayout, TimeStep};
use df_io::export::write_records;
use df_io::foam::read_field;
use df_io::{FieldKind, ParsedField, Record};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::assembler::{assemble, AssemblyInput};
use crate::classifier::{BoundaryClassifier, PatchCounts};
use crate::coords::{CoordinateResolver, CoordinateSet, CoordinateSource};
use crate::placeholder::{pressure_profile, velocity_profile};
use crate::stats::{summarize, ColumnSummary};

/// 场数据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldProvenance {
    /// 从 nonuniform 列表解析
    Parsed,
    /// uniform 单值广播
    Uniform,
    /// 解析式占位剖面
    Placeholder,
    /// 缺失，按零填充
    Absent,
}

/// 某时间步的提取结果（尚未写出）
#[derive(Debug, Clone)]
pub struct StepData {
    /// 时间步
    pub time_step: TimeStep,
    /// 坐标
    pub coordinates: CoordinateSet,
    /// 记录
    pub records: Vec<Record>,
    /// 各场来源，键为场名
    pub provenance: BTreeMap<String, FieldProvenance>,
    /// 面片统计（未分类时为空）
    pub patch_counts: PatchCounts,
}

/// 单个算例报告
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    /// 算例目录
    pub case_dir: PathBuf,
    /// 时间步目录名
    pub time_step: String,
    /// 记录数
    pub record_count: usize,
    /// 输出文件
    pub output: PathBuf,
    /// 坐标来源
    pub coordinate_source: CoordinateSource,
    /// 各场来源
    pub fields: BTreeMap<String, FieldProvenance>,
    /// 诊断信息
    pub diagnostics: Vec<Diagnostic>,
    /// 列统计
    pub statistics: Vec<ColumnSummary>,
    /// 面片统计
    pub patch_counts: PatchCounts,
}

/// 批处理中单个算例的结果
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// 成功
    Success {
        /// 模式编号
        pattern_id: u32,
        /// 报告
        report: CaseReport,
    },
    /// 失败
    Failure {
        /// 模式编号
        pattern_id: u32,
        /// 算例目录
        case_dir: PathBuf,
        /// 原因
        reason: String,
    },
}

impl CaseOutcome {
    /// 模式编号
    pub fn pattern_id(&self) -> u32 {
        match self {
            Self::Success { pattern_id, .. } | Self::Failure { pattern_id, .. } => *pattern_id,
        }
    }

    /// 是否成功
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// 批处理报告
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// 生成时间
    pub generated_at: DateTime<Utc>,
    /// 时间步选择器
    pub time_step: String,
    /// 各算例结果（模式编号升序）
    pub cases: Vec<CaseOutcome>,
}

impl BatchReport {
    /// 成功数量
    pub fn succeeded(&self) -> usize {
        self.cases.iter().filter(|c| c.is_success()).count()
    }

    /// 失败数量
    pub fn failed(&self) -> usize {
        self.cases.len() - self.succeeded()
    }

    /// 至少一个算例产出了结果
    pub fn any_succeeded(&self) -> bool {
        self.succeeded() > 0
    }
}

/// 提取驱动
#[derive(Debug, Clone)]
pub struct ExtractionDriver {
    config: ExtractionConfig,
}

impl ExtractionDriver {
    /// 创建
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// 当前配置
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// 算例目录布局
    pub fn layout(&self, case_dir: &Path) -> CaseLayout {
        CaseLayout::new(case_dir, &self.config.case.mesh_dir)
    }

    /// 提取单个时间步，不写文件
    pub fn load_step(&self, layout: &CaseLayout, step: &TimeStep) -> Outcome<StepData> {
        let case_name = layout.root().display().to_string();
        let case_cfg = &self.config.case;
        let mut diagnostics = Vec::new();

        let velocity = self.read_optional(layout, step, &case_cfg.velocity_field, &mut diagnostics);
        let pressure = self.read_optional(layout, step, &case_cfg.pressure_field, &mut diagnostics);

        let target = [&velocity, &pressure]
            .into_iter()
            .flatten()
            .filter_map(ParsedField::length_constraint)
            .max();

        let resolver = CoordinateResolver::new(&self.config.coordinates, self.config.domain.bounds);
        let coordinates = match resolver.resolve(&layout.points_file(), target).into_parts() {
            Ok((set, diags)) => {
                diagnostics.extend(diags);
                set
            }
            Err(e) if velocity.is_none() && pressure.is_none() => {
                debug!("{case_name}: 坐标解析失败: {e}");
                return Outcome::Failure(DfError::no_data(
                    case_name,
                    "速度与压力场均不可用，且没有网格点",
                ));
            }
            Err(e) => return Outcome::Failure(e),
        };
        if velocity.is_none() && pressure.is_none() && !coordinates.source.is_real() {
            return Outcome::Failure(DfError::no_data(
                case_name,
                "速度与压力场均不可用，且没有网格点",
            ));
        }

        let mut provenance = BTreeMap::new();
        let velocity = self.fill_missing(
            velocity,
            FieldKind::Vector,
            &case_cfg.velocity_field,
            &coordinates,
            &mut provenance,
            &mut diagnostics,
        );
        let pressure = self.fill_missing(
            pressure,
            FieldKind::Scalar,
            &case_cfg.pressure_field,
            &coordinates,
            &mut provenance,
            &mut diagnostics,
        );

        let input = AssemblyInput {
            case: &case_name,
            coordinates: &coordinates.points,
            velocity: velocity.as_ref(),
            pressure: pressure.as_ref(),
        };
        let mut records = match assemble(input).into_parts() {
            Ok((records, diags)) => {
                diagnostics.extend(diags);
                records
            }
            Err(e) => return Outcome::Failure(e),
        };

        let patch_counts = if self.config.patches.enabled {
            BoundaryClassifier::from_config(&self.config.patches).label_all(&mut records)
        } else {
            PatchCounts::new()
        };

        Outcome::with_diagnostics(
            StepData {
                time_step: step.clone(),
                coordinates,
                records,
                provenance,
                patch_counts,
            },
            diagnostics,
        )
    }

    /// 提取单个算例并写出 CSV
    pub fn extract_case(&self, case_dir: &Path, output: &Path) -> DfResult<CaseReport> {
        let layout = self.layout(case_dir);
        let step = layout.select(&self.config.time_step)?;
        info!("{}: 时间步 {}", case_dir.display(), step.label);

        let (data, diagnostics) = self.load_step(&layout, &step).into_parts()?;
        for d in &diagnostics {
            warn!("{}: {}", case_dir.display(), d);
        }

        let include_patches = self.config.output.include_patches && self.config.patches.enabled;
        let rows = write_records(output, &data.records, include_patches)?;
        info!("{}: 写出 {} 条记录 → {}", case_dir.display(), rows, output.display());

        Ok(CaseReport {
            case_dir: case_dir.to_path_buf(),
            time_step: step.label,
            record_count: rows,
            output: output.to_path_buf(),
            coordinate_source: data.coordinates.source,
            fields: data.provenance,
            diagnostics,
            statistics: summarize(&data.records),
            patch_counts: data.patch_counts,
        })
    }

    /// 按模式编号提取
    pub fn extract_pattern(&self, pattern_id: u32) -> CaseOutcome {
        let case_dir = self.config.case.case_dir(pattern_id);
        let output = self.config.output.file_for(pattern_id);
        match self.extract_case(&case_dir, &output) {
            Ok(report) => CaseOutcome::Success { pattern_id, report },
            Err(e) => {
                warn!("模式 {pattern_id} 失败: {e}");
                CaseOutcome::Failure {
                    pattern_id,
                    case_dir,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// 批处理全部配置的模式
    pub fn run_batch(&self) -> BatchReport {
        let ids = self.config.case.patterns.ids();
        info!("批处理 {} 个算例: {}", ids.len(), self.config.case.patterns);

        let cases = self.map_patterns(ids);
        let report = BatchReport {
            generated_at: Utc::now(),
            time_step: self.config.time_step.to_string(),
            cases,
        };
        info!("批处理完成: 成功 {}，失败 {}", report.succeeded(), report.failed());
        report
    }

    #[cfg(feature = "parallel")]
    fn map_patterns(&self, ids: &[u32]) -> Vec<CaseOutcome> {
        if self.config.parallel {
            use rayon::prelude::*;
            ids.par_iter().map(|&id| self.extract_pattern(id)).collect()
        } else {
            ids.iter().map(|&id| self.extract_pattern(id)).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn map_patterns(&self, ids: &[u32]) -> Vec<CaseOutcome> {
        if self.config.parallel {
            warn!("未启用 parallel 特性，按顺序执行");
        }
        ids.iter().map(|&id| self.extract_pattern(id)).collect()
    }

    fn read_optional(
        &self,
        layout: &CaseLayout,
        step: &TimeStep,
        name: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<ParsedField> {
        let path = layout.field_file(step, name);
        if !path.is_file() {
            diagnostics.push(Diagnostic::MissingFile { path });
            return None;
        }
        match read_field(&path) {
            Outcome::Success(field) => Some(field),
            Outcome::Warning(field, diags) => {
                diagnostics.extend(diags);
                Some(field)
            }
            Outcome::Failure(e) => {
                diagnostics.push(Diagnostic::Unreadable {
                    path,
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    fn fill_missing(
        &self,
        field: Option<ParsedField>,
        kind: FieldKind,
        name: &str,
        coordinates: &CoordinateSet,
        provenance: &mut BTreeMap<String, FieldProvenance>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<ParsedField> {
        if let Some(f) = field {
            let source = if f.uniform {
                FieldProvenance::Uniform
            } else {
                FieldProvenance::Parsed
            };
            provenance.insert(name.to_string(), source);
            return Some(f);
        }

        let placeholder = &self.config.placeholder;
        if !placeholder.enabled {
            provenance.insert(name.to_string(), FieldProvenance::Absent);
            return None;
        }

        let bounds = &self.config.domain.bounds;
        let profile = match kind {
            FieldKind::Vector => velocity_profile(name, &coordinates.points, bounds, placeholder),
            FieldKind::Scalar => pressure_profile(name, &coordinates.points, bounds, placeholder),
        };
        provenance.insert(name.to_string(), FieldProvenance::Placeholder);
        diagnostics.push(Diagnostic::Placeholder {
            field: name.to_string(),
        });
        Some(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_case(root: &Path, u: Option<&str>, p: Option<&str>) {
        fs::create_dir_all(root.join("5")).unwrap();
        if let Some(u) = u {
            fs::write(root.join("5/U"), u).unwrap();
        }
        if let Some(p) = p {
            fs::write(root.join("5/p"), p).unwrap();
        }
    }

    const U3: &str = "internalField nonuniform List<vector>\n3\n(\n(1 0 0)\n(0 2 0)\n(0 0 3)\n)\n;";
    const P3: &str = "internalField nonuniform List<scalar>\n3\n(\n1.0\n2.5\n-0.3\n)\n;";

    #[test]
    fn test_extract_case_with_lattice() {
        let dir = tempdir().unwrap();
        let case = dir.path().join("case");
        write_case(&case, Some(U3), Some(P3));

        let driver = ExtractionDriver::new(ExtractionConfig::default());
        let out = dir.path().join("out/result.csv");
        let report = driver.extract_case(&case, &out).unwrap();

        assert_eq!(report.record_count, 3);
        assert_eq!(report.time_step, "5");
        assert_eq!(report.fields.get("U"), Some(&FieldProvenance::Parsed));
        assert!(!report.coordinate_source.is_real());
        assert_eq!(report.patch_counts.values().sum::<usize>(), 3);

        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_missing_pressure_uses_placeholder() {
        let dir = tempdir().unwrap();
        let case = dir.path().join("case");
        write_case(&case, Some(U3), None);

        let driver = ExtractionDriver::new(ExtractionConfig::default());
        let layout = driver.layout(&case);
        let step = layout.select(&driver.config().time_step).unwrap();
        let (data, diags) = driver.load_step(&layout, &step).into_parts().unwrap();

        assert_eq!(data.records.len(), 3);
        assert_eq!(data.provenance.get("p"), Some(&FieldProvenance::Placeholder));
        assert!(diags.iter().any(|d| matches!(d, Diagnostic::MissingFile { .. })));
        assert!(diags.contains(&Diagnostic::Placeholder { field: "p".into() }));
    }

    #[test]
    fn test_placeholder_disabled_zero_fills() {
        let dir = tempdir().unwrap();
        let case = dir.path().join("case");
        write_case(&case, None, Some(P3));

        let mut config = ExtractionConfig::default();
        config.placeholder.enabled = false;
        let driver = ExtractionDriver::new(config);
        let layout = driver.layout(&case);
        let step = layout.select(&driver.config().time_step).unwrap();
        let (data, _) = driver.load_step(&layout, &step).into_parts().unwrap();

        assert_eq!(data.provenance.get("U"), Some(&FieldProvenance::Absent));
        assert!(data.records.iter().all(|r| r.velocity_magnitude == 0.0));
        assert_eq!(data.records[1].pressure, 2.5);
    }

    #[test]
    fn test_no_fields_no_points_is_no_data() {
        let dir = tempdir().unwrap();
        let case = dir.path().join("case");
        write_case(&case, None, None);

        let driver = ExtractionDriver::new(ExtractionConfig::default());
        let err = driver.extract_case(&case, &dir.path().join("x.csv")).unwrap_err();
        assert!(matches!(err, DfError::NoData { .. }));
    }

    #[test]
    fn test_uniform_fields_without_mesh_use_fixed_grid() {
        let dir = tempdir().unwrap();
        let case = dir.path().join("case");
        fs::create_dir_all(case.join("0")).unwrap();
        fs::write(case.join("0/U"), "internalField uniform (0.5 0 0);").unwrap();
        fs::write(case.join("0/p"), "internalField uniform 0;").unwrap();

        let driver = ExtractionDriver::new(ExtractionConfig::default());
        let out = dir.path().join("uniform.csv");
        let report = driver.extract_case(&case, &out).unwrap();

        assert_eq!(report.time_step, "0");
        assert_eq!(report.record_count, 30 * 30 * 10);
        assert_eq!(report.fields.get("U"), Some(&FieldProvenance::Uniform));
        assert_eq!(report.fields.get("p"), Some(&FieldProvenance::Uniform));
        assert!(matches!(
            report.coordinate_source,
            CoordinateSource::Lattice { dims: crate::coords::GridDims { nx: 30, ny: 30, nz: 10 }, .. }
        ));
        assert!(report
            .diagnostics
            .contains(&Diagnostic::LatticeFallback { dims: [30, 30, 10] }));
        assert_eq!(report.statistics[3].column, "Ux");
        assert_eq!((report.statistics[3].min, report.statistics[3].max), (0.5, 0.5));
        assert_eq!(fs::read_to_string(&out).unwrap().lines().count(), 9001);
    }

    #[test]
    fn test_unreadable_field_recorded() {
        let dir = tempdir().unwrap();
        let case = dir.path().join("case");
        write_case(&case, Some("garbage without declaration"), Some(P3));

        let driver = ExtractionDriver::new(ExtractionConfig::default());
        let report = driver.extract_case(&case, &dir.path().join("x.csv")).unwrap();
        assert_eq!(report.fields.get("U"), Some(&FieldProvenance::Placeholder));
        assert!(report
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::Unreadable { .. })));
    }
}
