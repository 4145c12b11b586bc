// crates/df_extract/src/tracer.rs

//! 示踪剂浓度 JSON 导出
//!
//! 读取标量场（默认 `s`）与网格点，丢弃浓度 ≤ ratio·max 的点，
//! 超过上限时以固定种子无放回降采样（保持原有顺序）。
//! 没有可用数据时导出一个确定性的合成羽流，并在 `metadata.description` 中注明。

use std::path::Path;

use chrono::{DateTime, Utc};
use df_config::{CoordinateMode, TracerConfig};
use df_foundation::{Aabb, DVec3, DfError, DfResult};
use df_io::foam::read_field;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};

use crate::coords::CoordinateResolver;
use crate::driver::ExtractionDriver;

/// 合成羽流说明
pub const SYNTHETIC_DESCRIPTION: &str = "Synthetic odor plume (no simulation data available)";

/// 真实数据说明
pub const REAL_DESCRIPTION: &str = "OpenFOAM odor dispersion simulation";

/// 合成羽流的绝对显示阈值
const SYNTHETIC_THRESHOLD: f64 = 0.001;

/// 计算域范围
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DomainExtent {
    /// x 最小值
    pub x_min: f64,
    /// x 最大值
    pub x_max: f64,
    /// y 最小值
    pub y_min: f64,
    /// y 最大值
    pub y_max: f64,
    /// z 最小值
    pub z_min: f64,
    /// z 最大值
    pub z_max: f64,
}

impl From<Aabb> for DomainExtent {
    fn from(b: Aabb) -> Self {
        Self {
            x_min: b.min.x,
            x_max: b.max.x,
            y_min: b.min.y,
            y_max: b.max.y,
            z_min: b.min.z,
            z_max: b.max.z,
        }
    }
}

/// 导出元数据
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TracerMetadata {
    /// 时间步
    pub time_step: String,
    /// 原始单元数
    pub total_cells: usize,
    /// 导出点数
    pub displayed_points: usize,
    /// 最大浓度
    pub max_concentration: f64,
    /// 说明
    pub description: String,
    /// 生成时间
    pub generated_at: DateTime<Utc>,
}

/// 示踪剂导出文档
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TracerDocument {
    /// 点位置
    pub points: Vec<[f64; 3]>,
    /// 对应浓度
    pub concentrations: Vec<f64>,
    /// 释放源
    pub source_location: [f64; 3],
    /// 计算域范围
    pub domain: DomainExtent,
    /// 元数据
    pub metadata: TracerMetadata,
}

impl TracerDocument {
    /// 是否为合成数据
    pub fn is_synthetic(&self) -> bool {
        self.metadata.description == SYNTHETIC_DESCRIPTION
    }
}

/// 浓度筛选与降采样
///
/// 返回保留的下标（升序）。阈值为 `ratio · max`，只保留严格大于阈值的点。
pub fn select_significant(
    concentrations: &[f64],
    threshold: f64,
    max_points: usize,
    seed: u64,
) -> Vec<usize> {
    let kept: Vec<usize> = concentrations
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c > threshold)
        .map(|(i, _)| i)
        .collect();
    if kept.len() <= max_points {
        return kept;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked: Vec<usize> = rand::seq::index::sample(&mut rng, kept.len(), max_points)
        .into_iter()
        .map(|j| kept[j])
        .collect();
    picked.sort_unstable();
    picked
}

/// 最大有限浓度
fn max_finite(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .reduce(f64::max)
}

/// 从算例导出示踪剂浓度
///
/// 标量场或网格点不可用时回退为合成羽流。
pub fn export_tracer(
    driver: &ExtractionDriver,
    case_dir: &Path,
    config: &TracerConfig,
) -> DfResult<TracerDocument> {
    match extract_real(driver, case_dir, config) {
        Ok(doc) => Ok(doc),
        Err(e) if e.is_case_fatal() || matches!(e, DfError::FileNotFound { .. } | DfError::Parse { .. }) => {
            warn!("{}: 示踪剂数据不可用（{e}），导出合成羽流", case_dir.display());
            Ok(synthetic_plume(config))
        }
        Err(e) => Err(e),
    }
}

fn extract_real(
    driver: &ExtractionDriver,
    case_dir: &Path,
    config: &TracerConfig,
) -> DfResult<TracerDocument> {
    let layout = driver.layout(case_dir);
    let step = layout.select(&driver.config().time_step)?;
    let (field, diagnostics) = read_field(&layout.field_file(&step, &config.field)).into_parts()?;
    for d in &diagnostics {
        warn!("{}: {}", case_dir.display(), d);
    }
    if field.uniform {
        return Err(DfError::no_data(case_dir.display().to_string(), "示踪剂场为 uniform"));
    }
    let concentrations = field
        .values
        .as_scalar()
        .ok_or_else(|| DfError::invalid_input(format!("场 {} 不是标量场", field.name)))?;

    let coord_config = df_config::CoordinateConfig {
        mode: CoordinateMode::MeshPoints,
        ..driver.config().coordinates.clone()
    };
    let resolver = CoordinateResolver::new(&coord_config, driver.config().domain.bounds);
    let (coords, _) = resolver
        .resolve(&layout.points_file(), Some(concentrations.len()))
        .into_parts()?;

    let n = coords.len().min(concentrations.len());
    let points = &coords.points[..n];
    let concentrations = &concentrations[..n];

    let max = max_finite(concentrations)
        .ok_or_else(|| DfError::no_data(case_dir.display().to_string(), "示踪剂场没有有限值"))?;
    let keep = select_significant(
        concentrations,
        max * config.threshold_ratio,
        config.max_points,
        config.seed,
    );
    let domain = Aabb::from_points(points)
        .unwrap_or(driver.config().domain.bounds)
        .into();

    info!(
        "{}: {} 个单元中保留 {} 个点",
        case_dir.display(),
        n,
        keep.len()
    );

    Ok(TracerDocument {
        points: keep.iter().map(|&i| points[i].to_array()).collect(),
        concentrations: keep.iter().map(|&i| concentrations[i]).collect(),
        source_location: config.source_location,
        domain,
        metadata: TracerMetadata {
            time_step: step.label,
            total_cells: n,
            displayed_points: keep.len(),
            max_concentration: max,
            description: REAL_DESCRIPTION.to_string(),
            generated_at: Utc::now(),
        },
    })
}

/// 以释放源为中心、受 +x 方向风影响的解析羽流
fn plume_concentration(p: DVec3, source: DVec3) -> f64 {
    let d = p - source;
    let wind = if d.x >= 0.0 {
        (-d.x / 10.0).exp()
    } else {
        (d.x / 5.0).exp() * 0.1
    };
    let base = (-d.length() / 6.0).exp() * wind;
    let lateral = (-(d.y * d.y) / 50.0).exp();
    let vertical = (-(d.z * d.z) / 8.0).exp();
    base * lateral * vertical
}

fn linspace(a: f64, b: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { (b - a) / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| a + i as f64 * step)
}

/// 合成羽流：x ∈ [-15, 15]、y ∈ [-20, 15]、z ∈ [0, 6] 上的 31×36×13 网格
pub fn synthetic_plume(config: &TracerConfig) -> TracerDocument {
    let domain = Aabb::from_arrays([-15.0, -20.0, 0.0], [15.0, 15.0, 6.0]);
    let source = DVec3::from_array(config.source_location);

    let mut points = Vec::new();
    let mut concentrations = Vec::new();
    let mut total = 0usize;
    for x in linspace(domain.min.x, domain.max.x, 31) {
        for y in linspace(domain.min.y, domain.max.y, 36) {
            for z in linspace(domain.min.z, domain.max.z, 13) {
                total += 1;
                let p = DVec3::new(x, y, z);
                let c = plume_concentration(p, source);
                if c > SYNTHETIC_THRESHOLD {
                    points.push(p);
                    concentrations.push(c);
                }
            }
        }
    }

    let keep = select_significant(&concentrations, SYNTHETIC_THRESHOLD, config.max_points, config.seed);
    let max = max_finite(&concentrations).unwrap_or(0.0);

    TracerDocument {
        points: keep.iter().map(|&i| points[i].to_array()).collect(),
        concentrations: keep.iter().map(|&i| concentrations[i]).collect(),
        source_location: config.source_location,
        domain: domain.into(),
        metadata: TracerMetadata {
            time_step: "synthetic".to_string(),
            total_cells: total,
            displayed_points: keep.len(),
            max_concentration: max,
            description: SYNTHETIC_DESCRIPTION.to_string(),
            generated_at: Utc::now(),
        },
    }
}
