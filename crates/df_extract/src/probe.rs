// crates/df_extract/src/probe.rs

//! 采样点时间序列
//!
//! 对算例的每个时间步（升序），取离各采样点最近的单元记录。
//! 某个时间步无法提取时跳过并记录警告。

use std::path::Path;

use df_config::SamplePoint;
use df_foundation::{DVec3, DfResult};
use df_io::Record;
use serde::Serialize;
use tracing::{info, warn};

use crate::driver::ExtractionDriver;

/// 时间序列中的一行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeRow {
    /// 时间
    pub time: f64,
    /// 采样点名称
    pub point_name: String,
    /// 最近单元的 x
    pub x: f64,
    /// 最近单元的 y
    pub y: f64,
    /// 最近单元的 z
    pub z: f64,
    /// 速度 x 分量
    #[serde(rename = "Ux")]
    pub ux: f64,
    /// 速度 y 分量
    #[serde(rename = "Uy")]
    pub uy: f64,
    /// 速度 z 分量
    #[serde(rename = "Uz")]
    pub uz: f64,
    /// 速度模
    pub velocity_magnitude: f64,
    /// 压力
    pub pressure: f64,
}

impl ProbeRow {
    fn new(time: f64, point_name: &str, r: &Record) -> Self {
        Self {
            time,
            point_name: point_name.to_string(),
            x: r.position.x,
            y: r.position.y,
            z: r.position.z,
            ux: r.velocity.x,
            uy: r.velocity.y,
            uz: r.velocity.z,
            velocity_magnitude: r.velocity_magnitude,
            pressure: r.pressure,
        }
    }
}

/// 离 `target` 最近的记录
pub fn nearest_record(records: &[Record], target: DVec3) -> Option<&Record> {
    records.iter().min_by(|a, b| {
        a.position
            .distance_squared(target)
            .total_cmp(&b.position.distance_squared(target))
    })
}

/// 对一组记录采样全部采样点
pub fn sample(time: f64, records: &[Record], points: &[SamplePoint]) -> Vec<ProbeRow> {
    points
        .iter()
        .filter_map(|sp| {
            let target = DVec3::from_array(sp.position);
            nearest_record(records, target).map(|r| ProbeRow::new(time, &sp.name, r))
        })
        .collect()
}

/// 生成算例的采样点时间序列
pub fn probe_case(driver: &ExtractionDriver, case_dir: &Path) -> DfResult<Vec<ProbeRow>> {
    let layout = driver.layout(case_dir);
    let steps = layout.time_steps()?;
    let points = &driver.config().probes.points;

    let mut rows = Vec::with_capacity(steps.len() * points.len());
    for step in &steps {
        match driver.load_step(&layout, step).into_parts() {
            Ok((data, _)) => rows.extend(sample(step.value, &data.records, points)),
            Err(e) => warn!("{}: 时间步 {} 跳过: {}", case_dir.display(), step.label, e),
        }
    }
    info!(
        "{}: {} 个时间步，{} 行采样",
        case_dir.display(),
        steps.len(),
        rows.len()
    );
    Ok(rows)
}
