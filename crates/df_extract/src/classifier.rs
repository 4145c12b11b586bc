// crates/df_extract/src/classifier.rs

//! 边界面片分类
//!
//! 按位置给单元打标签，规则按顺序匹配，先命中者生效：
//!
//! 1. x ≤ inlet_x → inlet
//! 2. x ≥ outlet_x → outlet
//! 3. z ≤ ground_z → ground
//! 4. z ≥ atmosphere_z → atmosphere
//! 5. 位于碎屑区域包围盒内（含边界）→ debris_region
//! 6. 其余 → internal

use std::collections::BTreeMap;

use df_config::PatchConfig;
use df_foundation::{Aabb, DVec3};
use df_io::{PatchLabel, Record};

/// 边界分类器
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryClassifier {
    inlet_x: f64,
    outlet_x: f64,
    ground_z: f64,
    atmosphere_z: f64,
    debris_box: Aabb,
}

impl BoundaryClassifier {
    /// 由配置创建
    pub fn from_config(config: &PatchConfig) -> Self {
        Self {
            inlet_x: config.inlet_x,
            outlet_x: config.outlet_x,
            ground_z: config.ground_z,
            atmosphere_z: config.atmosphere_z,
            debris_box: config.debris_box,
        }
    }

    /// 分类单个位置
    pub fn classify(&self, p: DVec3) -> PatchLabel {
        if p.x <= self.inlet_x {
            PatchLabel::Inlet
        } else if p.x >= self.outlet_x {
            PatchLabel::Outlet
        } else if p.z <= self.ground_z {
            PatchLabel::Ground
        } else if p.z >= self.atmosphere_z {
            PatchLabel::Atmosphere
        } else if self.debris_box.contains(p) {
            PatchLabel::DebrisRegion
        } else {
            PatchLabel::Internal
        }
    }

    /// 为全部记录打标签并统计
    pub fn label_all(&self, records: &mut [Record]) -> PatchCounts {
        let mut counts = PatchCounts::default();
        for r in records.iter_mut() {
            let label = self.classify(r.position);
            r.patch = Some(label);
            *counts.entry(label.name().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for BoundaryClassifier {
    fn default() -> Self {
        Self::from_config(&PatchConfig::default())
    }
}

/// 各面片标签的单元数，键为标签名
pub type PatchCounts = BTreeMap<String, usize>;

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> DVec3 {
        DVec3::new(x, y, z)
    }

    #[test]
    fn test_concrete_classification() {
        let c = BoundaryClassifier::default();
        assert_eq!(c.classify(p(0.2, 7.0, 2.0)), PatchLabel::Inlet);
        assert_eq!(c.classify(p(7.0, 7.0, 2.0)), PatchLabel::DebrisRegion);
        assert_eq!(c.classify(p(7.0, 1.0, 2.0)), PatchLabel::Internal);
        assert_eq!(c.classify(p(7.0, 7.0, 4.8)), PatchLabel::Atmosphere);
    }

    #[test]
    fn test_priority_order() {
        let c = BoundaryClassifier::default();
        // inlet 优先于 ground
        assert_eq!(c.classify(p(0.1, 7.0, 0.1)), PatchLabel::Inlet);
        // outlet 优先于 atmosphere
        assert_eq!(c.classify(p(14.9, 7.0, 4.9)), PatchLabel::Outlet);
        // ground 优先于 debris_region
        assert_eq!(c.classify(p(7.0, 7.0, 0.5)), PatchLabel::Ground);
    }

    #[test]
    fn test_thresholds_inclusive() {
        let c = BoundaryClassifier::default();
        assert_eq!(c.classify(p(0.5, 7.0, 2.0)), PatchLabel::Inlet);
        assert_eq!(c.classify(p(14.5, 7.0, 2.0)), PatchLabel::Outlet);
        assert_eq!(c.classify(p(4.5, 4.5, 3.5)), PatchLabel::DebrisRegion);
    }

    #[test]
    fn test_label_all_counts() {
        let c = BoundaryClassifier::default();
        let mut records: Vec<Record> = [p(0.2, 7.0, 2.0), p(7.0, 7.0, 2.0), p(7.0, 7.0, 2.5)]
            .into_iter()
            .map(|pos| Record::new(pos, DVec3::ZERO, 0.0))
            .collect();
        let counts = c.label_all(&mut records);
        assert_eq!(counts.get("inlet"), Some(&1));
        assert_eq!(counts.get("debris_region"), Some(&2));
        assert!(records.iter().all(|r| r.patch.is_some()));

        let again = c.label_all(&mut records);
        assert_eq!(counts, again);
    }
}
