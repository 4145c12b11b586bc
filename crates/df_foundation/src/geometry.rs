// crates/df_foundation/src/geometry.rs

//! 轴对齐包围盒

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 轴对齐包围盒（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// 最小角点
    pub min: DVec3,
    /// 最大角点
    pub max: DVec3,
}

impl Aabb {
    /// 创建包围盒，自动整理角点顺序
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// 从数组创建
    pub fn from_arrays(min: [f64; 3], max: [f64; 3]) -> Self {
        Self::new(DVec3::from_array(min), DVec3::from_array(max))
    }

    /// 包含点集的最小包围盒，点集为空时返回 `None`
    pub fn from_points(points: &[DVec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Self { min, max })
    }

    /// 各轴长度
    pub fn extent(&self) -> DVec3 {
        self.max - self.min
    }

    /// 体积
    pub fn volume(&self) -> f64 {
        let e = self.extent();
        e.x * e.y * e.z
    }

    /// 中心点
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// 点是否在盒内（含边界）
    pub fn contains(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// 各边向内收缩 `margin`，收缩过度的轴退化到中心
    pub fn shrink(&self, margin: f64) -> Self {
        let c = self.center();
        let m = DVec3::splat(margin);
        Self {
            min: (self.min + m).min(c),
            max: (self.max - m).max(c),
        }
    }

    /// 是否退化（任一轴长度非正或非有限）
    pub fn is_degenerate(&self) -> bool {
        let e = self.extent();
        !(e.is_finite() && e.cmpgt(DVec3::ZERO).all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orders_corners() {
        let b = Aabb::new(DVec3::new(2.0, 0.0, 5.0), DVec3::new(0.0, 3.0, 1.0));
        assert_eq!(b.min, DVec3::new(0.0, 0.0, 1.0));
        assert_eq!(b.max, DVec3::new(2.0, 3.0, 5.0));
    }

    #[test]
    fn test_contains_inclusive() {
        let b = Aabb::from_arrays([4.5, 4.5, 0.5], [10.5, 10.5, 3.5]);
        assert!(b.contains(DVec3::new(4.5, 10.5, 0.5)));
        assert!(b.contains(DVec3::new(7.5, 7.5, 2.0)));
        assert!(!b.contains(DVec3::new(7.5, 7.5, 3.6)));
    }

    #[test]
    fn test_from_points() {
        let pts = [DVec3::new(1.0, -1.0, 0.0), DVec3::new(-2.0, 4.0, 3.0)];
        let b = Aabb::from_points(&pts).unwrap();
        assert_eq!(b.min, DVec3::new(-2.0, -1.0, 0.0));
        assert_eq!(b.max, DVec3::new(1.0, 4.0, 3.0));
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_shrink_and_volume() {
        let b = Aabb::from_arrays([0.0, 0.0, 0.0], [15.0, 15.0, 5.0]);
        assert!((b.volume() - 1125.0).abs() < 1e-12);
        let s = b.shrink(0.5);
        assert_eq!(s.min, DVec3::new(0.5, 0.5, 0.5));
        assert_eq!(s.max, DVec3::new(14.5, 14.5, 4.5));
        assert!(!b.is_degenerate());
        assert!(Aabb::from_arrays([0.0; 3], [1.0, 0.0, 1.0]).is_degenerate());
    }
}
