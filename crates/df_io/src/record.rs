// crates/df_io/src/record.rs

//! 输出记录
//!
//! 每条记录对应一个单元：位置、速度、压力、速度模，以及可选的边界面片标签。

use std::fmt;

use df_foundation::DVec3;
use serde::Serialize;

/// 边界面片标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchLabel {
    /// 入口
    Inlet,
    /// 出口
    Outlet,
    /// 地面
    Ground,
    /// 顶部大气边界
    Atmosphere,
    /// 碎屑区域
    DebrisRegion,
    /// 内部单元
    Internal,
}

impl PatchLabel {
    /// 全部标签，按编号顺序（内部单元最后）
    pub const ALL: [PatchLabel; 6] = [
        Self::Inlet,
        Self::Outlet,
        Self::Ground,
        Self::Atmosphere,
        Self::DebrisRegion,
        Self::Internal,
    ];

    /// 数值编号，内部单元为 -1
    pub fn id(&self) -> i32 {
        match self {
            Self::Inlet => 0,
            Self::Outlet => 1,
            Self::Ground => 2,
            Self::Atmosphere => 3,
            Self::DebrisRegion => 4,
            Self::Internal => -1,
        }
    }

    /// 名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inlet => "inlet",
            Self::Outlet => "outlet",
            Self::Ground => "ground",
            Self::Atmosphere => "atmosphere",
            Self::DebrisRegion => "debris_region",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for PatchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 单元记录
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// 单元位置
    pub position: DVec3,
    /// 速度
    pub velocity: DVec3,
    /// 压力
    pub pressure: f64,
    /// 速度模，恒等于 `velocity.length()`
    pub velocity_magnitude: f64,
    /// 边界面片标签
    pub patch: Option<PatchLabel>,
}

impl Record {
    /// 创建记录并计算速度模
    pub fn new(position: DVec3, velocity: DVec3, pressure: f64) -> Self {
        Self {
            position,
            velocity,
            pressure,
            velocity_magnitude: velocity.length(),
            patch: None,
        }
    }

    /// 附加面片标签
    pub fn with_patch(mut self, patch: PatchLabel) -> Self {
        self.patch = Some(patch);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_magnitude() {
        let r = Record::new(DVec3::ZERO, DVec3::new(3.0, 4.0, 0.0), 1.0);
        assert!((r.velocity_magnitude - 5.0).abs() < 1e-12);
        assert!(r.patch.is_none());
    }

    #[test]
    fn test_patch_ids() {
        let ids: Vec<i32> = PatchLabel::ALL.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, -1]);
        assert_eq!(PatchLabel::DebrisRegion.to_string(), "debris_region");
    }
}
