// crates/df_extract/src/coords.rs

//! 坐标解析
//!
//! 为每个单元提供一个三维位置。优先使用网格点文件；
//! 没有网格点时在计算域包围盒内生成规则格点，或在显式配置时生成随机点。
//!
//! # 格点尺寸
//!
//! | 模式 | 尺寸 |
//! |------|------|
//! | `fixed_grid` | 配置给定（默认 30×30×10） |
//! | `cube_root` | nx = ny = ⌈∛N⌉，nz = max(1, ⌈N/(nx·ny)⌉) |
//! | `axis_weighted` | h = ∛(V/N)，n = max(1, ⌈L/h⌉)，z 方向补足到 N |
//!
//! 格点取单元中心 `min + (i + 0.5)·L/n`，x 最快变化，截取前 N 个。

use std::path::{Path, PathBuf};

use df_config::{CoordinateConfig, CoordinateMode};
use df_foundation::{Aabb, DVec3, DfError, Diagnostic, Outcome};
use df_io::foam::read_points;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

/// 格点尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridDims {
    /// x 方向
    pub nx: usize,
    /// y 方向
    pub ny: usize,
    /// z 方向
    pub nz: usize,
}

impl GridDims {
    /// 创建
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// 格点总数
    pub fn count(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// 立方根启发式
    pub fn cube_root(n: usize) -> Self {
        let side = ceil_cbrt(n).max(1);
        let nz = n.div_ceil(side * side).max(1);
        Self::new(side, side, nz)
    }

    /// 按轴长加权的启发式：各轴间距近似相等
    pub fn axis_weighted(n: usize, bounds: &Aabb) -> Self {
        let volume = bounds.volume();
        let h = (volume / n.max(1) as f64).cbrt();
        if !(h.is_finite() && h > 0.0) {
            return Self::cube_root(n);
        }
        let extent = bounds.extent();
        let per_axis = |len: f64| ((len / h).ceil() as usize).max(1);
        let mut dims = Self::new(per_axis(extent.x), per_axis(extent.y), per_axis(extent.z));
        while dims.count() < n {
            dims.nz += 1;
        }
        dims
    }
}

/// ⌈∛n⌉，整数校正以避免浮点误差
fn ceil_cbrt(n: usize) -> usize {
    let mut k = (n as f64).cbrt().ceil() as usize;
    while k > 0 && (k - 1).pow(3) >= n {
        k -= 1;
    }
    while k.pow(3) < n {
        k += 1;
    }
    k
}

/// 坐标来源
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoordinateSource {
    /// 网格点文件
    MeshPoints {
        /// 文件路径
        path: PathBuf,
    },
    /// 规则格点
    Lattice {
        /// 生成模式
        mode: CoordinateMode,
        /// 尺寸
        dims: GridDims,
    },
    /// 随机点
    Random {
        /// 种子
        seed: u64,
    },
}

impl CoordinateSource {
    /// 是否为真实网格位置
    pub fn is_real(&self) -> bool {
        matches!(self, Self::MeshPoints { .. })
    }
}

/// 坐标集合
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSet {
    /// 位置
    pub points: Vec<DVec3>,
    /// 来源
    pub source: CoordinateSource,
}

impl CoordinateSet {
    /// 数量
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 格点单元中心（x 最快），截取前 `limit` 个
pub fn lattice_points(bounds: &Aabb, dims: GridDims, limit: usize) -> Vec<DVec3> {
    let n = dims.count().min(limit);
    let extent = bounds.extent();
    let step = DVec3::new(
        extent.x / dims.nx.max(1) as f64,
        extent.y / dims.ny.max(1) as f64,
        extent.z / dims.nz.max(1) as f64,
    );
    let mut points = Vec::with_capacity(n);
    'outer: for k in 0..dims.nz {
        for j in 0..dims.ny {
            for i in 0..dims.nx {
                if points.len() == n {
                    break 'outer;
                }
                let idx = DVec3::new(i as f64 + 0.5, j as f64 + 0.5, k as f64 + 0.5);
                points.push(bounds.min + idx * step);
            }
        }
    }
    points
}

/// 在收缩后的包围盒内均匀生成 `n` 个随机点
pub fn random_points(bounds: &Aabb, n: usize, seed: u64, margin: f64) -> Vec<DVec3> {
    let region = bounds.shrink(margin);
    let extent = region.extent();
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let t = DVec3::new(rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>());
            region.min + t * extent
        })
        .collect()
}

/// 坐标解析器
#[derive(Debug, Clone)]
pub struct CoordinateResolver<'a> {
    config: &'a CoordinateConfig,
    bounds: Aabb,
}

impl<'a> CoordinateResolver<'a> {
    /// 创建
    pub fn new(config: &'a CoordinateConfig, bounds: Aabb) -> Self {
        Self { config, bounds }
    }

    /// 解析坐标
    ///
    /// `points_file` 为网格点文件路径，`target` 为场数据给出的单元数。
    pub fn resolve(&self, points_file: &Path, target: Option<usize>) -> Outcome<CoordinateSet> {
        match self.config.mode {
            CoordinateMode::MeshPoints => self.from_mesh(points_file, target),
            CoordinateMode::Auto => self.auto(points_file, target),
            CoordinateMode::FixedGrid => self.fixed_grid(target),
            CoordinateMode::CubeRoot | CoordinateMode::AxisWeighted => {
                match target {
                    Some(n) => Outcome::Success(self.heuristic(self.config.mode, n)),
                    None => Outcome::Failure(no_target(self.config.mode)),
                }
            }
            CoordinateMode::Random => match target {
                Some(n) => Outcome::Success(CoordinateSet {
                    points: random_points(
                        &self.bounds,
                        n,
                        self.config.random_seed,
                        self.config.random_margin,
                    ),
                    source: CoordinateSource::Random {
                        seed: self.config.random_seed,
                    },
                }),
                None => Outcome::Failure(no_target(CoordinateMode::Random)),
            },
        }
    }

    fn auto(&self, points_file: &Path, target: Option<usize>) -> Outcome<CoordinateSet> {
        let mut diagnostics = Vec::new();
        if points_file.is_file() {
            match self.from_mesh(points_file, target) {
                Outcome::Failure(e) => {
                    debug!("网格点不可用，改用格点: {e}");
                    diagnostics.push(Diagnostic::Unreadable {
                        path: points_file.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
                ok => return ok,
            }
        } else {
            diagnostics.push(Diagnostic::MissingFile {
                path: points_file.to_path_buf(),
            });
        }

        match target {
            Some(n) => Outcome::with_diagnostics(
                self.heuristic(CoordinateMode::AxisWeighted, n),
                diagnostics,
            ),
            // 没有单元数量时使用配置的固定格点
            None => {
                let [nx, ny, nz] = self.config.fixed_dims;
                debug!("没有单元数量，使用固定格点 {nx}x{ny}x{nz}");
                diagnostics.push(Diagnostic::LatticeFallback {
                    dims: self.config.fixed_dims,
                });
                let mut outcome = self.fixed_grid(None);
                for d in diagnostics {
                    outcome = outcome.push_diagnostic(d);
                }
                outcome
            }
        }
    }

    fn from_mesh(&self, points_file: &Path, target: Option<usize>) -> Outcome<CoordinateSet> {
        let (mut points, mut diagnostics) = match read_points(points_file).into_parts() {
            Ok(parts) => parts,
            Err(e) => return Outcome::Failure(e),
        };
        if points.is_empty() {
            return Outcome::Failure(DfError::parse(points_file, 0, "网格点列表为空"));
        }
        if let Some(n) = target {
            if points.len() < n {
                diagnostics.push(Diagnostic::CoordinateShortfall {
                    needed: n,
                    available: points.len(),
                });
            }
            points.truncate(n);
        }
        Outcome::with_diagnostics(
            CoordinateSet {
                points,
                source: CoordinateSource::MeshPoints {
                    path: points_file.to_path_buf(),
                },
            },
            diagnostics,
        )
    }

    fn fixed_grid(&self, target: Option<usize>) -> Outcome<CoordinateSet> {
        let [nx, ny, nz] = self.config.fixed_dims;
        let dims = GridDims::new(nx, ny, nz);
        let limit = target.unwrap_or(dims.count());
        let set = CoordinateSet {
            points: lattice_points(&self.bounds, dims, limit),
            source: CoordinateSource::Lattice {
                mode: CoordinateMode::FixedGrid,
                dims,
            },
        };
        let mut diagnostics = Vec::new();
        if set.len() < limit {
            diagnostics.push(Diagnostic::CoordinateShortfall {
                needed: limit,
                available: set.len(),
            });
        }
        Outcome::with_diagnostics(set, diagnostics)
    }

    fn heuristic(&self, mode: CoordinateMode, n: usize) -> CoordinateSet {
        let dims = match mode {
            CoordinateMode::CubeRoot => GridDims::cube_root(n),
            _ => GridDims::axis_weighted(n, &self.bounds),
        };
        debug!("{:?} 格点 {}x{}x{} 覆盖 {} 个单元", mode, dims.nx, dims.ny, dims.nz, n);
        CoordinateSet {
            points: lattice_points(&self.bounds, dims, n),
            source: CoordinateSource::Lattice { mode, dims },
        }
    }
}

fn no_target(mode: CoordinateMode) -> DfError {
    DfError::invalid_input(format!(
        "坐标模式 {mode:?} 需要单元数量，但没有非 uniform 场给出单元数量"
    ))
}
