// crates/df_config/src/extraction.rs

//! ExtractionConfig - 提取流程配置
//!
//! 所有路径、阈值与启发式参数都通过本结构显式注入驱动层，
//! 不读取任何进程级全局状态。默认值取自参考算例
//! （15 m × 15 m × 5 m 计算域，blockMesh 30×30×10）。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use df_foundation::Aabb;

use crate::error::ConfigError;
use crate::selection::{PatternSelection, TimeStepSelector};

/// 模式编号占位符
pub const PATTERN_PLACEHOLDER: &str = "{id}";

/// 提取配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// 算例定位
    #[serde(default)]
    pub case: CaseConfig,

    /// 时间步选择
    #[serde(default)]
    pub time_step: TimeStepSelector,

    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,

    /// 计算域
    #[serde(default)]
    pub domain: DomainConfig,

    /// 坐标解析
    #[serde(default)]
    pub coordinates: CoordinateConfig,

    /// 边界分类
    #[serde(default)]
    pub patches: PatchConfig,

    /// 缺失场替代数据
    #[serde(default)]
    pub placeholder: PlaceholderConfig,

    /// 采样点时间序列
    #[serde(default)]
    pub probes: ProbeConfig,

    /// 示踪剂导出
    #[serde(default)]
    pub tracer: TracerConfig,

    /// 批处理时并行处理各算例（输出顺序不变）
    #[serde(default)]
    pub parallel: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            case: CaseConfig::default(),
            time_step: TimeStepSelector::default(),
            output: OutputConfig::default(),
            domain: DomainConfig::default(),
            coordinates: CoordinateConfig::default(),
            patches: PatchConfig::default(),
            placeholder: PlaceholderConfig::default(),
            probes: ProbeConfig::default(),
            tracer: TracerConfig::default(),
            parallel: false,
        }
    }
}

// ============================================================
// 算例定位
// ============================================================

/// 算例定位配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseConfig {
    /// 算例根目录
    #[serde(default = "default_case_root")]
    pub case_root: PathBuf,

    /// 单个模式的算例目录模板（相对根目录，`{id}` 替换为编号）
    #[serde(default = "default_case_dir_template")]
    pub case_dir_template: String,

    /// 批处理的模式编号
    #[serde(default)]
    pub patterns: PatternSelection,

    /// 网格描述子目录（相对算例目录）
    #[serde(default = "default_mesh_dir")]
    pub mesh_dir: PathBuf,

    /// 速度场文件名
    #[serde(default = "default_velocity_field")]
    pub velocity_field: String,

    /// 压力场文件名
    #[serde(default = "default_pressure_field")]
    pub pressure_field: String,
}

fn default_case_root() -> PathBuf { PathBuf::from("simulation_results") }
fn default_case_dir_template() -> String { "pattern_{id}/debrisCase".to_string() }
fn default_mesh_dir() -> PathBuf { PathBuf::from("constant/polyMesh") }
fn default_velocity_field() -> String { "U".to_string() }
fn default_pressure_field() -> String { "p".to_string() }

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            case_root: default_case_root(),
            case_dir_template: default_case_dir_template(),
            patterns: PatternSelection::default(),
            mesh_dir: default_mesh_dir(),
            velocity_field: default_velocity_field(),
            pressure_field: default_pressure_field(),
        }
    }
}

impl CaseConfig {
    /// 指定模式编号的算例目录
    pub fn case_dir(&self, pattern_id: u32) -> PathBuf {
        self.case_root
            .join(expand_template(&self.case_dir_template, pattern_id))
    }
}

// ============================================================
// 输出
// ============================================================

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 输出目录
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// 批处理输出文件名模板
    #[serde(default = "default_file_template")]
    pub file_template: String,

    /// 输出 patch_id / patch_name 列
    #[serde(default = "default_true")]
    pub include_patches: bool,
}

fn default_output_dir() -> PathBuf { PathBuf::from("output") }
fn default_file_template() -> String { "pattern_{id}_results.csv".to_string() }
fn default_true() -> bool { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            file_template: default_file_template(),
            include_patches: true,
        }
    }
}

impl OutputConfig {
    /// 指定模式编号的输出文件路径
    pub fn file_for(&self, pattern_id: u32) -> PathBuf {
        self.directory
            .join(expand_template(&self.file_template, pattern_id))
    }
}

// ============================================================
// 计算域与坐标
// ============================================================

/// 计算域配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    /// 计算域包围盒 [m]
    #[serde(default = "default_domain_bounds")]
    pub bounds: Aabb,
}

fn default_domain_bounds() -> Aabb {
    Aabb::from_arrays([0.0, 0.0, 0.0], [15.0, 15.0, 5.0])
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            bounds: default_domain_bounds(),
        }
    }
}

/// 坐标解析模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateMode {
    /// 优先网格点文件，其次按目标单元数的轴加权格点
    #[default]
    Auto,
    /// 仅使用网格点文件
    MeshPoints,
    /// 固定格点维度
    FixedGrid,
    /// 立方根启发式
    CubeRoot,
    /// 按计算域长宽高比加权的启发式
    AxisWeighted,
    /// 固定种子的随机坐标（仅作最后手段的占位）
    Random,
}

/// 坐标解析配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinateConfig {
    /// 解析模式
    #[serde(default)]
    pub mode: CoordinateMode,

    /// 固定格点维度 [nx, ny, nz]
    #[serde(default = "default_fixed_dims")]
    pub fixed_dims: [usize; 3],

    /// 随机模式种子
    #[serde(default = "default_seed")]
    pub random_seed: u64,

    /// 随机模式下距计算域边界的留白 [m]
    #[serde(default = "default_random_margin")]
    pub random_margin: f64,
}

fn default_fixed_dims() -> [usize; 3] { [30, 30, 10] }
fn default_seed() -> u64 { 42 }
fn default_random_margin() -> f64 { 0.5 }

impl Default for CoordinateConfig {
    fn default() -> Self {
        Self {
            mode: CoordinateMode::default(),
            fixed_dims: default_fixed_dims(),
            random_seed: default_seed(),
            random_margin: default_random_margin(),
        }
    }
}

// ============================================================
// 边界分类
// ============================================================

/// 边界分类阈值
///
/// 默认值来自参考算例的 blockMesh 尺寸，不具有普适性。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchConfig {
    /// 是否执行分类
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// x ≤ inlet_x 判为入口
    #[serde(default = "default_inlet_x")]
    pub inlet_x: f64,

    /// x ≥ outlet_x 判为出口
    #[serde(default = "default_outlet_x")]
    pub outlet_x: f64,

    /// z ≤ ground_z 判为地面
    #[serde(default = "default_ground_z")]
    pub ground_z: f64,

    /// z ≥ atmosphere_z 判为大气边界
    #[serde(default = "default_atmosphere_z")]
    pub atmosphere_z: f64,

    /// 瓦砾区域包围盒
    #[serde(default = "default_debris_box")]
    pub debris_box: Aabb,
}

fn default_inlet_x() -> f64 { 0.5 }
fn default_outlet_x() -> f64 { 14.5 }
fn default_ground_z() -> f64 { 0.5 }
fn default_atmosphere_z() -> f64 { 4.5 }
fn default_debris_box() -> Aabb {
    Aabb::from_arrays([4.5, 4.5, 0.5], [10.5, 10.5, 3.5])
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            inlet_x: default_inlet_x(),
            outlet_x: default_outlet_x(),
            ground_z: default_ground_z(),
            atmosphere_z: default_atmosphere_z(),
            debris_box: default_debris_box(),
        }
    }
}

// ============================================================
// 替代数据
// ============================================================

/// 缺失场的解析式替代数据
///
/// `Ux = velocity_scale·(1 − x'/Lx)`，`p = pressure_scale·x'/Lx`，
/// 其中 x' 为相对计算域起点的距离。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    /// 是否启用；关闭时缺失场由组装器补零
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 入口速度尺度 [m/s]
    #[serde(default = "default_velocity_scale")]
    pub velocity_scale: f64,

    /// 压力尺度
    #[serde(default = "default_pressure_scale")]
    pub pressure_scale: f64,
}

fn default_velocity_scale() -> f64 { 0.5 }
fn default_pressure_scale() -> f64 { 0.01 }

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            velocity_scale: default_velocity_scale(),
            pressure_scale: default_pressure_scale(),
        }
    }
}

// ============================================================
// 采样点与示踪剂
// ============================================================

/// 命名采样点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// 名称
    pub name: String,
    /// 位置 [m]
    pub position: [f64; 3],
}

impl SamplePoint {
    /// 创建采样点
    pub fn new(name: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// 采样点时间序列配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// 采样点
    #[serde(default = "default_probe_points")]
    pub points: Vec<SamplePoint>,
}

fn default_probe_points() -> Vec<SamplePoint> {
    vec![
        SamplePoint::new("debris_front", [2.0, 7.5, 1.0]),
        SamplePoint::new("debris_center", [7.5, 7.5, 1.0]),
        SamplePoint::new("debris_back", [13.0, 7.5, 1.0]),
        SamplePoint::new("debris_side1", [7.5, 2.0, 1.0]),
        SamplePoint::new("debris_side2", [7.5, 13.0, 1.0]),
        SamplePoint::new("debris_above", [7.5, 7.5, 3.0]),
    ]
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            points: default_probe_points(),
        }
    }
}

/// 示踪剂（气味扩散）导出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracerConfig {
    /// 标量场文件名
    #[serde(default = "default_tracer_field")]
    pub field: String,

    /// 相对最大浓度的显示阈值
    #[serde(default = "default_threshold_ratio")]
    pub threshold_ratio: f64,

    /// 最多导出的点数
    #[serde(default = "default_max_points")]
    pub max_points: usize,

    /// 降采样种子
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// 释放源位置 [m]
    #[serde(default = "default_source_location")]
    pub source_location: [f64; 3],
}

fn default_tracer_field() -> String { "s".to_string() }
fn default_threshold_ratio() -> f64 { 0.001 }
fn default_max_points() -> usize { 10_000 }
fn default_source_location() -> [f64; 3] { [2.0, -3.0, 0.5] }

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            field: default_tracer_field(),
            threshold_ratio: default_threshold_ratio(),
            max_points: default_max_points(),
            seed: default_seed(),
            source_location: default_source_location(),
        }
    }
}

// ============================================================
// 加载、验证、保存
// ============================================================

impl ExtractionConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;

        let config: ExtractionConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.case.case_dir_template.contains(PATTERN_PLACEHOLDER) {
            return Err(ConfigError::invalid(
                "case.case_dir_template",
                &self.case.case_dir_template,
                "必须包含 {id}",
            ));
        }
        if !self.output.file_template.contains(PATTERN_PLACEHOLDER) {
            return Err(ConfigError::invalid(
                "output.file_template",
                &self.output.file_template,
                "必须包含 {id}",
            ));
        }
        for (key, name) in [
            ("case.velocity_field", &self.case.velocity_field),
            ("case.pressure_field", &self.case.pressure_field),
            ("tracer.field", &self.tracer.field),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid(key, name, "场名称不能为空"));
            }
        }

        if self.domain.bounds.is_degenerate() {
            return Err(ConfigError::invalid(
                "domain.bounds",
                format!("{:?}", self.domain.bounds),
                "计算域各轴长度必须为正",
            ));
        }

        if self.coordinates.fixed_dims.contains(&0) {
            return Err(ConfigError::invalid(
                "coordinates.fixed_dims",
                format!("{:?}", self.coordinates.fixed_dims),
                "格点维度必须为正",
            ));
        }
        if !(self.coordinates.random_margin >= 0.0) {
            return Err(ConfigError::invalid(
                "coordinates.random_margin",
                self.coordinates.random_margin,
                "留白不能为负",
            ));
        }

        let p = &self.patches;
        if p.inlet_x >= p.outlet_x {
            return Err(ConfigError::invalid(
                "patches.inlet_x",
                p.inlet_x,
                format!("必须小于 outlet_x ({})", p.outlet_x),
            ));
        }
        if p.ground_z >= p.atmosphere_z {
            return Err(ConfigError::invalid(
                "patches.ground_z",
                p.ground_z,
                format!("必须小于 atmosphere_z ({})", p.atmosphere_z),
            ));
        }

        if !(0.0..=1.0).contains(&self.tracer.threshold_ratio) {
            return Err(ConfigError::invalid(
                "tracer.threshold_ratio",
                self.tracer.threshold_ratio,
                "必须在 [0, 1] 范围内",
            ));
        }
        if self.tracer.max_points == 0 {
            return Err(ConfigError::invalid("tracer.max_points", 0, "必须为正"));
        }

        Ok(())
    }

    /// 保存配置到 JSON 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }
}

/// 替换模板中的 `{id}`
pub fn expand_template(template: &str, pattern_id: u32) -> String {
    template.replace(PATTERN_PLACEHOLDER, &pattern_id.to_string())
}
