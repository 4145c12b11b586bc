// crates/df_extract/src/placeholder.rs

//! 缺失场的确定性占位剖面
//!
//! - 速度: Ux = s_u·(1 − ξ)，Uy = Uz = 0
//! - 压力: p = s_p·ξ
//!
//! 其中 ξ = (x − x_min)/Lx 为沿流向的归一化位置。

use df_config::PlaceholderConfig;
use df_foundation::{Aabb, DVec3};
use df_io::ParsedField;

/// 沿流向的归一化位置
fn xi(p: DVec3, bounds: &Aabb) -> f64 {
    let lx = bounds.extent().x;
    if lx > 0.0 {
        (p.x - bounds.min.x) / lx
    } else {
        0.0
    }
}

/// 速度占位场
pub fn velocity_profile(
    name: &str,
    coords: &[DVec3],
    bounds: &Aabb,
    config: &PlaceholderConfig,
) -> ParsedField {
    let values = coords
        .iter()
        .map(|&p| DVec3::new(config.velocity_scale * (1.0 - xi(p, bounds)), 0.0, 0.0))
        .collect();
    ParsedField::vector(name, values)
}

/// 压力占位场
pub fn pressure_profile(
    name: &str,
    coords: &[DVec3],
    bounds: &Aabb,
    config: &PlaceholderConfig,
) -> ParsedField {
    let values = coords
        .iter()
        .map(|&p| config.pressure_scale * xi(p, bounds))
        .collect();
    ParsedField::scalar(name, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let bounds = Aabb::from_arrays([0.0, 0.0, 0.0], [15.0, 15.0, 5.0]);
        let cfg = PlaceholderConfig::default();
        let coords = [DVec3::new(0.0, 1.0, 1.0), DVec3::new(7.5, 1.0, 1.0), DVec3::new(15.0, 0.0, 0.0)];

        let u = velocity_profile("U", &coords, &bounds, &cfg);
        let v = u.values.as_vector().unwrap();
        assert!((v[0].x - 0.5).abs() < 1e-12);
        assert!((v[1].x - 0.25).abs() < 1e-12);
        assert!(v[2].x.abs() < 1e-12);
        assert!(v.iter().all(|u| u.y == 0.0 && u.z == 0.0));

        let p = pressure_profile("p", &coords, &bounds, &cfg);
        let s = p.values.as_scalar().unwrap();
        assert!(s[0].abs() < 1e-12);
        assert!((s[2] - 0.01).abs() < 1e-12);
        assert_eq!(p.len(), 3);
    }
}
