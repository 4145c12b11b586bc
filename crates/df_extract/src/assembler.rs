// crates/df_extract/src/assembler.rs

//! 记录组装
//!
//! 输出长度 = min(坐标数, 速度数（若存在）, 压力数（若存在）)。
//! 缺失的场按零填充，不会缩短输出；uniform 场广播到全部单元。

use df_foundation::{DVec3, DfError, Diagnostic, Outcome};
use df_io::{FieldKind, ParsedField, Record};
use tracing::warn;

/// 组装输入
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    /// 算例名，用于错误信息
    pub case: &'a str,
    /// 单元位置
    pub coordinates: &'a [DVec3],
    /// 速度场
    pub velocity: Option<&'a ParsedField>,
    /// 压力场
    pub pressure: Option<&'a ParsedField>,
}

/// 组装记录
pub fn assemble(input: AssemblyInput<'_>) -> Outcome<Vec<Record>> {
    let mut diagnostics = Vec::new();

    let velocity = match checked(input.velocity, FieldKind::Vector) {
        Ok(v) => v,
        Err(e) => return Outcome::Failure(e),
    };
    let pressure = match checked(input.pressure, FieldKind::Scalar) {
        Ok(p) => p,
        Err(e) => return Outcome::Failure(e),
    };

    // 存在但为空的场按缺失处理
    let velocity = non_empty(velocity, input.coordinates.len(), &mut diagnostics);
    let pressure = non_empty(pressure, input.coordinates.len(), &mut diagnostics);

    if input.coordinates.is_empty() {
        let reason = if velocity.is_none() && pressure.is_none() {
            "速度与压力场均缺失且没有坐标"
        } else {
            "没有可用坐标"
        };
        return Outcome::Failure(DfError::no_data(input.case, reason));
    }

    if velocity.is_none() {
        warn!("{}: 速度场缺失，按零填充", input.case);
    }
    if pressure.is_none() {
        warn!("{}: 压力场缺失，按零填充", input.case);
    }

    let n = [
        Some(input.coordinates.len()),
        velocity.and_then(ParsedField::length_constraint),
        pressure.and_then(ParsedField::length_constraint),
    ]
    .into_iter()
    .flatten()
    .min()
    .unwrap_or(0);

    let records = input.coordinates[..n]
        .iter()
        .enumerate()
        .map(|(i, &pos)| {
            let u = velocity.and_then(|f| f.vector_at(i)).unwrap_or(DVec3::ZERO);
            let p = pressure.and_then(|f| f.scalar_at(i)).unwrap_or(0.0);
            Record::new(pos, u, p)
        })
        .collect();

    Outcome::with_diagnostics(records, diagnostics)
}

fn checked(field: Option<&ParsedField>, expected: FieldKind) -> Result<Option<&ParsedField>, DfError> {
    match field {
        Some(f) if f.kind() != expected => Err(DfError::invalid_input(format!(
            "场 {} 为 {} 类型，应为 {}",
            f.name,
            f.kind().name(),
            expected.name()
        ))),
        other => Ok(other),
    }
}

fn non_empty<'a>(
    field: Option<&'a ParsedField>,
    expected: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'a ParsedField> {
    match field {
        Some(f) if f.is_empty() => {
            diagnostics.push(Diagnostic::LengthMismatch {
                field: f.name.clone(),
                declared: f.declared_count.unwrap_or(expected),
                parsed: 0,
            });
            None
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(n: usize) -> Vec<DVec3> {
        (0..n).map(|i| DVec3::new(i as f64, 0.0, 1.0)).collect()
    }

    fn vel(n: usize) -> ParsedField {
        ParsedField::vector("U", (0..n).map(|i| DVec3::new(i as f64, 1.0, 2.0)).collect())
    }

    fn pres(n: usize) -> ParsedField {
        ParsedField::scalar("p", (0..n).map(|i| i as f64 * 0.1).collect())
    }

    fn run(c: &[DVec3], u: Option<&ParsedField>, p: Option<&ParsedField>) -> Outcome<Vec<Record>> {
        assemble(AssemblyInput {
            case: "pattern_1",
            coordinates: c,
            velocity: u,
            pressure: p,
        })
    }

    #[test]
    fn test_min_rule() {
        let c = coords(10);
        let (u, p) = (vel(8), pres(9));
        let (records, _) = run(&c, Some(&u), Some(&p)).into_parts().unwrap();
        assert_eq!(records.len(), 8);

        let (records, _) = run(&c, None, Some(&p)).into_parts().unwrap();
        assert_eq!(records.len(), 9);

        let (records, _) = run(&coords(5), Some(&u), Some(&p)).into_parts().unwrap();
        assert_eq!(records.len(), 5);
    }

    #[test]
    fn test_absent_zero_filled() {
        let c = coords(4);
        let u = vel(4);
        let (records, _) = run(&c, Some(&u), None).into_parts().unwrap();
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.pressure == 0.0));

        let p = pres(4);
        let (records, _) = run(&c, None, Some(&p)).into_parts().unwrap();
        assert!(records.iter().all(|r| r.velocity == DVec3::ZERO && r.velocity_magnitude == 0.0));
    }

    #[test]
    fn test_magnitude_exact() {
        let c = coords(3);
        let u = ParsedField::vector(
            "U",
            vec![DVec3::new(3.0, 4.0, 12.0), DVec3::new(-1.0, 0.0, 0.0), DVec3::new(1e-3, 2e-3, 2e-3)],
        );
        let (records, _) = run(&c, Some(&u), None).into_parts().unwrap();
        assert!((records[0].velocity_magnitude - 13.0).abs() < 1e-9);
        assert!((records[1].velocity_magnitude - 1.0).abs() < 1e-9);
        assert!((records[2].velocity_magnitude - 3e-3).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_broadcast() {
        let c = coords(6);
        let u = ParsedField {
            name: "U".into(),
            declared_count: None,
            values: df_io::FieldValues::Vector(vec![DVec3::new(0.5, 0.0, 0.0)]),
            uniform: true,
        };
        let p = pres(6);
        let (records, _) = run(&c, Some(&u), Some(&p)).into_parts().unwrap();
        assert_eq!(records.len(), 6);
        assert!(records.iter().all(|r| r.velocity.x == 0.5));
    }

    #[test]
    fn test_no_data() {
        let outcome = run(&[], None, None);
        assert!(matches!(outcome, Outcome::Failure(DfError::NoData { .. })));
    }

    #[test]
    fn test_empty_field_treated_as_absent() {
        let c = coords(3);
        let u = vel(0);
        let (records, diags) = run(&c, Some(&u), None).into_parts().unwrap();
        assert_eq!(records.len(), 3);
        assert!(matches!(diags[0], Diagnostic::LengthMismatch { parsed: 0, .. }));
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let c = coords(2);
        let p = pres(2);
        assert!(run(&c, Some(&p), None).is_failure());
    }
}
