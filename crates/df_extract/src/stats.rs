// crates/df_extract/src/stats.rs

//! 记录列统计

use df_io::export::RECORD_HEADER;
use df_io::Record;
use serde::Serialize;

/// 单列统计（仅统计有限值）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// 列名
    pub column: String,
    /// 最小值
    pub min: f64,
    /// 最大值
    pub max: f64,
    /// 均值
    pub mean: f64,
    /// NaN / Inf 个数
    pub non_finite: usize,
}

#[derive(Default)]
struct Accumulator {
    min: f64,
    max: f64,
    sum: f64,
    count: usize,
    non_finite: usize,
}

impl Accumulator {
    fn push(&mut self, v: f64) {
        if !v.is_finite() {
            self.non_finite += 1;
            return;
        }
        if self.count == 0 {
            self.min = v;
            self.max = v;
        } else {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
        self.sum += v;
        self.count += 1;
    }

    /// 没有有限值时 min / max / mean 均为 NaN
    fn finish(self, column: &str) -> ColumnSummary {
        let (min, max, mean) = if self.count > 0 {
            (self.min, self.max, self.sum / self.count as f64)
        } else {
            (f64::NAN, f64::NAN, f64::NAN)
        };
        ColumnSummary {
            column: column.to_string(),
            min,
            max,
            mean,
            non_finite: self.non_finite,
        }
    }
}

fn columns(r: &Record) -> [f64; 8] {
    [
        r.position.x,
        r.position.y,
        r.position.z,
        r.velocity.x,
        r.velocity.y,
        r.velocity.z,
        r.pressure,
        r.velocity_magnitude,
    ]
}

/// 按输出列顺序统计全部数值列
pub fn summarize(records: &[Record]) -> Vec<ColumnSummary> {
    let mut acc: [Accumulator; 8] = Default::default();
    for r in records {
        for (a, v) in acc.iter_mut().zip(columns(r)) {
            a.push(v);
        }
    }
    acc.into_iter()
        .zip(RECORD_HEADER)
        .map(|(a, name)| a.finish(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use df_foundation::DVec3;

    #[test]
    fn test_summarize() {
        let records = vec![
            Record::new(DVec3::new(0.0, 1.0, 2.0), DVec3::new(3.0, 4.0, 0.0), -1.0),
            Record::new(DVec3::new(2.0, 1.0, 2.0), DVec3::ZERO, f64::NAN),
        ];
        let stats = summarize(&records);
        assert_eq!(stats.len(), 8);
        assert_eq!(stats[0].column, "x");
        assert_eq!((stats[0].min, stats[0].max, stats[0].mean), (0.0, 2.0, 1.0));

        let p = &stats[6];
        assert_eq!(p.column, "pressure");
        assert_eq!(p.non_finite, 1);
        assert_eq!(p.mean, -1.0);

        let mag = &stats[7];
        assert_eq!(mag.max, 5.0);
        assert_eq!(mag.mean, 2.5);
    }

    #[test]
    fn test_all_non_finite_column_has_no_range() {
        let records = vec![
            Record::new(DVec3::ZERO, DVec3::ZERO, f64::NAN),
            Record::new(DVec3::ONE, DVec3::ZERO, f64::INFINITY),
        ];
        let p = &summarize(&records)[6];
        assert_eq!(p.non_finite, 2);
        assert!(p.min.is_nan() && p.max.is_nan() && p.mean.is_nan());

        assert!(summarize(&[]).iter().all(|c| c.min.is_nan() && c.max.is_nan()));
    }
}
