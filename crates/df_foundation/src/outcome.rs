// crates/df_foundation/src/outcome.rs

//! 阶段结果类型
//!
//! 解析、坐标解析等各阶段统一返回 [`Outcome`]：
//!
//! - `Success(data)`: 数据完整可用
//! - `Warning(data, reasons)`: 数据可用，但存在需要记录的问题
//! - `Failure(error)`: 无法产出数据
//!
//! 驱动层逐一检查并记录诊断信息，而不是静默混合真实数据与替代数据。

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DfError, DfResult};

/// 诊断原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// 头部声明数量与实际解析数量不一致（实际更少）
    LengthMismatch {
        /// 场名称
        field: String,
        /// 声明数量
        declared: usize,
        /// 实际解析数量
        parsed: usize,
    },
    /// 实际数据多于声明数量，已截断
    ExcessValues {
        /// 场名称
        field: String,
        /// 声明数量
        declared: usize,
        /// 被丢弃的数量
        dropped: usize,
    },
    /// 跳过了无法转换的记号
    SkippedTokens {
        /// 场名称
        field: String,
        /// 跳过数量
        count: usize,
    },
    /// 未找到 nonuniform 声明，使用 uniform 值广播
    UniformFallback {
        /// 场名称
        field: String,
    },
    /// 数据列表在文件结束前未闭合
    Truncated {
        /// 场名称
        field: String,
        /// 已读取数量
        parsed: usize,
    },
    /// 期望的文件不存在
    MissingFile {
        /// 文件路径
        path: PathBuf,
    },
    /// 文件存在但无法解析
    Unreadable {
        /// 文件路径
        path: PathBuf,
        /// 原因
        reason: String,
    },
    /// 使用了解析式替代数据
    Placeholder {
        /// 场名称
        field: String,
    },
    /// 没有网格点也没有单元数量，使用固定维度格点
    LatticeFallback {
        /// 格点维度 [nx, ny, nz]
        dims: [usize; 3],
    },
    /// 坐标数量少于需要的数量
    CoordinateShortfall {
        /// 需要的数量
        needed: usize,
        /// 可用的数量
        available: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { field, declared, parsed } => {
                write!(f, "{field}: 声明 {declared} 个值，实际解析 {parsed} 个")
            }
            Self::ExcessValues { field, declared, dropped } => {
                write!(f, "{field}: 超出声明数量 {declared}，丢弃 {dropped} 个")
            }
            Self::SkippedTokens { field, count } => {
                write!(f, "{field}: 跳过 {count} 个无效记号")
            }
            Self::UniformFallback { field } => {
                write!(f, "{field}: 未找到 nonuniform 列表，使用 uniform 值")
            }
            Self::Truncated { field, parsed } => {
                write!(f, "{field}: 列表未闭合，仅读取 {parsed} 个值")
            }
            Self::MissingFile { path } => write!(f, "文件缺失: {}", path.display()),
            Self::Unreadable { path, reason } => {
                write!(f, "无法解析 {}: {reason}", path.display())
            }
            Self::Placeholder { field } => write!(f, "{field}: 使用替代数据"),
            Self::LatticeFallback { dims: [nx, ny, nz] } => {
                write!(f, "无法确定单元数量，使用 {nx}x{ny}x{nz} 固定格点")
            }
            Self::CoordinateShortfall { needed, available } => {
                write!(f, "坐标不足: 需要 {needed}，可用 {available}")
            }
        }
    }
}

/// 阶段结果
#[derive(Debug)]
pub enum Outcome<T> {
    /// 成功
    Success(T),
    /// 带警告的成功
    Warning(T, Vec<Diagnostic>),
    /// 失败
    Failure(DfError),
}

impl<T> Outcome<T> {
    /// 根据诊断列表构造：为空时为 `Success`
    pub fn with_diagnostics(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        if diagnostics.is_empty() {
            Self::Success(value)
        } else {
            Self::Warning(value, diagnostics)
        }
    }

    /// 是否无警告成功
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// 是否失败
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// 诊断信息（失败时为空）
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Warning(_, d) => d,
            _ => &[],
        }
    }

    /// 数据引用
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(v) | Self::Warning(v, _) => Some(v),
            Self::Failure(_) => None,
        }
    }

    /// 映射数据，保留诊断
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Success(v) => Outcome::Success(f(v)),
            Self::Warning(v, d) => Outcome::Warning(f(v), d),
            Self::Failure(e) => Outcome::Failure(e),
        }
    }

    /// 追加诊断，`Success` 会升级为 `Warning`
    pub fn push_diagnostic(self, diagnostic: Diagnostic) -> Self {
        match self {
            Self::Success(v) => Self::Warning(v, vec![diagnostic]),
            Self::Warning(v, mut d) => {
                d.push(diagnostic);
                Self::Warning(v, d)
            }
            failure => failure,
        }
    }

    /// 拆分为数据与诊断
    pub fn into_parts(self) -> DfResult<(T, Vec<Diagnostic>)> {
        match self {
            Self::Success(v) => Ok((v, Vec::new())),
            Self::Warning(v, d) => Ok((v, d)),
            Self::Failure(e) => Err(e),
        }
    }
}

impl<T> From<DfResult<T>> for Outcome<T> {
    fn from(result: DfResult<T>) -> Self {
        match result {
            Ok(v) => Self::Success(v),
            Err(e) => Self::Failure(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_diagnostics() {
        let ok: Outcome<i32> = Outcome::with_diagnostics(1, vec![]);
        assert!(ok.is_success());

        let warn = Outcome::with_diagnostics(
            1,
            vec![Diagnostic::Placeholder { field: "p".into() }],
        );
        assert_eq!(warn.diagnostics().len(), 1);
    }

    #[test]
    fn test_push_diagnostic_upgrades_success() {
        let outcome = Outcome::Success(vec![1.0])
            .push_diagnostic(Diagnostic::UniformFallback { field: "U".into() });
        assert!(matches!(outcome, Outcome::Warning(_, ref d) if d.len() == 1));
    }

    #[test]
    fn test_failure_into_parts() {
        let outcome: Outcome<()> = Outcome::Failure(DfError::io("x"));
        assert!(outcome.is_failure());
        assert!(outcome.value().is_none());
        assert!(outcome.into_parts().is_err());
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::LengthMismatch {
            field: "U".into(),
            declared: 10,
            parsed: 8,
        };
        let text = d.to_string();
        assert!(text.contains("10") && text.contains('8'));
    }
}
