// crates/df_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `DfError` 枚举和 `DfResult` 类型别名，用于整个工作区的错误处理。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义核心错误，配置错误在 `df_config` 中定义
//! 2. **易用性**: 提供便捷的构造方法
//! 3. **可追溯**: 支持错误链
//!
//! # 示例
//!
//! ```
//! use df_foundation::error::{DfError, DfResult};
//!
//! fn open_case() -> DfResult<()> {
//!     Err(DfError::case_not_found("/data/pattern_9/debrisCase"))
//! }
//! assert!(open_case().is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// 统一结果类型
pub type DfResult<T> = Result<T, DfError>;

/// DebrisFlow 错误类型
#[derive(Error, Debug)]
pub enum DfError {
    // ========================================================================
    // IO 相关错误
    // ========================================================================
    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 文件不存在
    #[error("文件不存在: {path}")]
    FileNotFound {
        /// 未找到的路径
        path: PathBuf,
    },

    /// 文件解析错误（语法未找到或无法恢复）
    #[error("文件解析错误: {file} 第{line}行: {message}")]
    Parse {
        /// 文件路径
        file: PathBuf,
        /// 行号（0 表示未知）
        line: usize,
        /// 错误信息
        message: String,
    },

    // ========================================================================
    // 算例相关错误
    // ========================================================================
    /// 算例目录不存在
    #[error("算例目录不存在: {path}")]
    CaseNotFound {
        /// 算例路径
        path: PathBuf,
    },

    /// 找不到时间步目录
    #[error("算例 {case} 中找不到时间步 '{selector}'")]
    TimeStepNotFound {
        /// 算例路径
        case: PathBuf,
        /// 时间步选择器描述
        selector: String,
    },

    /// 无任何可用数据（无场、无坐标）
    #[error("算例 {case} 无可用数据: {reason}")]
    NoData {
        /// 算例标识
        case: String,
        /// 原因
        reason: String,
    },

    // ========================================================================
    // 输入与配置错误
    // ========================================================================
    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidConfig {
        /// 配置键名
        key: String,
        /// 配置值
        value: String,
        /// 无效原因说明
        reason: String,
    },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 序列化失败原因
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl DfError {
    /// 从描述创建 IO 错误
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带底层源的 IO 错误
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 文件不存在
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// 解析错误
    pub fn parse(file: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// 算例目录不存在
    pub fn case_not_found(path: impl Into<PathBuf>) -> Self {
        Self::CaseNotFound { path: path.into() }
    }

    /// 时间步不存在
    pub fn time_step_not_found(case: impl Into<PathBuf>, selector: impl Into<String>) -> Self {
        Self::TimeStepNotFound {
            case: case.into(),
            selector: selector.into(),
        }
    }

    /// 无可用数据
    pub fn no_data(case: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NoData {
            case: case.into(),
            reason: reason.into(),
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 配置值无效
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// 序列化错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// 是否为单算例模式下必须终止的错误
    ///
    /// 批处理模式下所有错误都只记录，不终止。
    pub fn is_case_fatal(&self) -> bool {
        matches!(
            self,
            Self::CaseNotFound { .. } | Self::TimeStepNotFound { .. } | Self::NoData { .. }
        )
    }
}

// ========================================================================
// 标准库错误转换
// ========================================================================

impl From<std::io::Error> for DfError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DfError::case_not_found("/data/pattern_3/debrisCase");
        assert!(err.to_string().contains("pattern_3"));
    }

    #[test]
    fn test_parse_error_location() {
        let err = DfError::parse("5/U", 21, "缺少列表开括号");
        let msg = err.to_string();
        assert!(msg.contains("5/U"));
        assert!(msg.contains("21"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: DfError = io_err.into();
        assert!(matches!(err, DfError::Io { source: Some(_), .. }));
    }

    #[test]
    fn test_case_fatal_classification() {
        assert!(DfError::no_data("pattern_1", "无场数据").is_case_fatal());
        assert!(DfError::time_step_not_found("/c", "latest").is_case_fatal());
        assert!(!DfError::io("磁盘已满").is_case_fatal());
    }
}
