// crates/df_io/src/foam/mod.rs

//! OpenFOAM ASCII 文件读取
//!
//! - [`lexer`]: 流式词法分析
//! - [`field`]: `internalField` 场与网格点列表
//! - [`boundary`]: 边界面片定义

pub mod boundary;
pub mod field;
pub mod lexer;

pub use boundary::{parse_boundary_str, read_boundary, BoundaryPatch};
pub use field::{
    parse_field_str, parse_points_str, read_field, read_points, FieldKind, FieldParser,
    FieldValues, ParseState, ParsedField,
};
pub use lexer::{Lexer, Token, TokenKind};
