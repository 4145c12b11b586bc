// crates/df_io/src/foam/field.rs

//! OpenFOAM 场文件解析
//!
//! 识别以下声明：
//!
//! ```text
//! internalField   nonuniform List<vector>
//! <N>
//! (
//! (<f> <f> <f>)
//! ...
//! )
//! ;
//! ```
//!
//! 以及 `List<scalar>`（每个元素一个浮点数）。找不到 nonuniform 声明时
//! 回退到 `internalField uniform <value>;`，由下游广播到所需长度。
//!
//! 解析由显式状态机驱动：
//! `SeekHeader → ReadCount → ReadData → Done`，任何阶段都可能进入 `Failed`。
//! 网格点文件（无 `internalField`，头部之后直接是 `N ( ... )`）复用同一状态机。

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use df_foundation::{DVec3, DfError, Diagnostic, Outcome};
use tracing::debug;

use super::lexer::{Lexer, Token, TokenKind};

/// 场类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 标量场
    Scalar,
    /// 向量场
    Vector,
}

impl FieldKind {
    /// 从 `List<T>` 中的 T 识别
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "scalar" => Some(Self::Scalar),
            "vector" => Some(Self::Vector),
            _ => None,
        }
    }

    /// 类型名
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Vector => "vector",
        }
    }
}

/// 场数值
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValues {
    /// 标量序列
    Scalar(Vec<f64>),
    /// 向量序列
    Vector(Vec<DVec3>),
}

impl FieldValues {
    fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Scalar => Self::Scalar(Vec::new()),
            FieldKind::Vector => Self::Vector(Vec::new()),
        }
    }

    /// 场类型
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Scalar(_) => FieldKind::Scalar,
            Self::Vector(_) => FieldKind::Vector,
        }
    }

    /// 元素数量
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(v) => v.len(),
            Self::Vector(v) => v.len(),
        }
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 截断到 `n` 个元素
    pub fn truncate(&mut self, n: usize) {
        match self {
            Self::Scalar(v) => v.truncate(n),
            Self::Vector(v) => v.truncate(n),
        }
    }

    /// 标量视图
    pub fn as_scalar(&self) -> Option<&[f64]> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Vector(_) => None,
        }
    }

    /// 向量视图
    pub fn as_vector(&self) -> Option<&[DVec3]> {
        match self {
            Self::Vector(v) => Some(v),
            Self::Scalar(_) => None,
        }
    }
}

/// 解析后的场
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedField {
    /// 场名称（文件名）
    pub name: String,
    /// 头部声明的单元数；uniform 场为 `None`
    pub declared_count: Option<usize>,
    /// 数值
    pub values: FieldValues,
    /// 是否来自 uniform 声明（单值广播）
    pub uniform: bool,
}

impl ParsedField {
    /// 由标量序列构造
    pub fn scalar(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            declared_count: Some(values.len()),
            values: FieldValues::Scalar(values),
            uniform: false,
        }
    }

    /// 由向量序列构造
    pub fn vector(name: impl Into<String>, values: Vec<DVec3>) -> Self {
        Self {
            name: name.into(),
            declared_count: Some(values.len()),
            values: FieldValues::Vector(values),
            uniform: false,
        }
    }

    /// 场类型
    pub fn kind(&self) -> FieldKind {
        self.values.kind()
    }

    /// 实际元素数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 第 `i` 个标量值；uniform 场对任意下标返回同一值，越界返回 `None`
    pub fn scalar_at(&self, i: usize) -> Option<f64> {
        let v = self.values.as_scalar()?;
        if self.uniform {
            v.first().copied()
        } else {
            v.get(i).copied()
        }
    }

    /// 第 `i` 个向量值；uniform 场对任意下标返回同一值，越界返回 `None`
    pub fn vector_at(&self, i: usize) -> Option<DVec3> {
        let v = self.values.as_vector()?;
        if self.uniform {
            v.first().copied()
        } else {
            v.get(i).copied()
        }
    }

    /// 对下游长度的约束：uniform 场不约束
    pub fn length_constraint(&self) -> Option<usize> {
        (!self.uniform).then(|| self.len())
    }
}

/// 解析状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// 查找声明头
    SeekHeader,
    /// 读取元素数量
    ReadCount,
    /// 读取数据列表
    ReadData,
    /// 完成
    Done,
    /// 失败
    Failed,
}

/// 声明头的识别方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderMode {
    /// `internalField nonuniform List<T>` / `internalField uniform v`
    InternalField,
    /// `FoamFile {..}` 之后直接是 `N ( ... )`，元素为向量
    BareVectorList,
}

/// 场文件解析器
pub struct FieldParser<R> {
    lexer: Lexer<R>,
    source: PathBuf,
    name: String,
    mode: HeaderMode,
    state: ParseState,
    kind: FieldKind,
    declared: Option<usize>,
    values: FieldValues,
    uniform: bool,
    skipped: usize,
    truncated: bool,
}

impl<R: BufRead> FieldParser<R> {
    /// 创建 `internalField` 解析器
    pub fn new(reader: R, name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self::with_mode(reader, name.into(), source.into(), HeaderMode::InternalField)
    }

    /// 创建网格点列表解析器
    pub fn points(reader: R, source: impl Into<PathBuf>) -> Self {
        Self::with_mode(reader, "points".into(), source.into(), HeaderMode::BareVectorList)
    }

    fn with_mode(reader: R, name: String, source: PathBuf, mode: HeaderMode) -> Self {
        Self {
            lexer: Lexer::new(reader),
            source,
            name,
            mode,
            state: ParseState::SeekHeader,
            kind: FieldKind::Vector,
            declared: None,
            values: FieldValues::empty(FieldKind::Vector),
            uniform: false,
            skipped: 0,
            truncated: false,
        }
    }

    /// 执行状态机直到 `Done` 或 `Failed`
    pub fn run(mut self) -> Outcome<ParsedField> {
        loop {
            let step = match self.state {
                ParseState::SeekHeader => self.seek_header(),
                ParseState::ReadCount => self.read_count(),
                ParseState::ReadData => self.read_data(),
                ParseState::Done => return self.finish(),
                ParseState::Failed => {
                    return Outcome::Failure(self.error("解析器处于失败状态"));
                }
            };
            match step {
                Ok(next) => self.state = next,
                Err(e) => {
                    self.state = ParseState::Failed;
                    debug!("{} 解析失败: {}", self.name, e);
                    return Outcome::Failure(e);
                }
            }
        }
    }

    // ------------------------------------------------------------
    // 各状态处理
    // ------------------------------------------------------------

    fn seek_header(&mut self) -> Result<ParseState, DfError> {
        match self.mode {
            HeaderMode::InternalField => self.seek_internal_field(),
            HeaderMode::BareVectorList => self.seek_bare_list(),
        }
    }

    fn seek_internal_field(&mut self) -> Result<ParseState, DfError> {
        loop {
            let tok = self.expect_token("未找到 internalField 声明")?;
            if tok.word() != Some("internalField") {
                continue;
            }

            let form = self.expect_token("internalField 之后缺少内容")?;
            return match form.word() {
                Some("nonuniform") => {
                    let list = self.expect_token("nonuniform 之后缺少 List<T>")?;
                    let type_name = list
                        .word()
                        .and_then(|w| w.strip_prefix("List<"))
                        .and_then(|w| w.strip_suffix('>'))
                        .ok_or_else(|| self.error_at(list.line, "nonuniform 之后应为 List<T>"))?;
                    self.kind = FieldKind::from_type_name(type_name).ok_or_else(|| {
                        self.error_at(list.line, format!("不支持的列表类型 List<{type_name}>"))
                    })?;
                    self.values = FieldValues::empty(self.kind);
                    Ok(ParseState::ReadCount)
                }
                Some("uniform") => {
                    self.read_uniform()?;
                    Ok(ParseState::Done)
                }
                _ => Err(self.error_at(form.line, "internalField 之后应为 uniform 或 nonuniform")),
            };
        }
    }

    fn seek_bare_list(&mut self) -> Result<ParseState, DfError> {
        loop {
            let tok = self.expect_token("未找到点列表")?;
            match &tok.kind {
                TokenKind::Word(w) if w == "FoamFile" => {
                    let open = self.expect_token("FoamFile 之后缺少 {")?;
                    if open.kind != TokenKind::LBrace {
                        return Err(self.error_at(open.line, "FoamFile 之后应为 {"));
                    }
                    self.lexer.skip_block()?;
                }
                TokenKind::Word(w) => {
                    if let Ok(n) = w.parse::<usize>() {
                        self.kind = FieldKind::Vector;
                        self.values = FieldValues::empty(FieldKind::Vector);
                        self.declared = Some(n);
                        return self.expect_list_open();
                    }
                }
                _ => {}
            }
        }
    }

    fn read_count(&mut self) -> Result<ParseState, DfError> {
        let tok = self.expect_token("缺少元素数量")?;
        let n = tok
            .word()
            .and_then(|w| w.parse::<usize>().ok())
            .ok_or_else(|| self.error_at(tok.line, "元素数量应为非负整数"))?;
        self.declared = Some(n);
        match &mut self.values {
            FieldValues::Scalar(v) => v.reserve(n),
            FieldValues::Vector(v) => v.reserve(n),
        }
        self.expect_list_open()
    }

    fn expect_list_open(&mut self) -> Result<ParseState, DfError> {
        let tok = self.expect_token("缺少列表开括号")?;
        if tok.kind == TokenKind::LParen {
            Ok(ParseState::ReadData)
        } else {
            Err(self.error_at(tok.line, "元素数量之后应为 ("))
        }
    }

    fn read_data(&mut self) -> Result<ParseState, DfError> {
        loop {
            let Some(tok) = self.lexer.next_token()? else {
                self.truncated = true;
                return Ok(ParseState::Done);
            };
            match tok.kind {
                TokenKind::RParen => return Ok(ParseState::Done),
                TokenKind::Semicolon | TokenKind::RBrace => {
                    self.truncated = true;
                    return Ok(ParseState::Done);
                }
                TokenKind::LParen => match self.read_tuple()? {
                    Some(parts) => self.push_tuple(&parts),
                    None => {
                        self.truncated = true;
                        return Ok(ParseState::Done);
                    }
                },
                TokenKind::Word(w) => match (&mut self.values, parse_float(&w)) {
                    (FieldValues::Scalar(v), Some(x)) => v.push(x),
                    _ => self.skipped += 1,
                },
                TokenKind::LBrace => self.skipped += 1,
            }
        }
    }

    // ------------------------------------------------------------
    // 辅助
    // ------------------------------------------------------------

    /// 读取 `(` 之后直到匹配 `)` 的单词；嵌套括号视为畸形元素
    fn read_tuple(&mut self) -> Result<Option<Vec<String>>, DfError> {
        let mut parts = Vec::with_capacity(3);
        let mut depth = 1usize;
        let mut nested = false;
        while let Some(tok) = self.lexer.next_token()? {
            match tok.kind {
                TokenKind::LParen => {
                    depth += 1;
                    nested = true;
                }
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        if nested {
                            parts.clear();
                        }
                        return Ok(Some(parts));
                    }
                }
                TokenKind::Word(w) => parts.push(w),
                _ => nested = true,
            }
        }
        Ok(None)
    }

    fn push_tuple(&mut self, parts: &[String]) {
        match &mut self.values {
            FieldValues::Vector(v) => match parse_triple(parts) {
                Some(p) => v.push(p),
                None => self.skipped += 1,
            },
            FieldValues::Scalar(_) => self.skipped += 1,
        }
    }

    fn read_uniform(&mut self) -> Result<(), DfError> {
        let tok = self.expect_token("uniform 之后缺少数值")?;
        match tok.kind {
            TokenKind::LParen => {
                let parts = self
                    .read_tuple()?
                    .ok_or_else(|| self.error_at(tok.line, "uniform 向量未闭合"))?;
                let p = parse_triple(&parts)
                    .ok_or_else(|| self.error_at(tok.line, "uniform 向量应为三个浮点数"))?;
                self.kind = FieldKind::Vector;
                self.values = FieldValues::Vector(vec![p]);
            }
            TokenKind::Word(ref w) => {
                let x = parse_float(w)
                    .ok_or_else(|| self.error_at(tok.line, format!("无效的 uniform 标量 '{w}'")))?;
                self.kind = FieldKind::Scalar;
                self.values = FieldValues::Scalar(vec![x]);
            }
            _ => return Err(self.error_at(tok.line, "uniform 之后应为数值")),
        }
        self.uniform = true;
        Ok(())
    }

    fn expect_token(&mut self, message: &str) -> Result<Token, DfError> {
        self.lexer
            .next_token()?
            .ok_or_else(|| self.error(message))
    }

    fn error(&self, message: impl Into<String>) -> DfError {
        self.error_at(self.lexer.line(), message)
    }

    fn error_at(&self, line: usize, message: impl Into<String>) -> DfError {
        DfError::parse(&self.source, line, message)
    }

    fn finish(self) -> Outcome<ParsedField> {
        let mut diagnostics = Vec::new();
        let mut values = self.values;
        let name = self.name;

        if self.uniform {
            diagnostics.push(Diagnostic::UniformFallback { field: name.clone() });
        }
        if self.truncated {
            diagnostics.push(Diagnostic::Truncated {
                field: name.clone(),
                parsed: values.len(),
            });
        }
        if self.skipped > 0 {
            diagnostics.push(Diagnostic::SkippedTokens {
                field: name.clone(),
                count: self.skipped,
            });
        }
        if let Some(declared) = self.declared {
            let parsed = values.len();
            if parsed < declared {
                diagnostics.push(Diagnostic::LengthMismatch {
                    field: name.clone(),
                    declared,
                    parsed,
                });
            } else if parsed > declared {
                values.truncate(declared);
                diagnostics.push(Diagnostic::ExcessValues {
                    field: name.clone(),
                    declared,
                    dropped: parsed - declared,
                });
            }
        }

        debug!(
            "{}: {} 个{}值 (声明 {:?})",
            name,
            values.len(),
            values.kind().name(),
            self.declared
        );

        Outcome::with_diagnostics(
            ParsedField {
                name,
                declared_count: self.declared,
                values,
                uniform: self.uniform,
            },
            diagnostics,
        )
    }
}

/// 浮点字面量转换，NaN/Inf 原样通过
pub fn parse_float(token: &str) -> Option<f64> {
    token.parse::<f64>().ok()
}

fn parse_triple(parts: &[String]) -> Option<DVec3> {
    match parts {
        [x, y, z] => Some(DVec3::new(parse_float(x)?, parse_float(y)?, parse_float(z)?)),
        _ => None,
    }
}

// ============================================================
// 便捷入口
// ============================================================

/// 从文本解析场
pub fn parse_field_str(text: &str, name: &str) -> Outcome<ParsedField> {
    FieldParser::new(text.as_bytes(), name, format!("<{name}>")).run()
}

/// 从文件解析场，场名取文件名
pub fn read_field(path: &Path) -> Outcome<ParsedField> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "field".to_string());
    match File::open(path) {
        Ok(file) => FieldParser::new(BufReader::new(file), name, path).run(),
        Err(e) => Outcome::Failure(open_error(path, e)),
    }
}

/// 从文本解析网格点列表
pub fn parse_points_str(text: &str) -> Outcome<Vec<DVec3>> {
    FieldParser::points(text.as_bytes(), "<points>")
        .run()
        .map(into_points)
}

/// 从 `constant/polyMesh/points` 文件解析网格点
pub fn read_points(path: &Path) -> Outcome<Vec<DVec3>> {
    match File::open(path) {
        Ok(file) => FieldParser::points(BufReader::new(file), path)
            .run()
            .map(into_points),
        Err(e) => Outcome::Failure(open_error(path, e)),
    }
}

fn into_points(field: ParsedField) -> Vec<DVec3> {
    match field.values {
        FieldValues::Vector(v) => v,
        FieldValues::Scalar(_) => Vec::new(),
    }
}

fn open_error(path: &Path, e: std::io::Error) -> DfError {
    if e.kind() == std::io::ErrorKind::NotFound {
        DfError::file_not_found(path)
    } else {
        DfError::io_with_source(format!("无法打开 {}", path.display()), e)
    }
}
