// crates/df_io/src/foam/boundary.rs

//! `constant/polyMesh/boundary` 解析
//!
//! 只提取每个边界面片的名称、类型、面数与起始面编号，
//! 用于 `info` 命令展示算例的网格拓扑概况。

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use df_foundation::{DfError, DfResult};
use serde::Serialize;

use super::lexer::{Lexer, TokenKind};

/// 边界面片
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundaryPatch {
    /// 名称
    pub name: String,
    /// 类型（patch / wall / symmetryPlane ...）
    pub patch_type: String,
    /// 面数
    pub n_faces: usize,
    /// 起始面编号
    pub start_face: usize,
}

/// 读取 boundary 文件
pub fn read_boundary(path: &Path) -> DfResult<Vec<BoundaryPatch>> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DfError::file_not_found(path)
        } else {
            DfError::io_with_source(format!("无法打开 {}", path.display()), e)
        }
    })?;
    parse_boundary(BufReader::new(file), path)
}

/// 从文本解析 boundary
pub fn parse_boundary_str(text: &str) -> DfResult<Vec<BoundaryPatch>> {
    parse_boundary(text.as_bytes(), Path::new("<boundary>"))
}

fn parse_boundary<R: BufRead>(reader: R, source: &Path) -> DfResult<Vec<BoundaryPatch>> {
    let mut lexer = Lexer::new(reader);
    let err = |line: usize, msg: &str| DfError::parse(source, line, msg);

    // 跳过头部，定位 `N (`
    let count = loop {
        let tok = lexer
            .next_token()?
            .ok_or_else(|| err(lexer.line(), "未找到面片列表"))?;
        match tok.kind {
            TokenKind::Word(ref w) if w == "FoamFile" => {
                let open = lexer.next_token()?;
                if open.map(|t| t.kind) != Some(TokenKind::LBrace) {
                    return Err(err(tok.line, "FoamFile 之后应为 {"));
                }
                lexer.skip_block()?;
            }
            TokenKind::Word(ref w) => {
                if let Ok(n) = w.parse::<usize>() {
                    break n;
                }
            }
            _ => {}
        }
    };
    match lexer.next_token()? {
        Some(t) if t.kind == TokenKind::LParen => {}
        _ => return Err(err(lexer.line(), "面片数量之后应为 (")),
    }

    let mut patches = Vec::with_capacity(count);
    loop {
        let tok = lexer
            .next_token()?
            .ok_or_else(|| err(lexer.line(), "面片列表未闭合"))?;
        let name = match tok.kind {
            TokenKind::RParen => break,
            TokenKind::Word(w) => w,
            _ => return Err(err(tok.line, "应为面片名称")),
        };
        match lexer.next_token()? {
            Some(t) if t.kind == TokenKind::LBrace => {}
            _ => return Err(err(tok.line, "面片名称之后应为 {")),
        }

        let mut patch = BoundaryPatch {
            name,
            patch_type: String::new(),
            n_faces: 0,
            start_face: 0,
        };
        while let Some((key, value)) = next_entry(&mut lexer, source)? {
            match key.as_str() {
                "type" => patch.patch_type = value.first().cloned().unwrap_or_default(),
                "nFaces" => patch.n_faces = parse_usize(&value, source, lexer.line())?,
                "startFace" => patch.start_face = parse_usize(&value, source, lexer.line())?,
                _ => {}
            }
        }
        patches.push(patch);
    }

    Ok(patches)
}

/// 读取字典中的下一个 `key value...;` 条目，遇到 `}` 返回 `None`
fn next_entry<R: BufRead>(
    lexer: &mut Lexer<R>,
    source: &Path,
) -> DfResult<Option<(String, Vec<String>)>> {
    let key = match lexer.next_token()? {
        Some(t) => match t.kind {
            TokenKind::RBrace => return Ok(None),
            TokenKind::Word(w) => w,
            _ => return Err(DfError::parse(source, t.line, "应为字典键")),
        },
        None => return Err(DfError::parse(source, lexer.line(), "字典块未闭合")),
    };

    let mut value = Vec::new();
    let mut depth = 0usize;
    while let Some(t) = lexer.next_token()? {
        match t.kind {
            TokenKind::Semicolon if depth == 0 => return Ok(Some((key, value))),
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth = depth.saturating_sub(1),
            TokenKind::LBrace => lexer.skip_block()?,
            TokenKind::Word(w) => value.push(w),
            _ => {}
        }
    }
    Err(DfError::parse(source, lexer.line(), format!("条目 '{key}' 缺少 ;")))
}

fn parse_usize(value: &[String], source: &Path, line: usize) -> DfResult<usize> {
    value
        .first()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| DfError::parse(source, line, "应为非负整数"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = r#"FoamFile
{
    version     2.0;
    format      ascii;
    class       polyBoundaryMesh;
    location    "constant/polyMesh";
    object      boundary;
}

3
(
    inlet
    {
        type            patch;
        nFaces          900;
        startFace       128000;
    }
    ground
    {
        type            wall;
        inGroups        1(wall);
        nFaces          2250;
        startFace       128900;
    }
    atmosphere
    {
        type            patch;
        nFaces          2250;
        startFace       131150;
    }
)
"#;

    #[test]
    fn test_parse_boundary() {
        let patches = parse_boundary_str(BOUNDARY).unwrap();
        assert_eq!(patches.len(), 3);
        assert_eq!(patches[0].name, "inlet");
        assert_eq!(patches[1].patch_type, "wall");
        assert_eq!(patches[1].n_faces, 2250);
        assert_eq!(patches[2].start_face, 131150);
    }

    #[test]
    fn test_unclosed_list() {
        assert!(parse_boundary_str("1\n(\n inlet { type patch; }\n").is_err());
    }

    #[test]
    fn test_bad_face_count() {
        assert!(parse_boundary_str("1 ( inlet { nFaces many; } )").is_err());
    }
}
