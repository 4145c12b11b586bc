// crates/df_io/src/foam/lexer.rs

//! OpenFOAM 文本词法分析器
//!
//! 按行从 `BufRead` 读取，内存占用只与单行长度相关，
//! 适合几十万单元的场文件。
//!
//! 记号划分规则：
//! - `(` `)` `{` `}` `;` 为独立记号
//! - `//` 行注释与 `/* */` 块注释（可跨行）被跳过
//! - `"..."` 作为一个整体单词
//! - 其余以空白或上述符号分隔的字符序列为单词，如 `List<vector>`、`-1.5e-3`

use std::collections::VecDeque;
use std::io::BufRead;

use df_foundation::{DfError, DfResult};

/// 记号类型
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// 单词（关键字、数字字面量等）
    Word(String),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `;`
    Semicolon,
}

/// 带行号的记号
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// 记号类型
    pub kind: TokenKind,
    /// 所在行（从 1 开始）
    pub line: usize,
}

impl Token {
    /// 若为单词则返回其文本
    pub fn word(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word(w) => Some(w),
            _ => None,
        }
    }
}

/// 流式词法分析器
pub struct Lexer<R> {
    reader: R,
    buf: String,
    pending: VecDeque<Token>,
    line: usize,
    in_block_comment: bool,
    eof: bool,
}

impl<R: BufRead> Lexer<R> {
    /// 创建词法分析器
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            pending: VecDeque::new(),
            line: 0,
            in_block_comment: false,
            eof: false,
        }
    }

    /// 当前已读取到的行号
    pub fn line(&self) -> usize {
        self.line
    }

    /// 读取下一个记号，文件结束返回 `None`
    pub fn next_token(&mut self) -> DfResult<Option<Token>> {
        while self.pending.is_empty() && !self.eof {
            self.read_line()?;
        }
        Ok(self.pending.pop_front())
    }

    /// 跳过直到与已消费的 `{` 匹配的 `}`
    pub fn skip_block(&mut self) -> DfResult<()> {
        let mut depth = 1usize;
        while let Some(tok) = self.next_token()? {
            match tok.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(DfError::parse("<stream>", self.line, "字典块未闭合"))
    }

    fn read_line(&mut self) -> DfResult<()> {
        self.buf.clear();
        let n = self
            .reader
            .read_line(&mut self.buf)
            .map_err(|e| DfError::io_with_source(format!("读取第 {} 行失败", self.line + 1), e))?;
        if n == 0 {
            self.eof = true;
            return Ok(());
        }
        self.line += 1;
        let line = std::mem::take(&mut self.buf);
        self.tokenize(&line);
        self.buf = line;
        Ok(())
    }

    fn tokenize(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let mut i = 0;
        let mut word_start: Option<usize> = None;

        while i < bytes.len() {
            if self.in_block_comment {
                if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    self.in_block_comment = false;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }

            let c = bytes[i];
            let comment_start = c == b'/' && matches!(bytes.get(i + 1), Some(b'/') | Some(b'*'));
            let special = matches!(c, b'(' | b')' | b'{' | b'}' | b';');

            if c.is_ascii_whitespace() || special || comment_start || c == b'"' {
                if let Some(start) = word_start.take() {
                    self.push_word(&text[start..i]);
                }
            }

            if comment_start {
                if bytes[i + 1] == b'/' {
                    return;
                }
                self.in_block_comment = true;
                i += 2;
                continue;
            }

            if c == b'"' {
                let end = text[i + 1..].find('"').map(|p| i + 1 + p + 1).unwrap_or(bytes.len());
                self.push_word(text[i..end].trim_end());
                i = end;
                continue;
            }

            if special {
                let kind = match c {
                    b'(' => TokenKind::LParen,
                    b')' => TokenKind::RParen,
                    b'{' => TokenKind::LBrace,
                    b'}' => TokenKind::RBrace,
                    _ => TokenKind::Semicolon,
                };
                self.pending.push_back(Token { kind, line: self.line });
            } else if !c.is_ascii_whitespace() && word_start.is_none() {
                word_start = Some(i);
            }
            i += 1;
        }

        if let Some(start) = word_start {
            self.push_word(&text[start..]);
        }
    }

    fn push_word(&mut self, w: &str) {
        if !w.is_empty() {
            self.pending.push_back(Token {
                kind: TokenKind::Word(w.to_string()),
                line: self.line,
            });
        }
    }
}
