// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tokenizer for `.msg`/`.srv`/`.action` interface files.
//!
//! Scans character by character within each line and produces per-section
//! token lists. `---` lines separate sections; the caller checks that the
//! section count matches the interface kind.

use crate::core::error::{Result, RosError};

/// Lexical classes emitted by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `# ...` line or trailing remark
    Comment,
    /// Primitive ROS type name
    BuiltInType,
    /// Non-primitive type, optionally package-qualified
    DefinedType,
    /// The special `Header` type
    Header,
    /// `[N]` suffix, token text is `N`
    FixedSizeArray,
    /// `[]` suffix
    VariableSizeArray,
    /// Field or constant name
    Identifier,
    /// `= ...` rest of line, text is everything after `=`
    ConstantDeclaration,
}

/// One token with its source line (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
        }
    }
}

/// Tokenizes one interface file into per-section token lists.
pub struct Tokenizer<'a> {
    file: &'a str,
    source: &'a str,
}

impl<'a> Tokenizer<'a> {
    pub fn new(file: &'a str, source: &'a str) -> Self {
        Tokenizer { file, source }
    }

    /// Tokenize the whole file. Sections are split on `---` lines; the
    /// result always has at least one (possibly empty) section.
    pub fn tokenize(&self) -> Result<Vec<Vec<Token>>> {
        let mut sections = vec![Vec::new()];

        for (idx, raw_line) in self.source.lines().enumerate() {
            let line_no = idx as u32 + 1;
            let line = raw_line.trim();

            if line.is_empty() {
                continue;
            }
            if line == "---" {
                sections.push(Vec::new());
                continue;
            }
            let section = sections.last_mut().unwrap();
            if let Some(rest) = line.strip_prefix('#') {
                section.push(Token::new(TokenKind::Comment, rest.trim(), line_no));
                continue;
            }
            self.tokenize_declaration(line, line_no, section)?;
        }

        Ok(sections)
    }

    /// Tokenize one field or constant declaration line.
    fn tokenize_declaration(&self, line: &str, line_no: u32, out: &mut Vec<Token>) -> Result<()> {
        let chars: Vec<char> = line.chars().collect();
        let mut pos = 0;

        let type_word = self.read_word(&chars, &mut pos, line_no)?;
        let (type_name, array) = self.split_array_suffix(&type_word, line_no)?;

        let kind = if type_name == "Header" {
            TokenKind::Header
        } else if crate::msg::model::is_builtin_type(&type_name) {
            TokenKind::BuiltInType
        } else {
            self.check_type_name(&type_name, line_no)?;
            TokenKind::DefinedType
        };
        out.push(Token::new(kind, type_name, line_no));
        if let Some(token) = array {
            out.push(token);
        }

        skip_spaces(&chars, &mut pos);
        if pos >= chars.len() {
            return Err(RosError::syntax(
                self.file,
                line_no,
                "expected a field name after the type",
            ));
        }

        let name_word = self.read_word(&chars, &mut pos, line_no)?;
        out.push(Token::new(TokenKind::Identifier, name_word, line_no));

        skip_spaces(&chars, &mut pos);
        if pos >= chars.len() {
            return Ok(());
        }

        match chars[pos] {
            '=' => {
                pos += 1;
                let rest: String = chars[pos..].iter().collect();
                out.push(Token::new(TokenKind::ConstantDeclaration, rest, line_no));
            }
            '#' => {
                let rest: String = chars[pos + 1..].iter().collect();
                out.push(Token::new(TokenKind::Comment, rest.trim(), line_no));
            }
            other => {
                return Err(RosError::syntax(
                    self.file,
                    line_no,
                    format!("unexpected character '{other}' after field name"),
                ));
            }
        }

        Ok(())
    }

    /// Read one whitespace-delimited word, stopping before `=` and `#`.
    fn read_word(&self, chars: &[char], pos: &mut usize, line_no: u32) -> Result<String> {
        let start = *pos;
        while *pos < chars.len() {
            let c = chars[*pos];
            if c.is_whitespace() || c == '=' || c == '#' {
                break;
            }
            *pos += 1;
        }
        if *pos == start {
            return Err(RosError::syntax(self.file, line_no, "expected a word"));
        }
        Ok(chars[start..*pos].iter().collect())
    }

    /// Strip a trailing `[]` or `[N]` from a type word.
    fn split_array_suffix(&self, word: &str, line_no: u32) -> Result<(String, Option<Token>)> {
        let Some(open) = word.find('[') else {
            return Ok((word.to_string(), None));
        };
        if !word.ends_with(']') {
            return Err(RosError::syntax(
                self.file,
                line_no,
                format!("unterminated array suffix in '{word}'"),
            ));
        }
        let base = word[..open].to_string();
        let inner = &word[open + 1..word.len() - 1];
        if inner.is_empty() {
            return Ok((
                base,
                Some(Token::new(TokenKind::VariableSizeArray, "", line_no)),
            ));
        }
        if !inner.chars().all(|c| c.is_ascii_digit()) {
            return Err(RosError::syntax(
                self.file,
                line_no,
                format!("array size '{inner}' is not a number"),
            ));
        }
        Ok((
            base,
            Some(Token::new(TokenKind::FixedSizeArray, inner, line_no)),
        ))
    }

    /// A defined type is `Name` or `package/Name`, identifier characters only.
    fn check_type_name(&self, name: &str, line_no: u32) -> Result<()> {
        let mut slashes = 0;
        for c in name.chars() {
            if c == '/' {
                slashes += 1;
            } else if !c.is_ascii_alphanumeric() && c != '_' {
                return Err(RosError::syntax(
                    self.file,
                    line_no,
                    format!("invalid character '{c}' in type name '{name}'"),
                ));
            }
        }
        if slashes > 1 || name.starts_with('/') || name.ends_with('/') {
            return Err(RosError::syntax(
                self.file,
                line_no,
                format!("malformed package-qualified type '{name}'"),
            ));
        }
        Ok(())
    }
}

fn skip_spaces(chars: &[char], pos: &mut usize) {
    while *pos < chars.len() && chars[*pos].is_whitespace() {
        *pos += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(src: &str) -> Vec<Vec<Token>> {
        Tokenizer::new("test.msg", src).tokenize().unwrap()
    }

    #[test]
    fn test_plain_field() {
        let sections = tokenize("float64 x\n");
        assert_eq!(sections.len(), 1);
        let tokens = &sections[0];
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::BuiltInType);
        assert_eq!(tokens[0].text, "float64");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "x");
    }

    #[test]
    fn test_header_token() {
        let tokens = &tokenize("Header header\n")[0];
        assert_eq!(tokens[0].kind, TokenKind::Header);
    }

    #[test]
    fn test_defined_type_with_package() {
        let tokens = &tokenize("geometry_msgs/Point position\n")[0];
        assert_eq!(tokens[0].kind, TokenKind::DefinedType);
        assert_eq!(tokens[0].text, "geometry_msgs/Point");
    }

    #[test]
    fn test_variable_array() {
        let tokens = &tokenize("int32[] values\n")[0];
        assert_eq!(tokens[0].kind, TokenKind::BuiltInType);
        assert_eq!(tokens[1].kind, TokenKind::VariableSizeArray);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_fixed_array() {
        let tokens = &tokenize("float32[36] covariance\n")[0];
        assert_eq!(tokens[1].kind, TokenKind::FixedSizeArray);
        assert_eq!(tokens[1].text, "36");
    }

    #[test]
    fn test_bad_array_size() {
        let err = Tokenizer::new("t.msg", "int32[x] v\n").tokenize().unwrap_err();
        assert!(matches!(err, RosError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_constant_declaration() {
        let tokens = &tokenize("int32 MAX=42\n")[0];
        assert_eq!(tokens[2].kind, TokenKind::ConstantDeclaration);
        assert_eq!(tokens[2].text, "42");
    }

    #[test]
    fn test_string_constant_keeps_hash() {
        let tokens = &tokenize("string NOTE= keep # this\n")[0];
        assert_eq!(tokens[2].kind, TokenKind::ConstantDeclaration);
        assert_eq!(tokens[2].text, " keep # this");
    }

    #[test]
    fn test_comment_lines_and_trailing() {
        let tokens = &tokenize("# leading remark\nfloat64 x # meters\n")[0];
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, "leading remark");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Comment);
        assert_eq!(tokens.last().unwrap().text, "meters");
    }

    #[test]
    fn test_sections_split_on_separator() {
        let sections = tokenize("int32 a\n---\nint32 b\n");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0][1].text, "a");
        assert_eq!(sections[1][1].text, "b");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let sections = tokenize("\n\nint32 a\n\n");
        assert_eq!(sections[0].len(), 2);
    }

    #[test]
    fn test_missing_field_name() {
        let err = Tokenizer::new("t.msg", "int32\n").tokenize().unwrap_err();
        assert!(err.to_string().contains("field name"));
    }

    #[test]
    fn test_garbage_after_name() {
        let err = Tokenizer::new("t.msg", "int32 a b\n").tokenize().unwrap_err();
        assert!(matches!(err, RosError::Syntax { .. }));
    }

    #[test]
    fn test_bad_type_name() {
        let err = Tokenizer::new("t.msg", "pkg/sub/Type v\n").tokenize().unwrap_err();
        assert!(err.to_string().contains("pkg/sub/Type"));
    }
}
