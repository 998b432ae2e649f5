//! Shared plumbing for the per-language pattern libraries.
//!
//! Every language module owns its own table of lexical rules. This module
//! provides what they have in common:
//! - comment stripping (C-style and hash-style), aware of string literals
//! - `RequirementSet`, which applies the claim policy and restores source order
//! - small helpers for splitting argument lists and cleaning variable names

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::InputRequirement;

lazy_static! {
    /// A bare identifier, used to pull names out of argument expressions.
    static ref IDENT: Regex = Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap();

    /// A scanf-family directive: `%%`, or `%` with optional assignment
    /// suppression, width, length modifier and a conversion or scanset.
    static ref FORMAT_DIRECTIVE: Regex = Regex::new(
        r"%%|%(\*)?\d*(?:hh|h|ll|l|L|j|z|t|q)?([diouxXeEfFgGaAcspvtqb]|\[\^?\]?[^\]]*\])"
    ).unwrap();
}

/// Comment syntax of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/* block */` and `// line` comments.
    CStyle,
    /// `# line` comments plus triple-quoted blocks.
    Hash,
}

impl CommentStyle {
    /// Remove comments from `code`, keeping line structure intact.
    pub fn strip(&self, code: &str) -> String {
        match self {
            CommentStyle::CStyle => strip_c_comments(code),
            CommentStyle::Hash => strip_hash_comments(code),
        }
    }
}

/// How a rule treats a name that an earlier match already recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// Record every match, even for a repeated name.
    Always,
    /// Skip the match when its name is already recorded.
    Unclaimed,
}

/// Ordered collection of requirements found in one analyzer run.
///
/// Rules run in precedence order, but the final list follows the position
/// of each matched construct in the source.
#[derive(Debug, Default)]
pub struct RequirementSet {
    entries: Vec<(usize, usize, InputRequirement)>,
    claimed: HashSet<String>,
}

impl RequirementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a requirement found at byte `offset`.
    ///
    /// Returns false when the claim policy discarded it.
    pub fn record(&mut self, offset: usize, claim: Claim, req: InputRequirement) -> bool {
        if let Some(name) = &req.name {
            if claim == Claim::Unclaimed && self.claimed.contains(name) {
                tracing::debug!(name = %name, "skipping already claimed input");
                return false;
            }
            self.claimed.insert(name.clone());
        }
        let seq = self.entries.len();
        self.entries.push((offset, seq, req));
        true
    }

    pub fn is_claimed(&self, name: &str) -> bool {
        self.claimed.contains(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the set, yielding requirements in source order.
    pub fn into_requirements(mut self) -> Vec<InputRequirement> {
        self.entries.sort_by_key(|(offset, seq, _)| (*offset, *seq));
        self.entries.into_iter().map(|(_, _, req)| req).collect()
    }
}

/// Split an argument list on top-level commas.
///
/// Commas nested inside parentheses, brackets, braces or string literals do
/// not split.
pub fn split_args(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut current = String::new();

    for ch in args.chars() {
        if let Some(q) = quote {
            current.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                current.push(ch);
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' | '}' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

/// Turn an address-of / indexed target (`&a[i]`, `*p`, `&x`) into a name.
pub fn target_name(expr: &str) -> String {
    let trimmed = expr.trim().trim_start_matches(['&', '*']).trim();
    let without_index = match trimmed.find('[') {
        Some(idx) => &trimmed[..idx],
        None => trimmed,
    };
    without_index.trim().to_string()
}

/// Whether `expr` mentions any identifier from `names`.
pub fn mentions_any(expr: &str, names: &HashSet<String>) -> bool {
    IDENT
        .find_iter(expr)
        .any(|m| names.contains(m.as_str()))
}

/// Conversion characters of the assigning directives in a scanf-style
/// format string, in order. `%%` and `%*d` directives are skipped and a
/// scanset (`%[a-z]`) is reported as `s`.
pub fn format_conversions(format: &str) -> Vec<char> {
    FORMAT_DIRECTIVE
        .captures_iter(format)
        .filter_map(|caps| {
            if caps.get(1).is_some() {
                return None;
            }
            let conv = caps.get(2)?.as_str();
            if conv.starts_with('[') {
                Some('s')
            } else {
                conv.chars().next()
            }
        })
        .collect()
}

/// Strip `/* */` and `//` comments outside string and char literals.
fn strip_c_comments(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    let mut out = String::with_capacity(code.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();

        match ch {
            '/' if next == Some('*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    if chars[i] == '\n' {
                        out.push('\n');
                    }
                    i += 1;
                }
                i += 2;
            }
            '/' if next == Some('/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '"' | '`' => {
                i = copy_quoted(&chars, i, ch, &mut out);
            }
            '\'' => {
                // Only treat it as a char literal when it is one; Rust
                // lifetimes and labels also start with a quote.
                let len = char_literal_len(&chars, i);
                for c in &chars[i..i + len] {
                    out.push(*c);
                }
                i += len;
            }
            _ => {
                out.push(ch);
                i += 1;
            }
        }
    }

    out
}

/// Strip `#` comments and triple-quoted blocks outside string literals.
fn strip_hash_comments(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    let mut out = String::with_capacity(code.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '"' | '\'' if chars.get(i + 1) == Some(&ch) && chars.get(i + 2) == Some(&ch) => {
                i += 3;
                while i < chars.len()
                    && !(chars[i] == ch
                        && chars.get(i + 1) == Some(&ch)
                        && chars.get(i + 2) == Some(&ch))
                {
                    if chars[i] == '\n' {
                        out.push('\n');
                    }
                    i += 1;
                }
                i += 3;
            }
            '"' | '\'' => {
                i = copy_quoted(&chars, i, ch, &mut out);
            }
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            _ => {
                out.push(ch);
                i += 1;
            }
        }
    }

    out
}

/// Copy a quoted literal starting at `start` into `out`, returning the index
/// just past its closing quote. Non-backtick literals end at a newline.
fn copy_quoted(chars: &[char], start: usize, quote: char, out: &mut String) -> usize {
    out.push(quote);
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        i += 1;
        if c == '\\' {
            if let Some(&escaped) = chars.get(i) {
                out.push(escaped);
                i += 1;
            }
            continue;
        }
        if c == quote || (c == '\n' && quote != '`') {
            break;
        }
    }
    i
}

/// Length of a char literal at `start` (`'a'`, `'\n'`), or 1 when the quote
/// does not open one.
fn char_literal_len(chars: &[char], start: usize) -> usize {
    match (chars.get(start + 1), chars.get(start + 2), chars.get(start + 3)) {
        (Some('\\'), Some(_), Some('\'')) => 4,
        (Some(c), Some('\''), _) if *c != '\\' => 3,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::InputType;

    fn req(name: &str) -> InputRequirement {
        InputRequirement::scalar(InputType::String, name, format!("Input for {}", name))
    }

    #[test]
    fn test_strip_c_comments() {
        let code = "int a; // scanf(\"%d\", &b);\n/* scanf(\"%d\", &c);\n */ int d;";
        let clean = CommentStyle::CStyle.strip(code);
        assert!(!clean.contains("&b"));
        assert!(!clean.contains("&c"));
        assert!(clean.contains("int a;"));
        assert!(clean.contains("int d;"));
        assert_eq!(clean.lines().count(), code.lines().count());
    }

    #[test]
    fn test_strip_c_comments_keeps_strings() {
        let code = r#"let url = "http://example.org"; // trailing"#;
        let clean = CommentStyle::CStyle.strip(code);
        assert_eq!(clean.trim_end(), r#"let url = "http://example.org";"#);
    }

    #[test]
    fn test_strip_c_comments_char_literals_and_lifetimes() {
        let code = "reader.ReadString('\\n') // read\nfn f<'a>(x: &'a str) {} // done";
        let clean = CommentStyle::CStyle.strip(code);
        assert!(clean.contains("ReadString('\\n')"));
        assert!(clean.contains("fn f<'a>(x: &'a str) {}"));
        assert!(!clean.contains("read\n"));
        assert!(!clean.contains("done"));
    }

    #[test]
    fn test_strip_hash_comments() {
        let code = "x = int(input())  # y = input()\n\"\"\"\nz = input()\n\"\"\"\ns = '#not a comment'";
        let clean = CommentStyle::Hash.strip(code);
        assert!(clean.contains("x = int(input())"));
        assert!(!clean.contains("y = input()"));
        assert!(!clean.contains("z = input()"));
        assert!(clean.contains("'#not a comment'"));
    }

    #[test]
    fn test_requirement_set_claims() {
        let mut set = RequirementSet::new();
        assert!(set.record(10, Claim::Always, req("x")));
        assert!(!set.record(0, Claim::Unclaimed, req("x")));
        assert!(set.record(5, Claim::Unclaimed, req("y")));
        assert!(set.record(20, Claim::Always, req("x")));
        assert!(set.is_claimed("y"));
        assert_eq!(set.len(), 3);

        let names: Vec<_> = set
            .into_requirements()
            .into_iter()
            .map(|r| r.name.unwrap())
            .collect();
        assert_eq!(names, vec!["y", "x", "x"]);
    }

    #[test]
    fn test_split_args() {
        assert_eq!(split_args("&a, &b"), vec!["&a", "&b"]);
        assert_eq!(split_args("&a[f(i, j)], b"), vec!["&a[f(i, j)]", "b"]);
        assert_eq!(split_args("\"a,b\", c"), vec!["\"a,b\"", "c"]);
        assert!(split_args("  ").is_empty());
    }

    #[test]
    fn test_format_conversions() {
        assert_eq!(format_conversions("%d %f"), vec!['d', 'f']);
        assert_eq!(format_conversions("%5d%%%lld %lf"), vec!['d', 'd', 'f']);
        assert_eq!(format_conversions("%*d %c"), vec!['c']);
        assert_eq!(format_conversions("%[^\\n]"), vec!['s']);
        assert!(format_conversions("no directives").is_empty());
    }

    #[test]
    fn test_target_name() {
        assert_eq!(target_name(" &n "), "n");
        assert_eq!(target_name("&arr[i]"), "arr");
        assert_eq!(target_name("buf"), "buf");
        assert_eq!(target_name("*p"), "p");
    }

    #[test]
    fn test_mentions_any() {
        let names: HashSet<String> = ["line".to_string()].into_iter().collect();
        assert!(mentions_any("strings.TrimSpace(line)", &names));
        assert!(!mentions_any("lines[0]", &names));
    }
}
