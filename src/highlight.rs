//! Token-table syntax highlighting for the code surface.
//!
//! A small hand-rolled lexer per language feeding an egui `LayoutJob`.
//! Constructs it does not model (nested f-strings, regex literals) fall
//! back to plain text instead of corrupting the output.

use egui::text::{LayoutJob, TextFormat};
use egui::FontId;

use crate::theme::Palette;
use crate::types::Language;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    Keyword,
    Str,
    Number,
    Comment,
    /// An identifier immediately followed by `(`
    Call,
    Plain,
}

#[derive(Debug, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

struct LangSpec {
    keywords: &'static [&'static str],
    line_comment: &'static str,
    block_comment: Option<(&'static str, &'static str)>,
}

const PYTHON: LangSpec = LangSpec {
    keywords: &[
        "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else",
        "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
        "not", "or", "pass", "raise", "return", "try", "while", "with", "yield", "True",
        "False", "None",
    ],
    line_comment: "#",
    block_comment: None,
};

const JAVASCRIPT: LangSpec = LangSpec {
    keywords: &[
        "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
        "delete", "do", "else", "export", "extends", "finally", "for", "function", "if",
        "import", "in", "instanceof", "let", "new", "of", "return", "switch", "this", "throw",
        "try", "typeof", "var", "while", "yield", "true", "false", "null", "undefined",
    ],
    line_comment: "//",
    block_comment: Some(("/*", "*/")),
};

fn spec(language: Language) -> &'static LangSpec {
    match language {
        Language::Python => &PYTHON,
        Language::JavaScript => &JAVASCRIPT,
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Length in bytes of a string literal starting at `src` (whose first char
/// is the quote). Stops at the matching unescaped quote or end of line.
fn string_len(src: &str, quote: char) -> usize {
    let mut escaped = false;
    for (i, c) in src.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '\n' => return i,
            c if c == quote => return i + c.len_utf8(),
            _ => {}
        }
    }
    src.len()
}

fn number_len(src: &str) -> usize {
    src.char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.' && *c != '_')
        .map(|(i, _)| i)
        .unwrap_or(src.len())
}

fn ident_len(src: &str) -> usize {
    src.char_indices()
        .find(|(_, c)| !is_ident_continue(*c))
        .map(|(i, _)| i)
        .unwrap_or(src.len())
}

/// One token per scan step. Plain identifiers are consumed whole so their
/// tails can't be re-lexed as numbers or keywords.
fn scan_token(spec: &LangSpec, rest: &str) -> (TokenKind, usize) {
    let c = match rest.chars().next() {
        Some(c) => c,
        None => return (TokenKind::Plain, 0),
    };

    if rest.starts_with(spec.line_comment) {
        return (TokenKind::Comment, rest.find('\n').unwrap_or(rest.len()));
    }
    if let Some((open, close)) = spec.block_comment {
        if rest.starts_with(open) {
            let len = rest[open.len()..]
                .find(close)
                .map(|i| open.len() + i + close.len())
                .unwrap_or(rest.len());
            return (TokenKind::Comment, len);
        }
    }
    if c == '"' || c == '\'' {
        return (TokenKind::Str, string_len(rest, c));
    }
    if c.is_ascii_digit() {
        return (TokenKind::Number, number_len(rest));
    }
    if is_ident_start(c) {
        let len = ident_len(rest);
        if spec.keywords.contains(&&rest[..len]) {
            return (TokenKind::Keyword, len);
        }
        if rest[len..].starts_with('(') {
            return (TokenKind::Call, len);
        }
        return (TokenKind::Plain, len);
    }
    (TokenKind::Plain, c.len_utf8())
}

pub fn tokenize(language: Language, src: &str) -> Vec<Token<'_>> {
    let spec = spec(language);
    let mut spans: Vec<(TokenKind, usize, usize)> = Vec::new();
    let mut pos = 0;

    while pos < src.len() {
        let (kind, len) = scan_token(spec, &src[pos..]);
        let end = pos + len.max(1);
        match spans.last_mut() {
            // Merge adjacent plain runs so the layout stays compact.
            Some((TokenKind::Plain, _, last_end)) if kind == TokenKind::Plain => *last_end = end,
            _ => spans.push((kind, pos, end)),
        }
        pos = end;
    }

    spans
        .into_iter()
        .map(|(kind, start, end)| Token {
            kind,
            text: &src[start..end],
        })
        .collect()
}

/// Builds the layout for the code editor's custom layouter.
pub fn layout_job(language: Language, palette: &Palette, src: &str, font: FontId) -> LayoutJob {
    let mut job = LayoutJob::default();
    for token in tokenize(language, src) {
        let color = match token.kind {
            TokenKind::Keyword => palette.syntax.keyword,
            TokenKind::Str => palette.syntax.string,
            TokenKind::Number => palette.syntax.number,
            TokenKind::Comment => palette.syntax.comment,
            TokenKind::Call => palette.syntax.call,
            TokenKind::Plain => palette.syntax.plain,
        };
        job.append(
            token.text,
            0.0,
            TextFormat {
                font_id: font.clone(),
                color,
                ..Default::default()
            },
        );
    }
    job
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(language: Language, src: &str) -> Vec<(TokenKind, String)> {
        tokenize(language, src)
            .into_iter()
            .map(|t| (t.kind, t.text.to_string()))
            .collect()
    }

    fn reassembled(language: Language, src: &str) -> String {
        tokenize(language, src).iter().map(|t| t.text).collect()
    }

    #[test]
    fn tokens_reassemble_to_the_exact_input() {
        let samples = [
            "def foo(n):\n    return n * 2  # double\n",
            "const x = 'a\\'b' + f(1.5);\n/* block\ncomment */\nlet y_2 = x;",
            "",
            "just words and spaces",
        ];
        for src in samples {
            assert_eq!(reassembled(Language::Python, src), src);
            assert_eq!(reassembled(Language::JavaScript, src), src);
        }
    }

    #[test]
    fn python_keywords_calls_and_numbers() {
        let tokens = kinds(Language::Python, "def foo(42):");
        assert!(tokens.contains(&(TokenKind::Keyword, "def".to_string())));
        assert!(tokens.contains(&(TokenKind::Call, "foo".to_string())));
        assert!(tokens.contains(&(TokenKind::Number, "42".to_string())));
    }

    #[test]
    fn python_hash_comment_runs_to_end_of_line() {
        let tokens = kinds(Language::Python, "x = 1  # set x\ny = 2");
        assert!(tokens.contains(&(TokenKind::Comment, "# set x".to_string())));
        assert!(tokens.contains(&(TokenKind::Number, "2".to_string())));
    }

    #[test]
    fn javascript_block_comment_spans_lines() {
        let tokens = kinds(Language::JavaScript, "a /* one\ntwo */ b");
        assert!(tokens.contains(&(TokenKind::Comment, "/* one\ntwo */".to_string())));
    }

    #[test]
    fn string_with_escaped_quote_stays_one_token() {
        let tokens = kinds(Language::JavaScript, r#"s = "a\"b";"#);
        assert!(tokens.contains(&(TokenKind::Str, r#""a\"b""#.to_string())));
    }

    #[test]
    fn unterminated_string_stops_at_line_end() {
        let tokens = kinds(Language::Python, "s = 'oops\nx = 1");
        assert!(tokens.contains(&(TokenKind::Str, "'oops".to_string())));
        assert!(tokens.contains(&(TokenKind::Number, "1".to_string())));
    }

    #[test]
    fn identifier_tails_are_not_relexed_as_numbers() {
        // "x2" must stay plain, not split into "x" + number "2"
        let tokens = kinds(Language::Python, "x2 = 3");
        assert!(tokens.contains(&(TokenKind::Plain, "x2 = ".to_string())));
        assert!(tokens.contains(&(TokenKind::Number, "3".to_string())));
    }

    #[test]
    fn keyword_sets_differ_per_language() {
        assert!(kinds(Language::Python, "def x")
            .contains(&(TokenKind::Keyword, "def".to_string())));
        assert!(!kinds(Language::JavaScript, "def x")
            .contains(&(TokenKind::Keyword, "def".to_string())));
        assert!(kinds(Language::JavaScript, "const x")
            .contains(&(TokenKind::Keyword, "const".to_string())));
    }

    #[test]
    fn layout_job_covers_full_source() {
        let palette = crate::theme::palette(crate::settings::ThemeChoice::Dark);
        let src = "def foo():\n    return 'hi'  # greet\n";
        let job = layout_job(
            Language::Python,
            palette,
            src,
            FontId::monospace(13.0),
        );
        assert_eq!(job.text, src);
        assert!(job.sections.len() >= 4);
    }
}
