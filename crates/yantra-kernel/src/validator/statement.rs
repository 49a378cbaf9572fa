//! Statement forms and their parsers.
//!
//! Every logical statement (or fragment of one) is classified into exactly one
//! [`Statement`] variant. Forms are tried in a fixed order; the first parser
//! that accepts the text wins. Declarations, assignments, prints and scans
//! consume only their own `;`-terminated prefix, and whatever follows on the
//! same logical statement is handed back as `rest` for classification as a
//! further fragment.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::symbols::VarType;

#[allow(clippy::expect_used)]
fn pattern(src: &str) -> Regex {
    Regex::new(src).expect("built-in pattern compiles")
}

const IDENT: &str = r"[A-Za-z_][A-Za-z0-9_]*";
/// Declared names: identifiers, plus the one reserved word that is not an
/// identifier, so it is reported as reserved rather than unparseable.
const DECL_NAME: &str = r"[A-Za-z_][A-Za-z0-9_]*|MALLI-MALLI";

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    pattern(&format!(
        r"^PADAM\s+({DECL_NAME})\s*:\s*(ANKHE|VARTTAI)\b\s*(?:=\s*([^;\n]*?))?\s*;"
    ))
});
static DECLARATION_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    pattern(&format!(
        r"^PADAM\s+(?:{DECL_NAME})\s*:\s*(?:ANKHE|VARTTAI)(?:\s*=\s*[^;]+)?$"
    ))
});
static ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| pattern(&format!(r"^({IDENT})\s*=\s*([^;]+?)\s*;")));
static PRINT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^CHATIMPU\s*\(\s*([^\n]*?)\s*\)\s*;"));
static SCAN: LazyLock<Regex> = LazyLock::new(|| pattern(r"^CHEPPU\s*\(\s*([^\n]*?)\s*\)\s*;"));
static IF_HEADER: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?s)^ELAITHE\s*\((.+)\)\s*\[$"));
static ELSE_HEADER: LazyLock<Regex> = LazyLock::new(|| pattern(r"^ALAITHE\s*\[$"));
static ELSE_SEMICOLON: LazyLock<Regex> = LazyLock::new(|| pattern(r"^ALAITHE\s*;\s*\[$"));
static SEMICOLON_ELSE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^;\s*ALAITHE\s*\[$"));
static LOOP_HEADER: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?s)^MALLI-MALLI\s*\((.+)\)\s*\[$"));
static COMPARISON: LazyLock<Regex> =
    LazyLock::new(|| pattern(&format!(r"^({IDENT})\s*(==|!=|<=|>=|<|>)\s*(.+)$")));
static LOOP_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| pattern(&format!(r"^PADAM\s+({IDENT})\s*:\s*ANKHE\s*=\s*-?\d+$")));
static LOOP_UPDATE: LazyLock<Regex> =
    LazyLock::new(|| pattern(&format!(r"^({IDENT})\s*=\s*({IDENT})\s*\+\s*1$")));

/// `CHATIMPU` or `CHEPPU`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoKind {
    Print,
    Scan,
}

impl IoKind {
    /// Word used in diagnostics.
    pub fn context(self) -> &'static str {
        match self {
            IoKind::Print => "print",
            IoKind::Scan => "scan",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<'a> {
    /// Text starting with `]`; `rest` is whatever follows it.
    Closer { rest: &'a str },
    /// `PADAM name : TYPE (= value)? ;`
    Declaration {
        name: &'a str,
        ty: VarType,
        value: Option<&'a str>,
    },
    /// A declaration whose line ended without `;`, so the next line was
    /// absorbed into the same statement.
    UnterminatedDeclaration,
    /// `name = expr ;`
    Assignment { target: &'a str, expr: &'a str },
    /// `CHATIMPU ( arg ) ;` / `CHEPPU ( arg ) ;`
    Io { kind: IoKind, arg: &'a str },
    /// `ELAITHE ( condition ) [`
    IfHeader { condition: &'a str },
    /// `ALAITHE [`
    ElseHeader,
    /// `ALAITHE ; [`
    ElseSemicolon,
    /// `MALLI-MALLI ( header ) [`
    LoopHeader { header: &'a str },
    Unknown,
}

impl Statement<'_> {
    pub fn form_name(&self) -> &'static str {
        match self {
            Statement::Closer { .. } => "closer",
            Statement::Declaration { .. } => "declaration",
            Statement::UnterminatedDeclaration => "unterminated-declaration",
            Statement::Assignment { .. } => "assignment",
            Statement::Io {
                kind: IoKind::Print,
                ..
            } => "print",
            Statement::Io {
                kind: IoKind::Scan, ..
            } => "scan",
            Statement::IfHeader { .. } => "if-header",
            Statement::ElseHeader => "else-header",
            Statement::ElseSemicolon => "else-semicolon",
            Statement::LoopHeader { .. } => "loop-header",
            Statement::Unknown => "unknown",
        }
    }
}

/// A classified fragment plus the text left over after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified<'a> {
    pub statement: Statement<'a>,
    pub rest: &'a str,
}

impl<'a> Classified<'a> {
    fn whole(statement: Statement<'a>) -> Self {
        Self {
            statement,
            rest: "",
        }
    }
}

/// Classify a trimmed statement fragment.
pub fn classify(text: &str) -> Classified<'_> {
    if let Some(rest) = text.strip_prefix(']') {
        return Classified::whole(Statement::Closer {
            rest: rest.trim(),
        });
    }

    if let Some(caps) = DECLARATION.captures(text) {
        let whole = caps.get(0).map_or(0, |m| m.end());
        let name = caps.get(1).map_or("", |m| m.as_str());
        let ty = caps
            .get(2)
            .and_then(|m| VarType::from_keyword(m.as_str()))
            .unwrap_or(VarType::Number);
        return Classified {
            statement: Statement::Declaration {
                name,
                ty,
                value: caps.get(3).map(|m| m.as_str()),
            },
            rest: text[whole..].trim(),
        };
    }

    if let Some((first, _)) = text.split_once('\n') {
        if DECLARATION_HEAD.is_match(first) {
            return Classified::whole(Statement::UnterminatedDeclaration);
        }
    }

    if let Some(caps) = ASSIGNMENT.captures(text) {
        let whole = caps.get(0).map_or(0, |m| m.end());
        return Classified {
            statement: Statement::Assignment {
                target: caps.get(1).map_or("", |m| m.as_str()),
                expr: caps.get(2).map_or("", |m| m.as_str()),
            },
            rest: text[whole..].trim(),
        };
    }

    for (regex, kind) in [(&*PRINT, IoKind::Print), (&*SCAN, IoKind::Scan)] {
        if let Some(caps) = regex.captures(text) {
            let whole = caps.get(0).map_or(0, |m| m.end());
            return Classified {
                statement: Statement::Io {
                    kind,
                    arg: caps.get(1).map_or("", |m| m.as_str()),
                },
                rest: text[whole..].trim(),
            };
        }
    }

    if let Some(caps) = IF_HEADER.captures(text) {
        return Classified::whole(Statement::IfHeader {
            condition: caps.get(1).map_or("", |m| m.as_str()).trim(),
        });
    }

    if ELSE_HEADER.is_match(text) {
        return Classified::whole(Statement::ElseHeader);
    }
    if ELSE_SEMICOLON.is_match(text) {
        return Classified::whole(Statement::ElseSemicolon);
    }

    if let Some(caps) = LOOP_HEADER.captures(text) {
        return Classified::whole(Statement::LoopHeader {
            header: caps.get(1).map_or("", |m| m.as_str()).trim(),
        });
    }

    Classified::whole(Statement::Unknown)
}

/// What follows a `]` on the same statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterCloser<'a> {
    Nothing,
    /// `] ALAITHE [`
    Else,
    /// `] ALAITHE ; [`
    ElseSemicolon,
    /// `] ; ALAITHE [`
    SemicolonElse,
    /// Anything else, to be classified as its own fragment.
    Fragment(&'a str),
}

pub fn after_closer(rest: &str) -> AfterCloser<'_> {
    let rest = rest.trim();
    if rest.is_empty() {
        AfterCloser::Nothing
    } else if ELSE_HEADER.is_match(rest) {
        AfterCloser::Else
    } else if ELSE_SEMICOLON.is_match(rest) {
        AfterCloser::ElseSemicolon
    } else if SEMICOLON_ELSE.is_match(rest) {
        AfterCloser::SemicolonElse
    } else {
        AfterCloser::Fragment(rest)
    }
}

/// Relational operators usable in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
}

impl RelOp {
    fn parse(op: &str) -> Option<Self> {
        Some(match op {
            "==" => RelOp::Eq,
            "!=" => RelOp::Ne,
            "<=" => RelOp::Le,
            ">=" => RelOp::Ge,
            "<" => RelOp::Lt,
            ">" => RelOp::Gt,
            _ => return None,
        })
    }

    /// `< > <= >=`, which are meaningless on text.
    pub fn is_ordering(self) -> bool {
        matches!(self, RelOp::Le | RelOp::Ge | RelOp::Lt | RelOp::Gt)
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
            RelOp::Le => "<=",
            RelOp::Ge => ">=",
            RelOp::Lt => "<",
            RelOp::Gt => ">",
        })
    }
}

/// `name OP value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison<'a> {
    pub name: &'a str,
    pub op: RelOp,
    pub value: &'a str,
}

/// Parse a whitespace-normalized comparison.
pub fn parse_comparison(text: &str) -> Option<Comparison<'_>> {
    let caps = COMPARISON.captures(text)?;
    Some(Comparison {
        name: caps.get(1)?.as_str(),
        op: RelOp::parse(caps.get(2)?.as_str())?,
        value: caps.get(3)?.as_str().trim(),
    })
}

/// Collapse every whitespace run (including newlines) to one space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Validate the inside of `MALLI-MALLI ( ... ) [` and return the loop variable.
///
/// The header must be exactly `PADAM v:ANKHE = INT; v OP value; v = v + 1`.
pub fn parse_loop_header(header: &str) -> Option<String> {
    let header = normalize_whitespace(header);
    if header.contains(";;") {
        return None;
    }

    let parts: Vec<&str> = header.split(';').map(str::trim).collect();
    let [decl, cond, update] = parts.as_slice() else {
        return None;
    };
    if decl.is_empty() || cond.is_empty() || update.is_empty() {
        return None;
    }

    let var = LOOP_DECLARATION.captures(decl)?.get(1)?.as_str();

    let comparison = parse_comparison(cond)?;
    if comparison.name != var {
        return None;
    }

    let caps = LOOP_UPDATE.captures(update)?;
    if caps.get(1)?.as_str() != var || caps.get(2)?.as_str() != var {
        return None;
    }

    Some(var.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(text: &str) -> Statement<'_> {
        classify(text).statement
    }

    #[test]
    fn declaration_with_and_without_value() {
        assert_eq!(
            form("PADAM a:ANKHE;"),
            Statement::Declaration {
                name: "a",
                ty: VarType::Number,
                value: None
            }
        );
        assert_eq!(
            form(r#"PADAM msg : VARTTAI = "Hello World" ;"#),
            Statement::Declaration {
                name: "msg",
                ty: VarType::Text,
                value: Some(r#""Hello World""#)
            }
        );
    }

    #[test]
    fn declaration_type_keyword_must_end() {
        assert_eq!(form("PADAM a:ANKHEE;"), Statement::Unknown);
    }

    #[test]
    fn chained_statements_leave_rest() {
        let classified = classify("PADAM a:ANKHE; a = 4; CHATIMPU(a);");
        assert_eq!(classified.rest, "a = 4; CHATIMPU(a);");
        let classified = classify(classified.rest);
        assert_eq!(
            classified.statement,
            Statement::Assignment {
                target: "a",
                expr: "4"
            }
        );
        assert_eq!(classified.rest, "CHATIMPU(a);");
    }

    #[test]
    fn unterminated_declaration_needs_absorbed_line() {
        assert_eq!(
            form("PADAM a:ANKHE\nCHATIMPU(a);"),
            Statement::UnterminatedDeclaration
        );
        assert_eq!(
            form("PADAM a:ANKHE = 3\na = 4;"),
            Statement::UnterminatedDeclaration
        );
        assert_eq!(form("PADAM a:ANKHE"), Statement::Unknown);
    }

    #[test]
    fn declaration_split_before_initializer() {
        assert_eq!(
            form("PADAM a:ANKHE\n= 3;"),
            Statement::Declaration {
                name: "a",
                ty: VarType::Number,
                value: Some("3")
            }
        );
    }

    #[test]
    fn print_and_scan() {
        assert_eq!(
            form(r#"CHATIMPU( "Sum:" );"#),
            Statement::Io {
                kind: IoKind::Print,
                arg: r#""Sum:""#
            }
        );
        assert_eq!(
            form("CHEPPU(\nx\n);"),
            Statement::Io {
                kind: IoKind::Scan,
                arg: "x"
            }
        );
    }

    #[test]
    fn headers() {
        assert_eq!(
            form("ELAITHE (a >= 3) ["),
            Statement::IfHeader { condition: "a >= 3" }
        );
        assert_eq!(form("ALAITHE ["), Statement::ElseHeader);
        assert_eq!(form("ALAITHE ; ["), Statement::ElseSemicolon);
        assert_eq!(
            form("MALLI-MALLI (PADAM i:ANKHE = 1;\ni < 3;\ni = i + 1) ["),
            Statement::LoopHeader {
                header: "PADAM i:ANKHE = 1;\ni < 3;\ni = i + 1"
            }
        );
    }

    #[test]
    fn closer_keeps_rest() {
        assert_eq!(form("] ALAITHE ["), Statement::Closer { rest: "ALAITHE [" });
        assert_eq!(after_closer("ALAITHE ["), AfterCloser::Else);
        assert_eq!(after_closer("ALAITHE;["), AfterCloser::ElseSemicolon);
        assert_eq!(after_closer("; ALAITHE ["), AfterCloser::SemicolonElse);
        assert_eq!(after_closer(""), AfterCloser::Nothing);
        assert_eq!(
            after_closer("CHATIMPU(x);"),
            AfterCloser::Fragment("CHATIMPU(x);")
        );
    }

    #[test]
    fn comparison_operators() {
        let cmp = parse_comparison("name != \"bob\"").expect("parses");
        assert_eq!(cmp.name, "name");
        assert_eq!(cmp.op, RelOp::Ne);
        assert_eq!(cmp.value, "\"bob\"");
        assert_eq!(parse_comparison("i<=10").map(|c| c.op), Some(RelOp::Le));
        assert_eq!(parse_comparison("i>10").map(|c| c.op), Some(RelOp::Gt));
        assert!(parse_comparison("i = 10").is_none());
        assert!(RelOp::Lt.is_ordering());
        assert!(!RelOp::Eq.is_ordering());
    }

    #[test]
    fn loop_header_accepts_canonical_form() {
        assert_eq!(
            parse_loop_header("PADAM i:ANKHE = 1; i <= 10; i = i + 1"),
            Some("i".to_string())
        );
        assert_eq!(
            parse_loop_header("PADAM  k : ANKHE = -5;\n k != n ;\n k=k+1"),
            Some("k".to_string())
        );
    }

    #[test]
    fn loop_header_rejections() {
        for header in [
            "PADAM i:ANKHE = 1; i <= 10;",
            "PADAM i:ANKHE = 1; i <= 10; ",
            "PADAM i:ANKHE = 1;; i = i + 1",
            "PADAM i:ANKHE = 1; i <= 10",
            "PADAM i:ANKHE = 1; i <= 10; i = i + 1; x",
            "PADAM i:VARTTAI = 1; i <= 10; i = i + 1",
            "PADAM i:ANKHE = a; i <= 10; i = i + 1",
            "PADAM i:ANKHE = 1; j <= 10; i = i + 1",
            "PADAM i:ANKHE = 1; i <= 10; j = j + 1",
            "PADAM i:ANKHE = 1; i <= 10; i = j + 1",
            "PADAM i:ANKHE = 1; i <= 10; i = i - 1",
            "PADAM i:ANKHE = 1; i <= 10; i = i + 2",
        ] {
            assert_eq!(parse_loop_header(header), None, "{header}");
        }
    }
}
