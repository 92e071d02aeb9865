//! Syntactic clean-up of extracted diagrams.
//!
//! Mermaid rejects double-quoted class names in class diagrams, yet generated
//! documentation frequently contains them. [`normalize`] strips those quotes
//! line by line and reports every line it touched. Other diagram kinds pass
//! through unchanged.

use std::{borrow::Cow, sync::OnceLock};

use log::debug;
use regex::Regex;

use crate::{diagnostic::Diagnostic, diagram::DiagramKind};

/// Outcome of normalizing one diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    content: String,
    diagnostics: Vec<Diagnostic>,
}

impl Normalized {
    /// `true` when the diagram needed no fixes.
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// `true` when at least one line was rewritten.
    pub fn was_fixed(&self) -> bool {
        !self.is_valid()
    }

    /// The corrected diagram text, or the original when nothing changed.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Which rule matched a class diagram line.
#[derive(Debug, Clone, Copy)]
enum LineRule {
    ClassDeclaration,
    Inheritance,
    Association,
}

impl LineRule {
    fn classify(line: &str) -> Option<Self> {
        if !line.contains('"') {
            return None;
        }
        if class_keyword().is_match(line) {
            Some(LineRule::ClassDeclaration)
        } else if line.contains("<|--") {
            Some(LineRule::Inheritance)
        } else if line.contains("-->") {
            Some(LineRule::Association)
        } else {
            None
        }
    }

    fn apply(&self, line: &str) -> String {
        match self {
            LineRule::ClassDeclaration => {
                let declared = quoted_declaration().replace_all(line, "class $1");
                quoted_block_open()
                    .replace_all(&declared, "$1 {")
                    .into_owned()
            }
            LineRule::Inheritance | LineRule::Association => {
                quoted_segment().replace_all(line, "$1").into_owned()
            }
        }
    }

    fn message(&self) -> &'static str {
        match self {
            LineRule::ClassDeclaration => "removed quotes from class name",
            LineRule::Inheritance => "removed quotes from class names in inheritance",
            LineRule::Association => "removed quotes from class names in association",
        }
    }
}

fn class_keyword() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bclass\b").expect("class keyword pattern is valid"))
}

fn quoted_declaration() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\bclass\s*"([^"]+)""#).expect("class declaration pattern is valid")
    })
}

fn quoted_block_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"]+)"\s*\{"#).expect("block open pattern is valid"))
}

fn quoted_segment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("quoted segment pattern is valid"))
}

/// Normalize one diagram's raw text.
///
/// Only class diagrams have fixes defined. A result with diagnostics means
/// the returned content differs from the input; it is never a rejection.
///
/// # Examples
///
/// ```
/// # use mermex::normalize::normalize;
/// let result = normalize("classDiagram\nclass \"Foo\" { }");
/// assert!(!result.is_valid());
/// assert_eq!(result.content(), "classDiagram\nclass Foo { }");
/// assert_eq!(result.diagnostics()[0].line(), Some(2));
/// ```
pub fn normalize(content: &str) -> Normalized {
    if DiagramKind::detect(content) != DiagramKind::Class {
        return Normalized {
            content: content.to_string(),
            diagnostics: Vec::new(),
        };
    }

    let mut diagnostics = Vec::new();
    let lines: Vec<Cow<'_, str>> = content
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            let Some(rule) = LineRule::classify(line) else {
                return Cow::Borrowed(line);
            };
            let fixed = rule.apply(line);
            if fixed == line {
                return Cow::Borrowed(line);
            }
            diagnostics.push(Diagnostic::warning(rule.message()).with_line(index + 1));
            Cow::Owned(fixed)
        })
        .collect();

    if diagnostics.is_empty() {
        return Normalized {
            content: content.to_string(),
            diagnostics,
        };
    }

    debug!(fixed_lines = diagnostics.len(); "Class diagram quotes removed");
    Normalized {
        content: lines.join("\n"),
        diagnostics,
    }
}
