//! Strategies that turn a file's raw content into diagram text spans.
//!
//! The pipeline is agnostic of where diagrams come from. It reads a file and
//! hands the content to a [`TextSource`], which returns the ordered spans it
//! found along with any diagnostics raised while producing them.

use log::debug;

use crate::{
    decode,
    diagnostic::Diagnostic,
    locate::{self, Anchor, FenceMatcher},
};

/// Diagram spans located in one file.
#[derive(Debug, Clone, Default)]
pub struct Located {
    spans: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Located {
    pub fn new(spans: Vec<String>, diagnostics: Vec<Diagnostic>) -> Self {
        Self { spans, diagnostics }
    }

    pub fn spans(&self) -> &[String] {
        &self.spans
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Diagnostic>) {
        (self.spans, self.diagnostics)
    }
}

/// Produces diagram text spans from raw file content.
pub trait TextSource {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Locate diagram spans in `raw`, in source order.
    fn locate(&self, raw: &str) -> Located;
}

/// Markdown or plain Mermaid files.
///
/// Fenced blocks may start anywhere. When none are present, the whole file
/// counts as one diagram if it opens with a Mermaid keyword.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectSource;

impl TextSource for DirectSource {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn locate(&self, raw: &str) -> Located {
        let fenced = FenceMatcher::new(Anchor::Anywhere).find_all(raw);
        if !fenced.is_empty() {
            return Located::new(fenced.into_iter().map(str::to_string).collect(), Vec::new());
        }

        match locate::bare_diagram(raw) {
            Some(diagram) => {
                debug!("No fenced blocks, using bare Mermaid syntax");
                Located::new(vec![diagram.to_string()], Vec::new())
            }
            None => Located::default(),
        }
    }
}

/// HTML pages carrying Markdown in a `self.__next_f.push([1, "..."])` script.
///
/// The payload is decoded first; fenced blocks must then start a line. There
/// is no bare-syntax fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl TextSource for EmbeddedSource {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn locate(&self, raw: &str) -> Located {
        let Some(payload) = decode::find_payload(raw) else {
            return Located::new(
                Vec::new(),
                vec![Diagnostic::info("no embedded script payload found")],
            );
        };

        let decoded = decode::decode_payload(payload);
        debug!(tier:? = decoded.tier(); "Embedded payload decoded");
        let (text, diagnostics) = decoded.into_parts();
        let spans = FenceMatcher::new(Anchor::LineStart)
            .find_all(&text)
            .into_iter()
            .map(str::to_string)
            .collect();

        Located::new(spans, diagnostics)
    }
}
