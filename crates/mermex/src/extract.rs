//! Turning located spans into normalized, numbered diagram blocks.

use crate::{
    diagnostic::Diagnostic,
    diagram::DiagramBlock,
    normalize::{self, Normalized},
    source::{Located, TextSource},
};

/// One diagram block together with its normalization outcome.
#[derive(Debug, Clone)]
pub struct ExtractedDiagram {
    block: DiagramBlock,
    normalized: Normalized,
}

impl ExtractedDiagram {
    pub fn block(&self) -> &DiagramBlock {
        &self.block
    }

    pub fn normalized(&self) -> &Normalized {
        &self.normalized
    }

    /// `true` when normalization rewrote the block.
    pub fn was_fixed(&self) -> bool {
        self.normalized.was_fixed()
    }
}

/// All diagrams extracted from one source file, in source order.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    diagrams: Vec<ExtractedDiagram>,
    diagnostics: Vec<Diagnostic>,
}

impl ExtractionResult {
    /// Number each located span from 1 and normalize it.
    pub fn from_located(located: Located) -> Self {
        let (spans, diagnostics) = located.into_parts();
        let diagrams = spans
            .into_iter()
            .enumerate()
            .map(|(index, span)| {
                let normalized = normalize::normalize(&span);
                ExtractedDiagram {
                    block: DiagramBlock::new(span, index + 1),
                    normalized,
                }
            })
            .collect();

        Self {
            diagrams,
            diagnostics,
        }
    }

    pub fn diagrams(&self) -> &[ExtractedDiagram] {
        &self.diagrams
    }

    /// Diagnostics raised while locating the diagrams, such as decode
    /// fallbacks. Per-diagram diagnostics live on each [`Normalized`].
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }
}

/// Locate and normalize every diagram in `raw` using `source`.
///
/// # Examples
///
/// ```
/// # use mermex::{extract::extract, source::DirectSource};
/// let result = extract(&DirectSource, "```mermaid\nclassDiagram\n\"A\" <|-- B\n```");
/// assert_eq!(result.len(), 1);
/// assert!(result.diagrams()[0].was_fixed());
/// ```
pub fn extract(source: &dyn TextSource, raw: &str) -> ExtractionResult {
    ExtractionResult::from_located(source.locate(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagram::DiagramKind, source::DirectSource};

    #[test]
    fn test_ordinals_are_one_based_and_ordered() {
        let raw = "```mermaid\ngraph TD\nA-->B\n```\n```mermaid\nsequenceDiagram\nA->>B: x\n```\n```mermaid\npie\n\"x\" : 1\n```";
        let result = extract(&DirectSource, raw);

        let summary: Vec<_> = result
            .diagrams()
            .iter()
            .map(|d| (d.block().ordinal(), d.block().kind()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, DiagramKind::Graph),
                (2, DiagramKind::Sequence),
                (3, DiagramKind::Pie),
            ]
        );
    }

    #[test]
    fn test_block_keeps_raw_content() {
        let result = extract(&DirectSource, "```mermaid\nclassDiagram\nclass \"Foo\"\n```");
        let diagram = &result.diagrams()[0];
        assert_eq!(diagram.block().content(), "classDiagram\nclass \"Foo\"");
        assert_eq!(diagram.normalized().content(), "classDiagram\nclass Foo");
    }

    #[test]
    fn test_empty_input() {
        let result = extract(&DirectSource, "");
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
    }
}
