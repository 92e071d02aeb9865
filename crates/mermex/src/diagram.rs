//! Diagram blocks and the Mermaid diagram kinds they may declare.

use std::fmt;

/// The kind of a Mermaid diagram, inferred from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Graph,
    Sequence,
    Class,
    State,
    EntityRelationship,
    Pie,
    Gantt,
    Flowchart,
    Journey,
    Unknown,
}

/// Leading keywords recognized as the start of a bare Mermaid diagram.
///
/// Matching is by prefix on the trimmed text, so `classDiagram-v2` counts
/// as a class diagram and `pie title Pets` as a pie chart.
const KEYWORDS: &[(&str, DiagramKind)] = &[
    ("graph ", DiagramKind::Graph),
    ("sequenceDiagram", DiagramKind::Sequence),
    ("classDiagram", DiagramKind::Class),
    ("stateDiagram", DiagramKind::State),
    ("erDiagram", DiagramKind::EntityRelationship),
    ("pie", DiagramKind::Pie),
    ("gantt", DiagramKind::Gantt),
    ("flowchart ", DiagramKind::Flowchart),
    ("journey", DiagramKind::Journey),
];

impl DiagramKind {
    /// Infer the kind of a diagram from its text.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mermex::DiagramKind;
    /// assert_eq!(DiagramKind::detect("  classDiagram\n  A <|-- B"), DiagramKind::Class);
    /// assert_eq!(DiagramKind::detect("graph TD\nA-->B"), DiagramKind::Graph);
    /// assert_eq!(DiagramKind::detect("graphTD"), DiagramKind::Unknown);
    /// ```
    pub fn detect(text: &str) -> Self {
        let text = text.trim();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| text.starts_with(keyword))
            .map(|(_, kind)| *kind)
            .unwrap_or(DiagramKind::Unknown)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, DiagramKind::Unknown)
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagramKind::Graph => "graph",
            DiagramKind::Sequence => "sequence",
            DiagramKind::Class => "class",
            DiagramKind::State => "state",
            DiagramKind::EntityRelationship => "entity-relationship",
            DiagramKind::Pie => "pie",
            DiagramKind::Gantt => "gantt",
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::Journey => "journey",
            DiagramKind::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// The raw text of one diagram found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    content: String,
    ordinal: usize,
    kind: DiagramKind,
}

impl DiagramBlock {
    /// Create a block from its raw text and 1-based position in the source.
    pub fn new(content: impl Into<String>, ordinal: usize) -> Self {
        let content = content.into();
        let kind = DiagramKind::detect(&content);
        Self {
            content,
            ordinal,
            kind,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// 1-based position of this block within its source file.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn kind(&self) -> DiagramKind {
        self.kind
    }
}
