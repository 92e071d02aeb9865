//! Locating Mermaid diagram text inside larger documents.
//!
//! Two strategies are provided:
//!
//! - [`FenceMatcher`] finds fenced ```` ```mermaid ```` code blocks. The same
//!   matcher serves Markdown files and decoded script payloads; the only
//!   difference is the [`Anchor`] rule applied to the fence markers.
//! - [`bare_diagram`] treats a whole document as one diagram when it starts
//!   with a recognized Mermaid keyword.

use std::sync::OnceLock;

use log::{debug, trace};
use regex::Regex;

use crate::diagram::DiagramKind;

/// Where fence markers are allowed to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Markers may start anywhere; horizontal whitespace is allowed around
    /// the `mermaid` tag.
    Anywhere,

    /// Both markers must start a line, optionally after leading whitespace.
    LineStart,
}

/// Finds non-overlapping fenced Mermaid blocks.
#[derive(Debug, Clone, Copy)]
pub struct FenceMatcher {
    anchor: Anchor,
}

impl FenceMatcher {
    pub fn new(anchor: Anchor) -> Self {
        Self { anchor }
    }

    fn regex(&self) -> &'static Regex {
        static ANYWHERE: OnceLock<Regex> = OnceLock::new();
        static LINE_START: OnceLock<Regex> = OnceLock::new();

        match self.anchor {
            Anchor::Anywhere => ANYWHERE.get_or_init(|| {
                Regex::new(r"(?s)```[^\S\n]*mermaid[^\S\n]*\n(.*?)\n[^\S\n]*```")
                    .expect("fence pattern is valid")
            }),
            Anchor::LineStart => LINE_START.get_or_init(|| {
                Regex::new(r"(?ms)^\s*```mermaid\n(.*?)\n^\s*```")
                    .expect("fence pattern is valid")
            }),
        }
    }

    /// Return the bodies of all fenced blocks, in source order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mermex::locate::{Anchor, FenceMatcher};
    /// let text = "intro\n```mermaid\ngraph TD\nA-->B\n```\noutro";
    /// let blocks = FenceMatcher::new(Anchor::Anywhere).find_all(text);
    /// assert_eq!(blocks, vec!["graph TD\nA-->B"]);
    /// ```
    pub fn find_all<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let blocks: Vec<&str> = self
            .regex()
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|body| body.as_str())
            .collect();

        debug!(anchor:? = self.anchor, count = blocks.len(); "Fenced blocks located");
        blocks
    }
}

/// Treat the whole text as one diagram if it opens with a Mermaid keyword.
///
/// Returns the trimmed text on success.
pub fn bare_diagram(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let kind = DiagramKind::detect(trimmed);
    trace!(kind:% = kind; "Bare syntax check");
    kind.is_known().then_some(trimmed)
}
