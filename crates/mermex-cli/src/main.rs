//! Mermex CLI entry point for Markdown and raw Mermaid files.

use mermex::DirectSource;

fn main() {
    mermex_cli::main_with(&DirectSource);
}
