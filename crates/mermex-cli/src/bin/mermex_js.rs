//! Mermex CLI entry point for HTML pages with embedded script payloads.

use mermex::EmbeddedSource;

fn main() {
    mermex_cli::main_with(&EmbeddedSource);
}
