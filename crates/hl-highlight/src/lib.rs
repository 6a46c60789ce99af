//! Phrase highlighting over a mutable document tree.
//!
//! A pass walks the tree from a root node, finds text nodes containing any of
//! the configured phrases (case-insensitive substring match), and replaces
//! each such node with a `span` whose content is the same text with every
//! occurrence wrapped in a styled `span`. Script, style and form-control
//! subtrees are never touched, and containers produced by an earlier pass are
//! skipped, so running a pass twice changes nothing.
//!
//! ```ignore
//! let mut doc = hl_html::HtmlParser.parse(source)?;
//! hl_highlight::highlight_document(&mut doc, &HighlightConfig::default())?;
//! ```

mod config;
mod matcher;
mod render;
mod traverse;

use hl_core::HighlightResult;
use hl_dom::Document;
use hl_dom::NodeId;

pub use config::DEFAULT_PHRASES;
pub use config::DEFAULT_STYLE;
pub use config::HighlightConfig;
pub use config::PHRASES_ENV;
pub use config::STYLE_ENV;
pub use matcher::MatchSpan;
pub use matcher::PhraseMatcher;
pub use render::HIGHLIGHT_MARKER_ATTR;
pub use render::build_replacement;
pub use render::mark_up;
pub use render::replace_text_node;
pub use traverse::Highlighter;
pub use traverse::IGNORED_TAGS;
pub use traverse::PassStats;
pub use traverse::is_ignored_tag;

/// Highlights everything under `root`.
pub fn highlight(
    doc: &mut Document,
    root: NodeId,
    config: &HighlightConfig,
) -> HighlightResult<PassStats> {
    Highlighter::new(config)?.traverse(doc, root)
}

/// Highlights the document body, or the whole document when it has no `<body>`.
///
/// Walking from the root still leaves `head` and `title` alone.
pub fn highlight_document(
    doc: &mut Document,
    config: &HighlightConfig,
) -> HighlightResult<PassStats> {
    let root = doc.body().unwrap_or_else(|| doc.root());
    highlight(doc, root, config)
}
