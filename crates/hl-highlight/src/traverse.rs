//! Depth-first walk that hands eligible text nodes to the matcher.

use hl_core::HighlightResult;
use hl_dom::Document;
use hl_dom::NodeId;
use hl_dom::NodeKind;

use crate::config::HighlightConfig;
use crate::matcher::PhraseMatcher;
use crate::render::HIGHLIGHT_MARKER_ATTR;
use crate::render::replace_text_node;

/// Elements whose subtrees are never inspected or modified. A `title` holds
/// text only, so markup written into it would not survive serialization.
pub const IGNORED_TAGS: &[&str] = &[
    "script", "style", "noscript", "textarea", "input", "select", "head", "title",
];

pub fn is_ignored_tag(tag: &str) -> bool {
    IGNORED_TAGS
        .iter()
        .any(|ignored| ignored.eq_ignore_ascii_case(tag))
}

/// Counters for one pass, reported through `log`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassStats {
    pub visited: usize,
    pub replaced: usize,
    pub skipped_subtrees: usize,
}

/// A compiled configuration ready to walk documents.
#[derive(Debug, Clone)]
pub struct Highlighter {
    matcher: PhraseMatcher,
    style: String,
}

impl Highlighter {
    pub fn new(config: &HighlightConfig) -> HighlightResult<Self> {
        config.validate()?;
        Ok(Self {
            matcher: PhraseMatcher::new(config.phrases.as_slice())?,
            style: config.style.clone(),
        })
    }

    /// Visits `node` and everything below it once, in document order,
    /// replacing every text node that contains a phrase.
    pub fn traverse(&self, doc: &mut Document, node: NodeId) -> HighlightResult<PassStats> {
        let mut stats = PassStats::default();
        // Pending nodes, next one last. Children are pushed as a copy of the
        // child list taken when their parent is reached, because replacements
        // rewrite the live list.
        let mut pending = vec![node];
        while let Some(next) = pending.pop() {
            self.visit(doc, next, &mut pending, &mut stats)?;
        }

        log::debug!(
            target: "hl_highlight",
            "highlight pass done: visited={} replaced={} skipped_subtrees={}",
            stats.visited,
            stats.replaced,
            stats.skipped_subtrees
        );
        Ok(stats)
    }

    fn visit(
        &self,
        doc: &mut Document,
        node: NodeId,
        pending: &mut Vec<NodeId>,
        stats: &mut PassStats,
    ) -> HighlightResult<()> {
        stats.visited += 1;

        match doc.kind(node) {
            Some(NodeKind::Text(text)) => {
                if text.trim().is_empty() {
                    return Ok(());
                }

                let Some(markup) = self.matcher.find_and_mark(text, &self.style) else {
                    return Ok(());
                };

                if doc.parent(node).is_none() {
                    log::trace!(target: "hl_highlight", "text node {} is detached, leaving it", node.index());
                    return Ok(());
                }

                let replacement = replace_text_node(doc, node, &markup)?;
                stats.replaced += 1;
                log::trace!(
                    target: "hl_highlight",
                    "replaced text node {} with node {}",
                    node.index(),
                    replacement.index()
                );
                Ok(())
            }
            Some(NodeKind::Element(element)) => {
                if is_ignored_tag(&element.tag) || element.has_attr(HIGHLIGHT_MARKER_ATTR) {
                    stats.skipped_subtrees += 1;
                    log::trace!(target: "hl_highlight", "skipping <{}> subtree", element.tag);
                    return Ok(());
                }
                pending.extend(doc.children(node).iter().rev());
                Ok(())
            }
            Some(NodeKind::Document) => {
                pending.extend(doc.children(node).iter().rev());
                Ok(())
            }
            Some(NodeKind::Comment(_)) | None => Ok(()),
        }
    }
}
