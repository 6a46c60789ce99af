//! Highlight markup construction and in-place text node replacement.

use hl_core::HighlightError;
use hl_core::HighlightResult;
use hl_dom::Document;
use hl_dom::Element;
use hl_dom::NodeId;
use hl_html::push_escaped;
use hl_html::set_inner_html;

use crate::matcher::MatchSpan;

/// Attribute carried by every replacement container. Containers with it are
/// never descended into again, so a second pass over a document is a no-op.
pub const HIGHLIGHT_MARKER_ATTR: &str = "data-hl-highlight";

/// Escapes `text` and wraps every span in a styled `<span>`.
///
/// `spans` must be sorted, non-overlapping and on char boundaries, as
/// produced by [`crate::PhraseMatcher::find_spans`]. Escaping is applied to
/// each raw segment as it is copied, so matched text keeps its original
/// casing and nothing in `text` can open or close markup.
pub fn mark_up(text: &str, spans: &[MatchSpan], style: &str) -> String {
    let mut open_tag = String::from("<span style=\"");
    push_escaped(&mut open_tag, style);
    open_tag.push_str("\">");

    let mut out = String::with_capacity(text.len() + spans.len() * (open_tag.len() + 7));
    let mut cursor = 0_usize;
    for span in spans {
        push_escaped(&mut out, &text[cursor..span.start]);
        out.push_str(&open_tag);
        push_escaped(&mut out, &text[span.start..span.end]);
        out.push_str("</span>");
        cursor = span.end;
    }
    push_escaped(&mut out, &text[cursor..]);
    out
}

/// Builds a detached marker `span` whose content is `markup` interpreted as HTML.
pub fn build_replacement(doc: &mut Document, markup: &str) -> HighlightResult<NodeId> {
    let mut container = Element::new("span");
    container.set_attr(HIGHLIGHT_MARKER_ATTR, "");
    let node = doc.create_element(container);
    set_inner_html(doc, node, markup)?;
    Ok(node)
}

/// Swaps `text_node` for a container holding `markup`, in the same slot.
pub fn replace_text_node(
    doc: &mut Document,
    text_node: NodeId,
    markup: &str,
) -> HighlightResult<NodeId> {
    let Some(parent) = doc.parent(text_node) else {
        return Err(HighlightError::new(
            "highlight.detached_text",
            format!("text node {} has no parent to splice into", text_node.index()),
        ));
    };

    let replacement = build_replacement(doc, markup)?;
    doc.replace_child(parent, replacement, text_node)?;
    Ok(replacement)
}
