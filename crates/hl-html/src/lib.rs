//! HTML tokenization, tree building and serialization for arena documents.

mod entities;
mod serialize;
mod tokenizer;

use hl_core::HighlightError;
use hl_core::HighlightResult;
use hl_dom::Document;
use hl_dom::Element;
use hl_dom::NodeId;

pub use entities::decode_entities;
pub use entities::escape_html;
pub use entities::push_escaped;
pub use serialize::inner_html;
pub use serialize::outer_html;

use tokenizer::Token;
use tokenizer::is_void;
use tokenizer::tokenize;

/// Parses raw HTML into a DOM document.
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Parses a whole document; top-level nodes become children of the document root.
    pub fn parse(&self, input: &str) -> HighlightResult<Document> {
        let mut doc = Document::new();
        let roots = self.parse_fragment(&mut doc, input)?;
        let root = doc.root();
        for node in roots {
            doc.append_child(root, node)?;
        }

        log::debug!(
            target: "hl_html",
            "parsed document: {} bytes, {} nodes",
            input.len(),
            doc.node_count()
        );
        Ok(doc)
    }

    /// Builds detached nodes for `input` inside `doc` and returns the top-level ones in order.
    pub fn parse_fragment(&self, doc: &mut Document, input: &str) -> HighlightResult<Vec<NodeId>> {
        let mut builder = TreeBuilder::default();
        for token in tokenize(input) {
            builder.push(doc, token)?;
        }
        Ok(builder.roots)
    }
}

/// Replaces the children of element `id` with the nodes parsed from `html`.
pub fn set_inner_html(doc: &mut Document, id: NodeId, html: &str) -> HighlightResult<()> {
    if doc.element(id).is_none() {
        return Err(HighlightError::new(
            "dom.not_an_element",
            format!("node {} cannot take markup content", id.index()),
        ));
    }

    let nodes = HtmlParser.parse_fragment(doc, html)?;
    doc.take_children(id);
    for node in nodes {
        doc.append_child(id, node)?;
    }
    Ok(())
}

/// Stack-based tree construction. Unmatched end tags are dropped; elements
/// still open at the end of input are closed implicitly.
#[derive(Debug, Default)]
struct TreeBuilder {
    open: Vec<(String, NodeId)>,
    roots: Vec<NodeId>,
}

impl TreeBuilder {
    fn push(&mut self, doc: &mut Document, token: Token) -> HighlightResult<()> {
        match token {
            Token::Text(text) => {
                if text.is_empty() {
                    return Ok(());
                }
                let node = doc.create_text(text);
                self.attach(doc, node)
            }
            Token::Comment(data) => {
                let node = doc.create_comment(data);
                self.attach(doc, node)
            }
            Token::Start {
                name,
                attrs,
                self_closing,
            } => {
                let mut element = Element::new(&name);
                element.attrs = attrs;
                let node = doc.create_element(element);
                self.attach(doc, node)?;

                if !self_closing && !is_void(&name) {
                    self.open.push((name, node));
                }
                Ok(())
            }
            Token::End { name } => {
                if let Some(index) = self.open.iter().rposition(|(open, _)| *open == name) {
                    self.open.truncate(index);
                } else {
                    log::trace!(target: "hl_html", "dropping unmatched end tag </{name}>");
                }
                Ok(())
            }
        }
    }

    fn attach(&mut self, doc: &mut Document, node: NodeId) -> HighlightResult<()> {
        match self.open.last() {
            Some((_, parent)) => doc.append_child(*parent, node),
            None => {
                self.roots.push(node);
                Ok(())
            }
        }
    }
}
