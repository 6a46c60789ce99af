//! Markup serialization for arena documents.

use hl_dom::Document;
use hl_dom::NodeId;
use hl_dom::NodeKind;

use crate::entities::push_escaped;
use crate::tokenizer::RawTextKind;
use crate::tokenizer::is_void;
use crate::tokenizer::raw_text_kind;

/// Serializes the children of `id`.
pub fn inner_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_nodes(doc, doc.children(id), holds_verbatim_text(doc, id), &mut out);
    out
}

/// Serializes `id` itself, including its own tag when it is an element.
pub fn outer_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_nodes(doc, &[id], false, &mut out);
    out
}

fn holds_verbatim_text(doc: &Document, id: NodeId) -> bool {
    doc.tag_name(id)
        .and_then(raw_text_kind)
        .is_some_and(|kind| kind == RawTextKind::Verbatim)
}

enum Step<'a> {
    /// Node to write, and whether its text is written unescaped.
    Open(NodeId, bool),
    Close(&'a str),
}

fn push_children<'a>(doc: &'a Document, id: NodeId, stack: &mut Vec<Step<'a>>) {
    let verbatim = holds_verbatim_text(doc, id);
    stack.extend(
        doc.children(id)
            .iter()
            .rev()
            .map(|child| Step::Open(*child, verbatim)),
    );
}

fn write_nodes(doc: &Document, nodes: &[NodeId], verbatim_text: bool, out: &mut String) {
    let mut stack: Vec<Step<'_>> = nodes
        .iter()
        .rev()
        .map(|id| Step::Open(*id, verbatim_text))
        .collect();

    while let Some(step) = stack.pop() {
        let (id, verbatim_text) = match step {
            Step::Open(id, verbatim_text) => (id, verbatim_text),
            Step::Close(tag) => {
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
                continue;
            }
        };

        match doc.kind(id) {
            Some(NodeKind::Text(text)) => {
                if verbatim_text {
                    out.push_str(text);
                } else {
                    push_escaped(out, text);
                }
            }
            Some(NodeKind::Comment(data)) => {
                out.push_str("<!--");
                out.push_str(data);
                out.push_str("-->");
            }
            Some(NodeKind::Element(element)) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    push_escaped(out, value);
                    out.push('"');
                }
                out.push('>');

                if !is_void(&element.tag) {
                    stack.push(Step::Close(&element.tag));
                    push_children(doc, id, &mut stack);
                }
            }
            Some(NodeKind::Document) => push_children(doc, id, &mut stack),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::inner_html;
    use super::outer_html;
    use hl_dom::Document;
    use hl_dom::Element;

    #[test]
    fn escapes_text_and_attribute_values() {
        let mut doc = Document::new();
        let mut element = Element::new("span");
        element.set_attr("title", "\"quoted\" & more");
        let span = doc.create_element(element);
        let text = doc.create_text("1 < 2");
        assert!(doc.append_child(span, text).is_ok());

        assert_eq!(
            outer_html(&doc, span),
            "<span title=\"&quot;quoted&quot; &amp; more\">1 &lt; 2</span>"
        );
    }

    #[test]
    fn script_text_is_written_verbatim() {
        let mut doc = Document::new();
        let script = doc.create_element(Element::new("script"));
        let code = doc.create_text("if (a < b) {}");
        assert!(doc.append_child(script, code).is_ok());

        assert_eq!(inner_html(&doc, script), "if (a < b) {}");
    }

    #[test]
    fn nested_elements_close_in_order() {
        let mut doc = Document::new();
        let div = doc.create_element(Element::new("div"));
        let em = doc.create_element(Element::new("em"));
        let inner = doc.create_text("a");
        let tail = doc.create_text("b");
        assert!(doc.append_child(doc.root(), div).is_ok());
        assert!(doc.append_child(div, em).is_ok());
        assert!(doc.append_child(em, inner).is_ok());
        assert!(doc.append_child(div, tail).is_ok());

        assert_eq!(outer_html(&doc, doc.root()), "<div><em>a</em>b</div>");
    }

    #[test]
    fn deep_nesting_serializes_without_recursion() {
        let depth = 100_000;
        let mut doc = Document::new();
        let mut parent = doc.root();
        for _ in 0..depth {
            let div = doc.create_element(Element::new("div"));
            assert!(doc.append_child(parent, div).is_ok());
            parent = div;
        }

        let html = outer_html(&doc, doc.root());
        assert_eq!(html.len(), depth * "<div></div>".len());
        assert!(html.starts_with("<div><div>"));
        assert!(html.ends_with("</div></div>"));
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        let mut doc = Document::new();
        let br = doc.create_element(Element::new("br"));
        assert_eq!(outer_html(&doc, br), "<br>");
    }
}
