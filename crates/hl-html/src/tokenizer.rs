//! Tolerant byte-level HTML tokenizer.

use crate::entities::decode_entities;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Start {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    End {
        name: String,
    },
    Text(String),
    Comment(String),
}

pub(crate) fn tokenize(source: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let bytes = source.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if starts_with(bytes, i, b"<!--") {
            let (data, next) = read_comment(source, i);
            out.push(Token::Comment(data));
            i = next;
            continue;
        }

        if bytes[i] == b'<' {
            if starts_with(bytes, i, b"</") {
                if let Some((tok, next)) = parse_end_tag(bytes, i) {
                    out.push(tok);
                    i = next;
                    continue;
                }
            } else if starts_with(bytes, i, b"<!") || starts_with(bytes, i, b"<?") {
                i = skip_to_gt(bytes, i.saturating_add(2));
                continue;
            } else if let Some((tok, next)) = parse_start_tag(source, i) {
                let mut raw_text_tag: Option<String> = None;
                if let Token::Start {
                    name, self_closing, ..
                } = &tok
                {
                    if !*self_closing && raw_text_kind(name).is_some() {
                        raw_text_tag = Some(name.clone());
                    }
                }

                out.push(tok);
                i = next;

                if let Some(tag_name) = raw_text_tag {
                    let (raw_text, closing_end) = read_raw_text_until_end_tag(source, i, &tag_name);
                    if !raw_text.is_empty() {
                        let text = match raw_text_kind(&tag_name) {
                            Some(RawTextKind::Escapable) => decode_entities(raw_text),
                            _ => raw_text.to_owned(),
                        };
                        out.push(Token::Text(text));
                    }

                    out.push(Token::End { name: tag_name });
                    i = closing_end.unwrap_or(bytes.len());
                }

                continue;
            }
        }

        let next = text_end(bytes, i);
        out.push(Token::Text(decode_entities(&source[i..next])));
        i = next;
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawTextKind {
    /// Contents are kept byte-for-byte (`script`, `style`).
    Verbatim,
    /// Contents are text with entity references (`textarea`, `title`).
    Escapable,
}

pub(crate) fn raw_text_kind(tag: &str) -> Option<RawTextKind> {
    match tag {
        "script" | "style" => Some(RawTextKind::Verbatim),
        "textarea" | "title" => Some(RawTextKind::Escapable),
        _ => None,
    }
}

pub(crate) fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// End of the text run starting at `start`. A `<` that did not open a tag is
/// consumed as text so the scan always advances.
fn text_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start.saturating_add(1);
    while i < bytes.len() && bytes[i] != b'<' {
        i += 1;
    }
    i.min(bytes.len())
}

fn read_comment(source: &str, start: usize) -> (String, usize) {
    let body_start = start.saturating_add(4);
    match source.get(body_start..).and_then(|rest| rest.find("-->")) {
        Some(offset) => (
            source[body_start..body_start + offset].to_owned(),
            body_start + offset + 3,
        ),
        None => (
            source.get(body_start..).unwrap_or_default().to_owned(),
            source.len(),
        ),
    }
}

fn skip_to_gt(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() {
        if bytes[i] == b'>' {
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

fn read_raw_text_until_end_tag<'a>(
    source: &'a str,
    start: usize,
    tag_name: &str,
) -> (&'a str, Option<usize>) {
    let bytes = source.as_bytes();
    let tag_bytes = tag_name.as_bytes();
    let mut i = start;

    while i < bytes.len() {
        if bytes[i] != b'<' || i + 2 + tag_bytes.len() > bytes.len() || bytes[i + 1] != b'/' {
            i = i.saturating_add(1);
            continue;
        }

        let name_start = i + 2;
        let name_end = name_start + tag_bytes.len();
        if !bytes_eq_ignore_ascii_case(&bytes[name_start..name_end], tag_bytes) {
            i = i.saturating_add(1);
            continue;
        }

        let mut close = name_end;
        while close < bytes.len() && bytes[close].is_ascii_whitespace() {
            close = close.saturating_add(1);
        }

        if close < bytes.len() && bytes[close] == b'>' {
            return (&source[start..i], Some(close + 1));
        }

        i = i.saturating_add(1);
    }

    (&source[start..], None)
}

fn parse_end_tag(bytes: &[u8], start: usize) -> Option<(Token, usize)> {
    let mut i = start + 2;
    skip_spaces(bytes, &mut i);
    let begin = i;
    while i < bytes.len() && is_name_char(bytes[i]) {
        i += 1;
    }
    if i == begin {
        return None;
    }

    let name = String::from_utf8_lossy(&bytes[begin..i]).to_ascii_lowercase();
    while i < bytes.len() && bytes[i] != b'>' {
        i += 1;
    }
    if i >= bytes.len() {
        return None;
    }

    Some((Token::End { name }, i + 1))
}

fn parse_start_tag(source: &str, start: usize) -> Option<(Token, usize)> {
    let bytes = source.as_bytes();
    let mut i = start + 1;
    let begin = i;
    while i < bytes.len() && is_name_char(bytes[i]) {
        i += 1;
    }
    if i == begin || !bytes[begin].is_ascii_alphabetic() {
        return None;
    }

    let name = source[begin..i].to_ascii_lowercase();
    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;

    loop {
        skip_spaces(bytes, &mut i);
        if i >= bytes.len() {
            return None;
        }

        if bytes[i] == b'>' {
            i += 1;
            break;
        }

        // A solidus only self-closes when it is the last byte of the tag.
        if bytes[i] == b'/' {
            i += 1;
            if i < bytes.len() && bytes[i] == b'>' {
                self_closing = true;
                i += 1;
                break;
            }
            continue;
        }

        let a_start = i;
        while i < bytes.len() && is_name_char(bytes[i]) {
            i += 1;
        }
        if i == a_start {
            i = skip_to_gt(bytes, i);
            break;
        }

        let a_name = source[a_start..i].to_ascii_lowercase();
        skip_spaces(bytes, &mut i);

        let mut val = "";
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            skip_spaces(bytes, &mut i);
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let q = bytes[i];
                i += 1;
                let v_start = i;
                while i < bytes.len() && bytes[i] != q {
                    i += 1;
                }
                val = &source[v_start..i];
                if i < bytes.len() {
                    i += 1;
                }
            } else {
                let v_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                val = &source[v_start..i];
            }
        }

        // First occurrence wins, as in browsers.
        if !attrs.iter().any(|(existing, _)| *existing == a_name) {
            attrs.push((a_name, decode_entities(val)));
        }
    }

    Some((
        Token::Start {
            name,
            attrs,
            self_closing,
        },
        i,
    ))
}

fn starts_with(bytes: &[u8], i: usize, pat: &[u8]) -> bool {
    let end = i.saturating_add(pat.len());
    end <= bytes.len() && &bytes[i..end] == pat
}

fn bytes_eq_ignore_ascii_case(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right.iter())
            .all(|(lhs, rhs)| lhs.eq_ignore_ascii_case(rhs))
}

fn skip_spaces(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':')
}

#[cfg(test)]
mod tests {
    use super::Token;
    use super::tokenize;

    #[test]
    fn tokenizes_tags_attributes_and_text() {
        let tokens = tokenize(r#"<P class="a &amp; b" hidden>Hi &lt;3</p>"#);
        assert_eq!(
            tokens,
            vec![
                Token::Start {
                    name: "p".to_owned(),
                    attrs: vec![
                        ("class".to_owned(), "a & b".to_owned()),
                        ("hidden".to_owned(), String::new()),
                    ],
                    self_closing: false,
                },
                Token::Text("Hi <3".to_owned()),
                Token::End {
                    name: "p".to_owned()
                },
            ]
        );
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        let tokens = tokenize("a < b <3");
        let text: String = tokens
            .iter()
            .filter_map(|token| match token {
                Token::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(text, "a < b <3");
    }

    #[test]
    fn script_contents_are_not_tokenized() {
        let tokens = tokenize("<script>if (a < b) { x = '<p>'; }</SCRIPT>after");
        assert_eq!(
            tokens[1],
            Token::Text("if (a < b) { x = '<p>'; }".to_owned())
        );
        assert_eq!(
            tokens[2],
            Token::End {
                name: "script".to_owned()
            }
        );
        assert_eq!(tokens[3], Token::Text("after".to_owned()));
    }

    #[test]
    fn slash_inside_unquoted_value_is_part_of_the_value() {
        let tokens = tokenize("<script type=text/javascript>var error;</script>");
        assert_eq!(
            tokens,
            vec![
                Token::Start {
                    name: "script".to_owned(),
                    attrs: vec![("type".to_owned(), "text/javascript".to_owned())],
                    self_closing: false,
                },
                Token::Text("var error;".to_owned()),
                Token::End {
                    name: "script".to_owned()
                },
            ]
        );

        let tokens = tokenize("<style media=screen/print>.error{}</style>");
        assert_eq!(tokens[1], Token::Text(".error{}".to_owned()));
    }

    #[test]
    fn solidus_self_closes_only_before_gt() {
        let tokens = tokenize("<br/><img src=x / alt=y><a href=/path/>");
        assert_eq!(
            tokens,
            vec![
                Token::Start {
                    name: "br".to_owned(),
                    attrs: Vec::new(),
                    self_closing: true,
                },
                Token::Start {
                    name: "img".to_owned(),
                    attrs: vec![
                        ("src".to_owned(), "x".to_owned()),
                        ("alt".to_owned(), "y".to_owned()),
                    ],
                    self_closing: false,
                },
                Token::Start {
                    name: "a".to_owned(),
                    attrs: vec![("href".to_owned(), "/path/".to_owned())],
                    self_closing: false,
                },
            ]
        );
    }

    #[test]
    fn comments_and_doctype() {
        let tokens = tokenize("<!DOCTYPE html><!-- note -->x");
        assert_eq!(
            tokens,
            vec![
                Token::Comment(" note ".to_owned()),
                Token::Text("x".to_owned())
            ]
        );
    }

    #[test]
    fn multibyte_text_survives() {
        let tokens = tokenize("<b>誤り</b>です");
        assert_eq!(tokens[1], Token::Text("誤り".to_owned()));
        assert_eq!(tokens[3], Token::Text("です".to_owned()));
    }
}
