//! Entry markup rendering with cross-reference links.
//!
//! Entry texts carry a tiny markup subset: `<b>` and `<i>` (any case, not
//! necessarily well nested). Words quoted in bold are Clauson headwords; any
//! bold, non-italic token that exactly matches a known canonical key becomes a
//! link to that entry.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Markup tags understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    B,
    I,
}

/// Parsed markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element { tag: Tag, children: Vec<Node> },
}

/// Rendered inline content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Inline {
    Text { text: String },
    Link { word: String },
    Bold { children: Vec<Inline> },
    Italic { children: Vec<Inline> },
}

enum Token<'a> {
    Open(Tag),
    Close(Tag),
    Text(&'a str),
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</?[bi]>").expect("static tag regex"))
}

fn delimiter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\s+|[.,;!?()"']"#).expect("static delimiter regex"))
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in tag_regex().find_iter(input) {
        if m.start() > last {
            tokens.push(Token::Text(&input[last..m.start()]));
        }
        let raw = m.as_str();
        let tag = if raw[raw.len() - 2..].eq_ignore_ascii_case("b>") {
            Tag::B
        } else {
            Tag::I
        };
        tokens.push(if raw.starts_with("</") {
            Token::Close(tag)
        } else {
            Token::Open(tag)
        });
        last = m.end();
    }
    if last < input.len() {
        tokens.push(Token::Text(&input[last..]));
    }
    tokens
}

/// Parse markup into a tree.
///
/// A closing tag is honoured only when it matches the innermost open tag;
/// otherwise it is dropped. Tags still open at end of input are closed there.
pub fn parse(input: &str) -> Vec<Node> {
    let mut root = Vec::new();
    let mut stack: Vec<(Tag, Vec<Node>)> = Vec::new();

    for token in tokenize(input) {
        match token {
            Token::Open(tag) => stack.push((tag, Vec::new())),
            Token::Close(tag) => {
                if stack.last().is_some_and(|(open, _)| *open == tag) {
                    close_top(&mut stack, &mut root);
                }
            }
            Token::Text(text) => {
                let node = Node::Text(text.to_string());
                match stack.last_mut() {
                    Some((_, children)) => children.push(node),
                    None => root.push(node),
                }
            }
        }
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut root);
    }
    root
}

fn close_top(stack: &mut Vec<(Tag, Vec<Node>)>, root: &mut Vec<Node>) {
    if let Some((tag, children)) = stack.pop() {
        let node = Node::Element { tag, children };
        match stack.last_mut() {
            Some((_, parent)) => parent.push(node),
            None => root.push(node),
        }
    }
}

/// Render a markup string, linking known words in bold, non-italic text.
pub fn render(input: &str, known_words: &HashSet<String>) -> Vec<Inline> {
    render_nodes(&parse(input), known_words, false, false)
}

fn render_nodes(
    nodes: &[Node],
    known_words: &HashSet<String>,
    in_bold: bool,
    in_italic: bool,
) -> Vec<Inline> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Node::Text(text) if in_bold && !in_italic => {
                out.extend(linkify(text, known_words));
            }
            Node::Text(text) => out.push(Inline::Text { text: text.clone() }),
            Node::Element { tag, children } => {
                let bold = in_bold || *tag == Tag::B;
                let italic = in_italic || *tag == Tag::I;
                let children = render_nodes(children, known_words, bold, italic);
                out.push(match tag {
                    Tag::B => Inline::Bold { children },
                    Tag::I => Inline::Italic { children },
                });
            }
        }
    }
    out
}

/// Split on whitespace/punctuation, keeping delimiters, and link exact matches.
fn linkify(text: &str, known_words: &HashSet<String>) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in delimiter_regex().find_iter(text) {
        push_word(&mut out, &text[last..m.start()], known_words);
        push_text(&mut out, m.as_str());
        last = m.end();
    }
    push_word(&mut out, &text[last..], known_words);
    out
}

fn push_word(out: &mut Vec<Inline>, word: &str, known_words: &HashSet<String>) {
    if known_words.contains(word) {
        out.push(Inline::Link {
            word: word.to_string(),
        });
    } else {
        push_text(out, word);
    }
}

/// Append text, merging with a preceding text node.
fn push_text(out: &mut Vec<Inline>, piece: &str) {
    if piece.is_empty() {
        return;
    }
    if let Some(Inline::Text { text }) = out.last_mut() {
        text.push_str(piece);
    } else {
        out.push(Inline::Text {
            text: piece.to_string(),
        });
    }
}

/// Serialize rendered inline content to HTML.
pub fn to_html(inlines: &[Inline]) -> String {
    let mut html = String::new();
    write_html(inlines, &mut html);
    html
}

fn write_html(inlines: &[Inline], html: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text { text } => html.push_str(&escape_html(text)),
            Inline::Link { word } => {
                let href: String = url::form_urlencoded::byte_serialize(word.as_bytes()).collect();
                html.push_str(&format!(
                    r##"<a class="xref" href="#/kelime/{href}">{}</a>"##,
                    escape_html(word)
                ));
            }
            Inline::Bold { children } => {
                html.push_str("<b>");
                write_html(children, html);
                html.push_str("</b>");
            }
            Inline::Italic { children } => {
                html.push_str("<i>");
                write_html(children, html);
                html.push_str("</i>");
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
