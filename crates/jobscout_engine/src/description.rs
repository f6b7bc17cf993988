//! Description sanitization and dual-representation rendering.
//!
//! The description ships in two forms: sanitized markup for rich display
//! and whitespace-normalized plain text for exports. Sanitization strips
//! scripting vectors wholesale; only `class` and `style` attributes
//! survive.

use ego_tree::NodeRef;
use jobscout_core::Description;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::selectors;

/// Layout-preserving rules injected ahead of the sanitized markup so lists
/// and paragraphs keep their shape when rendered out of context.
const LAYOUT_STYLE: &str = "<style>\n\
ul, ol { padding-left: 20px; margin: 8px 0; }\n\
li { margin: 4px 0; }\n\
p { margin: 8px 0; }\n\
br { display: block; margin: 5px 0; }\n\
</style>";

const STRIPPED_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "object", "embed"];
const KEPT_ATTRIBUTES: &[&str] = &["class", "style"];
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Renders both representations of the description region, or the sentinel
/// pair when no container locator matches.
pub(crate) fn extract(doc: &Html) -> Description {
    match container(doc) {
        Some(element) => Description {
            html: format!("{LAYOUT_STYLE}{}", sanitized_html(element)),
            text: rendered_text(element),
        },
        None => Description::not_found(),
    }
}

fn container(doc: &Html) -> Option<ElementRef<'_>> {
    selectors::DESCRIPTION_LOCATORS.iter().find_map(|locator| {
        let selector = Selector::parse(locator.css).ok()?;
        doc.select(&selector).next()
    })
}

fn sanitized_html(container: ElementRef) -> String {
    let mut out = String::new();
    for child in container.children() {
        render_node(child, &mut out);
    }
    out
}

fn render_node(node: NodeRef<Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => push_escaped(text, out),
        Node::Element(_) => {
            if let Some(element) = ElementRef::wrap(node) {
                render_element(element, out);
            }
        }
        _ => {}
    }
}

fn render_element(element: ElementRef, out: &mut String) {
    let tag = element.value().name().to_ascii_lowercase();
    if is_stripped(&tag, &element) {
        return;
    }

    out.push('<');
    out.push_str(&tag);
    for name in KEPT_ATTRIBUTES {
        if let Some(value) = element.value().attr(name) {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            push_escaped(value, out);
            out.push('"');
        }
    }
    out.push('>');
    if VOID_TAGS.contains(&tag.as_str()) {
        return;
    }
    for child in element.children() {
        render_node(child, out);
    }
    out.push_str("</");
    out.push_str(&tag);
    out.push('>');
}

/// Scripting vectors are dropped wholesale: scripted tags and any element
/// carrying an event-handler attribute.
fn is_stripped(tag: &str, element: &ElementRef) -> bool {
    STRIPPED_TAGS.contains(&tag) || has_event_handler(element)
}

fn has_event_handler(element: &ElementRef) -> bool {
    element.value().attrs().any(|(name, _)| name.starts_with("on"))
}

fn push_escaped(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn rendered_text(container: ElementRef) -> String {
    let mut ctx = TextContext::default();
    for child in container.children() {
        ctx.visit(child);
    }
    ctx.finish()
}

/// Whitespace-normalizing text renderer: one newline at block boundaries,
/// bullet-prefixed list items.
#[derive(Default)]
struct TextContext {
    out: String,
    last: Option<char>,
}

impl TextContext {
    fn visit(&mut self, node: NodeRef<Node>) {
        match node.value() {
            Node::Text(text) => self.append_text(text),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    self.visit_element(element);
                }
            }
            _ => {}
        }
    }

    fn visit_element(&mut self, element: ElementRef) {
        let tag = element.value().name().to_ascii_lowercase();
        if is_stripped(&tag, &element) {
            return;
        }
        match tag.as_str() {
            "li" => {
                self.ensure_newline();
                self.append_raw("• ");
                self.visit_children(element);
                self.ensure_newline();
            }
            "br" => self.ensure_newline(),
            "p" | "div" | "ul" | "ol" => {
                self.ensure_newline();
                self.visit_children(element);
                self.ensure_newline();
            }
            _ => self.visit_children(element),
        }
    }

    fn visit_children(&mut self, element: ElementRef) {
        for child in element.children() {
            self.visit(child);
        }
    }

    fn append_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                if matches!(self.last, Some(' ') | Some('\n')) {
                    continue;
                }
                self.push(' ');
            } else {
                self.push(ch);
            }
        }
    }

    fn append_raw(&mut self, text: &str) {
        for ch in text.chars() {
            self.push(ch);
        }
    }

    fn ensure_newline(&mut self) {
        if self.out.is_empty() || self.last == Some('\n') {
            return;
        }
        self.push('\n');
    }

    fn push(&mut self, ch: char) {
        self.out.push(ch);
        self.last = Some(ch);
    }

    fn finish(self) -> String {
        self.out.trim().to_string()
    }
}
