//! A small element tree standing in for the browser DOM.
//!
//! Panels build [`Node`]s, the page serializes them. The tree also supports
//! the few read-back operations the page behaviors need: text content,
//! attribute and class manipulation, and walking text nodes.

use std::fmt;

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Element(element) => element.write_html(out),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_html(&mut out);
        f.write_str(&out)
    }
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(n, _)| n != name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let classes = match self.attr("class") {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attr("class", classes);
    }

    pub fn remove_class(&mut self, class: &str) {
        if let Some(existing) = self.attr("class") {
            let remaining = existing
                .split_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" ");
            self.set_attr("class", remaining);
        }
    }

    /// Toggles `class`, returning whether it is now present.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Child elements, skipping text nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    /// First descendant element (depth-first, self excluded) with `tag`.
    pub fn find_mut(&mut self, tag: &str) -> Option<&mut Element> {
        for child in &mut self.children {
            if let Node::Element(element) = child {
                if element.tag == tag {
                    return Some(element);
                }
                if let Some(found) = element.find_mut(tag) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// First descendant element (depth-first, self excluded) with `tag`.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        for element in self.child_elements() {
            if element.tag == tag {
                return Some(element);
            }
            if let Some(found) = element.find(tag) {
                return Some(found);
            }
        }
        None
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// Serialize a list of sibling nodes.
pub fn render_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialize_nested() {
        let el = Element::new("div")
            .with_class("graph-bar")
            .with_attr("style", "height: 70px")
            .with_child(Element::new("span").with_text("5"));
        assert_eq!(
            el.to_html(),
            r#"<div class="graph-bar" style="height: 70px"><span>5</span></div>"#
        );
    }

    #[test]
    fn test_escaping() {
        let el = Element::new("td")
            .with_attr("title", "a \"quoted\" <b>")
            .with_text("Fish & <Chips>");
        assert_eq!(
            el.to_html(),
            r#"<td title="a &quot;quoted&quot; &lt;b&gt;">Fish &amp; &lt;Chips&gt;</td>"#
        );
    }

    #[test]
    fn test_text_content_concatenates() {
        let el = Element::new("td")
            .with_child(Element::new("a").with_text("Citations"))
            .with_text(" (all)");
        assert_eq!(el.text_content(), "Citations (all)");
    }

    #[test]
    fn test_class_manipulation() {
        let mut nav = Element::new("nav").with_class("primary");
        assert!(nav.toggle_class("is-open"));
        assert!(nav.has_class("is-open"));
        assert_eq!(nav.attr("class"), Some("primary is-open"));
        assert!(!nav.toggle_class("is-open"));
        assert_eq!(nav.attr("class"), Some("primary"));

        nav.add_class("primary");
        assert_eq!(nav.attr("class"), Some("primary"));
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut button = Element::new("button").with_attr("aria-expanded", "false");
        button.set_attr("aria-expanded", "true");
        assert_eq!(button.attr("aria-expanded"), Some("true"));
        button.remove_attr("aria-expanded");
        assert_eq!(button.attr("aria-expanded"), None);
    }

    #[test]
    fn test_find_descendant() {
        let mut table = Element::new("table")
            .with_child(Element::new("thead").with_child(Element::new("tr")))
            .with_child(Element::new("tbody"));
        assert!(table.find("tbody").is_some());
        if let Some(tbody) = table.find_mut("tbody") {
            tbody.push(Element::new("tr"));
        }
        assert_eq!(table.find("tbody").map(|t| t.children().len()), Some(1));
        assert!(table.find("tfoot").is_none());
    }
}
