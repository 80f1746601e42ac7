use crate::SiteConfig;
use crate::html::{Element, Node};
use tracing::debug;

/// Swaps the owner's full name for a short form on narrow viewports.
///
/// Text nodes containing the full name are found once, when the
/// substitution is created, and their original text is kept. Each
/// [`apply`](Self::apply) recomputes from the originals, so widening the
/// viewport again restores the full name exactly.
///
/// ```
/// use scholar_panels::chrome::NameSubstitution;
/// use scholar_panels::html::Element;
///
/// let mut root = Element::new("body").with_child(Element::new("h1").with_text("Ada King Lovelace"));
/// let names = NameSubstitution::collect(&root, "Ada King Lovelace", "Ada Lovelace", 640);
///
/// names.apply(&mut root, 400);
/// assert_eq!(root.text_content(), "Ada Lovelace");
/// names.apply(&mut root, 1024);
/// assert_eq!(root.text_content(), "Ada King Lovelace");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSubstitution {
    full: String,
    short: String,
    breakpoint: u32,
    /// Child-index path from the root to each matching text node, with the
    /// text it held when collected.
    originals: Vec<(Vec<usize>, String)>,
}

impl NameSubstitution {
    /// Walks the text under `root`, skipping `script` and `style` contents.
    pub fn collect(
        root: &Element,
        full: impl Into<String>,
        short: impl Into<String>,
        breakpoint: u32,
    ) -> Self {
        let full = full.into();
        let mut originals = Vec::new();
        if !full.is_empty() {
            collect_text(root, &full, &mut Vec::new(), &mut originals);
        }
        debug!(nodes = originals.len(), "collected name text nodes");
        Self {
            full,
            short: short.into(),
            breakpoint,
            originals,
        }
    }

    /// Uses the configured name pair, if any.
    pub fn from_config(root: &Element, config: &SiteConfig) -> Option<Self> {
        let (full, short) = config.name_variant()?;
        Some(Self::collect(root, full, short, config.name_breakpoint()))
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn uses_short(&self, viewport_width: u32) -> bool {
        viewport_width <= self.breakpoint
    }

    /// Rewrites the collected text nodes for `viewport_width`. Returns how
    /// many nodes were written; nodes that no longer exist are skipped.
    pub fn apply(&self, root: &mut Element, viewport_width: u32) -> usize {
        let short = self.uses_short(viewport_width);
        let mut written = 0;
        for (path, original) in &self.originals {
            let Some(text) = text_at(root, path) else {
                continue;
            };
            *text = if short {
                original.replace(&self.full, &self.short)
            } else {
                original.clone()
            };
            written += 1;
        }
        written
    }
}

fn collect_text(
    element: &Element,
    full: &str,
    path: &mut Vec<usize>,
    out: &mut Vec<(Vec<usize>, String)>,
) {
    if matches!(element.tag(), "script" | "style") {
        return;
    }
    for (index, child) in element.children().iter().enumerate() {
        path.push(index);
        match child {
            Node::Text(text) if text.contains(full) => out.push((path.clone(), text.clone())),
            Node::Text(_) => {}
            Node::Element(child) => collect_text(child, full, path, out),
        }
        path.pop();
    }
}

fn text_at<'a>(root: &'a mut Element, path: &[usize]) -> Option<&'a mut String> {
    let (last, parents) = path.split_last()?;
    let mut element = root;
    for index in parents {
        element = element.children_mut().get_mut(*index)?.as_element_mut()?;
    }
    match element.children_mut().get_mut(*last)? {
        Node::Text(text) => Some(text),
        Node::Element(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const FULL: &str = "Ada King Lovelace";
    const SHORT: &str = "Ada Lovelace";

    fn page() -> Element {
        Element::new("body")
            .with_child(Element::new("h1").with_text(FULL))
            .with_child(
                Element::new("p")
                    .with_text("Contact ")
                    .with_child(Element::new("strong").with_text(format!("{} (PI)", FULL))),
            )
            .with_child(Element::new("script").with_text(format!("const n = '{}';", FULL)))
            .with_child(Element::new("style").with_text(format!("/* {} */", FULL)))
            .with_child(Element::new("footer").with_text("Unrelated"))
    }

    #[test]
    fn test_collect_skips_script_and_style() {
        let names = NameSubstitution::collect(&page(), FULL, SHORT, 640);
        assert_eq!(names.len(), 2);
    }

    #[rstest]
    #[case(320, true)]
    #[case(640, true)]
    #[case(641, false)]
    #[case(1280, false)]
    fn test_breakpoint_is_inclusive(#[case] width: u32, #[case] short: bool) {
        let mut root = page();
        let names = NameSubstitution::collect(&root, FULL, SHORT, 640);
        assert_eq!(names.apply(&mut root, width), 2);

        let heading = root.find("h1").unwrap().text_content();
        assert_eq!(heading, if short { SHORT } else { FULL });
        assert!(root.find("script").unwrap().text_content().contains(FULL));
    }

    #[test]
    fn test_restores_original_text() {
        let mut root = page();
        let names = NameSubstitution::collect(&root, FULL, SHORT, 640);
        let original = root.clone();

        names.apply(&mut root, 400);
        assert_eq!(root.find("strong").unwrap().text_content(), "Ada Lovelace (PI)");

        names.apply(&mut root, 1024);
        assert_eq!(root, original);
    }

    #[test]
    fn test_vanished_nodes_are_skipped() {
        let mut root = page();
        let names = NameSubstitution::collect(&root, FULL, SHORT, 640);
        root.children_mut().truncate(1);
        assert_eq!(names.apply(&mut root, 400), 1);
    }

    #[test]
    fn test_from_config_requires_names() {
        let root = page();
        assert!(NameSubstitution::from_config(&root, &SiteConfig::new()).is_none());

        let mut config = SiteConfig::new();
        config.set_name_variant(FULL, SHORT, 500);
        let names = NameSubstitution::from_config(&root, &config).unwrap();
        assert!(names.uses_short(500));
        assert!(!names.uses_short(501));
    }

    #[test]
    fn test_no_matches() {
        let root = Element::new("body").with_text("Someone else");
        assert!(NameSubstitution::collect(&root, FULL, SHORT, 640).is_empty());
    }
}
