use super::is_activation_key;
use crate::html::{Element, Node};

const SAME_WINDOW: &str = "_self";
const NEW_WINDOW: &str = "_blank";

/// Input events a clickable panel responds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// Primary click. `inside_link` is set when the click landed on a link
    /// nested in the panel.
    Click {
        inside_link: bool,
        meta: bool,
        ctrl: bool,
    },
    /// Key press, named as the browser reports it.
    KeyDown(String),
    /// Non-primary button click; 1 is the middle button.
    AuxClick(u16),
}

/// What the host should do in response to a [`PanelEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    /// Let the event through untouched.
    Ignore,
    /// Open `url` in `target`. The default action must be suppressed.
    Navigate {
        url: String,
        target: String,
        /// The new window must not keep a reference to its opener.
        noopener: bool,
    },
}

/// A panel whose whole surface behaves like a link.
///
/// ```
/// use scholar_panels::chrome::{ClickablePanel, PanelAction, PanelEvent};
///
/// let panel = ClickablePanel::new("https://doi.org/10.1/x", "_blank", "noopener");
/// let action = panel.handle(&PanelEvent::KeyDown("Enter".into()));
/// assert_eq!(
///     action,
///     PanelAction::Navigate {
///         url: "https://doi.org/10.1/x".into(),
///         target: "_blank".into(),
///         noopener: true,
///     }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickablePanel {
    url: String,
    target: String,
    rel: String,
}

impl ClickablePanel {
    /// An empty target means the current window.
    pub fn new(url: impl Into<String>, target: impl Into<String>, rel: impl Into<String>) -> Self {
        let target = target.into();
        Self {
            url: url.into(),
            target: if target.is_empty() {
                SAME_WINDOW.to_string()
            } else {
                target
            },
            rel: rel.into(),
        }
    }

    /// Reads `data-url`, `data-target` and `data-rel` from a paper panel.
    /// Panels without a url are not clickable.
    pub fn from_dataset(panel: &Element) -> Option<Self> {
        let url = panel.attr("data-url").filter(|url| !url.is_empty())?;
        Some(Self::new(
            url,
            panel.attr("data-target").unwrap_or(SAME_WINDOW),
            panel.attr("data-rel").unwrap_or(""),
        ))
    }

    /// Makes a mentoring list item clickable through its primary link, the
    /// first link that is not a `resource-tag`.
    ///
    /// Items whose primary link is missing, empty or `#` are left alone.
    /// Otherwise the item is marked as a clickable panel and made
    /// keyboard-focusable.
    pub fn from_mentoring_item(item: &mut Element) -> Option<Self> {
        let link = primary_link(item)?;
        let href = link.attr("href").unwrap_or("").trim();
        if href.is_empty() || href == "#" {
            return None;
        }
        let panel = Self::new(
            href,
            link.attr("target").unwrap_or(""),
            link.attr("rel").unwrap_or(""),
        );

        item.add_class("is-clickable-panel");
        item.set_attr("tabindex", "0");
        item.set_attr("role", "link");
        Some(panel)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// Decides what an event on the panel does.
    ///
    /// Clicks on nested links are left to the link. Ctrl/Meta-click and
    /// middle-click always open a new window; plain clicks, Enter and Space
    /// follow the panel's own target.
    pub fn handle(&self, event: &PanelEvent) -> PanelAction {
        match event {
            PanelEvent::Click {
                inside_link: true, ..
            } => PanelAction::Ignore,
            PanelEvent::Click { meta, ctrl, .. } if *meta || *ctrl => self.open(NEW_WINDOW),
            PanelEvent::Click { .. } => self.open(&self.target),
            PanelEvent::KeyDown(key) if is_activation_key(key) => self.open(&self.target),
            PanelEvent::AuxClick(1) => self.open(NEW_WINDOW),
            PanelEvent::KeyDown(_) | PanelEvent::AuxClick(_) => PanelAction::Ignore,
        }
    }

    fn open(&self, target: &str) -> PanelAction {
        let new_window = target != SAME_WINDOW;
        PanelAction::Navigate {
            url: self.url.clone(),
            target: target.to_string(),
            noopener: new_window && self.rel.split_whitespace().any(|r| r == "noopener"),
        }
    }
}

/// First `a` descendant without the `resource-tag` class.
fn primary_link(element: &Element) -> Option<&Element> {
    element.child_elements().find_map(|child| {
        if child.tag() == "a" && !child.has_class("resource-tag") {
            Some(child)
        } else {
            primary_link(child)
        }
    })
}

/// Every `.paper-panel[data-url]` under `root`, in document order.
pub fn collect_paper_panels(root: &Element) -> Vec<ClickablePanel> {
    let mut panels = Vec::new();
    visit(root, &mut |element| {
        if element.has_class("paper-panel") {
            if let Some(panel) = ClickablePanel::from_dataset(element) {
                panels.push(panel);
            }
        }
    });
    panels
}

fn visit<'a>(element: &'a Element, f: &mut impl FnMut(&'a Element)) {
    for child in element.child_elements() {
        f(child);
        visit(child, f);
    }
}

/// Enables every `li` under a mentoring student list, in document order.
pub fn collect_mentoring_panels(list: &mut Element) -> Vec<ClickablePanel> {
    let mut panels = Vec::new();
    for child in list.children_mut() {
        if let Node::Element(element) = child {
            if element.tag() == "li" {
                panels.extend(ClickablePanel::from_mentoring_item(element));
            } else {
                panels.extend(collect_mentoring_panels(element));
            }
        }
    }
    panels
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn navigate(url: &str, target: &str, noopener: bool) -> PanelAction {
        PanelAction::Navigate {
            url: url.to_string(),
            target: target.to_string(),
            noopener,
        }
    }

    fn click(inside_link: bool, meta: bool, ctrl: bool) -> PanelEvent {
        PanelEvent::Click {
            inside_link,
            meta,
            ctrl,
        }
    }

    #[rstest]
    #[case(click(false, false, false), navigate("/p", "_self", false))]
    #[case(click(true, false, false), PanelAction::Ignore)]
    #[case(click(true, true, false), PanelAction::Ignore)]
    #[case(click(false, true, false), navigate("/p", "_blank", true))]
    #[case(click(false, false, true), navigate("/p", "_blank", true))]
    #[case(PanelEvent::KeyDown("Enter".into()), navigate("/p", "_self", false))]
    #[case(PanelEvent::KeyDown(" ".into()), navigate("/p", "_self", false))]
    #[case(PanelEvent::KeyDown("Tab".into()), PanelAction::Ignore)]
    #[case(PanelEvent::AuxClick(1), navigate("/p", "_blank", true))]
    #[case(PanelEvent::AuxClick(2), PanelAction::Ignore)]
    fn test_events_on_same_window_panel(#[case] event: PanelEvent, #[case] expected: PanelAction) {
        let panel = ClickablePanel::new("/p", "", "noopener noreferrer");
        assert_eq!(panel.handle(&event), expected);
    }

    #[test]
    fn test_plain_click_follows_panel_target() {
        let panel = ClickablePanel::new("/p", "_blank", "");
        assert_eq!(
            panel.handle(&click(false, false, false)),
            navigate("/p", "_blank", false)
        );
    }

    #[test]
    fn test_from_dataset() {
        let element = Element::new("article")
            .with_class("paper-panel")
            .with_attr("data-url", "https://doi.org/10.1/x")
            .with_attr("data-target", "_blank")
            .with_attr("data-rel", "noopener");
        let panel = ClickablePanel::from_dataset(&element).unwrap();
        assert_eq!(panel.url(), "https://doi.org/10.1/x");
        assert_eq!(panel.target(), "_blank");
        assert_eq!(panel.rel(), "noopener");

        let defaults = ClickablePanel::from_dataset(
            &Element::new("article").with_attr("data-url", "/paper"),
        )
        .unwrap();
        assert_eq!(defaults.target(), "_self");
        assert_eq!(defaults.rel(), "");

        assert!(ClickablePanel::from_dataset(&Element::new("article").with_attr("data-url", "")).is_none());
        assert!(ClickablePanel::from_dataset(&Element::new("article")).is_none());
    }

    fn student(href: Option<&str>) -> Element {
        let tag = Element::new("a")
            .with_class("resource-tag")
            .with_attr("href", "/slides.pdf")
            .with_text("slides");
        let item = Element::new("li").with_child(tag);
        match href {
            Some(href) => item.with_child(
                Element::new("span").with_child(
                    Element::new("a")
                        .with_attr("href", href)
                        .with_attr("target", "_blank")
                        .with_text("Thesis"),
                ),
            ),
            None => item,
        }
    }

    #[test]
    fn test_mentoring_item_uses_primary_link() {
        let mut item = student(Some(" https://example.edu/thesis "));
        let panel = ClickablePanel::from_mentoring_item(&mut item).unwrap();

        assert_eq!(panel.url(), "https://example.edu/thesis");
        assert_eq!(panel.target(), "_blank");
        assert!(item.has_class("is-clickable-panel"));
        assert_eq!(item.attr("tabindex"), Some("0"));
        assert_eq!(item.attr("role"), Some("link"));
    }

    #[rstest]
    #[case(Some(""))]
    #[case(Some("   "))]
    #[case(Some("#"))]
    #[case(None)]
    fn test_mentoring_item_without_destination(#[case] href: Option<&str>) {
        let mut item = student(href);
        let before = item.clone();
        assert!(ClickablePanel::from_mentoring_item(&mut item).is_none());
        assert_eq!(item, before);
    }

    #[test]
    fn test_collect_panels() {
        let root = Element::new("main")
            .with_child(
                Element::new("section").with_child(
                    Element::new("div")
                        .with_class("paper-panel")
                        .with_attr("data-url", "/a"),
                ),
            )
            .with_child(Element::new("div").with_class("paper-panel"))
            .with_child(
                Element::new("div")
                    .with_class("other")
                    .with_attr("data-url", "/ignored"),
            );
        let urls: Vec<_> = collect_paper_panels(&root)
            .iter()
            .map(|p| p.url().to_string())
            .collect();
        assert_eq!(urls, vec!["/a"]);

        let mut list = Element::new("ul")
            .with_class("student-list")
            .with_child(student(Some("/one")))
            .with_child(student(Some("#")))
            .with_child(student(Some("/two")));
        let panels = collect_mentoring_panels(&mut list);
        assert_eq!(panels.len(), 2);
        assert_eq!(
            list.child_elements()
                .filter(|li| li.has_class("is-clickable-panel"))
                .count(),
            2
        );
    }
}
