use super::is_activation_key;
use crate::SiteConfig;
use crate::html::Element;
use tracing::debug;

const OPEN_CLASS: &str = "is-open";
const EXPANDED: &str = "aria-expanded";

/// Drives `.menu-toggle` and `#primary-navigation`.
///
/// ```
/// use scholar_panels::chrome::MenuToggle;
/// use scholar_panels::html::Element;
///
/// let menu = MenuToggle::new();
/// let mut toggle = Element::new("button").with_attr("aria-expanded", "false");
/// let mut nav = Element::new("nav");
///
/// assert!(menu.toggle(&mut toggle, &mut nav));
/// assert_eq!(toggle.attr("aria-expanded"), Some("true"));
/// assert!(nav.has_class("is-open"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuToggle {
    breakpoint: u32,
}

impl Default for MenuToggle {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuToggle {
    /// Nav links close the menu below 960 px.
    pub fn new() -> Self {
        Self { breakpoint: 960 }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            breakpoint: config.nav_breakpoint(),
        }
    }

    pub fn breakpoint(&self) -> u32 {
        self.breakpoint
    }

    pub fn is_expanded(toggle: &Element) -> bool {
        toggle.attr(EXPANDED) == Some("true")
    }

    /// Flips the toggle's expanded state and the nav's open class. Returns
    /// the new expanded state.
    pub fn toggle(&self, toggle: &mut Element, nav: &mut Element) -> bool {
        let expanded = !Self::is_expanded(toggle);
        toggle.set_attr(EXPANDED, expanded.to_string());
        nav.toggle_class(OPEN_CLASS);
        expanded
    }

    /// Enter and Space toggle the menu. Returns whether the key was handled,
    /// in which case the host should suppress the default action.
    pub fn key_down(&self, key: &str, toggle: &mut Element, nav: &mut Element) -> bool {
        if !is_activation_key(key) {
            return false;
        }
        self.toggle(toggle, nav);
        true
    }

    /// A nav link was followed. On narrow viewports this closes the menu.
    /// Returns whether the menu was closed.
    pub fn link_clicked(&self, viewport_width: u32, toggle: &mut Element, nav: &mut Element) -> bool {
        if viewport_width >= self.breakpoint {
            return false;
        }
        debug!(viewport_width, "closing navigation after link click");
        nav.remove_class(OPEN_CLASS);
        toggle.set_attr(EXPANDED, "false");
        true
    }
}
