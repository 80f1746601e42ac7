//! Interactive page chrome.
//!
//! The behaviors that sit around the panels, expressed over the
//! [`Element`](crate::html::Element) tree so they can run without a browser:
//!
//! - [`MenuToggle`]: the collapsible navigation menu
//! - [`ClickablePanel`]: whole-panel links for paper and mentoring panels
//! - [`NameSubstitution`]: short name on narrow viewports
//! - [`Debouncer`]: delays resize handling until the viewport settles
//!
//! Event inputs are plain values (key names as the browser reports them,
//! viewport widths in CSS pixels), and outputs are either tree mutations or
//! an action for the host to carry out.
//!
//! These are hooks for a host that owns a live page tree. The `render`
//! command fills mount points in a text template and does not run them, so
//! attributes such as `tabindex` or `role` on mentoring items do not appear
//! in its output.

mod debounce;
mod menu;
mod name;
mod panel;

pub use debounce::Debouncer;
pub use menu::MenuToggle;
pub use name::NameSubstitution;
pub use panel::{
    ClickablePanel, PanelAction, PanelEvent, collect_mentoring_panels, collect_paper_panels,
};

/// Whether a key press activates a control, as Enter and Space do.
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("Enter", true)]
    #[case(" ", true)]
    #[case("Escape", false)]
    #[case("Tab", false)]
    #[case("", false)]
    fn test_activation_keys(#[case] key: &str, #[case] expected: bool) {
        assert_eq!(is_activation_key(key), expected);
    }
}
