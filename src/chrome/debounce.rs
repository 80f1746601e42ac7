use crate::SiteConfig;
use std::time::{Duration, Instant};

/// Holds back a value until no newer one has arrived for `delay`.
///
/// Used for resize events: every event restarts the wait, and only the
/// latest viewport width is handed out once things settle.
///
/// ```
/// use scholar_panels::chrome::Debouncer;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let mut resize = Debouncer::new(Duration::from_millis(150));
/// resize.trigger(800, start);
/// resize.trigger(600, start + Duration::from_millis(100));
///
/// assert_eq!(resize.poll(start + Duration::from_millis(200)), None);
/// assert_eq!(resize.poll(start + Duration::from_millis(250)), Some(600));
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.resize_debounce())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any pending value and restarts the wait.
    pub fn trigger(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Takes the pending value once its wait has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.deadline().is_some_and(|deadline| now >= deadline) {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes available.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrome::NameSubstitution;
    use crate::html::Element;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(150));
        debouncer.trigger((), start);

        assert_eq!(debouncer.poll(start + ms(149)), None);
        assert_eq!(debouncer.poll(start + ms(150)), Some(()));
        assert_eq!(debouncer.poll(start + ms(300)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_new_trigger_restarts_wait() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(150));
        for step in 0..5 {
            debouncer.trigger(step, start + ms(step * 100));
        }
        assert_eq!(debouncer.deadline(), Some(start + ms(550)));
        assert_eq!(debouncer.poll(start + ms(500)), None);
        assert_eq!(debouncer.poll(start + ms(550)), Some(4));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(10));
        debouncer.trigger("x", start);
        debouncer.cancel();
        assert_eq!(debouncer.poll(start + ms(50)), None);
    }

    #[test]
    fn test_default_delay_from_config() {
        let debouncer: Debouncer<u32> = Debouncer::from_config(&SiteConfig::new());
        assert_eq!(debouncer.delay(), ms(150));
    }

    #[test]
    fn test_resize_drives_name_substitution() {
        let mut root = Element::new("body").with_child(Element::new("h1").with_text("Ada King Lovelace"));
        let names = NameSubstitution::collect(&root, "Ada King Lovelace", "Ada Lovelace", 640);
        let start = Instant::now();
        let mut resize = Debouncer::new(ms(150));

        resize.trigger(500, start);
        resize.trigger(1200, start + ms(50));
        resize.trigger(600, start + ms(120));

        if let Some(width) = resize.poll(start + ms(270)) {
            names.apply(&mut root, width);
        }
        assert_eq!(root.text_content(), "Ada Lovelace");
    }
}
