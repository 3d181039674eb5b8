use crate::config::NotifierKind;
use std::time::{Duration, Instant};

/// How long an inline banner stays visible before it clears itself.
pub const BANNER_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Danger,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub severity: Severity,
    pub text: String,
}

impl Notice {
    fn success(text: &str) -> Self {
        Self {
            severity: Severity::Success,
            text: text.to_string(),
        }
    }

    fn danger(text: &str) -> Self {
        Self {
            severity: Severity::Danger,
            text: text.to_string(),
        }
    }
}

/// Surfaces submit results to the user. One implementation is chosen at
/// startup from configuration; the synchronizer and submit path never know
/// which one is in play.
pub trait Notifier {
    fn success(&mut self, message: &str);
    fn failure(&mut self, message: &str);

    /// Notice currently shown inside the view, if any.
    fn active(&self) -> Option<&Notice>;

    /// Advance time-based state. Only the banner cares.
    fn tick(&mut self, _now: Instant) {}

    /// User acknowledged the notice. Only the modal cares.
    fn dismiss(&mut self) {}

    /// Whether the active notice swallows input until dismissed.
    fn is_blocking(&self) -> bool {
        false
    }

    /// Notice that should be carried out of the view, ending it. Only the
    /// redirect variant returns one.
    fn exit_notice(&self) -> Option<&Notice> {
        None
    }
}

pub fn build_notifier(kind: NotifierKind) -> Box<dyn Notifier> {
    match kind {
        NotifierKind::Banner => Box::new(BannerNotifier::new()),
        NotifierKind::Redirect => Box::new(RedirectNotifier::new()),
        NotifierKind::Modal => Box::new(ModalNotifier::new()),
    }
}

/// Inline transient banner, the alert-div style: shown in place, cleared
/// automatically after `BANNER_TIMEOUT`.
pub struct BannerNotifier {
    current: Option<(Notice, Instant)>,
}

impl BannerNotifier {
    pub fn new() -> Self {
        Self { current: None }
    }

    fn show(&mut self, notice: Notice) {
        self.current = Some((notice, Instant::now()));
    }
}

impl Notifier for BannerNotifier {
    fn success(&mut self, message: &str) {
        self.show(Notice::success(message));
    }

    fn failure(&mut self, message: &str) {
        self.show(Notice::danger(message));
    }

    fn active(&self) -> Option<&Notice> {
        self.current.as_ref().map(|(notice, _)| notice)
    }

    fn tick(&mut self, now: Instant) {
        if let Some((_, shown_at)) = self.current {
            if now.duration_since(shown_at) >= BANNER_TIMEOUT {
                self.current = None;
            }
        }
    }
}

/// Redirect style: the view ends and the message travels out with a
/// severity, like navigating back to the listing with message/type query
/// parameters.
pub struct RedirectNotifier {
    pending: Option<Notice>,
}

impl RedirectNotifier {
    pub fn new() -> Self {
        Self { pending: None }
    }
}

impl Notifier for RedirectNotifier {
    fn success(&mut self, message: &str) {
        self.pending = Some(Notice::success(message));
    }

    fn failure(&mut self, message: &str) {
        self.pending = Some(Notice::danger(message));
    }

    fn active(&self) -> Option<&Notice> {
        None
    }

    fn exit_notice(&self) -> Option<&Notice> {
        self.pending.as_ref()
    }
}

/// Blocking acknowledgement popup, the browser-alert style: stays up and
/// swallows input until the user presses a key.
pub struct ModalNotifier {
    current: Option<Notice>,
}

impl ModalNotifier {
    pub fn new() -> Self {
        Self { current: None }
    }
}

impl Notifier for ModalNotifier {
    fn success(&mut self, message: &str) {
        self.current = Some(Notice::success(message));
    }

    fn failure(&mut self, message: &str) {
        self.current = Some(Notice::danger(message));
    }

    fn active(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    fn dismiss(&mut self) {
        self.current = None;
    }

    fn is_blocking(&self) -> bool {
        self.current.is_some()
    }
}
