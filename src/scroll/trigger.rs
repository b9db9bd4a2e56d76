//! Visibility-driven "load more" trigger

use tracing::trace;

/// Zero-argument "load more" callback
pub type LoadMore = Box<dyn FnMut() + Send>;

/// Fires a callback when a sentinel element scrolls into view.
///
/// The callback runs at most once per visibility transition and never while
/// `done` or `loading` is set. Clearing a gate while the sentinel is still
/// visible arms a fresh transition, so the callback fires again right away.
pub struct InfiniteScroll {
    callback: LoadMore,
    done: bool,
    loading: bool,
    visible: bool,
    mounted: bool,
    fired: u64,
}

impl InfiniteScroll {
    /// Mount the trigger
    pub fn new(callback: impl FnMut() + Send + 'static) -> Self {
        Self {
            callback: Box::new(callback),
            done: false,
            loading: false,
            visible: false,
            mounted: true,
            fired: 0,
        }
    }

    /// Swap the callback; the sensor subscription is kept as is
    pub fn set_callback(&mut self, callback: impl FnMut() + Send + 'static) {
        self.callback = Box::new(callback);
    }

    /// Sensor report; returns whether the callback ran
    pub fn on_visibility(&mut self, visible: bool) -> bool {
        let entered = visible && !self.visible;
        self.visible = visible;
        entered && self.fire()
    }

    pub fn set_loading(&mut self, loading: bool) -> bool {
        let was_gated = self.is_gated();
        self.loading = loading;
        self.rearm(was_gated)
    }

    pub fn set_done(&mut self, done: bool) -> bool {
        let was_gated = self.is_gated();
        self.done = done;
        self.rearm(was_gated)
    }

    /// Detach from the sensor; later reports are ignored
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.visible = false;
    }

    pub fn is_gated(&self) -> bool {
        self.done || self.loading
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Times the callback has run
    pub fn fired(&self) -> u64 {
        self.fired
    }

    fn rearm(&mut self, was_gated: bool) -> bool {
        if was_gated && !self.is_gated() && self.visible {
            trace!("gate cleared with sentinel in view");
            return self.fire();
        }
        false
    }

    fn fire(&mut self) -> bool {
        if !self.mounted || self.is_gated() {
            return false;
        }
        self.fired += 1;
        (self.callback)();
        true
    }
}

impl std::fmt::Debug for InfiniteScroll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfiniteScroll")
            .field("done", &self.done)
            .field("loading", &self.loading)
            .field("visible", &self.visible)
            .field("mounted", &self.mounted)
            .field("fired", &self.fired)
            .finish_non_exhaustive()
    }
}
