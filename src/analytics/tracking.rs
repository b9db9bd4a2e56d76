//! Button click and jargon A/B tracking

use super::consent::ConsentContext;
use super::events::{EventDispatcher, EventParams, ParamValue};
use chrono::{SecondsFormat, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;
use uuid::Uuid;

/// Repeat clicks on the same button within this window are ignored
pub const CLICK_DEBOUNCE: Duration = Duration::from_millis(500);

pub const BUTTON_CLICK: &str = "button_click";
pub const JARGON_IMPRESSION: &str = "jargon_impression";
pub const JARGON_CLICK: &str = "jargon_click";

// ============================================================================
// Button clicks
// ============================================================================

/// Emits `button_click` for intentional button presses on one page
pub struct ClickTracker {
    dispatcher: Arc<EventDispatcher>,
    consent: Arc<ConsentContext>,
    page: Option<String>,
    debounce: Duration,
    last_fired: Mutex<HashMap<String, Instant>>,
}

impl ClickTracker {
    pub fn new(dispatcher: Arc<EventDispatcher>, consent: Arc<ConsentContext>) -> Self {
        Self {
            dispatcher,
            consent,
            page: None,
            debounce: CLICK_DEBOUNCE,
            last_fired: Mutex::new(HashMap::new()),
        }
    }

    /// Path of the page the buttons live on
    #[must_use]
    pub fn page(mut self, path: impl Into<String>) -> Self {
        self.page = Some(path.into());
        self
    }

    #[must_use]
    pub fn debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    /// Track a click; returns `false` when it was debounced.
    ///
    /// `extra` entries are merged last and override the standard keys.
    pub async fn track(&self, label: &str, section: &str, extra: EventParams) -> bool {
        let key = format!("{label}::{section}");
        let now = Instant::now();

        {
            let mut last_fired = self.last_fired.lock().await;
            last_fired.retain(|_, at| now.duration_since(*at) < self.debounce);
            if last_fired.contains_key(&key) {
                trace!(key, "click debounced");
                return false;
            }
            last_fired.insert(key, now);
        }

        let mut params = EventParams::from([
            ("label".to_string(), ParamValue::from(label)),
            ("page".to_string(), ParamValue::from(self.page.clone())),
            ("section".to_string(), ParamValue::from(section)),
            (
                "timestamp".to_string(),
                ParamValue::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            ),
        ]);
        params.extend(extra);

        self.dispatcher.track(BUTTON_CLICK, params, &self.consent).await;
        true
    }

    /// Buttons still inside their debounce window
    pub async fn debouncing(&self) -> usize {
        self.last_fired.lock().await.len()
    }
}

// ============================================================================
// Jargon
// ============================================================================

/// One phrase picked from an A/B set, with its impression and click events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jargon {
    text: String,
    set_id: String,
    section: String,
    clicked: bool,
}

impl Jargon {
    /// Pick a random phrase; `None` for an empty set
    pub fn pick(set: &[&str], set_id: &str, section: &str) -> Option<Self> {
        if set.is_empty() {
            return None;
        }
        let index = (Uuid::new_v4().as_u128() % set.len() as u128) as usize;
        Self::pick_at(set, index, set_id, section)
    }

    /// Pick the phrase at `index`
    pub fn pick_at(set: &[&str], index: usize, set_id: &str, section: &str) -> Option<Self> {
        set.get(index).map(|text| Self {
            text: (*text).to_string(),
            set_id: set_id.to_string(),
            section: section.to_string(),
            clicked: false,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn clicked(&self) -> bool {
        self.clicked
    }

    fn params(&self) -> EventParams {
        EventParams::from([
            ("jargon_text".to_string(), ParamValue::from(self.text.as_str())),
            ("jargon_set_id".to_string(), ParamValue::from(self.set_id.as_str())),
            ("page_section".to_string(), ParamValue::from(self.section.as_str())),
        ])
    }

    /// Emit `jargon_impression`
    pub async fn track_impression(&self, dispatcher: &EventDispatcher, consent: &ConsentContext) {
        dispatcher.track(JARGON_IMPRESSION, self.params(), consent).await;
    }

    /// Emit `jargon_click` and remember the conversion
    pub async fn track_click(&mut self, dispatcher: &EventDispatcher, consent: &ConsentContext) {
        self.clicked = true;
        let mut params = self.params();
        params.insert("converted".to_string(), ParamValue::Bool(true));
        dispatcher.track(JARGON_CLICK, params, consent).await;
    }
}
