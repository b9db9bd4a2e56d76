//! Homepage spotlight banners
//!
//! Two slots, an announcement and a product. Each banner is shown while it
//! is `active` and today's date falls inside its optional window.

use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Embedded spotlight banners
pub const MOCK_SPOTLIGHTS_YAML: &str = include_str!("../../data/spotlights.yaml");

/// Banner slot on the homepage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotlightSlot {
    Announcement,
    Product,
}

impl fmt::Display for SpotlightSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotlightSlot::Announcement => write!(f, "announcement"),
            SpotlightSlot::Product => write!(f, "product"),
        }
    }
}

fn default_active() -> bool {
    true
}

/// One banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spotlight {
    /// Badge text, e.g. "New"
    pub label: String,
    pub name: String,
    pub description: String,
    pub href: String,
    #[serde(default = "default_active")]
    pub active: bool,
    /// First day shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// First day no longer shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Spotlight {
    pub fn is_visible_on(&self, today: NaiveDate) -> bool {
        self.active
            && self.start_date.map_or(true, |start| start <= today)
            && self.end_date.map_or(true, |end| today < end)
    }
}

/// Contents of a spotlight file; either slot may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotlightSet {
    #[serde(default)]
    pub announcement: Option<Spotlight>,
    #[serde(default)]
    pub product: Option<Spotlight>,
}

impl SpotlightSet {
    /// Parse and check that every window ends after it starts
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let set: Self = serde_yaml::from_str(yaml)?;
        for (slot, spotlight) in set.entries() {
            if let (Some(start), Some(end)) = (spotlight.start_date, spotlight.end_date) {
                if end <= start {
                    return Err(Error::invalid_value(
                        format!("spotlight.{slot}"),
                        format!("endDate {end} is not after startDate {start}"),
                    ));
                }
            }
        }
        Ok(set)
    }

    pub fn get(&self, slot: SpotlightSlot) -> Option<&Spotlight> {
        match slot {
            SpotlightSlot::Announcement => self.announcement.as_ref(),
            SpotlightSlot::Product => self.product.as_ref(),
        }
    }

    fn entries(&self) -> impl Iterator<Item = (SpotlightSlot, &Spotlight)> {
        [SpotlightSlot::Announcement, SpotlightSlot::Product]
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|s| (slot, s)))
    }
}

/// Today's date as seen by [`Spotlights`]
pub type Clock = fn() -> NaiveDate;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Serves whichever banners are visible today
#[derive(Clone)]
pub struct Spotlights {
    set: Arc<SpotlightSet>,
    clock: Clock,
}

impl Spotlights {
    pub fn new(set: SpotlightSet) -> Self {
        Self {
            set: Arc::new(set),
            clock: local_today,
        }
    }

    /// The embedded banners
    pub fn mock() -> Result<Self> {
        Ok(Self::new(SpotlightSet::from_yaml_str(MOCK_SPOTLIGHTS_YAML)?))
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The banner for `slot` if it is visible today
    pub fn current(&self, slot: SpotlightSlot) -> Option<&Spotlight> {
        self.current_on(slot, (self.clock)())
    }

    pub fn current_on(&self, slot: SpotlightSlot, today: NaiveDate) -> Option<&Spotlight> {
        self.set.get(slot).filter(|s| s.is_visible_on(today))
    }
}

impl fmt::Debug for Spotlights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spotlights")
            .field("announcement", &self.set.announcement.is_some())
            .field("product", &self.set.product.is_some())
            .finish_non_exhaustive()
    }
}
