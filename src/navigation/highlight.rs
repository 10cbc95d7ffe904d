//! Scroll-driven navigation highlighting.
//!
//! # State
//! - active link: `#<id>` of the last section whose top, minus the header
//!   offset, is at or above the scroll position; none above the first one
//! - floating CTA: hidden once the contact section enters the viewport
//!
//! Scroll events pass through a [`Throttle`]; an update is only emitted
//! when the state actually changes.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::navigation::throttle::Throttle;
use crate::security::clock::Clock;

/// Space reserved for the fixed header, in pixels.
pub const HEADER_OFFSET_PX: f64 = 100.0;

/// A page section with an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    /// Document offset of the section top, in pixels.
    pub offset_top: f64,
}

impl Section {
    pub fn new(id: impl Into<String>, offset_top: f64) -> Self {
        Self {
            id: id.into(),
            offset_top,
        }
    }
}

/// Picks the section the reader is in.
#[derive(Debug, Clone)]
pub struct NavHighlighter {
    sections: Vec<Section>,
    header_offset: f64,
}

impl NavHighlighter {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            header_offset: HEADER_OFFSET_PX,
        }
    }

    pub fn with_header_offset(mut self, offset: f64) -> Self {
        self.header_offset = offset;
        self
    }

    /// Id of the active section, in document order (last match wins).
    pub fn active_section(&self, scroll_y: f64) -> Option<&str> {
        self.sections
            .iter()
            .rev()
            .find(|s| scroll_y >= s.offset_top - self.header_offset)
            .map(|s| s.id.as_str())
    }
}

/// Viewport measurements taken on a scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollSnapshot {
    pub scroll_y: f64,
    pub viewport_height: f64,
    /// Viewport-relative top of the contact section, if the page has one.
    pub contact_top: Option<f64>,
}

/// Navigation state the UI should render.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavView {
    /// `href` of the link to mark active.
    pub active_href: Option<String>,
    /// `None` when the page has no contact section.
    pub floating_cta_visible: Option<bool>,
}

/// Tracks the rendered navigation state across scroll events.
#[derive(Debug)]
pub struct NavigationState {
    highlighter: NavHighlighter,
    throttle: Throttle,
    current: Option<NavView>,
}

impl NavigationState {
    pub fn new(highlighter: NavHighlighter, throttle_limit: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            highlighter,
            throttle: Throttle::new(throttle_limit, clock),
            current: None,
        }
    }

    /// Last rendered state.
    pub fn current(&self) -> Option<&NavView> {
        self.current.as_ref()
    }

    /// Throttled scroll handler.
    pub fn on_scroll(&mut self, snapshot: ScrollSnapshot) -> Option<NavView> {
        if !self.throttle.try_fire() {
            return None;
        }
        self.refresh(snapshot)
    }

    /// Recompute without throttling (initial render). Returns the new view
    /// if it differs from the current one.
    pub fn refresh(&mut self, snapshot: ScrollSnapshot) -> Option<NavView> {
        let view = self.compute(&snapshot);
        if self.current.as_ref() == Some(&view) {
            return None;
        }
        tracing::trace!(active = ?view.active_href, "Navigation state changed");
        self.current = Some(view.clone());
        Some(view)
    }

    fn compute(&self, snapshot: &ScrollSnapshot) -> NavView {
        NavView {
            active_href: self
                .highlighter
                .active_section(snapshot.scroll_y)
                .map(|id| format!("#{}", id)),
            floating_cta_visible: snapshot
                .contact_top
                .map(|top| top >= snapshot.viewport_height),
        }
    }
}
