//! Fire-and-forget feedback to whatever is presenting the simulation.

use std::fmt;

use serde::Serialize;

use crate::game::{Element, Vec2};

/// An RGB color for feedback text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Neutral white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Score gains.
    pub const GOLD: Self = Self::rgb(255, 200, 40);
    /// Losses and steals.
    pub const RED: Self = Self::rgb(230, 60, 60);

    /// Build a color from channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Theme color of an element.
    #[must_use]
    pub const fn of_element(element: Element) -> Self {
        match element {
            Element::Fire => Self::rgb(240, 90, 30),
            Element::Earth => Self::rgb(150, 110, 60),
            Element::Ice => Self::rgb(150, 220, 255),
            Element::Air => Self::rgb(210, 230, 230),
            Element::Water => Self::rgb(40, 120, 230),
            Element::Void => Self::rgb(90, 30, 140),
            Element::Light => Self::rgb(255, 245, 180),
            Element::Nature => Self::rgb(80, 190, 70),
            Element::Metal => Self::rgb(160, 160, 170),
            Element::Life => Self::rgb(120, 240, 150),
            Element::Arcane => Self::rgb(200, 90, 230),
            Element::Shadow => Self::rgb(50, 40, 60),
            Element::Mirror => Self::rgb(220, 220, 250),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Receiver of visual feedback events.
///
/// Implementations must not feed anything back into the simulation.
pub trait Notifier: fmt::Debug + Send {
    /// Show `text` at `at` in `color`.
    fn notify(&mut self, at: Vec2, text: &str, color: Color);
}

/// Forwards notifications to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, at: Vec2, text: &str, color: Color) {
        tracing::debug!(x = at.x, y = at.y, %color, "{text}");
    }
}

/// A recorded notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Where the feedback appears.
    pub at: Vec2,
    /// Feedback text.
    pub text: String,
    /// Feedback color.
    pub color: Color,
}

/// Keeps every notification, for tests and headless inspection.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications so far.
    #[must_use]
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }
}

impl Notifier for NotificationLog {
    fn notify(&mut self, at: Vec2, text: &str, color: Color) {
        self.entries.push(Notification {
            at,
            text: text.to_string(),
            color,
        });
    }
}
