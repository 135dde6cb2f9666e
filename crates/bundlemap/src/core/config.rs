//! Rendering configuration

use super::Direction;

/// Default style applied to the focus node
pub const DEFAULT_FOCUS_STYLE: &str = "fill:#ffd966,stroke:#b45f06,stroke-width:3px";

/// Configuration for diagram rendering
///
/// Groups the options that control how a relation set is written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramConfig {
    /// Flow direction of the main diagram
    pub direction: Direction,
    /// Style directive body applied to the focus node
    pub focus_style: String,
    /// Append the shape legend after the diagram
    pub include_key: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            direction: Direction::TopDown,
            focus_style: DEFAULT_FOCUS_STYLE.to_string(),
            include_key: false,
        }
    }
}

impl DiagramConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_focus_style(mut self, style: impl Into<String>) -> Self {
        self.focus_style = style.into();
        self
    }

    pub fn with_key(mut self, include_key: bool) -> Self {
        self.include_key = include_key;
        self
    }
}
