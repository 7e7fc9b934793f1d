//! Scenario definition for headless ink replays.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// A document description plus the input to replay against it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Whether the document reports touch support
    #[serde(default)]
    pub touch_capable: bool,
    pub elements: Vec<ElementSpec>,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid scenario {}", path.display()))
    }
}

/// One element of the scenario document. Parents must be declared first.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementSpec {
    pub id: String,
    /// Parent element id, the document root when absent
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Page frame as `[x, y, width, height]`
    #[serde(default)]
    pub frame: [f32; 4],
    #[serde(default)]
    pub ink_target: bool,
}

fn default_tag() -> String {
    "div".to_string()
}

fn default_tolerance() -> f32 {
    0.01
}

/// Replay steps. Input steps name the element the event originates on.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    PointerDown {
        target: String,
        x: f32,
        y: f32,
        #[serde(default)]
        button: u8,
        #[serde(default)]
        ctrl: bool,
    },
    PointerUp {
        target: String,
        x: f32,
        y: f32,
        #[serde(default)]
        button: u8,
        #[serde(default)]
        ctrl: bool,
    },
    PointerLeave {
        target: String,
    },
    KeyUp {
        target: String,
        key: String,
    },
    Blur {
        target: String,
    },
    TouchStart {
        target: String,
        x: f32,
        y: f32,
    },
    TouchMove {
        target: String,
        x: f32,
        y: f32,
    },
    TouchEnd {
        target: String,
        x: f32,
        y: f32,
    },
    Wait {
        ms: u64,
    },
    /// Remove an element and its subtree from the document
    Unmount {
        target: String,
    },
    AssertRippleCount {
        target: String,
        count: usize,
    },
    AssertQueueLen {
        len: usize,
    },
    /// Radius of the newest ripple on a target
    AssertRadius {
        target: String,
        radius: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
}

impl ScenarioStep {
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioStep::PointerDown { .. } => "pointer_down",
            ScenarioStep::PointerUp { .. } => "pointer_up",
            ScenarioStep::PointerLeave { .. } => "pointer_leave",
            ScenarioStep::KeyUp { .. } => "key_up",
            ScenarioStep::Blur { .. } => "blur",
            ScenarioStep::TouchStart { .. } => "touch_start",
            ScenarioStep::TouchMove { .. } => "touch_move",
            ScenarioStep::TouchEnd { .. } => "touch_end",
            ScenarioStep::Wait { .. } => "wait",
            ScenarioStep::Unmount { .. } => "unmount",
            ScenarioStep::AssertRippleCount { .. } => "assert_ripple_count",
            ScenarioStep::AssertQueueLen { .. } => "assert_queue_len",
            ScenarioStep::AssertRadius { .. } => "assert_radius",
        }
    }
}
