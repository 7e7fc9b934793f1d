//! Headless scenario replay.

use anyhow::{anyhow, bail, Result};
use inkwave_core::{Event, KeyCode, Modifiers, NodeId, Rect};
use inkwave_dom::Document;
use inkwave_ink::{mark_ink_target, InkConfig, InkRuntime};
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::report::{AssertionFailure, ReplayReport};
use crate::scenario::{Scenario, ScenarioStep};

/// Replays a scenario against a headless document.
pub struct ScenarioRunner {
    runtime: InkRuntime,
    ids: FxHashMap<String, NodeId>,
}

impl ScenarioRunner {
    /// Build the scenario document and start the watcher on it.
    pub fn new(scenario: &Scenario, config: InkConfig) -> Result<Self> {
        let (document, ids) = build_document(scenario)?;
        let mut runtime = InkRuntime::new(document, config);
        let mode = runtime.start()?;
        info!("Replaying {} steps in {:?} mode", scenario.steps.len(), mode);
        Ok(Self { runtime, ids })
    }

    /// Run every step, stopping at the first failed assertion.
    ///
    /// Unknown element ids are scenario errors and abort the replay.
    pub fn run(&mut self, steps: &[ScenarioStep]) -> Result<ReplayReport> {
        for (index, step) in steps.iter().enumerate() {
            debug!("step {} at {}ms: {}", index, self.runtime.now_ms(), step.name());
            if let Err(message) = self.apply(step)? {
                let failure = AssertionFailure {
                    step_index: index,
                    assertion: step.name().to_string(),
                    message,
                };
                return Ok(self.report(index + 1, Some(failure)));
            }
        }

        Ok(self.report(steps.len(), None))
    }

    fn report(&self, steps_run: usize, failure: Option<AssertionFailure>) -> ReplayReport {
        ReplayReport::new(
            steps_run,
            self.runtime.now_ms(),
            self.runtime.watcher().ripples().len(),
            failure,
        )
    }

    /// Apply one step. The inner error is an assertion failure message.
    fn apply(&mut self, step: &ScenarioStep) -> Result<std::result::Result<(), String>> {
        let now = self.runtime.now_ms();
        match step {
            ScenarioStep::PointerDown {
                target,
                x,
                y,
                button,
                ctrl,
            } => {
                let node = self.node(target)?;
                let event = Event::pointer_down(node, *x, *y)
                    .with_button(*button, Modifiers::new(false, *ctrl, false, false))
                    .at(now);
                self.runtime.dispatch(event);
            }
            ScenarioStep::PointerUp {
                target,
                x,
                y,
                button,
                ctrl,
            } => {
                let node = self.node(target)?;
                let event = Event::pointer_up(node, *x, *y)
                    .with_button(*button, Modifiers::new(false, *ctrl, false, false))
                    .at(now);
                self.runtime.dispatch(event);
            }
            ScenarioStep::PointerLeave { target } => {
                let node = self.node(target)?;
                self.runtime.dispatch(Event::pointer_leave(node).at(now));
            }
            ScenarioStep::KeyUp { target, key } => {
                let node = self.node(target)?;
                let code = KeyCode::from_name(key).unwrap_or(KeyCode::UNKNOWN);
                self.runtime.dispatch(Event::key_up(node, code).at(now));
            }
            ScenarioStep::Blur { target } => {
                let node = self.node(target)?;
                self.runtime.dispatch(Event::blur(node).at(now));
            }
            ScenarioStep::TouchStart { target, x, y } => {
                let node = self.node(target)?;
                self.runtime.dispatch(Event::touch_start(node, *x, *y).at(now));
            }
            ScenarioStep::TouchMove { target, x, y } => {
                let node = self.node(target)?;
                self.runtime.dispatch(Event::touch_move(node, *x, *y).at(now));
            }
            ScenarioStep::TouchEnd { target, x, y } => {
                let node = self.node(target)?;
                self.runtime.dispatch(Event::touch_end(node, *x, *y).at(now));
            }
            ScenarioStep::Wait { ms } => self.runtime.advance(*ms),
            ScenarioStep::Unmount { target } => {
                let node = self.node(target)?;
                self.runtime.document_mut().remove_node(node)?;
            }
            ScenarioStep::AssertRippleCount { target, count } => {
                let node = self.node(target)?;
                let actual = self.runtime.ripple_elements(node).len();
                if actual != *count {
                    return Ok(Err(format!(
                        "expected {count} ripples on `{target}`, found {actual}"
                    )));
                }
            }
            ScenarioStep::AssertQueueLen { len } => {
                let actual = self.runtime.watcher().ripples().len();
                if actual != *len {
                    return Ok(Err(format!(
                        "expected {len} queued ripples, found {actual}"
                    )));
                }
            }
            ScenarioStep::AssertRadius {
                target,
                radius,
                tolerance,
            } => {
                let node = self.node(target)?;
                let Some(actual) = self.newest_radius(node) else {
                    return Ok(Err(format!("no ripple on `{target}`")));
                };
                if (actual - radius).abs() > *tolerance {
                    return Ok(Err(format!(
                        "expected radius {radius} on `{target}`, found {actual}"
                    )));
                }
            }
        }
        Ok(Ok(()))
    }

    fn node(&self, id: &str) -> Result<NodeId> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| anyhow!("unknown element `{id}`"))
    }

    /// Ripples are prepended, so the first one is the newest.
    fn newest_radius(&self, target: NodeId) -> Option<f32> {
        let ripple = *self.runtime.ripple_elements(target).first()?;
        let width = self.runtime.document().style(ripple)?.width?;
        Some(width / 2.0)
    }
}

/// Build the headless document a scenario describes.
pub fn build_document(scenario: &Scenario) -> Result<(Document, FxHashMap<String, NodeId>)> {
    let mut document = Document::new().with_touch_support(scenario.touch_capable);
    let mut ids = FxHashMap::default();

    for decl in &scenario.elements {
        if ids.contains_key(&decl.id) {
            bail!("duplicate element id `{}`", decl.id);
        }
        let parent = match &decl.parent {
            Some(parent) => *ids
                .get(parent)
                .ok_or_else(|| anyhow!("element `{}` names undeclared parent `{parent}`", decl.id))?,
            None => document.root(),
        };

        let node = document.create_element(&decl.tag);
        document.append_child(parent, node)?;
        let [x, y, width, height] = decl.frame;
        document.set_frame(node, Rect::new(x, y, width, height))?;
        if decl.ink_target {
            mark_ink_target(&mut document, node)?;
        }
        ids.insert(decl.id.clone(), node);
    }

    Ok((document, ids))
}

/// Replay a whole scenario with the given watcher options.
pub fn replay(scenario: &Scenario, config: InkConfig) -> Result<ReplayReport> {
    let mut runner = ScenarioRunner::new(scenario, config)?;
    runner.run(&scenario.steps)
}
