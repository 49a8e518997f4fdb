//! LifecycleController: mount state machine and event dispatch
//!
//! # Design Principles
//! 1. State machine: Unmounted → Observing → Mounted, one session per visit of the rules view
//! 2. Every host event maps to exactly one handler; handlers return an outcome the
//!    browser glue acts on (mount the control, start the settle timer, nothing)
//! 3. Last write wins: input arriving while a forced render is settling replaces the
//!    pending selection instead of queuing another pass
//!
//! | event              | handler                  |
//! |--------------------|--------------------------|
//! | path changed       | `on_navigation`          |
//! | container appeared | `on_container_observed`  |
//! | input changed      | `on_input`               |
//! | clear clicked      | `on_clear`               |
//! | settle timer fired | `on_render_settled`      |

use crate::config::{ForceRenderPolicy, HighlighterConfig};
use crate::editor::EditorAdapter;
use crate::error::{HighlightError, HighlightResult};
use crate::list_view::ListViewAdapter;
use crate::pattern::{PatternParser, Selection};
use crate::surface::{detect, HostPage, Highlighter, Surface, SurfaceKind};

// =============================================================================
// State Machine
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState {
    /// Not on the rules view
    Unmounted,
    /// On the rules view, waiting for the rule list container
    Observing,
    /// Input control installed and wired
    Mounted,
}

impl MountState {
    pub fn name(&self) -> &'static str {
        match self {
            MountState::Unmounted => "unmounted",
            MountState::Observing => "observing",
            MountState::Mounted => "mounted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Same path as last time
    Unchanged,
    /// Entered the rules view: start watching for the container
    StartObserving,
    /// Left the rules view: stop watching, session dropped
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Not mounted, or nothing left to do
    Skipped,
    Restored(SurfaceKind),
    Applied(SurfaceKind),
    /// Forced render started; call `on_render_settled` after `delay_ms`
    Deferred { delay_ms: u32 },
    /// Folded into the pass that is already settling
    Coalesced,
    /// The adapter could not act (missing container, invalid content)
    Degraded(SurfaceKind),
}

/// A list-view pass waiting for the forced render to settle
#[derive(Debug)]
struct PendingPass {
    /// `None` once the field was cleared while settling
    selection: Option<Selection>,
    saved_scroll: Option<f64>,
}

// =============================================================================
// LifecycleController
// =============================================================================

pub struct LifecycleController {
    config: HighlighterConfig,
    parser: PatternParser,
    state: MountState,
    last_path: Option<String>,
    pending: Option<PendingPass>,
    forced_render_done: bool,
    /// Bumped on every session reset; lets timers detect that their session is gone
    session: u64,
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new(HighlighterConfig::default())
    }
}

impl LifecycleController {
    pub fn new(config: HighlighterConfig) -> Self {
        Self {
            config,
            parser: PatternParser::new(),
            state: MountState::Unmounted,
            last_path: None,
            pending: None,
            forced_render_done: false,
            session: 0,
        }
    }

    pub fn config(&self) -> &HighlighterConfig {
        &self.config
    }

    pub fn state(&self) -> MountState {
        self.state
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn has_pending_pass(&self) -> bool {
        self.pending.is_some()
    }

    /// Compare `path` against the last seen path and move the state machine.
    pub fn on_navigation(&mut self, path: &str) -> NavigationOutcome {
        if self.last_path.as_deref() == Some(path) {
            return NavigationOutcome::Unchanged;
        }
        self.last_path = Some(path.to_string());
        self.reset_session();

        if self.config.is_rules_path(path) {
            self.state = MountState::Observing;
            tracing::info!(path, "rules view entered, waiting for rule list");
            NavigationOutcome::StartObserving
        } else {
            tracing::debug!(path, "outside rules view");
            NavigationOutcome::Left
        }
    }

    /// Returns true exactly once per session: the caller mounts the input control.
    pub fn on_container_observed(&mut self) -> bool {
        if self.state != MountState::Observing {
            return false;
        }
        self.state = MountState::Mounted;
        tracing::info!("rule list found, highlighter mounted");
        true
    }

    pub fn on_input<H: HostPage>(&mut self, host: &H, value: &str) -> InputOutcome {
        if self.state != MountState::Mounted {
            return InputOutcome::Skipped;
        }
        let selection = self.parser.parse(value.trim());

        match detect(host) {
            Surface::StructuredEditor(editor) => {
                let mut adapter = EditorAdapter::new(editor);
                if selection.is_empty() {
                    let result = adapter.restore();
                    report(SurfaceKind::StructuredEditor, result, InputOutcome::Restored)
                } else {
                    let result = adapter.apply(&selection);
                    report(SurfaceKind::StructuredEditor, result, InputOutcome::Applied)
                }
            }
            Surface::ListView => self.list_input(host, selection),
        }
    }

    /// The clear affordance restores whichever surface is live.
    pub fn on_clear<H: HostPage>(&mut self, host: &H) -> InputOutcome {
        self.on_input(host, "")
    }

    /// Finish a deferred pass: restore the scroll position, then filter with the
    /// most recent selection.
    pub fn on_render_settled<H: HostPage>(&mut self, host: &H) -> InputOutcome {
        let Some(pending) = self.pending.take() else {
            return InputOutcome::Skipped;
        };
        self.forced_render_done = true;

        let Some(list) = host.rule_list() else {
            tracing::warn!("rule list disappeared while settling");
            return InputOutcome::Degraded(SurfaceKind::ListView);
        };
        let mut adapter = ListViewAdapter::new(list, &self.config.row_style);
        adapter.finish_forced_render(pending.saved_scroll);

        let Some(selection) = pending.selection else {
            return InputOutcome::Skipped;
        };
        if let Surface::StructuredEditor(_) = detect(host) {
            tracing::debug!("surface switched to editor while settling, dropping list pass");
            return InputOutcome::Skipped;
        }
        let result = adapter.apply(&selection);
        report(SurfaceKind::ListView, result, InputOutcome::Applied)
    }

    fn list_input<H: HostPage>(&mut self, host: &H, selection: Selection) -> InputOutcome {
        if selection.is_empty() {
            if let Some(pending) = self.pending.as_mut() {
                pending.selection = None;
            }
            let result = match host.rule_list() {
                Some(list) => ListViewAdapter::new(list, &self.config.row_style).restore(),
                None => Err(HighlightError::missing("rule list")),
            };
            return report(SurfaceKind::ListView, result, InputOutcome::Restored);
        }

        if let Some(pending) = self.pending.as_mut() {
            pending.selection = Some(selection);
            return InputOutcome::Coalesced;
        }

        let Some(list) = host.rule_list() else {
            return report(
                SurfaceKind::ListView,
                Err(HighlightError::missing("rule list")),
                InputOutcome::Applied,
            );
        };
        let mut adapter = ListViewAdapter::new(list, &self.config.row_style);

        if self.needs_forced_render() {
            let saved_scroll = adapter.begin_forced_render();
            self.pending = Some(PendingPass {
                selection: Some(selection),
                saved_scroll,
            });
            return InputOutcome::Deferred {
                delay_ms: self.config.settle_delay_ms,
            };
        }

        let result = adapter.apply(&selection);
        report(SurfaceKind::ListView, result, InputOutcome::Applied)
    }

    /// Drop the session for good: any settle timer still in flight finds no
    /// pending pass and a different session id.
    pub fn dispose(&mut self) {
        self.reset_session();
        self.last_path = None;
        tracing::debug!("controller disposed");
    }

    fn needs_forced_render(&self) -> bool {
        match self.config.force_render {
            ForceRenderPolicy::FirstPass => !self.forced_render_done,
            ForceRenderPolicy::EveryPass => true,
            ForceRenderPolicy::Never => false,
        }
    }

    fn reset_session(&mut self) {
        self.state = MountState::Unmounted;
        self.pending = None;
        self.forced_render_done = false;
        self.session += 1;
    }
}

/// Log adapter failures and map the result to an outcome. Never propagates.
fn report(
    kind: SurfaceKind,
    result: HighlightResult<()>,
    ok: fn(SurfaceKind) -> InputOutcome,
) -> InputOutcome {
    match result {
        Ok(()) => ok(kind),
        Err(err) if err.is_expected() => {
            tracing::debug!(surface = ?kind, error = %err, "highlight skipped");
            InputOutcome::Degraded(kind)
        }
        Err(err) => {
            tracing::warn!(surface = ?kind, error = %err, "highlight unavailable");
            InputOutcome::Degraded(kind)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
