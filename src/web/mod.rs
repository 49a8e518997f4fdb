//! Browser glue: observers, input wiring and the settle timer around
//! [`LifecycleController`].
//!
//! The controller lives in an `Rc<RefCell<_>>`. DOM callbacks hold `Weak`
//! references, so dropping the handle (or calling `dispose`) frees everything.

pub mod control;
pub mod monaco;
pub mod page;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, MutationObserver, MutationObserverInit, Node};

use crate::config::HighlighterConfig;
use crate::error::{HighlightError, HighlightResult};
use crate::lifecycle::{InputOutcome, LifecycleController, NavigationOutcome};
use crate::logging;

use self::control::InputControl;
use self::page::WebPage;

// =============================================================================
// Runtime state
// =============================================================================

/// A connected observer together with the closure it calls
struct Watch {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut()>,
}

impl Watch {
    fn new(target: &Node, callback: Closure<dyn FnMut()>) -> HighlightResult<Self> {
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        observer.observe_with_options(target, &options)?;
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for Watch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

struct MountedControl {
    control: InputControl,
    _on_input: Closure<dyn FnMut()>,
    _on_clear: Closure<dyn FnMut()>,
}

impl Drop for MountedControl {
    fn drop(&mut self) {
        self.control.root.remove();
    }
}

struct Runtime {
    controller: LifecycleController,
    page: WebPage,
    document: Document,
    mount_watch: Option<Watch>,
    control: Option<MountedControl>,
}

type Shared = Rc<RefCell<Runtime>>;

impl Runtime {
    fn teardown_session(&mut self) {
        self.mount_watch = None;
        self.control = None;
    }
}

// =============================================================================
// JS API
// =============================================================================

/// Handle returned by `install()`. Dropping it on the JS side (`free()`) or
/// calling `dispose()` disconnects all observers and removes the input control.
#[wasm_bindgen]
pub struct HighlighterHandle {
    runtime: Shared,
    navigation: Option<Watch>,
}

#[wasm_bindgen]
impl HighlighterHandle {
    /// Current mount state: "unmounted", "observing" or "mounted"
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.runtime.borrow().controller.state().name().to_string()
    }

    pub fn dispose(&mut self) {
        self.navigation = None;
        let mut rt = self.runtime.borrow_mut();
        rt.controller.dispose();
        rt.teardown_session();
        drop(rt);
        tracing::info!("highlighter disposed");
    }
}

/// Start watching the page. `config` is an optional object of
/// `HighlighterConfig` overrides in camelCase.
#[wasm_bindgen]
pub fn install(config: JsValue) -> Result<HighlighterHandle, JsValue> {
    let config = HighlighterConfig::from_js(config)?;
    logging::init(logging::parse_level(&config.log_level));

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| HighlightError::missing("window.document"))?;
    let page = WebPage::new(
        document.clone(),
        config.selectors.clone(),
        config.scroll_overshoot_px,
    );

    let runtime: Shared = Rc::new(RefCell::new(Runtime {
        controller: LifecycleController::new(config),
        page,
        document: document.clone(),
        mount_watch: None,
        control: None,
    }));

    let weak = Rc::downgrade(&runtime);
    let callback = Closure::<dyn FnMut()>::new(move || {
        if let Some(runtime) = weak.upgrade() {
            check_location(&runtime);
        }
    });
    let navigation = Watch::new(&document, callback)?;

    check_location(&runtime);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "highlighter installed");

    Ok(HighlighterHandle {
        runtime,
        navigation: Some(navigation),
    })
}

// =============================================================================
// Handlers
// =============================================================================

fn current_path() -> Option<String> {
    web_sys::window()?.location().pathname().ok()
}

fn check_location(runtime: &Shared) {
    let Some(path) = current_path() else {
        return;
    };
    let outcome = runtime.borrow_mut().controller.on_navigation(&path);
    match outcome {
        NavigationOutcome::Unchanged => {}
        NavigationOutcome::Left => runtime.borrow_mut().teardown_session(),
        NavigationOutcome::StartObserving => {
            runtime.borrow_mut().teardown_session();
            if let Err(err) = watch_for_mount(runtime) {
                tracing::warn!(error = %err, "cannot observe rule list mount");
            }
        }
    }
}

fn watch_for_mount(runtime: &Shared) -> HighlightResult<()> {
    let body = runtime
        .borrow()
        .document
        .body()
        .ok_or_else(|| HighlightError::missing("document.body"))?;

    let weak = Rc::downgrade(runtime);
    let callback = Closure::<dyn FnMut()>::new(move || {
        if let Some(runtime) = weak.upgrade() {
            on_mutation(&runtime);
        }
    });
    let watch = Watch::new(&body, callback)?;
    runtime.borrow_mut().mount_watch = Some(watch);

    // The container may already be there
    on_mutation(runtime);
    Ok(())
}

fn on_mutation(runtime: &Shared) {
    let mounted = {
        let mut rt = runtime.borrow_mut();
        if !rt.page.is_mount_ready() {
            return;
        }
        rt.controller.on_container_observed()
    };
    if !mounted {
        return;
    }

    // Dropping the watch disconnects the observer
    let watch = runtime.borrow_mut().mount_watch.take();
    drop(watch);

    if let Err(err) = mount_control(runtime) {
        tracing::warn!(error = %err, "input control not mounted");
    }
}

fn mount_control(runtime: &Shared) -> HighlightResult<()> {
    let (control, anchor) = {
        let rt = runtime.borrow();
        let anchor = rt
            .page
            .control_anchor()
            .ok_or_else(|| HighlightError::missing("element after the mount container"))?;
        let config = rt.controller.config();
        let control = InputControl::build(&rt.document, &config.label, &config.placeholder)?;
        (control, anchor)
    };
    control.insert_before(&anchor)?;

    let on_input = {
        let weak = Rc::downgrade(runtime);
        let input = control.input.clone();
        Closure::<dyn FnMut()>::new(move || {
            if let Some(runtime) = weak.upgrade() {
                handle_input(&runtime, &input.value());
            }
        })
    };
    let on_clear = {
        let weak = Rc::downgrade(runtime);
        let input = control.input.clone();
        Closure::<dyn FnMut()>::new(move || {
            if let Some(runtime) = weak.upgrade() {
                handle_clear(&runtime);
            }
            input.set_value("");
        })
    };
    control
        .input
        .add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
    control
        .clear
        .add_event_listener_with_callback("click", on_clear.as_ref().unchecked_ref())?;

    runtime.borrow_mut().control = Some(MountedControl {
        control,
        _on_input: on_input,
        _on_clear: on_clear,
    });
    tracing::debug!("input control mounted");
    Ok(())
}

fn handle_input(runtime: &Shared, value: &str) {
    let (outcome, session) = {
        let mut rt = runtime.borrow_mut();
        let Runtime { controller, page, .. } = &mut *rt;
        (controller.on_input(page, value), controller.session())
    };
    after_input(runtime, outcome, session);
}

fn handle_clear(runtime: &Shared) {
    let (outcome, session) = {
        let mut rt = runtime.borrow_mut();
        let Runtime { controller, page, .. } = &mut *rt;
        (controller.on_clear(page), controller.session())
    };
    after_input(runtime, outcome, session);
}

fn after_input(runtime: &Shared, outcome: InputOutcome, session: u64) {
    tracing::trace!(?outcome, "input handled");
    if let InputOutcome::Deferred { delay_ms } = outcome {
        schedule_settle(Rc::downgrade(runtime), session, delay_ms);
    }
}

// =============================================================================
// Settle timer
// =============================================================================

fn schedule_settle(runtime: Weak<RefCell<Runtime>>, session: u64, delay_ms: u32) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = sleep(delay_ms).await {
            tracing::warn!(error = ?err, "settle timer failed");
        }
        let Some(runtime) = runtime.upgrade() else {
            return;
        };
        let mut rt = runtime.borrow_mut();
        let Runtime { controller, page, .. } = &mut *rt;
        if controller.session() != session {
            tracing::debug!("settle timer outlived its session");
            return;
        }
        let outcome = controller.on_render_settled(page);
        tracing::trace!(?outcome, "forced render settled");
    });
}

/// Resolve after `ms` milliseconds via `setTimeout`
async fn sleep(ms: u32) -> Result<(), JsValue> {
    let promise = Promise::new(&mut |resolve: Function, reject: Function| {
        let scheduled = web_sys::window().map(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(
                &resolve,
                i32::try_from(ms).unwrap_or(i32::MAX),
            )
        });
        if !matches!(scheduled, Some(Ok(_))) {
            if let Err(err) = reject.call1(&JsValue::NULL, &JsValue::from_str("setTimeout unavailable")) {
                tracing::trace!(error = ?err, "settle promise not rejected");
            }
        }
    });
    JsFuture::from(promise).await.map(|_| ())
}
