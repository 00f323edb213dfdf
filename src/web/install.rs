use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, MediaQueryListEvent, MutationObserver, MutationObserverInit, StorageEvent};

use super::{LocalStorage, MediaQueryScheme, WebDom};
use crate::config::ThemeConfig;
use crate::dom::Dom;
use crate::reconciler::Reconciler;
use crate::storage::affects_key;
use crate::sweep::{MutationWatch, StrayToggleDetector, SweepReport, SweepSchedule};
use crate::theme::ColorMode;

pub type WebReconciler = Reconciler<LocalStorage, MediaQueryScheme>;

/// Handle to a wired-up page. Listeners stay registered for the lifetime of
/// the page whether or not the handle is kept.
pub struct Installation {
    reconciler: Rc<RefCell<WebReconciler>>,
    dom: Rc<RefCell<WebDom>>,
    detector: Rc<StrayToggleDetector>,
    observer: Option<MutationObserver>,
}

impl Installation {
    pub fn reconciler(&self) -> Rc<RefCell<WebReconciler>> {
        Rc::clone(&self.reconciler)
    }

    pub fn effective(&self) -> ColorMode {
        self.reconciler.borrow().effective()
    }

    pub fn toggle(&self) -> ColorMode {
        self.reconciler.borrow_mut().toggle(&mut *self.dom.borrow_mut())
    }

    pub fn clear_preference(&self) -> ColorMode {
        self.reconciler
            .borrow_mut()
            .clear_preference(&mut *self.dom.borrow_mut())
    }

    pub fn sweep_now(&self) -> SweepReport {
        self.detector.sweep(&mut *self.dom.borrow_mut())
    }

    /// Stops the mutation-driven re-sweep.
    pub fn disconnect_observer(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
    }
}

/// Initializes the theme on the current page and wires every event source
/// to the reconciler: the checkbox, extra toggle buttons, the OS scheme,
/// storage changes from other tabs, and the scheduled stray-toggle sweeps.
///
/// Returns `None` outside a browsing context.
pub fn install(config: ThemeConfig) -> Option<Installation> {
    let dom = Rc::new(RefCell::new(WebDom::new()?));
    let scheme = MediaQueryScheme::new();
    let media = scheme.list().cloned();
    let reconciler = Rc::new(RefCell::new(Reconciler::from_config(
        &config,
        LocalStorage::new(),
        scheme,
    )));

    let mode = reconciler.borrow_mut().initialize(&mut *dom.borrow_mut());
    debug!(%mode, "theme installed");

    watch_checkbox(&reconciler, &dom);
    watch_toggle_buttons(&config, &reconciler, &dom);
    if let Some(media) = media {
        watch_system(&media, &reconciler, &dom);
    }
    watch_storage(&reconciler, &dom);

    let detector = Rc::new(StrayToggleDetector::from_config(&config));
    schedule_sweeps(&detector, &dom);
    let observer = if config.sweep.observe_mutations {
        observe_mutations(&detector, &dom)
    } else {
        None
    };

    Some(Installation {
        reconciler,
        dom,
        detector,
        observer,
    })
}

fn listen(target: &web_sys::EventTarget, event: &str, closure: Closure<dyn FnMut(Event)>) {
    if let Err(err) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        warn!(event, error = ?err, "failed to register listener");
    }
    closure.forget();
}

fn watch_checkbox(reconciler: &Rc<RefCell<WebReconciler>>, dom: &Rc<RefCell<WebDom>>) {
    let Some(selector) = reconciler.borrow().bindings().checkbox.clone() else {
        return;
    };
    for node in dom.borrow().query_all(&selector) {
        let reconciler = Rc::clone(reconciler);
        let dom = Rc::clone(dom);
        let target = node.clone();
        let closure = Closure::wrap(Box::new(move |_event: Event| {
            let checked = dom.borrow().is_checked(&target);
            reconciler
                .borrow_mut()
                .on_user_toggle(checked, &mut *dom.borrow_mut());
        }) as Box<dyn FnMut(Event)>);
        listen(&node, "change", closure);
    }
}

fn watch_toggle_buttons(
    config: &ThemeConfig,
    reconciler: &Rc<RefCell<WebReconciler>>,
    dom: &Rc<RefCell<WebDom>>,
) {
    let Some(selector) = &config.toggle_buttons else {
        return;
    };
    for node in dom.borrow().query_all(selector) {
        let reconciler = Rc::clone(reconciler);
        let dom = Rc::clone(dom);
        let closure = Closure::wrap(Box::new(move |_event: Event| {
            reconciler.borrow_mut().toggle(&mut *dom.borrow_mut());
        }) as Box<dyn FnMut(Event)>);
        listen(&node, "click", closure);
    }
}

fn watch_system(
    media: &web_sys::MediaQueryList,
    reconciler: &Rc<RefCell<WebReconciler>>,
    dom: &Rc<RefCell<WebDom>>,
) {
    let reconciler = Rc::clone(reconciler);
    let dom = Rc::clone(dom);
    let closure = Closure::wrap(Box::new(move |event: Event| {
        let Some(event) = event.dyn_ref::<MediaQueryListEvent>() else {
            return;
        };
        reconciler
            .borrow_mut()
            .on_system_preference_change(event.matches(), &mut *dom.borrow_mut());
    }) as Box<dyn FnMut(Event)>);
    listen(media, "change", closure);
}

fn watch_storage(reconciler: &Rc<RefCell<WebReconciler>>, dom: &Rc<RefCell<WebDom>>) {
    let window = dom.borrow().window().clone();
    let reconciler = Rc::clone(reconciler);
    let dom = Rc::clone(dom);
    let closure = Closure::wrap(Box::new(move |event: Event| {
        let Some(event) = event.dyn_ref::<StorageEvent>() else {
            return;
        };
        let key = event.key();
        if affects_key(key.as_deref(), reconciler.borrow().storage_key()) {
            reconciler
                .borrow_mut()
                .sync_from_storage(&mut *dom.borrow_mut());
        }
    }) as Box<dyn FnMut(Event)>);
    listen(&window, "storage", closure);
}

fn schedule_sweeps(detector: &Rc<StrayToggleDetector>, dom: &Rc<RefCell<WebDom>>) {
    detector.sweep(&mut *dom.borrow_mut());

    let window = dom.borrow().window().clone();
    let schedule = SweepSchedule::from_config(detector.config());
    for delay in schedule.delayed() {
        let detector = Rc::clone(detector);
        let dom = Rc::clone(dom);
        let closure = Closure::wrap(Box::new(move || {
            detector.sweep(&mut *dom.borrow_mut());
        }) as Box<dyn FnMut()>);
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if let Err(err) = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), millis)
        {
            warn!(error = ?err, "failed to schedule sweep");
        }
        closure.forget();
    }
}

fn observe_mutations(
    detector: &Rc<StrayToggleDetector>,
    dom: &Rc<RefCell<WebDom>>,
) -> Option<MutationObserver> {
    let body = dom.borrow().body()?;
    let generation = dom.borrow().generation_handle();
    let mut watch = MutationWatch::new();
    let detector = Rc::clone(detector);
    let dom = Rc::clone(dom);

    let callback = Closure::wrap(Box::new(move |_records: JsValue| {
        generation.set(generation.get().wrapping_add(1));
        watch.sweep_if_changed(&detector, &mut *dom.borrow_mut());
    }) as Box<dyn FnMut(JsValue)>);

    let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
        Ok(observer) => observer,
        Err(err) => {
            warn!(error = ?err, "mutation observer unavailable");
            return None;
        }
    };
    callback.forget();

    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    if let Err(err) = observer.observe_with_options(&body, &init) {
        warn!(error = ?err, "failed to observe document body");
        return None;
    }
    Some(observer)
}
