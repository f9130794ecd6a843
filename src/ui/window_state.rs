//! Connects the main window to the window state store.
//!
//! Moves and resizes arrive through the winit window-event hook; the delayed
//! write is a single `slint::Timer` that is restarted rather than spawned, and
//! fires on the UI thread.

use crate::config::{PREFERENCES_NAMESPACE, WINDOW_STATE_SAVE_DELAY};
use crate::preferences::Preferences;
use crate::services::{ManagedWindow, WindowStateStore};
use i_slint_backend_winit::WinitWindowAccessor;
use i_slint_backend_winit::{EventResult, winit::event::WindowEvent};
use log::debug;
use slint::{ComponentHandle, LogicalPosition, LogicalSize, Timer, TimerMode};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// `ManagedWindow` over the Slint main window, in logical pixels.
pub struct SlintWindow {
    ui: slint::Weak<crate::AppWindow>,
}

impl SlintWindow {
    pub fn new(ui: slint::Weak<crate::AppWindow>) -> Self {
        Self { ui }
    }

    fn with_window<R>(&self, f: impl FnOnce(&slint::Window) -> R) -> Option<R> {
        self.ui.upgrade().map(|ui| f(ui.window()))
    }
}

impl ManagedWindow for SlintWindow {
    fn position(&self) -> (f64, f64) {
        self.with_window(|window| {
            let position = window.position().to_logical(window.scale_factor());
            (f64::from(position.x), f64::from(position.y))
        })
        .unwrap_or_default()
    }

    fn set_position(&self, x: f64, y: f64) {
        self.with_window(|window| {
            window.set_position(LogicalPosition::new(x as f32, y as f32));
        });
    }

    fn size(&self) -> (f64, f64) {
        self.with_window(|window| {
            let size = window.size().to_logical(window.scale_factor());
            (f64::from(size.width), f64::from(size.height))
        })
        .unwrap_or_default()
    }

    fn set_size(&self, width: f64, height: f64) {
        self.with_window(|window| {
            window.set_size(LogicalSize::new(width as f32, height as f32));
        });
    }

    fn is_maximized(&self) -> bool {
        self.with_window(|window| window.is_maximized())
            .unwrap_or(false)
    }

    fn set_maximized(&self, maximized: bool) {
        self.with_window(|window| window.set_maximized(maximized));
    }

    fn is_fullscreen(&self) -> bool {
        self.with_window(|window| window.is_fullscreen())
            .unwrap_or(false)
    }

    fn set_fullscreen(&self, fullscreen: bool) {
        self.with_window(|window| window.set_fullscreen(fullscreen));
    }

    fn is_minimized(&self) -> bool {
        self.with_window(|window| window.is_minimized())
            .unwrap_or(false)
    }
}

type SharedStore = Rc<RefCell<WindowStateStore<SlintWindow>>>;

/// Restores the saved window state and keeps it up to date until the window
/// is closed.
pub fn attach(app: &crate::AppWindow, preferences: Preferences) {
    let store: SharedStore = Rc::new(RefCell::new(WindowStateStore::register(
        preferences,
        PREFERENCES_NAMESPACE,
        SlintWindow::new(app.as_weak()),
        WINDOW_STATE_SAVE_DELAY,
    )));
    let timer = Rc::new(Timer::default());

    store.borrow().restore();

    app.window().on_winit_window_event({
        let store = store.clone();
        let timer = timer.clone();
        move |_window, event| {
            if matches!(event, WindowEvent::Moved(_) | WindowEvent::Resized(_)) {
                geometry_changed(&store, &timer);
            }
            EventResult::Propagate
        }
    });

    app.window().on_close_requested({
        let store = store.clone();
        let timer = timer.clone();
        move || {
            timer.stop();
            match store.try_borrow_mut() {
                Ok(mut store) => store.close(),
                Err(_) => debug!("Window state busy during close, skipping save"),
            }
            slint::CloseRequestResponse::HideWindow
        }
    });
}

fn geometry_changed(store: &SharedStore, timer: &Rc<Timer>) {
    let Ok(mut guard) = store.try_borrow_mut() else {
        return;
    };
    if !guard.geometry_changed(Instant::now()) {
        return;
    }
    let delay = guard.save_delay();
    drop(guard);

    let store = store.clone();
    timer.start(TimerMode::SingleShot, delay, move || {
        if let Ok(mut store) = store.try_borrow_mut() {
            if store.write_pending() {
                debug!("Window bounds saved");
            }
        }
    });
}
