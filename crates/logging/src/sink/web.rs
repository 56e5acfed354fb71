//! crates/logging/src/sink/web.rs
//! Browser bindings: the console, `localStorage`, and the control surface.

use js_sys::{Array, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::console;

use super::{Channel, Console, SinkError, Storage, StyledLine};
use crate::control::ControlHandler;

/// Console writing through the browser's `console` object.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserConsole;

impl Console for BrowserConsole {
    fn emit(&mut self, line: &StyledLine) -> Result<(), SinkError> {
        let data = Array::new();
        data.push(&JsValue::from_str(&line.format));
        for value in line.styles.iter().chain(&line.args) {
            data.push(&JsValue::from_str(value));
        }

        match line.channel {
            Channel::Debug => console::debug(&data),
            Channel::Info => console::info(&data),
            Channel::Warn => console::warn(&data),
            Channel::Error => console::error(&data),
        }
        Ok(())
    }
}

/// Store backed by `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn handle() -> Result<web_sys::Storage, SinkError> {
        web_sys::window()
            .ok_or(SinkError::Unavailable("window"))?
            .local_storage()
            .map_err(js_error)?
            .ok_or(SinkError::Unavailable("localStorage"))
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SinkError> {
        Self::handle()?.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SinkError> {
        Self::handle()?.set_item(key, value).map_err(js_error)
    }
}

/// Installs `window[namespace]` as a function passing its argument to
/// `handler` and returning the reply.
pub fn install_control_surface(namespace: &str, handler: ControlHandler) -> Result<(), SinkError> {
    let window = web_sys::window().ok_or(SinkError::Unavailable("window"))?;

    let function =
        Closure::<dyn Fn(String) -> String>::new(move |input: String| handler(&input));

    Reflect::set(&window, &JsValue::from_str(namespace), function.as_ref()).map_err(js_error)?;
    // The function stays reachable from `window` for the life of the page.
    function.forget();
    Ok(())
}

fn js_error(value: JsValue) -> SinkError {
    SinkError::Storage(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}
