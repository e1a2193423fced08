//! Search and wide-card event wiring for the page controller.
//!
//! All handlers share the controller's state through `Rc<RefCell<_>>` and
//! follow the borrow-then-mutate-DOM discipline: state borrows are dropped
//! before any DOM call that could observe the page.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlInputElement;

use super::{run_filter, BoardState, CLEAR_BTN_ID, SEARCH_FORM_ID, SEARCH_INPUT_ID};

/// Delay before a wide card closes after the pointer leaves it.
const WIDE_CLOSE_DELAY_MS: i32 = 200;

/// Wire the search input, clear button, and form submit.
///
/// Wiring is all-or-nothing like the page it serves: when any of the three
/// controls is missing, none are wired. Ends by running the filter once with
/// an empty query to establish baseline visibility.
pub(crate) fn wire_search(
    state: &Rc<RefCell<BoardState>>,
    closures: &mut Vec<Closure<dyn FnMut(web_sys::Event)>>,
) -> Result<(), JsValue> {
    let document = state.borrow().document.clone();

    let input = document
        .get_element_by_id(SEARCH_INPUT_ID)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
    let clear_btn = document.get_element_by_id(CLEAR_BTN_ID);
    let form = document.get_element_by_id(SEARCH_FORM_ID);

    let (Some(input), Some(clear_btn), Some(form)) = (input, clear_btn, form) else {
        return Ok(());
    };

    state.borrow_mut().input = Some(input.clone());

    // Live filtering on every keystroke.
    {
        let state = state.clone();
        let input = input.clone();
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
            run_filter(&state, &input.value());
        }) as Box<dyn FnMut(web_sys::Event)>);
        input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closures.push(closure);
    }

    // Clear resets the field, restores visibility, and refocuses.
    {
        let state = state.clone();
        let input = input.clone();
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
            input.set_value("");
            run_filter(&state, "");
            let _ = input.focus();
        }) as Box<dyn FnMut(web_sys::Event)>);
        clear_btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closures.push(closure);
    }

    // Submit opens an external web search; empty queries do nothing.
    {
        let input = input.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            event.prevent_default();
            let term = input.value().trim().to_string();
            if term.is_empty() {
                return;
            }
            let encoded = String::from(js_sys::encode_uri_component(&term));
            let url = format!("https://www.google.com/search?q={encoded}");
            if let Some(window) = web_sys::window() {
                let _ = window.open_with_url_and_target_and_features(&url, "_blank", "noopener");
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
        closures.push(closure);
    }

    // Initial state: everything visible.
    run_filter(state, "");

    Ok(())
}

/// Wire hover open/close plus header click-toggle for every wide card.
///
/// Each card owns its close timer: re-entering the card cancels the pending
/// close, leaving schedules one, and the header click toggles the open state
/// independent of hover timing.
pub(crate) fn wire_wide_cards(
    state: &Rc<RefCell<BoardState>>,
    closures: &mut Vec<Closure<dyn FnMut(web_sys::Event)>>,
) -> Result<(), JsValue> {
    let count = state.borrow().wide_cards.len();

    for index in 0..count {
        let element = {
            let s = state.borrow();
            let Some(wide) = s.wide_cards.get(index) else {
                continue;
            };
            wide.element.clone()
        };

        // Pointer enters: cancel any pending close, open immediately.
        {
            let state = state.clone();
            let element = element.clone();
            let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
                cancel_close(&state, index);
                let _ = element.class_list().add_1("open");
            }) as Box<dyn FnMut(web_sys::Event)>);
            element
                .add_event_listener_with_callback("mouseenter", closure.as_ref().unchecked_ref())?;
            closures.push(closure);
        }

        // Pointer leaves: close after a grace delay unless re-entered.
        {
            let state = state.clone();
            let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
                schedule_close(&state, index);
            }) as Box<dyn FnMut(web_sys::Event)>);
            element
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
            closures.push(closure);
        }

        // Header click toggles regardless of hover timing.
        if let Ok(Some(header)) = element.query_selector("h2") {
            let element = element.clone();
            let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
                let _ = element.class_list().toggle("open");
            }) as Box<dyn FnMut(web_sys::Event)>);
            header.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closures.push(closure);
        }
    }

    Ok(())
}

/// Cancel the pending close timer of one wide card, if any.
fn cancel_close(state: &Rc<RefCell<BoardState>>, index: usize) {
    let timer = {
        let mut s = state.borrow_mut();
        s.wide_cards
            .get_mut(index)
            .and_then(|wide| wide.close_timer.take())
    };
    if let (Some(timer), Some(window)) = (timer, web_sys::window()) {
        window.clear_timeout_with_handle(timer);
    }
}

/// Replace the card's close timer with a fresh one.
fn schedule_close(state: &Rc<RefCell<BoardState>>, index: usize) {
    cancel_close(state, index);

    let Some(window) = web_sys::window() else {
        return;
    };

    let element = {
        let s = state.borrow();
        let Some(wide) = s.wide_cards.get(index) else {
            return;
        };
        wide.element.clone()
    };

    let state_for_timer = state.clone();
    let close = Closure::wrap(Box::new(move || {
        let _ = element.class_list().remove_1("open");
        let mut s = state_for_timer.borrow_mut();
        if let Some(wide) = s.wide_cards.get_mut(index) {
            wide.close_timer = None;
        }
    }) as Box<dyn FnMut()>);

    let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        close.as_ref().unchecked_ref(),
        WIDE_CLOSE_DELAY_MS,
    );

    let mut s = state.borrow_mut();
    if let Some(wide) = s.wide_cards.get_mut(index) {
        match handle {
            Ok(timer) => {
                wide.close_timer = Some(timer);
                // Hold the closure for as long as the timer can fire.
                wide.close_closure = Some(close);
            }
            Err(_) => {
                wide.close_timer = None;
                wide.close_closure = None;
            }
        }
    }
}
