//! Browser page controller - the wasm-exported entry point.
//!
//! `LinkBoard::start` runs the whole pass once: fetch the workbook, build
//! the card model, render and mount the tree, then wire the search controls
//! and wide-card hover. There is no other lifecycle; a failed fetch or
//! decode aborts the pass and reports to the console only.

mod dom;
mod events;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Response};

use crate::aggregate::aggregate;
use crate::error::LinkdeckError;
use crate::filter;
use crate::normalize::normalize_rows;
use crate::reader;
use crate::render::render_page;
use crate::types::ElementNode;
use crate::LINKS_SHEET_NAME;

use dom::{set_displayed, CardDom};

/// Where the workbook lives unless the host passes another URL.
pub const DEFAULT_WORKBOOK_URL: &str = "/data/links.xlsx";

/// Render target container.
const BLOCKS_ID: &str = "blocks";
const SEARCH_INPUT_ID: &str = "searchInput";
const CLEAR_BTN_ID: &str = "clearBtn";
const SEARCH_FORM_ID: &str = "searchForm";

/// Shared state the event closures work against.
pub(crate) struct BoardState {
    pub(crate) document: Document,
    /// The mount container; `None` when the page has no `#blocks`, in which
    /// case the whole render pass is a silent no-op.
    pub(crate) blocks: Option<Element>,
    /// The rendered tree; source of truth for the filter.
    pub(crate) tree: ElementNode,
    pub(crate) cards: Vec<CardDom>,
    pub(crate) input: Option<HtmlInputElement>,
    pub(crate) wide_cards: Vec<WideCardState>,
}

/// Per-wide-card hover state: the element plus its cancellable close timer.
pub(crate) struct WideCardState {
    pub(crate) element: HtmlElement,
    pub(crate) close_timer: Option<i32>,
    pub(crate) close_closure: Option<Closure<dyn FnMut()>>,
}

/// The page controller exported to JavaScript.
#[wasm_bindgen]
pub struct LinkBoard {
    state: Rc<RefCell<BoardState>>,
    #[allow(dead_code)] // Kept alive for the listeners' lifetime
    closures: Vec<Closure<dyn FnMut(web_sys::Event)>>,
}

#[wasm_bindgen]
impl LinkBoard {
    /// One-shot startup: fetch, build, mount, wire. The hosting page calls
    /// this exactly once when it is ready.
    ///
    /// # Errors
    /// Fetch and decode failures reject the returned promise after logging
    /// to the console; nothing is rendered in that case.
    pub async fn start(url: Option<String>) -> Result<LinkBoard, JsValue> {
        console_error_panic_hook::set_once();
        let url = url.unwrap_or_else(|| DEFAULT_WORKBOOK_URL.to_string());

        match Self::build(&url).await {
            Ok(board) => Ok(board),
            Err(err) => {
                web_sys::console::error_1(&err);
                Err(err)
            }
        }
    }

    /// Apply the search filter programmatically, as if typed into the field.
    pub fn search(&self, query: &str) {
        run_filter(&self.state, query);
    }

    /// Number of cards currently rendered.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.state.borrow().cards.len()
    }

    async fn build(url: &str) -> Result<LinkBoard, JsValue> {
        let bytes = fetch_workbook(url).await?;
        let records = reader::read_rows(&bytes, LINKS_SHEET_NAME).map_err(JsValue::from)?;
        let cards_model = aggregate(normalize_rows(&records));
        let tree = render_page(&cards_model);

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let blocks = document.get_element_by_id(BLOCKS_ID);

        let (cards, wide_cards) = match &blocks {
            Some(container) => {
                let mounted = dom::mount(&document, container, &tree)?;
                (mounted.cards, mounted.wide_cards)
            }
            None => (Vec::new(), Vec::new()),
        };

        let state = Rc::new(RefCell::new(BoardState {
            document,
            blocks,
            tree,
            cards,
            input: None,
            wide_cards: wide_cards
                .into_iter()
                .map(|element| WideCardState {
                    element,
                    close_timer: None,
                    close_closure: None,
                })
                .collect(),
        }));

        let mut closures = Vec::new();
        if state.borrow().blocks.is_some() {
            events::wire_search(&state, &mut closures)?;
            events::wire_wide_cards(&state, &mut closures)?;
        }

        Ok(LinkBoard { state, closures })
    }
}

/// Run one filter pass: recompute visibility over the tree, then mirror it
/// onto the mounted elements and the container's results flag.
pub(crate) fn run_filter(state: &Rc<RefCell<BoardState>>, query: &str) {
    // Compute against the tree and clone the handles first; the state borrow
    // is dropped before any DOM mutation.
    let (outcome, cards, blocks) = {
        let mut s = state.borrow_mut();
        let tree = &mut s.tree;
        let outcome = filter::apply(tree, query);
        (outcome, s.cards.clone(), s.blocks.clone())
    };

    for (card, visibility) in cards.iter().zip(outcome.cards.iter()) {
        for (line, &line_visible) in card.lines.iter().zip(visibility.lines.iter()) {
            set_displayed(line, line_visible);
        }
        set_displayed(&card.element, visibility.visible);
    }

    if let Some(blocks) = blocks {
        let _ = blocks.set_attribute(
            "data-hasresults",
            if outcome.any_visible { "1" } else { "0" },
        );
    }
}

/// GET the workbook and hand back its bytes.
async fn fetch_workbook(url: &str) -> Result<Vec<u8>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let response_value = JsFuture::from(window.fetch_with_str(url)).await?;
    let response: Response = response_value.dyn_into()?;
    if !response.ok() {
        return Err(LinkdeckError::Fetch(response.status()).into());
    }

    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
