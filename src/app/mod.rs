//! Browser shell: thread-local app state, navigation and panel mounting.
//!
//! All DOM wiring lives under this module; the panels delegate every decision
//! to the pure modules (`chat`, `calendar`, `game`, `i18n`, `prefs`) and only
//! paint their state. Event listeners follow the `Closure::wrap` + `forget`
//! pattern for chrome that lives as long as the page; per-connection socket
//! callbacks are stored so they drop when the socket is replaced.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::i18n::Translator;
use crate::prefs::{Preferences, Theme};

mod calendar_view;
mod chat_view;
mod game_view;
mod settings_view;

/// The four panels behind the nav bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Page {
    Chat,
    Calendar,
    Game,
    Settings,
}

impl Page {
    pub(crate) const ALL: [Page; 4] = [Page::Chat, Page::Calendar, Page::Game, Page::Settings];

    pub(crate) fn container_id(self) -> &'static str {
        match self {
            Page::Chat => "sb-page-chat",
            Page::Calendar => "sb-page-calendar",
            Page::Game => "sb-page-game",
            Page::Settings => "sb-page-settings",
        }
    }

    pub(crate) fn nav_id(self) -> &'static str {
        match self {
            Page::Chat => "sb-nav-chat",
            Page::Calendar => "sb-nav-calendar",
            Page::Game => "sb-nav-game",
            Page::Settings => "sb-nav-settings",
        }
    }

    pub(crate) fn nav_key(self) -> &'static str {
        match self {
            Page::Chat => "nav.chat",
            Page::Calendar => "nav.calendar",
            Page::Game => "nav.game",
            Page::Settings => "nav.settings",
        }
    }

    fn from_attr(value: &str) -> Option<Page> {
        match value {
            "chat" => Some(Page::Chat),
            "calendar" => Some(Page::Calendar),
            "game" => Some(Page::Game),
            "settings" => Some(Page::Settings),
            _ => None,
        }
    }

    fn attr(self) -> &'static str {
        match self {
            Page::Chat => "chat",
            Page::Calendar => "calendar",
            Page::Game => "game",
            Page::Settings => "settings",
        }
    }
}

/// Whole-app state behind the thread-local cell.
pub(crate) struct App {
    pub prefs: Preferences,
    pub translator: Translator,
    pub page: Page,
    pub chat: chat_view::ChatPanel,
    pub calendar: calendar_view::CalendarPanel,
    pub game: game_view::GamePanel,
}

thread_local! {
    pub(crate) static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Run `f` against the mounted app state, if any.
pub(crate) fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            f(app);
        }
    });
}

pub(crate) fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

/// Build the shell, restore preferences and enter the chat panel.
pub(crate) fn mount() -> Result<(), JsValue> {
    let doc = document().ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let prefs = Preferences::load();
    let translator = Translator::new(prefs.locale);
    apply_theme(&doc, prefs.theme);

    // Root container; re-mounting replaces any previous instance.
    if let Some(old) = doc.get_element_by_id("sb-root") {
        old.remove();
    }
    let root = doc.create_element("div")?;
    root.set_id("sb-root");

    let nav = doc.create_element("nav")?;
    nav.set_id("sb-nav");
    let brand = doc.create_element("span")?;
    brand.set_id("sb-brand");
    brand.set_text_content(Some("Soulbit"));
    nav.append_child(&brand)?;
    for page in Page::ALL {
        let link = doc.create_element("button")?;
        link.set_id(page.nav_id());
        link.set_class_name("sb-nav-link");
        link.set_attribute("data-page", page.attr())?;
        nav.append_child(&link)?;
    }
    root.append_child(&nav)?;

    let main = doc.create_element("main")?;
    main.set_id("sb-main");
    main.append_child(&chat_view::build(&doc)?.into())?;
    main.append_child(&calendar_view::build(&doc)?.into())?;
    main.append_child(&game_view::build(&doc)?.into())?;
    main.append_child(&settings_view::build(&doc)?.into())?;
    root.append_child(&main)?;
    body.append_child(&root)?;

    // One delegated click listener drives the nav.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            let Some(target) = evt.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Some(page) = target
                .get_attribute("data-page")
                .and_then(|v| Page::from_attr(&v))
            else {
                return;
            };
            with_app(|app| switch_page(app, page));
        }) as Box<dyn FnMut(_)>);
        nav.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let app = App {
        prefs,
        translator,
        page: Page::Chat,
        chat: chat_view::ChatPanel::new(),
        calendar: calendar_view::CalendarPanel::new(),
        game: game_view::GamePanel::new(),
    };
    APP.with(|cell| cell.replace(Some(app)));

    with_app(|app| {
        chat_view::enter(app);
        render_all(app);
    });
    Ok(())
}

/// Switch the visible panel. Leaving the chat panel tears its socket down;
/// entering it reconnects.
pub(crate) fn switch_page(app: &mut App, page: Page) {
    if app.page == page {
        return;
    }
    match app.page {
        Page::Chat => chat_view::leave(app),
        Page::Game => game_view::leave(app),
        _ => {}
    }
    app.page = page;
    if page == Page::Chat {
        chat_view::enter(app);
    }
    render_all(app);
}

/// Repaint nav labels, panel visibility and the active panel's content.
pub(crate) fn render_all(app: &App) {
    let Some(doc) = document() else { return };
    for page in Page::ALL {
        if let Some(link) = doc.get_element_by_id(page.nav_id()) {
            link.set_text_content(Some(&app.translator.t(page.nav_key())));
            let class = if page == app.page {
                "sb-nav-link active"
            } else {
                "sb-nav-link"
            };
            link.set_class_name(class);
        }
        if let Some(panel) = doc.get_element_by_id(page.container_id()) {
            let style = if page == app.page { "" } else { "display:none" };
            panel.set_attribute("style", style).ok();
        }
    }
    chat_view::render(app, &doc);
    calendar_view::render(app, &doc);
    game_view::render(app, &doc);
    settings_view::render(app, &doc);
}

/// Reflect the theme on the document root for CSS variable switching.
pub(crate) fn apply_theme(doc: &Document, theme: Theme) {
    if let Some(root) = doc.document_element() {
        root.set_attribute("data-theme", theme.as_str()).ok();
    }
}
