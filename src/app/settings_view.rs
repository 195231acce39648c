//! Settings panel: four independent write-through preference controls.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement};

use super::{App, apply_theme, render_all, with_app};
use crate::i18n::Locale;
use crate::prefs::DEFAULT_API_URL;

pub(crate) fn build(doc: &Document) -> Result<Element, JsValue> {
    let panel = doc.create_element("div")?;
    panel.set_id("sb-page-settings");
    panel.set_class_name("settings-content");

    let title = doc.create_element("h1")?;
    title.set_id("sb-set-title");
    title.set_class_name("settings-page-title");
    panel.append_child(&title)?;

    let sections = doc.create_element("div")?;
    sections.set_class_name("settings-sections");

    // Theme
    let (section, item) = settings_section(doc, "sb-set-theme-title")?;
    let theme_box = checkbox(doc, "sb-set-theme")?;
    item.append_child(&theme_box)?;
    let theme_label = doc.create_element("span")?;
    theme_label.set_id("sb-set-theme-label");
    theme_label.set_class_name("settings-checkbox-label");
    item.append_child(&theme_label)?;
    sections.append_child(&section)?;

    // Language
    let (section, item) = settings_section(doc, "sb-set-lang-title")?;
    let select = doc.create_element("select")?;
    select.set_id("sb-set-lang");
    select.set_class_name("settings-select");
    for locale in Locale::ALL {
        let option = doc.create_element("option")?;
        option.set_attribute("value", locale.as_tag())?;
        option.set_text_content(Some(locale.display_name()));
        select.append_child(&option)?;
    }
    item.append_child(&select)?;
    sections.append_child(&section)?;

    // Notifications
    let (section, item) = settings_section(doc, "sb-set-notif-title")?;
    let notif_box = checkbox(doc, "sb-set-notif")?;
    item.append_child(&notif_box)?;
    let notif_label = doc.create_element("span")?;
    notif_label.set_id("sb-set-notif-label");
    notif_label.set_class_name("settings-checkbox-label");
    item.append_child(&notif_label)?;
    sections.append_child(&section)?;

    // API base URL (free text, not validated)
    let (section, item) = settings_section(doc, "sb-set-api-title")?;
    let api_label = doc.create_element("label")?;
    api_label.set_id("sb-set-api-label");
    api_label.set_class_name("settings-label");
    item.append_child(&api_label)?;
    let api_input = doc.create_element("input")?;
    api_input.set_id("sb-set-api");
    api_input.set_class_name("settings-input");
    api_input.set_attribute("type", "text")?;
    api_input.set_attribute("placeholder", DEFAULT_API_URL)?;
    item.append_child(&api_input)?;
    sections.append_child(&section)?;

    // About
    let (section, item) = settings_section(doc, "sb-set-about-title")?;
    for id in ["sb-set-version", "sb-set-desc", "sb-set-copyright"] {
        let p = doc.create_element("p")?;
        p.set_id(id);
        p.set_class_name("settings-about-text");
        item.append_child(&p)?;
    }
    sections.append_child(&section)?;

    panel.append_child(&sections)?;

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            with_app(|app| {
                let next = app.prefs.theme.toggled();
                app.prefs.set_theme(next);
                if let Some(doc) = super::document() {
                    apply_theme(&doc, next);
                }
                render_all(app);
            });
        }) as Box<dyn FnMut(_)>);
        theme_box.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            let Some(select) = evt
                .target()
                .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
            else {
                return;
            };
            let locale = Locale::from_tag(&select.value());
            with_app(|app| {
                app.prefs.set_locale(locale);
                app.translator.set_locale(locale);
                render_all(app);
            });
        }) as Box<dyn FnMut(_)>);
        select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            let Some(input) = evt
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            with_app(|app| {
                app.prefs.set_notifications(input.checked());
                render_all(app);
            });
        }) as Box<dyn FnMut(_)>);
        notif_box.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        // Persist on every keystroke; the field has no apply button.
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            let Some(input) = evt
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            with_app(|app| {
                app.prefs.set_api_base_url(&input.value());
            });
        }) as Box<dyn FnMut(_)>);
        api_input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(panel)
}

fn settings_section(doc: &Document, title_id: &str) -> Result<(Element, Element), JsValue> {
    let section = doc.create_element("div")?;
    section.set_class_name("settings-section");
    let title = doc.create_element("h2")?;
    title.set_id(title_id);
    title.set_class_name("settings-section-title");
    section.append_child(&title)?;
    let item = doc.create_element("div")?;
    item.set_class_name("settings-item");
    section.append_child(&item)?;
    Ok((section, item))
}

fn checkbox(doc: &Document, id: &str) -> Result<Element, JsValue> {
    let input = doc.create_element("input")?;
    input.set_id(id);
    input.set_attribute("type", "checkbox")?;
    Ok(input)
}

pub(crate) fn render(app: &App, doc: &Document) {
    let t = &app.translator;
    let texts: [(&str, String); 9] = [
        ("sb-set-title", t.t("settings.title")),
        ("sb-set-theme-title", t.t("settings.theme")),
        ("sb-set-theme-label", t.t("settings.darkMode")),
        ("sb-set-lang-title", t.t("settings.language")),
        ("sb-set-notif-title", t.t("settings.notifications")),
        ("sb-set-notif-label", t.t("settings.receiveNotifications")),
        ("sb-set-api-title", t.t("settings.api")),
        ("sb-set-about-title", t.t("settings.about")),
        ("sb-set-api-label", format!("{}:", t.t("settings.apiUrl"))),
    ];
    for (id, text) in texts {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(&text));
        }
    }
    for (id, key) in [
        ("sb-set-version", "settings.version"),
        ("sb-set-desc", "settings.description"),
        ("sb-set-copyright", "settings.copyright"),
    ] {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(&t.t(key)));
        }
    }

    if let Some(input) = doc
        .get_element_by_id("sb-set-theme")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_checked(app.prefs.theme == crate::prefs::Theme::Dark);
    }
    if let Some(select) = doc
        .get_element_by_id("sb-set-lang")
        .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
    {
        select.set_value(app.prefs.locale.as_tag());
    }
    if let Some(input) = doc
        .get_element_by_id("sb-set-notif")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_checked(app.prefs.notifications_enabled);
    }
    if let Some(input) = doc
        .get_element_by_id("sb-set-api")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        // Leave the field alone while the user is typing in it.
        let focused = doc
            .active_element()
            .is_some_and(|el| el.id() == "sb-set-api");
        if !focused {
            input.set_value(&app.prefs.api_base_url);
        }
    }
}
