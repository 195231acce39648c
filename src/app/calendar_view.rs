//! Calendar panel: paints the pure month grid and today's advisory.

use chrono::{Datelike, Local, NaiveDate};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use super::{App, render_all, with_app};
use crate::almanac;
use crate::calendar::{add_months, month_grid};

/// Displayed month; navigation always anchors on day 1.
pub(crate) struct CalendarPanel {
    pub year: i32,
    pub month: u32,
}

impl CalendarPanel {
    pub(crate) fn new() -> Self {
        let today = today();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn build(doc: &Document) -> Result<Element, JsValue> {
    let panel = doc.create_element("div")?;
    panel.set_id("sb-page-calendar");
    panel.set_class_name("calendar-content");

    let title = doc.create_element("h1")?;
    title.set_id("sb-cal-page-title");
    title.set_class_name("calendar-page-title");
    panel.append_child(&title)?;

    let container = doc.create_element("div")?;
    container.set_class_name("calendar-container");

    let header = doc.create_element("div")?;
    header.set_class_name("calendar-header");
    let month_title = doc.create_element("div")?;
    month_title.set_id("sb-cal-title");
    month_title.set_class_name("calendar-title");
    header.append_child(&month_title)?;
    let nav = doc.create_element("div")?;
    nav.set_class_name("calendar-nav");
    let prev = doc.create_element("button")?;
    prev.set_attribute("data-action", "prev")?;
    prev.set_text_content(Some("‹"));
    nav.append_child(&prev)?;
    let next = doc.create_element("button")?;
    next.set_attribute("data-action", "next")?;
    next.set_text_content(Some("›"));
    nav.append_child(&next)?;
    header.append_child(&nav)?;
    container.append_child(&header)?;

    let grid = doc.create_element("div")?;
    grid.set_id("sb-cal-grid");
    grid.set_class_name("calendar-grid");
    container.append_child(&grid)?;

    let advice = doc.create_element("div")?;
    advice.set_class_name("calendar-advice");
    let advice_title = doc.create_element("h4")?;
    advice_title.set_id("sb-cal-advice-title");
    advice.append_child(&advice_title)?;
    let advice_content = doc.create_element("div")?;
    advice_content.set_id("sb-cal-advice");
    advice_content.set_class_name("calendar-advice-content");
    advice.append_child(&advice_content)?;
    container.append_child(&advice)?;

    panel.append_child(&container)?;

    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            let Some(target) = evt.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Some(action) = target.get_attribute("data-action") else {
                return;
            };
            let delta = match action.as_str() {
                "prev" => -1,
                "next" => 1,
                _ => return,
            };
            with_app(|app| {
                let (year, month) = add_months(app.calendar.year, app.calendar.month, delta);
                app.calendar.year = year;
                app.calendar.month = month;
                render_all(app);
            });
        }) as Box<dyn FnMut(_)>);
        nav.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(panel)
}

pub(crate) fn render(app: &App, doc: &Document) {
    let t = &app.translator;
    if let Some(el) = doc.get_element_by_id("sb-cal-page-title") {
        el.set_text_content(Some(&t.t("calendar.title")));
    }
    if let Some(el) = doc.get_element_by_id("sb-cal-title") {
        el.set_text_content(Some(&format!("{}年{}月", app.calendar.year, app.calendar.month)));
    }
    if let Some(el) = doc.get_element_by_id("sb-cal-advice-title") {
        el.set_text_content(Some(&format!(
            "{} {}/{}",
            t.t("calendar.today"),
            t.t("calendar.favorable"),
            t.t("calendar.unfavorable")
        )));
    }

    let today = today();
    let grid = month_grid(app.calendar.year, app.calendar.month, today);
    if let Some(el) = doc.get_element_by_id("sb-cal-grid") {
        let mut html = String::new();
        for day in 0..7 {
            html.push_str(&format!(
                "<div class=\"calendar-day-header\">{}</div>",
                t.t(&format!("calendar.day.{day}"))
            ));
        }
        for cell in &grid {
            let mut class = String::from("calendar-day");
            if !cell.in_displayed_month {
                class.push_str(" other-month");
            }
            if cell.is_today {
                class.push_str(" today");
            }
            html.push_str(&format!(
                "<div class=\"{class}\"><div class=\"calendar-day-solar\">{}</div>\
                 <div class=\"calendar-day-lunar\">{}</div></div>",
                cell.solar_day,
                cell.lunar.label()
            ));
        }
        el.set_inner_html(&html);
    }

    // Advisory follows the today cell; browsing other months leaves the last
    // shown advisory standing.
    if grid.iter().any(|c| c.is_today) {
        if let Some(el) = doc.get_element_by_id("sb-cal-advice") {
            let advice = almanac::advice_for(today);
            let mut html = String::new();
            for item in advice.favorable {
                html.push_str(&format!(
                    "<div class=\"calendar-advice-item favorable\">{item}</div>"
                ));
            }
            for item in advice.unfavorable {
                html.push_str(&format!(
                    "<div class=\"calendar-advice-item unfavorable\">{item}</div>"
                ));
            }
            el.set_inner_html(&html);
        }
    }
}
