//! Chat panel: socket lifecycle around the pure `ChatSession`.
//!
//! Each socket instance carries a generation number; callbacks compare it
//! against the panel's current generation and ignore themselves when stale
//! (panel left, or a reconnect already replaced the socket). Reconnects follow
//! the session's `ReconnectPolicy` and stop once it is exhausted.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CloseEvent, Document, Element, Event, HtmlTextAreaElement, MessageEvent, WebSocket};

use super::{App, render_all, with_app};
use crate::chat::{ChatSession, ConnectionState, FrameOutcome, ReconnectPolicy, Role, SendOutcome};
use crate::net;

/// Result of the one-shot liveness probe.
pub(crate) enum HelloStatus {
    Ok(String),
    Failed,
}

/// Closures currently attached to the live socket. Dropping this after
/// detaching releases them with the socket instance.
struct SocketCallbacks {
    _onopen: Closure<dyn FnMut()>,
    _onmessage: Closure<dyn FnMut(MessageEvent)>,
    _onerror: Closure<dyn FnMut(Event)>,
    _onclose: Closure<dyn FnMut(CloseEvent)>,
}

pub(crate) struct ChatPanel {
    pub session: ChatSession,
    socket: Option<WebSocket>,
    callbacks: Option<SocketCallbacks>,
    /// Bumped for every socket instance and on panel teardown; the guard
    /// against late callbacks from superseded sockets.
    generation: u32,
    attempts: u32,
    policy: ReconnectPolicy,
    reconnect_pending: bool,
    pub hello: Option<HelloStatus>,
}

impl ChatPanel {
    pub(crate) fn new() -> Self {
        Self {
            session: ChatSession::new(),
            socket: None,
            callbacks: None,
            generation: 0,
            attempts: 0,
            policy: ReconnectPolicy::default(),
            reconnect_pending: false,
            hello: None,
        }
    }
}

/// Static chrome for the chat panel; dynamic content is painted by `render`.
pub(crate) fn build(doc: &Document) -> Result<Element, JsValue> {
    let panel = doc.create_element("div")?;
    panel.set_id("sb-page-chat");
    panel.set_class_name("chat-container");

    let header = doc.create_element("div")?;
    header.set_class_name("chat-header");
    let title = doc.create_element("h1")?;
    title.set_id("sb-chat-title");
    header.append_child(&title)?;
    let hello = doc.create_element("div")?;
    hello.set_id("sb-chat-hello");
    hello.set_class_name("chat-status");
    header.append_child(&hello)?;
    let conn = doc.create_element("div")?;
    conn.set_id("sb-chat-conn");
    header.append_child(&conn)?;
    panel.append_child(&header)?;

    let messages = doc.create_element("div")?;
    messages.set_id("sb-chat-messages");
    messages.set_class_name("chat-messages");
    panel.append_child(&messages)?;

    let input_area = doc.create_element("div")?;
    input_area.set_class_name("chat-input-area");
    let form = doc.create_element("form")?;
    form.set_id("sb-chat-form");
    form.set_class_name("chat-form");
    let input = doc.create_element("textarea")?;
    input.set_id("sb-chat-input");
    input.set_attribute("rows", "3")?;
    form.append_child(&input)?;
    let send = doc.create_element("button")?;
    send.set_id("sb-chat-send");
    send.set_attribute("type", "submit")?;
    form.append_child(&send)?;
    input_area.append_child(&form)?;
    panel.append_child(&input_area)?;

    {
        let closure = Closure::wrap(Box::new(move |evt: Event| {
            evt.prevent_default();
            with_app(|app| submit(app));
        }) as Box<dyn FnMut(_)>);
        form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        // Enter sends, Shift+Enter keeps the newline.
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if evt.key() == "Enter" && !evt.shift_key() {
                evt.prevent_default();
                with_app(|app| submit(app));
            }
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(panel)
}

/// Entering the panel: probe the gateway and open a fresh socket.
pub(crate) fn enter(app: &mut App) {
    app.chat.hello = None;
    let base = app.prefs.api_base_url.clone();
    spawn_local(async move {
        let result = net::fetch_hello(&base).await;
        with_app(|app| {
            app.chat.hello = Some(match result {
                Ok(message) => HelloStatus::Ok(message),
                Err(_) => HelloStatus::Failed,
            });
            render_all(app);
        });
    });

    app.chat.attempts = 0;
    app.chat.reconnect_pending = false;
    connect_socket(app);
}

/// Leaving the panel: orphan all callbacks, close the socket. Late frames
/// from this socket are ignored via the generation bump.
pub(crate) fn leave(app: &mut App) {
    app.chat.generation += 1;
    app.chat.reconnect_pending = false;
    if let Some(socket) = app.chat.socket.take() {
        detach(&socket);
        socket.close().ok();
    }
    app.chat.callbacks = None;
    app.chat.session.closed();
}

/// Open a new socket instance and wire its callbacks to the session.
fn connect_socket(app: &mut App) {
    if let Some(old) = app.chat.socket.take() {
        detach(&old);
        old.close().ok();
    }
    app.chat.generation += 1;
    let generation = app.chat.generation;
    app.chat.session.connect_started();

    let url = net::ws_endpoint(&app.prefs.api_base_url);
    let socket = match WebSocket::new(&url) {
        Ok(socket) => socket,
        Err(_) => {
            app.chat.session.open_failed();
            schedule_reconnect(app);
            return;
        }
    };

    let onopen = Closure::wrap(Box::new(move || {
        web_sys::console::log_1(&"chat socket open".into());
        with_app(|app| {
            if app.chat.generation != generation {
                return;
            }
            app.chat.attempts = 0;
            app.chat.session.opened();
            render_all(app);
        });
    }) as Box<dyn FnMut()>);

    let onmessage = Closure::wrap(Box::new(move |evt: MessageEvent| {
        with_app(|app| {
            if app.chat.generation != generation {
                return;
            }
            let raw = evt.data().as_string().unwrap_or_default();
            match app.chat.session.handle_frame(&raw) {
                FrameOutcome::Dropped => {
                    web_sys::console::warn_1(&"chat frame without role or error dropped".into());
                }
                FrameOutcome::Malformed => {
                    web_sys::console::warn_1(&"chat frame was not valid JSON".into());
                }
                FrameOutcome::Appended | FrameOutcome::ServerError => {}
            }
            render_all(app);
        });
    }) as Box<dyn FnMut(_)>);

    let onerror = Closure::wrap(Box::new(move |_evt: Event| {
        web_sys::console::warn_1(&"chat socket error".into());
        with_app(|app| {
            if app.chat.generation != generation {
                return;
            }
            if app.chat.session.state() == ConnectionState::Connecting {
                app.chat.session.open_failed();
            } else {
                app.chat.session.transport_error();
            }
            schedule_reconnect(app);
            render_all(app);
        });
    }) as Box<dyn FnMut(_)>);

    let onclose = Closure::wrap(Box::new(move |_evt: CloseEvent| {
        with_app(|app| {
            if app.chat.generation != generation {
                return;
            }
            web_sys::console::log_1(&"chat socket closed".into());
            if app.chat.session.state() == ConnectionState::Connecting {
                // Open never happened; the error handler usually fired first,
                // but some engines only deliver close.
                app.chat.session.open_failed();
            } else {
                app.chat.session.closed();
            }
            schedule_reconnect(app);
            render_all(app);
        });
    }) as Box<dyn FnMut(_)>);

    socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));

    app.chat.callbacks = Some(SocketCallbacks {
        _onopen: onopen,
        _onmessage: onmessage,
        _onerror: onerror,
        _onclose: onclose,
    });
    app.chat.socket = Some(socket);
}

fn detach(socket: &WebSocket) {
    socket.set_onopen(None);
    socket.set_onmessage(None);
    socket.set_onerror(None);
    socket.set_onclose(None);
}

/// Queue the next reconnect attempt per the backoff policy. One pending
/// attempt at a time; exhaustion leaves the surfaced error standing.
fn schedule_reconnect(app: &mut App) {
    if app.chat.reconnect_pending {
        return;
    }
    if app.chat.policy.exhausted(app.chat.attempts) {
        web_sys::console::warn_1(&"chat reconnect attempts exhausted".into());
        return;
    }
    let delay = app.chat.policy.delay_for(app.chat.attempts);
    app.chat.attempts += 1;
    app.chat.reconnect_pending = true;
    let expected = app.chat.generation;

    let callback = Closure::once_into_js(move || {
        with_app(|app| {
            app.chat.reconnect_pending = false;
            if app.chat.generation != expected {
                return;
            }
            connect_socket(app);
            render_all(app);
        });
    });
    if let Some(window) = web_sys::window() {
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay as i32,
            )
            .ok();
    }
}

/// Read the input box and run it through the session manager.
fn submit(app: &mut App) {
    let Some(doc) = super::document() else { return };
    let Some(input) = doc
        .get_element_by_id("sb-chat-input")
        .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
    else {
        return;
    };
    let text = input.value();
    match app.chat.session.send(&text) {
        SendOutcome::Transmit(frame) => {
            input.set_value("");
            let failed = app
                .chat
                .socket
                .as_ref()
                .map(|socket| socket.send_with_str(&frame).is_err())
                .unwrap_or(true);
            if failed {
                app.chat.session.transport_error();
                schedule_reconnect(app);
            }
        }
        SendOutcome::NotConnected => {
            // Echo stays in the log, error slot explains; no retry.
            input.set_value("");
        }
        SendOutcome::Busy | SendOutcome::Ignored => {}
    }
    render_all(app);
}

/// Paint the whole panel from the session state.
pub(crate) fn render(app: &App, doc: &Document) {
    let t = &app.translator;
    if let Some(el) = doc.get_element_by_id("sb-chat-title") {
        el.set_text_content(Some(&t.t("chat.title")));
    }
    if let Some(el) = doc.get_element_by_id("sb-chat-hello") {
        let text = match &app.chat.hello {
            Some(HelloStatus::Ok(message)) => {
                format!("{}: {}", t.t("chat.serviceStatus"), message)
            }
            Some(HelloStatus::Failed) => t.t("chat.connectionFailed"),
            None => String::new(),
        };
        el.set_text_content(Some(&text));
    }
    if let Some(el) = doc.get_element_by_id("sb-chat-conn") {
        let (class, key) = match app.chat.session.state() {
            ConnectionState::Open => ("connection-status connected", "chat.connected"),
            ConnectionState::Connecting => ("connection-status connecting", "chat.connecting"),
            ConnectionState::Closed | ConnectionState::Errored => {
                ("connection-status disconnected", "chat.disconnected")
            }
        };
        el.set_class_name(class);
        el.set_text_content(Some(&t.t(key)));
    }
    if let Some(el) = doc.get_element_by_id("sb-chat-input") {
        el.set_attribute("placeholder", &t.t("chat.inputPlaceholder")).ok();
    }
    if let Some(el) = doc.get_element_by_id("sb-chat-send") {
        el.set_text_content(Some(&t.t("chat.send")));
    }

    let Some(list) = doc.get_element_by_id("sb-chat-messages") else {
        return;
    };
    list.set_inner_html("");
    for message in app.chat.session.messages() {
        if let Ok(node) = message_node(doc, message.role, &message.content) {
            list.append_child(&node).ok();
        }
    }
    if app.chat.session.awaiting_reply() {
        if let Ok(loading) = doc.create_element("div") {
            loading.set_class_name("loading-container");
            loading.set_text_content(Some(&t.t("chat.loading")));
            list.append_child(&loading).ok();
        }
    }
    if let Some(error) = app.chat.session.error() {
        if let Ok(banner) = doc.create_element("div") {
            banner.set_class_name("error-message");
            let text = match error.i18n_key() {
                Some(key) => t.t(key),
                None => error.to_string(),
            };
            banner.set_text_content(Some(&text));
            list.append_child(&banner).ok();
        }
    }
    // Pin the newest entry into view.
    list.set_scroll_top(list.scroll_height());
}

/// One message row: user bubbles keep the avatar on the right, assistant
/// bubbles on the left.
fn message_node(doc: &Document, role: Role, content: &str) -> Result<Element, JsValue> {
    let (row_class, avatar_class, avatar_glyph) = match role {
        Role::User => ("message user", "avatar user", "😊"),
        Role::Assistant => ("message assistant", "avatar assistant", "S"),
    };
    let row = doc.create_element("div")?;
    row.set_class_name(row_class);
    let avatar = doc.create_element("div")?;
    avatar.set_class_name(avatar_class);
    avatar.set_text_content(Some(avatar_glyph));
    let bubble = doc.create_element("div")?;
    bubble.set_class_name("message-content");
    bubble.set_text_content(Some(content));
    match role {
        Role::User => {
            row.append_child(&bubble)?;
            row.append_child(&avatar)?;
        }
        Role::Assistant => {
            row.append_child(&avatar)?;
            row.append_child(&bubble)?;
        }
    }
    Ok(row)
}
