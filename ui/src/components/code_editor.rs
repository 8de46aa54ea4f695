//! Code editor for JSON attribute values
//!
//! A textarea under a highlighted overlay with line numbers. The parsed value
//! is reported upward only while the text is valid JSON; an empty editor
//! reports null.

use leptos::prelude::*;
use leptos::web_sys;
use serde_json::Value;
use wasm_bindgen::JsCast;

/// Token classes used by the highlighter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token {
    Space,
    Key,
    Str,
    Number,
    Literal,
    Punct,
    Invalid,
}

impl Token {
    fn class(self) -> &'static str {
        match self {
            Token::Space => "",
            Token::Key => "code-key",
            Token::Str => "code-string",
            Token::Number => "code-number",
            Token::Literal => "code-literal",
            Token::Punct => "code-punct",
            Token::Invalid => "code-invalid",
        }
    }
}

fn scan_while(src: &str, start: usize, keep: impl Fn(char) -> bool) -> usize {
    src[start..]
        .char_indices()
        .find(|(_, c)| !keep(*c))
        .map(|(i, _)| start + i)
        .unwrap_or(src.len())
}

/// End of the string literal opening at `start`
fn scan_string(src: &str, start: usize) -> usize {
    let mut escaped = false;
    for (i, c) in src[start + 1..].char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return start + 1 + i + 1,
            _ => {}
        }
    }
    src.len()
}

/// Split `src` into highlighted spans
fn tokenize(src: &str) -> Vec<(&str, Token)> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(c) = src[pos..].chars().next() {
        let (end, token) = match c {
            c if c.is_whitespace() => (scan_while(src, pos, char::is_whitespace), Token::Space),
            '"' => {
                let end = scan_string(src, pos);
                let rest = src[end..].trim_start_matches(&[' ', '\t'][..]);
                let token = if rest.starts_with(':') { Token::Key } else { Token::Str };
                (end, token)
            }
            '-' | '0'..='9' => (
                scan_while(src, pos + 1, |c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')),
                Token::Number,
            ),
            c if c.is_ascii_alphabetic() => {
                let end = scan_while(src, pos, |c| c.is_ascii_alphabetic());
                let token = match &src[pos..end] {
                    "true" | "false" | "null" => Token::Literal,
                    _ => Token::Invalid,
                };
                (end, token)
            }
            '{' | '}' | '[' | ']' | ':' | ',' => (pos + 1, Token::Punct),
            other => (pos + other.len_utf8(), Token::Invalid),
        };
        tokens.push((&src[pos..end], token));
        pos = end;
    }

    tokens
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn highlight(src: &str) -> String {
    tokenize(src)
        .into_iter()
        .map(|(text, token)| match token.class() {
            "" => escape_html(text),
            class => format!(r#"<span class="{}">{}</span>"#, class, escape_html(text)),
        })
        .collect()
}

/// Parse editor text; blank text is null
pub fn parse_code(text: &str) -> Result<Value, String> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| e.to_string())
}

/// Editor text for a value; null shows as an empty editor
pub fn render_code(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}

#[component]
pub fn CodeEditor(
    /// Editor text
    text: RwSignal<String>,
    /// Called with the parsed value after each valid edit
    on_change: Callback<Value>,
    #[prop(default = 8)] rows: u32,
    #[prop(default = false)] readonly: bool,
    #[prop(optional)] id: Option<String>,
) -> impl IntoView {
    let error = Memo::new(move |_| text.with(|t| parse_code(t).err()));

    let update = move |new_text: String| {
        if let Ok(value) = parse_code(&new_text) {
            on_change.run(value);
        }
        text.set(new_text);
    };

    let on_input = move |ev: web_sys::Event| update(event_target_value(&ev));

    let on_format = move |_| {
        if let Ok(value) = parse_code(&text.get()) {
            update(render_code(&value));
        }
    };

    // Tab indents instead of leaving the field
    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() != "Tab" {
            return;
        }
        ev.prevent_default();
        let Some(area) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        else {
            return;
        };
        let current = area.value();
        let start = area.selection_start().ok().flatten().unwrap_or(0) as usize;
        let end = area.selection_end().ok().flatten().unwrap_or(0) as usize;
        let (Some(before), Some(after)) = (current.get(..start), current.get(end..)) else {
            return;
        };
        let next = format!("{}  {}", before, after);
        area.set_value(&next);
        let cursor = (start + 2) as u32;
        let _ = area.set_selection_range(cursor, cursor);
        update(next);
    };

    let on_scroll = move |ev: web_sys::Event| {
        let Some(area) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        else {
            return;
        };
        let overlay = area
            .parent_element()
            .and_then(|p| p.query_selector(".code-highlight").ok().flatten())
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
        if let Some(overlay) = overlay {
            overlay.set_scroll_top(area.scroll_top());
            overlay.set_scroll_left(area.scroll_left());
        }
    };

    view! {
        <div class="code-editor">
            <div class="flex justify-end mb-1">
                <button
                    type="button"
                    class="text-xs px-2 py-1 bg-gray-100 hover:bg-gray-200 text-gray-600 rounded"
                    on:click=on_format
                    disabled=move || readonly || error.get().is_some()
                >
                    "Format"
                </button>
            </div>
            <div class="code-editor-wrapper">
                <div class="code-line-numbers" aria-hidden="true">
                    {move || {
                        let lines = text.with(|t| t.lines().count()).max(rows as usize);
                        (1..=lines)
                            .map(|n| view! { <div>{n}</div> })
                            .collect_view()
                    }}
                </div>
                <div class="code-editor-area">
                    <pre
                        class="code-highlight"
                        aria-hidden="true"
                        inner_html=move || text.with(|t| highlight(t))
                    />
                    <textarea
                        id=id
                        class="code-textarea"
                        rows=rows
                        readonly=readonly
                        spellcheck="false"
                        autocomplete="off"
                        prop:value=move || text.get()
                        on:input=on_input
                        on:keydown=on_keydown
                        on:scroll=on_scroll
                    />
                </div>
            </div>
            {move || error.get().map(|e| view! { <p class="mt-1 text-xs text-red-500">{e}</p> })}
        </div>
    }
}
