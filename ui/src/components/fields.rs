//! Form inputs, one per field descriptor
//!
//! Every input reads and writes a `RwSignal<FieldValue>` owned by the form.

use infraview_core::dropdown::SelectOption;
use infraview_core::form::{ControlType, FieldDescriptor, FieldKind, FieldValue};
use leptos::prelude::*;
use leptos::web_sys;
use serde_json::Value;
use wasm_bindgen::JsCast;

use super::code_editor::{render_code, CodeEditor};
use super::select2step::Select2StepInput;

const INPUT_CLASS: &str =
    "w-full border border-gray-300 rounded px-3 py-2 focus:outline-none focus:ring-2 focus:ring-blue-500";

/// Value of a plain input after an edit; blank text is empty
pub fn text_input_value(control: ControlType, text: &str) -> FieldValue {
    if text.is_empty() {
        return FieldValue::Empty;
    }
    if control == ControlType::Number {
        if let Ok(n) = text.parse::<i64>() {
            return FieldValue::Scalar(Value::from(n));
        }
        if let Some(n) = text.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return FieldValue::Scalar(Value::Number(n));
        }
    }
    FieldValue::Scalar(Value::String(text.to_string()))
}

/// Value of a single select after picking `id`
pub fn select_value(kind: &FieldKind, id: &str) -> FieldValue {
    if id.is_empty() {
        return FieldValue::Empty;
    }
    match kind {
        // enum choices keep their JSON type
        FieldKind::Attribute { .. } => match serde_json::from_str::<Value>(id) {
            Ok(v @ (Value::Number(_) | Value::Bool(_))) => FieldValue::Scalar(v),
            _ => FieldValue::Scalar(Value::String(id.to_string())),
        },
        _ => FieldValue::Id(id.to_string()),
    }
}

/// Parent choices of a two-step select. A relationship to a concrete kind
/// offers that kind alone.
pub fn two_step_parents(field: &FieldDescriptor) -> Vec<SelectOption> {
    match (&field.kind, field.options.is_empty()) {
        (FieldKind::Relationship { peer, .. }, true) => vec![SelectOption::new(peer.clone(), peer.clone())],
        _ => field.options.clone(),
    }
}

fn selected_ids(ev: &web_sys::Event) -> Vec<String> {
    let Some(select) = ev
        .target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
    else {
        return Vec::new();
    };
    let options = select.selected_options();
    (0..options.length())
        .filter_map(|i| options.item(i))
        .filter_map(|el| el.dyn_into::<web_sys::HtmlOptionElement>().ok())
        .map(|opt| opt.value())
        .collect()
}

/// Label, input and required marker for one descriptor
#[component]
pub fn FieldInput(field: FieldDescriptor, value: RwSignal<FieldValue>) -> impl IntoView {
    let id = format!("field-{}", field.name);
    let label = field.label.clone();
    let required = field.required;
    let input = field_control(field, value, id.clone());

    view! {
        <div class="mb-4">
            <label for=id class="block text-sm font-medium text-gray-700 mb-1">
                {label}
                {required.then(|| view! { <span class="text-red-500 ml-1">"*"</span> })}
            </label>
            {input}
        </div>
    }
}

fn field_control(field: FieldDescriptor, value: RwSignal<FieldValue>, id: String) -> AnyView {
    let read_only = field.read_only;
    let control = field.control;

    match control {
        ControlType::Checkbox => view! {
            <input
                id=id
                type="checkbox"
                class="h-4 w-4"
                disabled=read_only
                prop:checked=move || value.with(FieldValue::as_bool)
                on:change=move |ev| value.set(FieldValue::Scalar(Value::Bool(event_target_checked(&ev))))
            />
        }
        .into_any(),
        ControlType::TextArea => view! {
            <textarea
                id=id
                class=INPUT_CLASS
                rows=4
                readonly=read_only
                prop:value=move || value.with(FieldValue::as_text)
                on:input=move |ev| value.set(text_input_value(control, &event_target_value(&ev)))
            />
        }
        .into_any(),
        ControlType::Code => {
            let text = RwSignal::new(value.with_untracked(|v| match v {
                FieldValue::Scalar(json) => render_code(json),
                _ => String::new(),
            }));
            let on_change = Callback::new(move |json: Value| {
                value.set(if json.is_null() {
                    FieldValue::Empty
                } else {
                    FieldValue::Scalar(json)
                })
            });
            view! { <CodeEditor text=text on_change=on_change readonly=read_only id=id /> }.into_any()
        }
        ControlType::Select => {
            let kind = field.kind.clone();
            view! {
                <select
                    id=id
                    class=INPUT_CLASS
                    disabled=read_only
                    on:change=move |ev| value.set(select_value(&kind, &event_target_value(&ev)))
                >
                    <option value="" prop:selected=move || value.with(FieldValue::is_empty)>"-"</option>
                    {field.options.into_iter().map(|opt| {
                        let opt_id = opt.id.clone();
                        view! {
                            <option
                                value=opt.id
                                prop:selected=move || value.with(|v| v.as_text() == opt_id)
                            >
                                {opt.name}
                            </option>
                        }
                    }).collect_view()}
                </select>
            }
            .into_any()
        }
        ControlType::MultiSelect => view! {
            <select
                id=id
                multiple=true
                class=INPUT_CLASS
                disabled=read_only
                on:change=move |ev| value.set(FieldValue::Ids(selected_ids(&ev)))
            >
                {field.options.into_iter().map(|opt| {
                    let opt_id = opt.id.clone();
                    view! {
                        <option
                            value=opt.id
                            prop:selected=move || value.with(|v| matches!(v, FieldValue::Ids(ids) if ids.contains(&opt_id)))
                        >
                            {opt.name}
                        </option>
                    }
                }).collect_view()}
            </select>
        }
        .into_any(),
        ControlType::Select2Step => {
            let parents = two_step_parents(&field);
            view! { <Select2StepInput id=id parents=parents value=value disabled=read_only /> }.into_any()
        }
        ControlType::Text
        | ControlType::Number
        | ControlType::DatePicker
        | ControlType::Email
        | ControlType::Password => view! {
            <input
                id=id
                type=control.input_type().unwrap_or("text")
                class=INPUT_CLASS
                readonly=read_only
                prop:value=move || value.with(FieldValue::as_text)
                on:input=move |ev| value.set(text_input_value(control, &event_target_value(&ev)))
            />
        }
        .into_any(),
    }
}
