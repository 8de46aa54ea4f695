//! Two-step cascading select
//!
//! The first select picks a kind, the second one of that kind's objects.
//! Child options are fetched per parent; [`Select2Step`] discards any fetch
//! that finishes after a newer parent was picked.

use infraview_core::dropdown::{DropdownOptions, SelectOption};
use infraview_core::form::FieldValue;
use infraview_core::query::dropdown_options_query;
use infraview_core::select2step::{ChildFetch, Select2Step};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos::web_sys;

use crate::api;
use crate::state::use_branch;

const SELECT_CLASS: &str =
    "flex-1 border border-gray-300 rounded px-3 py-2 focus:outline-none focus:ring-2 focus:ring-blue-500";

async fn load_children(parent: &str, branch: Option<&str>) -> Result<Vec<SelectOption>, String> {
    let peers = vec![parent.to_string()];
    let data = api::query(&dropdown_options_query(&peers), None, branch).await?;
    let options = DropdownOptions::from_response(&peers, &data).map_err(|e| e.to_string())?;
    Ok(options.get(parent).map(<[_]>::to_vec).unwrap_or_default())
}

#[component]
pub fn Select2StepInput(
    id: String,
    /// Kinds offered by the first select
    parents: Vec<SelectOption>,
    value: RwSignal<FieldValue>,
    #[prop(default = false)] disabled: bool,
) -> impl IntoView {
    let branch = use_branch();
    let machine = RwSignal::new(Select2Step::new());

    let fetch_children = move |fetch: ChildFetch| {
        let branch = branch.get_untracked();
        spawn_local(async move {
            let children = match load_children(&fetch.parent, branch.as_deref()).await {
                Ok(children) => children,
                Err(e) => {
                    log::warn!("Failed to load {} options: {}", fetch.parent, e);
                    Vec::new()
                }
            };
            // None once the form is gone
            match machine.try_update(|m| m.children_loaded(&fetch, children)) {
                Some(true) => {}
                Some(false) => log::debug!("Dropped stale {} options", fetch.parent),
                None => log::debug!("Dropped {} options after unmount", fetch.parent),
            }
        });
    };

    let preset = value.with_untracked(|v| {
        v.two_step_parts()
            .filter(|(parent, child)| !parent.is_empty() && !child.is_empty())
            .map(|(parent, child)| (parent.to_string(), child.to_string()))
    });
    if let Some((parent, child)) = preset {
        let (select, fetch) = Select2Step::with_value(parent, child);
        machine.set(select);
        fetch_children(fetch);
    }

    let on_parent = move |ev: web_sys::Event| {
        let parent = event_target_value(&ev);
        value.set(FieldValue::Empty);
        if parent.is_empty() {
            machine.update(Select2Step::reset);
            return;
        }
        if let Some(fetch) = machine.try_update(|m| m.select_parent(parent)) {
            fetch_children(fetch);
        }
    };

    let on_child = move |ev: web_sys::Event| {
        let child = event_target_value(&ev);
        if child.is_empty() {
            value.set(FieldValue::Empty);
            return;
        }
        if let Some(Some((parent, child))) = machine.try_update(|m| m.select_child(child)) {
            value.set(FieldValue::TwoStep { parent, child });
        }
    };

    view! {
        <div class="flex gap-2">
            <select id=id class=SELECT_CLASS disabled=disabled on:change=on_parent>
                <option value="" prop:selected=move || machine.with(|m| m.parent().is_none())>"-"</option>
                {parents.into_iter().map(|opt| {
                    let parent_id = opt.id.clone();
                    view! {
                        <option
                            value=opt.id
                            prop:selected=move || machine.with(|m| m.parent() == Some(parent_id.as_str()))
                        >
                            {opt.name}
                        </option>
                    }
                }).collect_view()}
            </select>
            <select
                class=SELECT_CLASS
                disabled=move || disabled || machine.with(|m| m.parent().is_none() || m.is_loading())
                on:change=on_child
            >
                {move || {
                    let (children, child, loading) = machine.with(|m| {
                        (m.children().to_vec(), m.child().map(String::from), m.is_loading())
                    });
                    let placeholder = if loading { "Loading..." } else { "-" };
                    view! {
                        <option value="" selected=child.is_none()>{placeholder}</option>
                        {children.into_iter().map(|opt| {
                            let selected = child.as_deref() == Some(opt.id.as_str());
                            view! { <option value=opt.id selected=selected>{opt.name}</option> }
                        }).collect_view()}
                    }
                }}
            </select>
        </div>
    }
}
