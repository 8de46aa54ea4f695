//! Create, edit and metadata forms
//!
//! All three derive their descriptors from the schema snapshot and submit a
//! `<Kind>Create` or `<Kind>Update` mutation built from the edited values.

use std::sync::Arc;

use infraview_core::dropdown::DropdownOptions;
use infraview_core::form::{
    build_metadata_input, build_mutation_input, derive_form_structure, derive_metadata_form,
    dropdown_peers, FieldDescriptor, FieldValue, FormContext, FormValues, MetadataTarget,
    MutationMode,
};
use infraview_core::query::{create_mutation, dropdown_options_query, update_mutation, Document};
use infraview_core::row::ObjectRow;
use infraview_core::SchemaSnapshot;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::{json, Value};

use super::fields::FieldInput;
use crate::api;
use crate::state::{use_branch, use_schema};

async fn load_options(
    snapshot: Arc<SchemaSnapshot>,
    kind: String,
    branch: Option<String>,
) -> Result<DropdownOptions, String> {
    let Some(schema) = snapshot.node(&kind) else {
        return Ok(DropdownOptions::new());
    };
    let peers = dropdown_peers(schema, &snapshot);
    if peers.is_empty() {
        return Ok(DropdownOptions::new());
    }
    let data = api::query(&dropdown_options_query(&peers), None, branch.as_deref()).await?;
    DropdownOptions::from_response(&peers, &data).map_err(|e| e.to_string())
}

/// Form creating an object of `kind`, or editing `row` when given
#[component]
pub fn ObjectForm(
    kind: String,
    #[prop(optional)] row: Option<ObjectRow>,
    on_saved: Callback<()>,
    #[prop(optional)] on_cancel: Option<Callback<()>>,
) -> impl IntoView {
    let schemas = use_schema();
    let branch = use_branch();
    let kind = StoredValue::new(kind);
    let row = StoredValue::new(row);

    let options = LocalResource::new(move || {
        let snapshot = schemas.snapshot();
        let branch = branch.get();
        load_options(snapshot, kind.get_value(), branch)
    });

    view! {
        <Suspense fallback=move || view! { <div class="text-gray-500">"Loading form..."</div> }>
            {move || options.get().map(|result| match result {
                Ok(options) => {
                    let snapshot = schemas.snapshot();
                    let kind = kind.get_value();
                    let Some(schema) = snapshot.node(&kind).cloned() else {
                        return view! { <div class="text-gray-500">{format!("Unknown kind {}", kind)}</div> }.into_any();
                    };
                    let row = row.get_value();
                    let ctx = FormContext::new(&snapshot, &options);
                    let fields = derive_form_structure(Some(&schema), &ctx, row.as_ref());

                    let submit = move |values: &FormValues| match &row {
                        Some(existing) => (
                            update_mutation(&schema.kind),
                            build_mutation_input(&schema, values, MutationMode::Update, Some(existing)),
                        ),
                        None => (
                            create_mutation(&schema.kind),
                            build_mutation_input(&schema, values, MutationMode::Create, None),
                        ),
                    };
                    view! {
                        <DescriptorForm fields=fields submit=submit on_saved=on_saved on_cancel=on_cancel />
                    }.into_any()
                }
                Err(e) => view! {
                    <div class="text-red-500">{format!("Failed to load options: {}", e)}</div>
                }.into_any(),
            })}
        </Suspense>
    }
}

fn metadata_target(name: &str, relationship: bool) -> MetadataTarget<'_> {
    if relationship {
        MetadataTarget::Relationship(name)
    } else {
        MetadataTarget::Attribute(name)
    }
}

/// Owner, source, visibility and protection of one attribute or relationship
#[component]
pub fn MetadataForm(
    kind: String,
    row: ObjectRow,
    /// Attribute or relationship name
    name: String,
    #[prop(default = false)] relationship: bool,
    on_saved: Callback<()>,
    #[prop(optional)] on_cancel: Option<Callback<()>>,
) -> impl IntoView {
    let snapshot = use_schema().snapshot();
    let fields = derive_metadata_form(Some(&row), metadata_target(&name, relationship), &snapshot);

    let submit = move |values: &FormValues| {
        (
            update_mutation(&kind),
            build_metadata_input(metadata_target(&name, relationship), values, &row),
        )
    };

    view! { <DescriptorForm fields=fields submit=submit on_saved=on_saved on_cancel=on_cancel /> }
}

/// Inputs for `fields` plus submit/cancel buttons. `submit` turns the edited
/// values into the mutation and its `data` input.
#[component]
fn DescriptorForm<F>(
    fields: Vec<FieldDescriptor>,
    submit: F,
    on_saved: Callback<()>,
    on_cancel: Option<Callback<()>>,
) -> impl IntoView
where
    F: Fn(&FormValues) -> (Document, Value) + Send + Sync + 'static,
{
    let branch = use_branch();
    let (error, set_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let entries: Vec<(FieldDescriptor, RwSignal<FieldValue>)> = fields
        .into_iter()
        .map(|f| {
            let value = RwSignal::new(f.value.clone());
            (f, value)
        })
        .collect();
    let values = StoredValue::new(
        entries
            .iter()
            .map(|(f, value)| (f.name.clone(), *value))
            .collect::<Vec<_>>(),
    );
    let submit = StoredValue::new(submit);
    let empty = entries.is_empty();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let edited: FormValues = values.with_value(|values| {
            values
                .iter()
                .map(|(name, value)| (name.clone(), value.get_untracked()))
                .collect()
        });
        let (document, input) = submit.with_value(|submit| submit(&edited));
        let branch = branch.get_untracked();

        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::query(&document, Some(json!({ "data": input })), branch.as_deref()).await {
                Ok(_) => {
                    log::info!("{} succeeded", document.name.as_deref().unwrap_or("mutation"));
                    set_saving.try_set(false);
                    on_saved.run(());
                }
                Err(e) => {
                    set_error.try_set(Some(e));
                    set_saving.try_set(false);
                }
            }
        });
    };

    view! {
        <form on:submit=on_submit>
            {empty.then(|| view! { <p class="text-gray-500 mb-4">"No fields to edit"</p> })}
            {entries.into_iter().map(|(field, value)| {
                view! { <FieldInput field=field value=value /> }
            }).collect_view()}

            {move || error.get().map(|e| view! {
                <div class="mb-4 p-3 bg-red-100 text-red-700 rounded">{e}</div>
            })}

            <div class="flex justify-end gap-2">
                {on_cancel.map(|cancel| view! {
                    <button
                        type="button"
                        class="px-4 py-2 rounded border border-gray-300 hover:bg-gray-50"
                        on:click=move |_| cancel.run(())
                    >
                        "Cancel"
                    </button>
                })}
                <button
                    type="submit"
                    class="bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded disabled:opacity-50"
                    disabled=move || saving.get()
                >
                    {move || if saving.get() { "Saving..." } else { "Save" }}
                </button>
            </div>
        </form>
    }
}
