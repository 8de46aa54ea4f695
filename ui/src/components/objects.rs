//! Object list and object detail pages
//!
//! Both pages are rendered from the schema of the kind in the route. A kind
//! unknown to the loaded schema sends the fallback query and shows nothing.

use infraview_core::layout::{column_names, detail_tabs, list_columns, selected_tab, DetailTab, TAB_QUERY_PARAM};
use infraview_core::permissions::KindPermissions;
use infraview_core::query::{
    delete_mutation, kind_permissions_query, object_details_query, object_list_query,
    query_or_fallback, relationship_tab_query, GraphqlRequest, Pagination, QueryState,
};
use infraview_core::row::{ObjectPage, ObjectRow, RowField};
use infraview_core::schema::NodeSchema;
use infraview_core::SchemaError;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Redirect;
use leptos_router::hooks::{use_params_map, use_query_map};
use serde_json::{json, Value};

use super::modal::{DeleteModal, Modal};
use super::object_form::{MetadataForm, ObjectForm};
use crate::api;
use crate::state::{branch_href, use_branch, use_query, use_schema, QueryHandle};

pub const PAGE_SIZE: usize = 10;

const PAGE_QUERY_PARAM: &str = "page";

pub fn object_route(kind: &str, id: &str) -> String {
    format!("/objects/{}/{}", urlencoding::encode(kind), urlencoding::encode(id))
}

/// List route of `kind` showing zero-based `page`
pub fn list_page_route(kind: &str, page: usize) -> String {
    let kind = urlencoding::encode(kind);
    if page == 0 {
        format!("/objects/{}", kind)
    } else {
        format!("/objects/{}?{}={}", kind, PAGE_QUERY_PARAM, page)
    }
}

pub fn page_count(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Permissions of `kind` from the state of a [`kind_permissions_query`].
/// Nothing is allowed while loading. Servers without permission data allow
/// everything.
pub fn kind_permissions(kind: &str, state: &QueryState<Value>) -> KindPermissions {
    match state {
        QueryState::Loading => KindPermissions::default(),
        QueryState::Error(e) => {
            log::debug!("No permissions for {}: {}", kind, e);
            KindPermissions::ALL
        }
        QueryState::Data(data) => KindPermissions::from_response(kind, data).unwrap_or_else(|e| {
            log::debug!("Unreadable permissions for {}: {}", kind, e);
            KindPermissions::ALL
        }),
    }
}

/// First node of `data[<kind>].edges`, parsed as a row
pub fn details_row(schema: &NodeSchema, data: &Value) -> Result<Option<ObjectRow>, SchemaError> {
    let edges = data
        .get(&schema.kind)
        .and_then(|envelope| envelope.get("edges"))
        .and_then(Value::as_array)
        .ok_or_else(|| SchemaError::shape(&schema.kind, "edges list"))?;
    edges
        .iter()
        .find_map(|edge| edge.get("node"))
        .map(|node| ObjectRow::from_node(schema, node))
        .transpose()
}

/// Peers behind one many relationship, from a [`relationship_tab_query`]
/// response. Rows are parsed against the peer schema when it is known.
pub fn relationship_rows(
    kind: &str,
    relationship: &str,
    peer: Option<&NodeSchema>,
    data: &Value,
) -> Result<(usize, Vec<ObjectRow>), SchemaError> {
    let Some(node) = data
        .get(kind)
        .and_then(|envelope| envelope.get("edges"))
        .and_then(Value::as_array)
        .and_then(|edges| edges.iter().find_map(|edge| edge.get("node")))
    else {
        return Ok((0, Vec::new()));
    };
    let envelope = node
        .get(relationship)
        .ok_or_else(|| SchemaError::missing(relationship, kind))?;
    let edges = envelope
        .get("edges")
        .and_then(Value::as_array)
        .ok_or_else(|| SchemaError::shape(relationship, "edges list"))?;

    let mut rows = Vec::with_capacity(edges.len());
    for peer_node in edges.iter().filter_map(|edge| edge.get("node")) {
        let row = match peer {
            Some(peer) => ObjectRow::from_node(peer, peer_node)?,
            None => {
                let id = peer_node
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| SchemaError::missing("id", relationship))?;
                let mut row = ObjectRow::new(id);
                row.display_label = peer_node
                    .get("display_label")
                    .and_then(Value::as_str)
                    .map(String::from);
                row.typename = peer_node
                    .get("__typename")
                    .and_then(Value::as_str)
                    .map(String::from);
                row
            }
        };
        rows.push(row);
    }
    let count = envelope
        .get("count")
        .and_then(Value::as_u64)
        .map(|c| c as usize)
        .unwrap_or(rows.len());
    Ok((count, rows))
}

fn use_kind_permissions(kind: Memo<String>) -> Signal<KindPermissions> {
    let permissions = use_query(move || GraphqlRequest::from(&kind_permissions_query(&kind.get())));
    Signal::derive(move || kind_permissions(&kind.get(), &permissions.state()))
}

fn use_route_param(name: &'static str) -> Memo<String> {
    let params = use_params_map();
    Memo::new(move |_| params.read().get(name).unwrap_or_default())
}

#[component]
pub fn ObjectList() -> impl IntoView {
    let kind = use_route_param("kind");
    let query = use_query_map();
    let page = Memo::new(move |_| {
        query
            .read()
            .get(PAGE_QUERY_PARAM)
            .and_then(|p| p.parse::<usize>().ok())
            .unwrap_or(0)
    });
    let schemas = use_schema();
    let permissions = use_kind_permissions(kind);
    let creating = RwSignal::new(false);

    let list = use_query(move || {
        let snapshot = schemas.snapshot();
        let pagination = Pagination::page(page.get(), PAGE_SIZE);
        GraphqlRequest::new(query_or_fallback(snapshot.node(&kind.get()), |schema| {
            let columns = column_names(&list_columns(schema));
            object_list_query(schema, &columns, pagination, &[])
        }))
    });

    let on_saved = Callback::new(move |_| {
        creating.set(false);
        list.refetch();
    });
    let on_cancel = Callback::new(move |_| creating.set(false));
    let title = move || {
        let snapshot = schemas.snapshot();
        snapshot
            .node(&kind.get())
            .map(|s| s.display_label().to_string())
            .unwrap_or_else(|| kind.get())
    };

    view! {
        <div class="p-6">
            <div class="flex justify-between items-center mb-6">
                <h2 class="text-2xl font-bold">{title}</h2>
                <Show when=move || permissions.get().create>
                    <button
                        class="bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded"
                        on:click=move |_| creating.set(true)
                    >
                        "+ Add"
                    </button>
                </Show>
            </div>

            {move || {
                let snapshot = schemas.snapshot();
                let Some(schema) = snapshot.node(&kind.get()).cloned() else {
                    return view! { <div class="text-gray-500">"No objects"</div> }.into_any();
                };
                match list.state() {
                    QueryState::Loading => view! { <div class="text-gray-500">"Loading..."</div> }.into_any(),
                    QueryState::Error(e) => view! {
                        <div class="text-red-500">{format!("Failed to load objects: {}", e)}</div>
                    }.into_any(),
                    QueryState::Data(data) => match ObjectPage::from_response(&schema, &data) {
                        Ok(result) => view! {
                            <ObjectTable schema=schema.clone() page=result.clone() />
                            <Paginator kind=schema.kind.clone() page=page.get() count=result.count />
                        }.into_any(),
                        Err(e) => view! { <div class="text-red-500">{e.to_string()}</div> }.into_any(),
                    },
                }
            }}

            <Modal open=creating title="Create".to_string()>
                <ObjectForm kind=kind.get_untracked() on_saved=on_saved on_cancel=on_cancel />
            </Modal>
        </div>
    }
}

#[component]
fn ObjectTable(schema: NodeSchema, page: ObjectPage) -> impl IntoView {
    let branch = use_branch();
    let columns = list_columns(&schema);

    if page.rows.is_empty() {
        return view! { <div class="text-gray-500">"No objects"</div> }.into_any();
    }

    view! {
        <div class="bg-white rounded-lg shadow overflow-hidden">
            <table class="min-w-full divide-y divide-gray-200">
                <thead class="bg-gray-50">
                    <tr>
                        {columns.iter().map(|c| view! {
                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">{c.label.clone()}</th>
                        }).collect_view()}
                    </tr>
                </thead>
                <tbody class="bg-white divide-y divide-gray-200">
                    {page.rows.into_iter().map(|row| {
                        let href = branch_href(&object_route(&schema.kind, &row.id), branch.get_untracked().as_deref());
                        view! {
                            <tr class="hover:bg-gray-50">
                                {columns.iter().enumerate().map(|(i, c)| {
                                    let text = row.cell_text(&c.name);
                                    if i == 0 {
                                        view! {
                                            <td class="px-6 py-4">
                                                <a href=href.clone() class="text-blue-600 hover:underline">
                                                    {if text.is_empty() { row.id.clone() } else { text }}
                                                </a>
                                            </td>
                                        }.into_any()
                                    } else {
                                        view! { <td class="px-6 py-4 text-sm text-gray-600">{text}</td> }.into_any()
                                    }
                                }).collect_view()}
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_any()
}

#[component]
fn Paginator(kind: String, page: usize, count: usize) -> impl IntoView {
    let branch = use_branch().get_untracked();
    let pages = page_count(count, PAGE_SIZE);
    let link = move |target: usize| branch_href(&list_page_route(&kind, target), branch.as_deref());
    let prev = (page > 0).then(|| link(page - 1));
    let next = (page + 1 < pages).then(|| link(page + 1));

    view! {
        <div class="flex justify-between items-center mt-4 text-sm text-gray-600">
            <span>{format!("{} results", count)}</span>
            <div class="flex items-center gap-3">
                {prev.map(|href| view! { <a href=href class="text-blue-600 hover:underline">"Previous"</a> })}
                <span>{format!("Page {} of {}", page + 1, pages.max(1))}</span>
                {next.map(|href| view! { <a href=href class="text-blue-600 hover:underline">"Next"</a> })}
            </div>
        </div>
    }
}

#[component]
pub fn ObjectDetails() -> impl IntoView {
    let kind = use_route_param("kind");
    let id = use_route_param("id");
    let query = use_query_map();
    let tab = Memo::new(move |_| query.read().get(TAB_QUERY_PARAM));
    let schemas = use_schema();
    let branch = use_branch();
    let permissions = use_kind_permissions(kind);

    let details = use_query(move || {
        let snapshot = schemas.snapshot();
        let id = id.get();
        GraphqlRequest::new(query_or_fallback(snapshot.node(&kind.get()), |schema| {
            object_details_query(schema, &id)
        }))
    });
    let row = Memo::new(move |_| {
        let snapshot = schemas.snapshot();
        let Some(schema) = snapshot.node(&kind.get()) else {
            return QueryState::Data(None);
        };
        match details.state() {
            QueryState::Data(data) => details_row(schema, &data).into(),
            QueryState::Error(e) => QueryState::Error(e),
            QueryState::Loading => QueryState::Loading,
        }
    });

    let editing = RwSignal::new(false);
    let confirming = RwSignal::new(false);
    let (deleting, set_deleting) = signal(false);
    let (deleted, set_deleted) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let on_saved = Callback::new(move |_| {
        editing.set(false);
        details.refetch();
    });
    let on_cancel = Callback::new(move |_| editing.set(false));

    let on_confirm = Callback::new(move |_| {
        let kind = kind.get_untracked();
        let id = id.get_untracked();
        let branch = branch.get_untracked();
        set_deleting.set(true);
        set_error.set(None);
        spawn_local(async move {
            let variables = json!({ "data": { "id": id } });
            match api::query(&delete_mutation(&kind), Some(variables), branch.as_deref()).await {
                Ok(_) => {
                    log::info!("Deleted {} {}", kind, id);
                    confirming.try_set(false);
                    set_deleted.try_set(true);
                }
                Err(e) => {
                    set_error.try_set(Some(e));
                    set_deleting.try_set(false);
                    confirming.try_set(false);
                }
            }
        });
    });

    let list_href = move || branch_href(&list_page_route(&kind.get(), 0), branch.get().as_deref());
    let heading = move || match row.get() {
        QueryState::Data(Some(row)) => row.display_label.unwrap_or(row.id),
        _ => id.get(),
    };

    view! {
        <div class="p-6">
            {move || deleted.get().then(|| view! { <Redirect path=list_href() /> })}
            <div class="flex justify-between items-center mb-6">
                <div>
                    <a href=list_href class="text-sm text-blue-600 hover:underline">
                        {move || schemas.snapshot().kind_name(&kind.get()).to_string()}
                    </a>
                    <h2 class="text-2xl font-bold">{heading}</h2>
                </div>
                <div class="flex gap-2">
                    <Show when=move || permissions.get().update>
                        <button
                            class="bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded"
                            on:click=move |_| editing.set(true)
                        >
                            "Edit"
                        </button>
                    </Show>
                    <Show when=move || permissions.get().delete>
                        <button
                            class="bg-red-500 hover:bg-red-600 text-white px-4 py-2 rounded"
                            on:click=move |_| confirming.set(true)
                        >
                            "Delete"
                        </button>
                    </Show>
                </div>
            </div>

            {move || error.get().map(|e| view! {
                <div class="mb-4 p-3 bg-red-100 text-red-700 rounded">{e}</div>
            })}

            {move || {
                let snapshot = schemas.snapshot();
                let Some(schema) = snapshot.node(&kind.get()).cloned() else {
                    return view! { <div class="text-gray-500">"Unknown object type"</div> }.into_any();
                };
                let tabs = detail_tabs(&schema);
                let active = selected_tab(&tabs, tab.get().as_deref()).cloned();
                view! {
                    <TabBar kind=schema.kind.clone() id=id.get() tabs=tabs.clone() active=active.clone() />
                    {match active.and_then(|t| t.name.zip(t.peer)) {
                        Some((relationship, peer)) => view! {
                            <RelationshipTab schema=schema id=id.get() relationship=relationship peer=peer />
                        }.into_any(),
                        None => match row.get() {
                            QueryState::Loading => view! { <div class="text-gray-500">"Loading..."</div> }.into_any(),
                            QueryState::Error(e) => view! { <div class="text-red-500">{e}</div> }.into_any(),
                            QueryState::Data(None) => view! { <div class="text-gray-500">"Object not found"</div> }.into_any(),
                            QueryState::Data(Some(row)) => view! {
                                <DetailsTab schema=schema row=row details=details />
                            }.into_any(),
                        },
                    }}
                }.into_any()
            }}

            <Modal open=editing title="Edit".to_string()>
                {move || match row.get_untracked() {
                    QueryState::Data(Some(row)) => view! {
                        <ObjectForm kind=kind.get_untracked() row=row on_saved=on_saved on_cancel=on_cancel />
                    }.into_any(),
                    _ => view! { <div class="text-gray-500">"Loading..."</div> }.into_any(),
                }}
            </Modal>
            <DeleteModal open=confirming label=id.get_untracked() on_confirm=on_confirm deleting=deleting />
        </div>
    }
}

#[component]
fn TabBar(kind: String, id: String, tabs: Vec<DetailTab>, active: Option<DetailTab>) -> impl IntoView {
    let branch = use_branch().get_untracked();
    let base = object_route(&kind, &id);

    view! {
        <div class="flex gap-4 border-b border-gray-200 mb-4">
            {tabs.into_iter().map(|t| {
                let path = match &t.name {
                    Some(name) => format!("{}?{}={}", base, TAB_QUERY_PARAM, urlencoding::encode(name)),
                    None => base.clone(),
                };
                let class = if active.as_ref() == Some(&t) {
                    "pb-2 border-b-2 border-blue-500 text-blue-600 font-medium"
                } else {
                    "pb-2 text-gray-500 hover:text-gray-700"
                };
                view! { <a href=branch_href(&path, branch.as_deref()) class=class>{t.label}</a> }
            }).collect_view()}
        </div>
    }
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "",
    }
}

#[component]
fn DetailsTab(schema: NodeSchema, row: ObjectRow, details: QueryHandle) -> impl IntoView {
    let metadata_open = RwSignal::new(false);
    let metadata_target = RwSignal::new(Option::<(String, bool)>::None);
    let kind = StoredValue::new(schema.kind.clone());
    let stored_row = StoredValue::new(row.clone());

    let on_saved = Callback::new(move |_| {
        metadata_open.set(false);
        details.refetch();
    });
    let on_cancel = Callback::new(move |_| metadata_open.set(false));
    let edit_metadata = move |name: String, relationship: bool| {
        metadata_target.set(Some((name, relationship)));
        metadata_open.set(true);
    };

    let mut entries: Vec<(String, String, bool)> = schema
        .attributes
        .iter()
        .map(|a| (a.name.clone(), a.display_label().to_string(), false))
        .collect();
    entries.extend(
        schema
            .relationships
            .iter()
            .filter(|r| !r.is_many())
            .map(|r| (r.name.clone(), r.display_label().to_string(), true)),
    );

    view! {
        <div class="bg-white rounded-lg shadow overflow-hidden">
            <table class="min-w-full divide-y divide-gray-200">
                <thead class="bg-gray-50">
                    <tr>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Field"</th>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Value"</th>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Owner"</th>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Source"</th>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Protected"</th>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Visible"</th>
                        <th class="px-6 py-3"></th>
                    </tr>
                </thead>
                <tbody class="bg-white divide-y divide-gray-200">
                    {entries.into_iter().map(|(name, label, relationship)| {
                        let properties = match row.field(&name) {
                            Some(RowField::Attribute(attr)) => Some(attr.properties.clone()),
                            Some(RowField::One(Some(related))) => Some(related.properties.clone()),
                            _ => None,
                        }
                        .unwrap_or_default();
                        let text = row.cell_text(&name);
                        let target = name.clone();
                        view! {
                            <tr>
                                <td class="px-6 py-4 text-sm font-medium text-gray-700">{label}</td>
                                <td class="px-6 py-4 text-sm">{text}</td>
                                <td class="px-6 py-4 text-sm text-gray-600">
                                    {properties.owner.as_ref().map(|o| o.label().to_string()).unwrap_or_default()}
                                </td>
                                <td class="px-6 py-4 text-sm text-gray-600">
                                    {properties.source.as_ref().map(|s| s.label().to_string()).unwrap_or_default()}
                                </td>
                                <td class="px-6 py-4 text-sm">{flag(properties.is_protected)}</td>
                                <td class="px-6 py-4 text-sm">{flag(properties.is_visible)}</td>
                                <td class="px-6 py-4 text-right">
                                    <button
                                        class="text-sm text-blue-600 hover:underline"
                                        on:click=move |_| edit_metadata(target.clone(), relationship)
                                    >
                                        "Metadata"
                                    </button>
                                </td>
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>
        </div>

        <Modal open=metadata_open title="Metadata".to_string()>
            {move || metadata_target.get().map(|(name, relationship)| view! {
                <MetadataForm
                    kind=kind.get_value()
                    row=stored_row.get_value()
                    name=name
                    relationship=relationship
                    on_saved=on_saved
                    on_cancel=on_cancel
                />
            })}
        </Modal>
    }
}

#[component]
fn RelationshipTab(schema: NodeSchema, id: String, relationship: String, peer: String) -> impl IntoView {
    let schemas = use_schema();
    let branch = use_branch();
    let kind = StoredValue::new(schema.kind.clone());
    let schema = StoredValue::new(schema);
    let id = StoredValue::new(id);
    let relationship = StoredValue::new(relationship);
    let peer = StoredValue::new(peer);

    let peers = use_query(move || {
        let snapshot = schemas.snapshot();
        let peer_schema = snapshot.node(&peer.get_value()).cloned();
        let document = schema.with_value(|schema| {
            relationship_tab_query(schema, &id.get_value(), &relationship.get_value(), peer_schema.as_ref())
        });
        GraphqlRequest::from(&document)
    });

    view! {
        {move || {
            let snapshot = schemas.snapshot();
            let peer_kind = peer.get_value();
            let peer_schema = snapshot.node(&peer_kind).cloned();
            let columns: Vec<(String, String)> = peer_schema
                .as_ref()
                .map(|p| p.attributes.iter().map(|a| (a.name.clone(), a.display_label().to_string())).collect())
                .unwrap_or_default();

            match peers.state() {
                QueryState::Loading => view! { <div class="text-gray-500">"Loading..."</div> }.into_any(),
                QueryState::Error(e) => view! { <div class="text-red-500">{e}</div> }.into_any(),
                QueryState::Data(data) => match relationship_rows(&kind.get_value(), &relationship.get_value(), peer_schema.as_ref(), &data) {
                    Err(e) => view! { <div class="text-red-500">{e.to_string()}</div> }.into_any(),
                    Ok((_, rows)) if rows.is_empty() => view! { <div class="text-gray-500">"No related objects"</div> }.into_any(),
                    Ok((count, rows)) => view! {
                        <div class="bg-white rounded-lg shadow overflow-hidden">
                            <table class="min-w-full divide-y divide-gray-200">
                                <thead class="bg-gray-50">
                                    <tr>
                                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Name"</th>
                                        {columns.iter().map(|(_, label)| view! {
                                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">{label.clone()}</th>
                                        }).collect_view()}
                                    </tr>
                                </thead>
                                <tbody class="bg-white divide-y divide-gray-200">
                                    {rows.into_iter().map(|row| {
                                        let target_kind = row.typename.clone().unwrap_or_else(|| peer_kind.clone());
                                        let href = branch_href(&object_route(&target_kind, &row.id), branch.get_untracked().as_deref());
                                        let label = row.display_label.clone().unwrap_or_else(|| row.id.clone());
                                        view! {
                                            <tr class="hover:bg-gray-50">
                                                <td class="px-6 py-4">
                                                    <a href=href class="text-blue-600 hover:underline">{label}</a>
                                                </td>
                                                {columns.iter().map(|(name, _)| view! {
                                                    <td class="px-6 py-4 text-sm text-gray-600">{row.cell_text(name)}</td>
                                                }).collect_view()}
                                            </tr>
                                        }
                                    }).collect_view()}
                                </tbody>
                            </table>
                        </div>
                        <div class="mt-4 text-sm text-gray-600">{format!("{} related", count)}</div>
                    }.into_any(),
                },
            }
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> NodeSchema {
        serde_json::from_value(json!({
            "name": "device",
            "kind": "InfraDevice",
            "attributes": [{"name": "name", "kind": "Text"}],
            "relationships": [
                {"name": "interfaces", "peer": "InfraInterface", "kind": "Component", "cardinality": "many"}
            ]
        }))
        .unwrap()
    }

    fn interface() -> NodeSchema {
        serde_json::from_value(json!({
            "name": "interface",
            "kind": "InfraInterface",
            "attributes": [{"name": "speed", "kind": "Number"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_routes() {
        assert_eq!(object_route("InfraDevice", "d 1"), "/objects/InfraDevice/d%201");
        assert_eq!(list_page_route("InfraDevice", 0), "/objects/InfraDevice");
        assert_eq!(list_page_route("InfraDevice", 2), "/objects/InfraDevice?page=2");
        assert_eq!(object_route("Infra/Device", "d1"), "/objects/Infra%2FDevice/d1");
        assert_eq!(list_page_route("Infra Device", 1), "/objects/Infra%20Device?page=1");
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, PAGE_SIZE), 0);
        assert_eq!(page_count(10, PAGE_SIZE), 1);
        assert_eq!(page_count(11, PAGE_SIZE), 2);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn test_kind_permissions_states() {
        assert_eq!(kind_permissions("InfraDevice", &QueryState::Loading), KindPermissions::default());
        assert_eq!(
            kind_permissions("InfraDevice", &QueryState::Error("no field".to_string())),
            KindPermissions::ALL
        );
        let data = json!({"InfraDevice": {"permissions": {"count": 1, "edges": [{"node": {
            "kind": "InfraDevice", "view": "ALLOW", "create": "DENY", "update": "ALLOW", "delete": "DENY"
        }}]}}});
        let perms = kind_permissions("InfraDevice", &QueryState::Data(data));
        assert!(perms.view && perms.update);
        assert!(!perms.create && !perms.delete);
    }

    #[test]
    fn test_details_row() {
        let data = json!({"InfraDevice": {"edges": [{"node": {
            "id": "d1", "display_label": "spine1", "name": {"value": "spine1"}
        }}]}});
        let row = details_row(&device(), &data).unwrap().unwrap();
        assert_eq!(row.id, "d1");
        assert_eq!(row.cell_text("name"), "spine1");

        let empty = json!({"InfraDevice": {"edges": []}});
        assert!(details_row(&device(), &empty).unwrap().is_none());
        assert!(details_row(&device(), &json!({"ok": true})).is_err());
    }

    #[test]
    fn test_relationship_rows() {
        let data = json!({"InfraDevice": {"edges": [{"node": {
            "id": "d1",
            "interfaces": {"count": 3, "edges": [
                {"node": {"id": "i1", "display_label": "eth0", "__typename": "InfraInterface", "speed": {"value": 1000}}},
                {"node": {"id": "i2", "display_label": "eth1", "__typename": "InfraInterface", "speed": {"value": 100}}}
            ]}
        }}]}});

        let (count, rows) = relationship_rows("InfraDevice", "interfaces", Some(&interface()), &data).unwrap();
        assert_eq!(count, 3);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cell_text("speed"), "1000");

        let (_, rows) = relationship_rows("InfraDevice", "interfaces", None, &data).unwrap();
        assert_eq!(rows[1].display_label.as_deref(), Some("eth1"));
        assert_eq!(rows[1].typename.as_deref(), Some("InfraInterface"));

        let missing = json!({"InfraDevice": {"edges": []}});
        assert_eq!(relationship_rows("InfraDevice", "interfaces", None, &missing).unwrap().0, 0);
    }
}
