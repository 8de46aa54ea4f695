//! Branch selector, branch list and branch details
//!
//! Creating a branch switches the app to it by navigating to the current
//! path with only `?branch=<name>` as query string.

use infraview_core::branch::{branch_route, with_branch_param, Branch, BRANCH_QUERY_PARAM, DEFAULT_BRANCH};
use infraview_core::query::{branch_create_mutation, branch_delete_mutation, branches_query, GraphqlRequest, QueryState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos::web_sys;
use leptos_router::components::Redirect;
use leptos_router::hooks::{use_location, use_navigate, use_params_map};
use serde_json::json;

use super::modal::DeleteModal;
use crate::api;
use crate::state::{branch_href, use_branch, use_query, QueryHandle};

fn use_branches() -> QueryHandle {
    use_query(|| GraphqlRequest::from(&branches_query()))
}

fn branch_list(state: QueryState<serde_json::Value>) -> QueryState<Vec<Branch>> {
    match state {
        QueryState::Data(data) => Branch::list_from_response(&data).into(),
        QueryState::Error(e) => QueryState::Error(e),
        QueryState::Loading => QueryState::Loading,
    }
}

/// URL switching the current page to a freshly created branch
pub fn created_branch_url(pathname: &str, name: &str) -> String {
    format!("{}?{}={}", pathname, BRANCH_QUERY_PARAM, urlencoding::encode(name))
}

/// Branch picker and "create branch" popover shown in the header
#[component]
pub fn BranchSelector() -> impl IntoView {
    let branches = use_branches();
    let branch = use_branch();
    let location = use_location();
    let navigate = use_navigate();
    let creating = RwSignal::new(false);

    let on_select = {
        let navigate = navigate.clone();
        move |ev: web_sys::Event| {
            let name = event_target_value(&ev);
            let current = format!(
                "{}{}",
                location.pathname.get_untracked(),
                location.search.get_untracked()
            );
            navigate(&with_branch_param(&current, Some(&name)), Default::default());
        }
    };

    view! {
        <div class="relative flex items-center gap-2">
            <select
                class="bg-gray-700 text-white rounded px-2 py-1 text-sm"
                on:change=on_select
            >
                {move || match branch_list(branches.state()) {
                    QueryState::Data(list) => {
                        let active = branch.get().unwrap_or_else(|| DEFAULT_BRANCH.to_string());
                        list.into_iter().map(|b| {
                            let selected = b.name == active;
                            view! { <option value=b.name.clone() selected=selected>{b.name}</option> }
                        }).collect_view().into_any()
                    }
                    QueryState::Error(_) => view! { <option>"unavailable"</option> }.into_any(),
                    QueryState::Loading => view! { <option>"..."</option> }.into_any(),
                }}
            </select>
            <button
                data-testid="create-branch-button"
                class="bg-gray-700 hover:bg-gray-600 text-white rounded px-2 py-1 text-sm"
                on:click=move |_| creating.update(|open| *open = !*open)
            >
                "+"
            </button>
            <Show when=move || creating.get()>
                <CreateBranchForm open=creating branches=branches />
            </Show>
        </div>
    }
}

#[component]
fn CreateBranchForm(open: RwSignal<bool>, branches: QueryHandle) -> impl IntoView {
    let location = use_location();
    let navigate = use_navigate();
    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (sync_with_git, set_sync_with_git) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let on_create = move |_| {
        let name = name.get_untracked().trim().to_string();
        if name.is_empty() {
            set_error.set(Some("Branch name is required".to_string()));
            return;
        }
        let description = description.get_untracked();
        let variables = Branch::create_variables(
            &name,
            Some(description.as_str()).filter(|d| !d.is_empty()),
            sync_with_git.get_untracked(),
        );
        let target = created_branch_url(&location.pathname.get_untracked(), &name);
        let navigate = navigate.clone();

        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::query(&branch_create_mutation(), Some(variables), None).await {
                Ok(_) => {
                    log::info!("Created branch {}", name);
                    open.try_set(false);
                    branches.refetch();
                    navigate(&target, Default::default());
                }
                Err(e) => {
                    set_error.try_set(Some(e));
                    set_saving.try_set(false);
                }
            }
        });
    };

    view! {
        <div class="absolute right-0 top-10 w-72 bg-white text-gray-900 rounded shadow-lg p-4 z-40">
            <label for="new-branch-name" class="block text-sm font-medium text-gray-700 mb-1">
                "New branch"
            </label>
            <input
                id="new-branch-name"
                type="text"
                class="w-full border border-gray-300 rounded px-2 py-1 mb-2"
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Description"
                class="w-full border border-gray-300 rounded px-2 py-1 mb-2"
                prop:value=move || description.get()
                on:input=move |ev| set_description.set(event_target_value(&ev))
            />
            <label class="flex items-center gap-2 text-sm mb-3">
                <input
                    type="checkbox"
                    prop:checked=move || sync_with_git.get()
                    on:change=move |ev| set_sync_with_git.set(event_target_checked(&ev))
                />
                "Sync with Git"
            </label>
            {move || error.get().map(|e| view! { <p class="text-xs text-red-500 mb-2">{e}</p> })}
            <button
                class="w-full bg-blue-500 hover:bg-blue-600 text-white rounded px-3 py-1 disabled:opacity-50"
                disabled=move || saving.get()
                on:click=on_create
            >
                "Create"
            </button>
        </div>
    }
}

#[component]
pub fn Branches() -> impl IntoView {
    let branches = use_branches();
    let branch = use_branch();

    view! {
        <div class="p-6">
            <h2 class="text-2xl font-bold mb-6">"Branches"</h2>
            {move || match branch_list(branches.state()) {
                QueryState::Loading => view! { <div class="text-gray-500">"Loading..."</div> }.into_any(),
                QueryState::Error(e) => view! {
                    <div class="text-red-500">{format!("Failed to load branches: {}", e)}</div>
                }.into_any(),
                QueryState::Data(list) => view! {
                    <div class="bg-white rounded-lg shadow overflow-hidden">
                        <table class="min-w-full divide-y divide-gray-200">
                            <thead class="bg-gray-50">
                                <tr>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Name"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Description"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Branched from"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Git"</th>
                                </tr>
                            </thead>
                            <tbody class="bg-white divide-y divide-gray-200">
                                {list.into_iter().map(|b| {
                                    let href = branch_href(&branch_route(&b.name), branch.get_untracked().as_deref());
                                    view! {
                                        <tr class="hover:bg-gray-50">
                                            <td class="px-6 py-4">
                                                <a href=href class="text-blue-600 hover:underline">{b.name.clone()}</a>
                                                {b.is_default.then(|| view! {
                                                    <span class="ml-2 px-2 text-xs rounded-full bg-gray-100">"default"</span>
                                                })}
                                            </td>
                                            <td class="px-6 py-4 text-sm text-gray-600">{b.description.unwrap_or_default()}</td>
                                            <td class="px-6 py-4 text-sm text-gray-600">{b.branched_from.unwrap_or_default()}</td>
                                            <td class="px-6 py-4 text-sm">{if b.sync_with_git { "yes" } else { "no" }}</td>
                                        </tr>
                                    }
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>
                }.into_any(),
            }}
        </div>
    }
}

#[component]
pub fn BranchDetails() -> impl IntoView {
    let params = use_params_map();
    let name = move || params.read().get("name").unwrap_or_default();
    let branches = use_branches();
    let confirming = RwSignal::new(false);
    let (deleting, set_deleting) = signal(false);
    let (deleted, set_deleted) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let on_confirm = Callback::new(move |_| {
        let name = name();
        set_deleting.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::query(&branch_delete_mutation(), Some(json!({ "name": name })), None).await {
                Ok(_) => {
                    log::info!("Deleted branch {}", name);
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

    view! {
        <div class="p-6">
            {move || deleted.get().then(|| view! { <Redirect path="/branches" /> })}
            <div class="flex justify-between items-center mb-6">
                <h2 class="text-2xl font-bold">{move || format!("Branch {}", name())}</h2>
                <button
                    class="bg-red-500 hover:bg-red-600 text-white px-4 py-2 rounded"
                    on:click=move |_| confirming.set(true)
                >
                    "Delete"
                </button>
            </div>
            {move || error.get().map(|e| view! {
                <div class="mb-4 p-3 bg-red-100 text-red-700 rounded">{e}</div>
            })}
            {move || match branch_list(branches.state()) {
                QueryState::Data(list) => match list.into_iter().find(|b| b.name == name()) {
                    Some(b) => view! {
                        <dl class="bg-white rounded-lg shadow p-6 grid grid-cols-2 gap-4">
                            <dt class="text-sm text-gray-500">"Description"</dt>
                            <dd>{b.description.unwrap_or_default()}</dd>
                            <dt class="text-sm text-gray-500">"Origin branch"</dt>
                            <dd>{b.origin_branch.unwrap_or_default()}</dd>
                            <dt class="text-sm text-gray-500">"Branched from"</dt>
                            <dd>{b.branched_from.unwrap_or_default()}</dd>
                            <dt class="text-sm text-gray-500">"Created at"</dt>
                            <dd>{b.created_at.unwrap_or_default()}</dd>
                            <dt class="text-sm text-gray-500">"Sync with Git"</dt>
                            <dd>{if b.sync_with_git { "yes" } else { "no" }}</dd>
                            <dt class="text-sm text-gray-500">"Schema changes"</dt>
                            <dd>{if b.has_schema_changes { "yes" } else { "no" }}</dd>
                        </dl>
                    }.into_any(),
                    None => view! { <div class="text-gray-500">"Branch not found"</div> }.into_any(),
                },
                QueryState::Error(e) => view! { <div class="text-red-500">{e}</div> }.into_any(),
                QueryState::Loading => view! { <div class="text-gray-500">"Loading..."</div> }.into_any(),
            }}
            <DeleteModal open=confirming label=name() on_confirm=on_confirm deleting=deleting />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_branch_url_drops_other_params() {
        assert_eq!(created_branch_url("/objects/InfraDevice", "test-branch"), "/objects/InfraDevice?branch=test-branch");
        assert_eq!(created_branch_url("/", "feature/x"), "/?branch=feature%2Fx");
    }

    #[test]
    fn test_branch_list_maps_states() {
        let data = json!({"Branch": [{"name": "main", "is_default": true}, {"name": "dev"}]});
        match branch_list(QueryState::Data(data)) {
            QueryState::Data(list) => {
                assert_eq!(list.len(), 2);
                assert!(list[0].is_default);
                assert_eq!(list[1].name, "dev");
            }
            other => panic!("unexpected state {:?}", other),
        }
        assert!(branch_list(QueryState::Data(json!({}))).error().is_some());
        assert!(branch_list(QueryState::Loading).is_loading());
    }
}
