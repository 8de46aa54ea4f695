use infraview_core::branch::DEFAULT_BRANCH;
use infraview_core::query::QueryState;
use leptos::prelude::*;

use super::objects::list_page_route;
use crate::state::{branch_href, use_branch, use_schema};

/// Sidebar entries generated from the schema menu
#[component]
pub fn SchemaMenu() -> impl IntoView {
    let schemas = use_schema();
    let branch = use_branch();

    move || {
        let snapshot = schemas.snapshot();
        let branch = branch.get();
        let groups = snapshot
            .menu()
            .into_iter()
            .map(|(namespace, nodes)| {
                view! {
                    <div class="mt-4">
                        <div class="text-xs uppercase text-gray-400 px-2 mb-1">{namespace}</div>
                        {nodes.into_iter().map(|node| {
                            let href = branch_href(&list_page_route(&node.kind, 0), branch.as_deref());
                            view! {
                                <a href=href class="block px-2 py-1 text-sm hover:bg-gray-700 rounded transition-colors">
                                    {node.display_label().to_string()}
                                </a>
                            }
                        }).collect_view()}
                    </div>
                }
            })
            .collect_view();
        groups
    }
}

#[component]
pub fn Home() -> impl IntoView {
    let schemas = use_schema();
    let branch = use_branch();

    view! {
        <div class="p-6">
            <h2 class="text-3xl font-bold mb-6">"Overview"</h2>
            {move || match schemas.state() {
                QueryState::Loading => view! { <div class="text-gray-500">"Loading schema..."</div> }.into_any(),
                QueryState::Error(e) => view! {
                    <div class="text-red-500">{format!("Failed to load schema: {}", e)}</div>
                }.into_any(),
                QueryState::Data(snapshot) => {
                    let branch = branch.get();
                    let groups = snapshot.menu().into_iter().map(|(namespace, nodes)| view! {
                        <div class="mb-4">
                            <h3 class="font-semibold text-gray-700 mb-2">{namespace}</h3>
                            <div class="flex flex-wrap gap-2">
                                {nodes.into_iter().map(|node| {
                                    let href = branch_href(&list_page_route(&node.kind, 0), branch.as_deref());
                                    view! {
                                        <a href=href class="px-3 py-1 rounded bg-gray-100 hover:bg-gray-200 text-sm">
                                            {node.display_label().to_string()}
                                        </a>
                                    }
                                }).collect_view()}
                            </div>
                        </div>
                    }).collect_view();
                    let nodes = snapshot.nodes().len();
                    let generics = snapshot.generics().len();
                    view! {
                        <div class="grid grid-cols-1 md:grid-cols-3 gap-6 mb-8">
                            <div class="bg-white p-6 rounded-lg shadow">
                                <h3 class="text-lg font-semibold text-gray-700">"Node types"</h3>
                                <p class="text-3xl font-bold text-blue-600">{nodes}</p>
                            </div>
                            <div class="bg-white p-6 rounded-lg shadow">
                                <h3 class="text-lg font-semibold text-gray-700">"Generic types"</h3>
                                <p class="text-3xl font-bold text-green-600">{generics}</p>
                            </div>
                            <div class="bg-white p-6 rounded-lg shadow">
                                <h3 class="text-lg font-semibold text-gray-700">"Branch"</h3>
                                <p class="text-3xl font-bold text-purple-600">
                                    {branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string())}
                                </p>
                            </div>
                        </div>
                        <div class="bg-white rounded-lg shadow p-6">{groups}</div>
                    }.into_any()
                }
            }}
        </div>
    }
}
