use infraview_core::permissions::PermissionRow;
use infraview_core::query::{
    global_permissions_query, object_permissions_query, GraphqlRequest, QueryState,
    GLOBAL_PERMISSION_KIND, OBJECT_PERMISSION_KIND,
};
use leptos::prelude::*;
use serde_json::Value;

use crate::state::use_query;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionTab {
    Object,
    Global,
}

impl PermissionTab {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Object => OBJECT_PERMISSION_KIND,
            Self::Global => GLOBAL_PERMISSION_KIND,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Object => "Object permissions",
            Self::Global => "Global permissions",
        }
    }

    fn request(&self) -> GraphqlRequest {
        match self {
            Self::Object => GraphqlRequest::from(&object_permissions_query()),
            Self::Global => GraphqlRequest::from(&global_permissions_query()),
        }
    }
}

pub fn permission_rows(tab: PermissionTab, state: QueryState<Value>) -> QueryState<Vec<PermissionRow>> {
    match state {
        QueryState::Data(data) => PermissionRow::listing(tab.kind(), &data).into(),
        QueryState::Error(e) => QueryState::Error(e),
        QueryState::Loading => QueryState::Loading,
    }
}

/// Comma separated role labels
pub fn role_names(row: &PermissionRow) -> String {
    row.roles
        .iter()
        .map(|r| r.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[component]
pub fn Permissions() -> impl IntoView {
    let tab = RwSignal::new(PermissionTab::Object);
    let listing = use_query(move || tab.get().request());

    let tab_button = move |t: PermissionTab| {
        view! {
            <button
                class=move || if tab.get() == t {
                    "pb-2 border-b-2 border-blue-500 text-blue-600 font-medium"
                } else {
                    "pb-2 text-gray-500 hover:text-gray-700"
                }
                on:click=move |_| tab.set(t)
            >
                {t.label()}
            </button>
        }
    };

    view! {
        <div class="p-6">
            <h2 class="text-2xl font-bold mb-6">"Permissions"</h2>
            <div class="flex gap-4 border-b border-gray-200 mb-4">
                {tab_button(PermissionTab::Object)}
                {tab_button(PermissionTab::Global)}
            </div>
            {move || {
                let current = tab.get();
                match permission_rows(current, listing.state()) {
                    QueryState::Loading => view! { <div class="text-gray-500">"Loading..."</div> }.into_any(),
                    QueryState::Error(e) => view! {
                        <div class="text-red-500">{format!("Failed to load permissions: {}", e)}</div>
                    }.into_any(),
                    QueryState::Data(rows) if rows.is_empty() => view! {
                        <div class="text-gray-500">"No permissions"</div>
                    }.into_any(),
                    QueryState::Data(rows) => {
                        let object = current == PermissionTab::Object;
                        view! {
                            <div class="bg-white rounded-lg shadow overflow-hidden">
                                <table class="min-w-full divide-y divide-gray-200">
                                    <thead class="bg-gray-50">
                                        <tr>
                                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Name"</th>
                                            {object.then(|| view! {
                                                <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Branch"</th>
                                                <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Namespace"</th>
                                            })}
                                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Action"</th>
                                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Decision"</th>
                                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Roles"</th>
                                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Identifier"</th>
                                        </tr>
                                    </thead>
                                    <tbody class="bg-white divide-y divide-gray-200">
                                        {rows.into_iter().map(|row| {
                                            let roles = role_names(&row);
                                            let (decision, decision_class) = match row.decision {
                                                Some(d) if d.is_allowed() => (d.label(), "px-2 text-xs rounded-full bg-green-100 text-green-800"),
                                                Some(d) => (d.label(), "px-2 text-xs rounded-full bg-red-100 text-red-800"),
                                                None => ("", ""),
                                            };
                                            view! {
                                                <tr class="hover:bg-gray-50">
                                                    <td class="px-6 py-4 text-sm font-medium">
                                                        {row.name.clone().unwrap_or_else(|| row.display_label.clone())}
                                                    </td>
                                                    {object.then(|| view! {
                                                        <td class="px-6 py-4 text-sm text-gray-600">{row.branch.clone().unwrap_or_default()}</td>
                                                        <td class="px-6 py-4 text-sm text-gray-600">{row.namespace.clone().unwrap_or_default()}</td>
                                                    })}
                                                    <td class="px-6 py-4 text-sm text-gray-600">{row.action.clone().unwrap_or_default()}</td>
                                                    <td class="px-6 py-4 text-sm">
                                                        <span class=decision_class>{decision}</span>
                                                    </td>
                                                    <td class="px-6 py-4 text-sm text-gray-600">{roles}</td>
                                                    <td class="px-6 py-4 text-xs font-mono text-gray-500">{row.identifier.clone().unwrap_or_default()}</td>
                                                </tr>
                                            }
                                        }).collect_view()}
                                    </tbody>
                                </table>
                            </div>
                        }.into_any()
                    }
                }
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_permission_rows_per_tab() {
        let data = json!({"CoreGlobalPermission": {"count": 1, "edges": [{"node": {
            "id": "g1",
            "display_label": "super admin",
            "name": {"value": "Super admin"},
            "action": {"value": "super_admin"},
            "decision": {"value": 6},
            "roles": {"count": 2, "edges": [
                {"node": {"id": "r1", "display_label": "Admins"}},
                {"node": {"id": "r2", "display_label": "Operators"}}
            ]}
        }}]}});

        match permission_rows(PermissionTab::Global, QueryState::Data(data.clone())) {
            QueryState::Data(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(role_names(&rows[0]), "Admins, Operators");
            }
            other => panic!("unexpected state {:?}", other),
        }
        assert!(permission_rows(PermissionTab::Object, QueryState::Data(data))
            .error()
            .is_some());
    }

    #[test]
    fn test_tab_kinds() {
        assert_eq!(PermissionTab::Object.kind(), "CoreObjectPermission");
        assert_eq!(PermissionTab::Global.kind(), "CoreGlobalPermission");
    }
}
