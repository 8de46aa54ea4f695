use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;

mod api;
mod components;
mod state;

use components::branches::{BranchDetails, BranchSelector, Branches};
use components::home::{Home, SchemaMenu};
use components::objects::{ObjectDetails, ObjectList};
use components::permissions::Permissions;
use state::{branch_href, provide_schema_context, use_branch};

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <Shell />
        </Router>
    }
}

/// Layout under the router, where the branch in the URL is readable
#[component]
fn Shell() -> impl IntoView {
    provide_schema_context();

    view! {
        <div class="flex h-screen bg-gray-100">
            // Sidebar
            <div class="w-64 bg-gray-800 text-white p-4 flex flex-col overflow-y-auto">
                <h1 class="text-2xl font-bold mb-8">"Infraview"</h1>
                <nav class="space-y-1 flex-1">
                    <NavLink href="/" label="Overview" />
                    <SchemaMenu />
                    <div class="border-t border-gray-700 my-4"></div>
                    <NavLink href="/branches" label="Branches" />
                    <NavLink href="/permissions" label="Permissions" />
                </nav>
            </div>

            // Main Content
            <div class="flex-1 flex flex-col overflow-hidden">
                <header class="bg-gray-800 text-white px-6 py-3 flex justify-end">
                    <BranchSelector />
                </header>
                <div class="flex-1 overflow-y-auto">
                    <Routes fallback=|| "Not found.">
                        <Route path=path!("/") view=Home/>
                        <Route path=path!("/objects/:kind") view=ObjectList/>
                        <Route path=path!("/objects/:kind/:id") view=ObjectDetails/>
                        <Route path=path!("/branches") view=Branches/>
                        <Route path=path!("/branches/:name") view=BranchDetails/>
                        <Route path=path!("/permissions") view=Permissions/>
                    </Routes>
                </div>
            </div>
        </div>
    }
}

/// Sidebar link keeping the active branch
#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    let branch = use_branch();
    view! {
        <A
            href=move || branch_href(href, branch.get().as_deref())
            attr:class="block p-2 hover:bg-gray-700 rounded transition-colors"
        >
            {label}
        </A>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(App);
}
