use leptos::prelude::*;

/// Overlay dialog shown while `open` is set
#[component]
pub fn Modal(open: RwSignal<bool>, title: String, children: ChildrenFn) -> impl IntoView {
    let title = StoredValue::new(title);
    view! {
        <Show when=move || open.get()>
            <div class="fixed inset-0 bg-black bg-opacity-40 flex items-center justify-center z-50">
                <div class="bg-white rounded-lg shadow-lg w-full max-w-xl max-h-screen overflow-y-auto p-6">
                    <div class="flex justify-between items-center mb-4">
                        <h3 class="text-lg font-bold">{title.get_value()}</h3>
                        <button class="text-gray-400 hover:text-gray-600" on:click=move |_| open.set(false)>
                            "✕"
                        </button>
                    </div>
                    {children()}
                </div>
            </div>
        </Show>
    }
}

/// Confirmation dialog for deleting `label`
#[component]
pub fn DeleteModal(
    open: RwSignal<bool>,
    label: String,
    on_confirm: Callback<()>,
    #[prop(into)] deleting: Signal<bool>,
) -> impl IntoView {
    let label = StoredValue::new(label);
    view! {
        <Modal open=open title="Delete".to_string()>
            <p class="mb-6 text-gray-700">
                "Are you sure you want to delete "
                <span class="font-semibold">{label.get_value()}</span>
                "?"
            </p>
            <div class="flex justify-end gap-2">
                <button
                    class="px-4 py-2 rounded border border-gray-300 hover:bg-gray-50"
                    on:click=move |_| open.set(false)
                >
                    "Cancel"
                </button>
                <button
                    data-testid="modal-delete-confirm"
                    class="bg-red-500 hover:bg-red-600 text-white px-4 py-2 rounded disabled:opacity-50"
                    disabled=move || deleting.get()
                    on:click=move |_| on_confirm.run(())
                >
                    {move || if deleting.get() { "Deleting..." } else { "Delete" }}
                </button>
            </div>
        </Modal>
    }
}
