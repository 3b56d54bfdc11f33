//! Dashboard page: navbar, upload form, and the file table.
//! Redirects to `/auth` once the session settles without a user.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::html::Input;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::files::{FileItem, FileList, SelectedFile};
use crate::state::session::SessionContext;
use crate::util::auth::install_unauth_redirect;

pub const NO_FILE_SELECTED: &str = "Please select a file to upload";
pub const DELETE_CONFIRM: &str = "Are you sure you want to delete this file?";

pub fn uploaded_notice(name: &str) -> String {
    format!("File \"{name}\" uploaded successfully!")
}

pub fn download_notice(name: &str) -> String {
    format!("Downloading \"{name}\"")
}

/// Greeting for the navbar.
pub fn welcome_line(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => format!("Welcome, {name}"),
        _ => "Welcome".to_owned(),
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    install_unauth_redirect(session, use_navigate());

    let files = RwSignal::new(FileList::with_samples());
    let notice = RwSignal::new(None::<String>);
    let file_input = NodeRef::<Input>::new();

    let user_name = move || session.state.get().user().map(|u| u.name.clone());
    let user_email = move || session.state.get().user().map(|u| u.email.clone()).unwrap_or_default();

    let on_logout = move |_| {
        session.spawn(|manager| async move {
            manager.logout().await;
        });
    };

    let on_upload = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(selected) = take_selected_file(file_input) else {
            notice.set(Some(NO_FILE_SELECTED.to_owned()));
            return;
        };
        let date = today();
        files.update(|list| {
            list.upload(&selected, &date);
        });
        notice.set(Some(uploaded_notice(&selected.name)));
    };

    let on_download = Callback::new(move |file: FileItem| {
        notice.set(Some(download_notice(&file.name)));
    });

    let on_delete = Callback::new(move |id: String| {
        if confirm_delete() {
            files.update(|list| {
                list.remove(&id);
            });
        }
    });

    view! {
        <div class="dashboard-page">
            <nav class="navbar">
                <h1 class="navbar__brand">"storAIge"</h1>
                <div class="navbar__user">
                    <span class="navbar__welcome" title=user_email>
                        {move || welcome_line(user_name().as_deref())}
                    </span>
                    <button class="btn btn--light" on:click=on_logout>"Logout"</button>
                </div>
            </nav>

            <main class="dashboard-page__content">
                <h2>"Your Files"</h2>

                <Show when=move || notice.get().is_some()>
                    <div class="notice" role="status">
                        <span>{move || notice.get().unwrap_or_default()}</span>
                        <button class="link-button" type="button" on:click=move |_| notice.set(None)>
                            "Dismiss"
                        </button>
                    </div>
                </Show>

                <section class="upload-panel">
                    <h3>"Upload New File"</h3>
                    <form class="upload-panel__form" on:submit=on_upload>
                        <input class="upload-panel__input" type="file" id="file-input" node_ref=file_input/>
                        <button class="btn btn--primary" type="submit">"Upload"</button>
                    </form>
                </section>

                <section class="files-panel">
                    <h3>"Uploaded Files"</h3>
                    <Show
                        when=move || !files.with(FileList::is_empty)
                        fallback=|| view! { <div class="files-panel__empty">"No files uploaded yet"</div> }
                    >
                        <FileTable files=files on_download=on_download on_delete=on_delete/>
                    </Show>
                </section>
            </main>
        </div>
    }
}

#[component]
fn FileTable(files: RwSignal<FileList>, on_download: Callback<FileItem>, on_delete: Callback<String>) -> impl IntoView {
    view! {
        <table class="files-table">
            <thead>
                <tr>
                    <th>"File Name"</th>
                    <th>"Type"</th>
                    <th>"Size"</th>
                    <th>"Date"</th>
                    <th>"Actions"</th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=move || files.with(|list| list.items().to_vec())
                    key=|file| file.id.clone()
                    children=move |file| {
                        let download = file.clone();
                        let id = file.id.clone();
                        view! {
                            <tr>
                                <td class="files-table__name">{file.name}</td>
                                <td><span class="badge">{file.kind}</span></td>
                                <td>{file.size}</td>
                                <td>{file.date}</td>
                                <td class="files-table__actions">
                                    <button
                                        class="link-button"
                                        type="button"
                                        on:click=move |_| on_download.run(download.clone())
                                    >
                                        "Download"
                                    </button>
                                    <button
                                        class="link-button link-button--danger"
                                        type="button"
                                        on:click=move |_| on_delete.run(id.clone())
                                    >
                                        "Delete"
                                    </button>
                                </td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
    }
}

/// Read the picked file's metadata and reset the input.
fn take_selected_file(input: NodeRef<Input>) -> Option<SelectedFile> {
    #[cfg(feature = "hydrate")]
    {
        let element = input.get()?;
        let file = element.files()?.get(0)?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bytes = file.size().max(0.0) as u64;
        let selected = SelectedFile { name: file.name(), bytes, mime: file.type_() };
        element.set_value("");
        Some(selected)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = input;
        None
    }
}

fn confirm_delete() -> bool {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(DELETE_CONFIRM).ok())
            .unwrap_or(false)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        false
    }
}

fn today() -> String {
    #[cfg(feature = "hydrate")]
    {
        let stamp = String::from(js_sys::Date::new_0().to_iso_string());
        crate::state::files::iso_day(&stamp).to_owned()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        String::new()
    }
}
