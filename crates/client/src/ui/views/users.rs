use dioxus::prelude::*;
use lms_admin_shared::{CreateUserRequest, Role, User};

use super::{teacher_or_admin, ErrorAlert};
use crate::app::AppContext;
use crate::pages::UsersPage;
use crate::ui::{use_cached_resource, ProtectedRoute, UiState};

#[component]
pub fn Users() -> Element {
    rsx! {
        ProtectedRoute { allowed_roles: teacher_or_admin(),
            UserDirectory {}
        }
    }
}

#[component]
fn UserDirectory() -> Element {
    let app = use_context::<AppContext>();
    let ui = use_context::<UiState>();
    let page = UsersPage::new(app);
    let mut action_error = use_signal(|| None::<String>);

    let users = use_cached_resource({
        let page = page.clone();
        move || {
            let page = page.clone();
            async move { page.load().await }
        }
    });

    let on_delete = {
        let page = page.clone();
        move |user_id: i64| {
            let page = page.clone();
            spawn(async move {
                match page.delete(user_id).await {
                    Ok(()) => ui.data_changed(),
                    Err(e) => action_error.set(Some(e.user_message())),
                }
            });
        }
    };

    let body = match &*users.read() {
        Some(Ok(list)) => rsx! {
            table { class: "w-full text-sm border",
                thead {
                    tr { class: "text-left bg-gray-50",
                        th { class: "px-3 py-2", "Username" }
                        th { class: "px-3 py-2", "Name" }
                        th { class: "px-3 py-2", "Email" }
                        th { class: "px-3 py-2", "Role" }
                        th {}
                    }
                }
                tbody {
                    for user in list.iter().cloned() {
                        UserRow { key: "{user.id}", user: user.clone(), on_delete: on_delete.clone() }
                    }
                }
            }
        },
        Some(Err(e)) => rsx! { ErrorAlert { message: e.user_message() } },
        None => rsx! { p { class: "text-gray-500", "Loading users..." } },
    };

    rsx! {
        div { class: "space-y-6",
            h1 { class: "text-2xl font-bold", "Users" }
            CreateUserForm {}
            if let Some(err) = action_error() {
                ErrorAlert { message: err }
            }
            {body}
        }
    }
}

#[component]
fn UserRow(user: User, on_delete: EventHandler<i64>) -> Element {
    let id = user.id;
    rsx! {
        tr { class: "border-t",
            td { class: "px-3 py-2", "{user.username}" }
            td { class: "px-3 py-2", "{user.full_name}" }
            td { class: "px-3 py-2", "{user.email}" }
            td { class: "px-3 py-2", "{user.role}" }
            td { class: "px-3 py-2 text-right",
                button { class: "text-red-600", onclick: move |_| on_delete.call(id), "Delete" }
            }
        }
    }
}

#[component]
fn CreateUserForm() -> Element {
    let page = UsersPage::new(use_context::<AppContext>());
    let ui = use_context::<UiState>();
    let roles = page.assignable_roles();

    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut full_name = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut role = use_signal(|| Role::Student.as_str().to_string());
    let mut error = use_signal(|| None::<String>);

    let handle_submit = move |e: FormEvent| {
        e.prevent_default();
        let page = page.clone();
        let payload = CreateUserRequest {
            username: username.read().trim().to_string(),
            email: email.read().trim().to_string(),
            full_name: full_name.read().trim().to_string(),
            password: password.read().clone(),
            role: Role::parse(&role.read()).unwrap_or(Role::Student),
        };
        error.set(None);

        spawn(async move {
            match page.create(payload).await {
                Ok(_) => {
                    username.set(String::new());
                    email.set(String::new());
                    full_name.set(String::new());
                    password.set(String::new());
                    ui.data_changed();
                }
                Err(err) => error.set(Some(err.user_message())),
            }
        });
    };

    rsx! {
        form { class: "border rounded p-4 grid grid-cols-2 gap-3", onsubmit: handle_submit,
            input { class: "border rounded px-3 py-2", placeholder: "Username", value: "{username}",
                oninput: move |e: FormEvent| username.set(e.value()) }
            input { class: "border rounded px-3 py-2", placeholder: "Email", value: "{email}",
                oninput: move |e: FormEvent| email.set(e.value()) }
            input { class: "border rounded px-3 py-2", placeholder: "Full name", value: "{full_name}",
                oninput: move |e: FormEvent| full_name.set(e.value()) }
            input { class: "border rounded px-3 py-2", r#type: "password", placeholder: "Password", value: "{password}",
                oninput: move |e: FormEvent| password.set(e.value()) }
            select { class: "border rounded px-3 py-2", value: "{role}",
                onchange: move |e: FormEvent| role.set(e.value()),
                for r in roles.iter().map(|r| r.as_str()) {
                    option { value: "{r}", "{r}" }
                }
            }
            button { r#type: "submit", class: "px-4 py-2 bg-indigo-600 text-white rounded", "Create user" }
            if let Some(err) = error() {
                div { class: "col-span-2", ErrorAlert { message: err } }
            }
        }
    }
}
