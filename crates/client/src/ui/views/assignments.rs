use chrono::Utc;
use dioxus::prelude::*;
use lms_admin_shared::{Assignment, AssignmentStatus};

use super::ErrorAlert;
use crate::app::AppContext;
use crate::pages::AssignmentsPage;
use crate::roles::RolePermission;
use crate::ui::{use_cached_resource, UiState};

#[component]
pub fn Assignments() -> Element {
    let app = use_context::<AppContext>();
    let ui = use_context::<UiState>();
    let perms = RolePermission::from_auth(&app.auth);
    let page = AssignmentsPage::new(app);
    let mut page_no = use_signal(|| 1u32);
    let mut action_error = use_signal(|| None::<String>);

    let assignments = use_cached_resource({
        let page = page.clone();
        move || {
            let page = page.clone();
            let n = page_no();
            async move { page.load(n).await }
        }
    });

    let on_status = {
        let page = page.clone();
        move |(id, status): (i64, AssignmentStatus)| {
            let page = page.clone();
            spawn(async move {
                match page.update_status(id, status).await {
                    Ok(_) => ui.data_changed(),
                    Err(e) => action_error.set(Some(e.user_message())),
                }
            });
        }
    };

    let on_delete = {
        let page = page.clone();
        move |id: i64| {
            let page = page.clone();
            spawn(async move {
                match page.delete(id).await {
                    Ok(()) => ui.data_changed(),
                    Err(e) => action_error.set(Some(e.user_message())),
                }
            });
        }
    };

    let body = match &*assignments.read() {
        Some(Ok(list)) => {
            let last = list.total_pages.max(1);
            let current = page_no();
            rsx! {
                if list.assignments.is_empty() {
                    p { class: "text-gray-500", "No assignments." }
                }
                ul { class: "divide-y border rounded",
                    for assignment in list.assignments.iter().cloned() {
                        AssignmentRow {
                            key: "{assignment.id}",
                            assignment: assignment.clone(),
                            is_student: perms.is_student(),
                            on_status: on_status.clone(),
                            on_delete: on_delete.clone(),
                        }
                    }
                }
                div { class: "flex items-center gap-3 text-sm",
                    button {
                        disabled: current <= 1,
                        onclick: move |_| page_no.set(current.saturating_sub(1).max(1)),
                        "Previous"
                    }
                    span { "Page {current} of {last}" }
                    button {
                        disabled: current >= last,
                        onclick: move |_| page_no.set(current + 1),
                        "Next"
                    }
                }
            }
        }
        Some(Err(e)) => rsx! { ErrorAlert { message: e.user_message() } },
        None => rsx! { p { class: "text-gray-500", "Loading assignments..." } },
    };

    rsx! {
        div { class: "space-y-6",
            h1 { class: "text-2xl font-bold", "Assignments" }
            if let Some(err) = action_error() {
                ErrorAlert { message: err }
            }
            {body}
        }
    }
}

#[component]
fn AssignmentRow(
    assignment: Assignment,
    is_student: bool,
    on_status: EventHandler<(i64, AssignmentStatus)>,
    on_delete: EventHandler<i64>,
) -> Element {
    let id = assignment.id;
    let who = if is_student {
        assignment.instructor_name.clone().unwrap_or_default()
    } else {
        assignment.student_name.clone().unwrap_or_default()
    };
    let due = assignment
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "no due date".to_string());
    let overdue = assignment.is_past_due(Utc::now());
    let status = assignment.status.as_str();
    let status_class = if overdue { "text-xs text-red-600" } else { "text-xs text-gray-600" };
    let next = match assignment.status {
        AssignmentStatus::Pending => Some((AssignmentStatus::InProgress, "Start")),
        AssignmentStatus::InProgress => Some((AssignmentStatus::Completed, "Complete")),
        _ => None,
    };

    rsx! {
        li { class: "flex items-center gap-4 px-4 py-3",
            div { class: "flex-1",
                p { class: "font-medium", "{assignment.title}" }
                p { class: "text-xs text-gray-500", "{assignment.content_title} / {who} / due {due}" }
            }
            span { class: status_class, "{status}" }
            if let Some((target, label)) = next {
                button {
                    class: "text-sm text-indigo-600",
                    onclick: move |_| on_status.call((id, target)),
                    "{label}"
                }
            }
            if !is_student {
                button { class: "text-sm text-red-600", onclick: move |_| on_delete.call(id), "Delete" }
            }
        }
    }
}
