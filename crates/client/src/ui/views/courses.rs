use dioxus::prelude::*;
use lms_admin_shared::{Course, CreateCourseRequest};

use super::{teacher_or_admin, ErrorAlert};
use crate::app::AppContext;
use crate::pages::{CoursesPage, LessonsPage};
use crate::ui::{use_cached_resource, RoleBasedComponent, UiState};

#[component]
pub fn Courses() -> Element {
    let app = use_context::<AppContext>();
    let ui = use_context::<UiState>();
    let page = CoursesPage::new(app);
    let mut action_error = use_signal(|| None::<String>);
    let mut open = use_signal(|| None::<String>);

    let courses = use_cached_resource({
        let page = page.clone();
        move || {
            let page = page.clone();
            async move { page.load().await }
        }
    });

    let on_delete = {
        let page = page.clone();
        move |course_id: String| {
            let page = page.clone();
            spawn(async move {
                match page.delete(&course_id).await {
                    Ok(()) => ui.data_changed(),
                    Err(e) => action_error.set(Some(e.user_message())),
                }
            });
        }
    };

    let body = match &*courses.read() {
        Some(Ok(list)) if list.is_empty() => rsx! { p { class: "text-gray-500", "No courses yet." } },
        Some(Ok(list)) => rsx! {
            ul { class: "divide-y border rounded",
                for course in list.iter().cloned() {
                    CourseRow {
                        key: "{course.id}",
                        course: course.clone(),
                        expanded: open().as_deref() == Some(course.id.as_str()),
                        can_edit: page.can_edit(),
                        on_toggle: move |id: String| {
                            let next = if open().as_deref() == Some(id.as_str()) { None } else { Some(id) };
                            open.set(next);
                        },
                        on_delete: on_delete.clone(),
                    }
                }
            }
        },
        Some(Err(e)) => rsx! { ErrorAlert { message: e.user_message() } },
        None => rsx! { p { class: "text-gray-500", "Loading courses..." } },
    };

    rsx! {
        div { class: "space-y-6",
            h1 { class: "text-2xl font-bold", "Courses" }
            RoleBasedComponent { allowed_roles: teacher_or_admin(),
                CreateCourseForm {}
            }
            if let Some(err) = action_error() {
                ErrorAlert { message: err }
            }
            {body}
        }
    }
}

#[component]
fn CourseRow(
    course: Course,
    expanded: bool,
    can_edit: bool,
    on_toggle: EventHandler<String>,
    on_delete: EventHandler<String>,
) -> Element {
    let toggle_id = course.id.clone();
    let delete_id = course.id.clone();
    let status = if course.is_published { "published" } else { "draft" };

    rsx! {
        li { class: "px-4 py-3 space-y-2",
            div { class: "flex items-center gap-4",
                button {
                    class: "font-medium text-left",
                    onclick: move |_| on_toggle.call(toggle_id.clone()),
                    "{course.title}"
                }
                span { class: "text-xs text-gray-500", "{status} / {course.total_lessons} lessons" }
                if can_edit {
                    button {
                        class: "ml-auto text-sm text-red-600",
                        onclick: move |_| on_delete.call(delete_id.clone()),
                        "Delete"
                    }
                }
            }
            if expanded {
                CourseLessons { course_id: course.id.clone() }
            }
        }
    }
}

#[component]
fn CourseLessons(course_id: String) -> Element {
    let app = use_context::<AppContext>();
    let lessons = use_cached_resource(move || {
        let page = LessonsPage::new(app.clone(), course_id.clone());
        async move { page.load().await }
    });

    match &*lessons.read() {
        Some(Ok(list)) if list.is_empty() => rsx! { p { class: "text-sm text-gray-500", "No lessons." } },
        Some(Ok(list)) => rsx! {
            ol { class: "pl-6 list-decimal text-sm",
                for lesson in list.iter() {
                    li { key: "{lesson.id}", "{lesson.title}" }
                }
            }
        },
        Some(Err(e)) => rsx! { ErrorAlert { message: e.user_message() } },
        None => rsx! { p { class: "text-sm text-gray-500", "Loading lessons..." } },
    }
}

#[component]
fn CreateCourseForm() -> Element {
    let page = CoursesPage::new(use_context::<AppContext>());
    let ui = use_context::<UiState>();
    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let handle_submit = move |e: FormEvent| {
        e.prevent_default();
        let page = page.clone();
        let payload = CreateCourseRequest {
            title: title.read().trim().to_string(),
            description: description.read().trim().to_string(),
            instructor_id: String::new(),
        };
        error.set(None);

        spawn(async move {
            match page.create(payload).await {
                Ok(_) => {
                    title.set(String::new());
                    description.set(String::new());
                    ui.data_changed();
                }
                Err(err) => error.set(Some(err.user_message())),
            }
        });
    };

    rsx! {
        form { class: "border rounded p-4 space-y-3", onsubmit: handle_submit,
            h2 { class: "font-semibold", "New course" }
            input {
                class: "w-full border rounded px-3 py-2",
                placeholder: "Title",
                value: "{title}",
                oninput: move |e: FormEvent| title.set(e.value()),
            }
            textarea {
                class: "w-full border rounded px-3 py-2",
                placeholder: "Description",
                value: "{description}",
                oninput: move |e: FormEvent| description.set(e.value()),
            }
            if let Some(err) = error() {
                ErrorAlert { message: err }
            }
            button { r#type: "submit", class: "px-4 py-2 bg-indigo-600 text-white rounded", "Create course" }
        }
    }
}
