mod ai_creator;
mod assignments;
mod courses;
mod dashboard;
mod deck_detail;
mod decks;
mod login;
mod shell;
mod users;

use dioxus::prelude::*;

use crate::roles::RoleGate;

pub use ai_creator::AiCreator;
pub use assignments::Assignments;
pub use courses::Courses;
pub use dashboard::Dashboard;
pub use deck_detail::DeckDetail;
pub use decks::Decks;
pub use login::Login;
pub use shell::Shell;
pub use users::Users;

fn teacher_or_admin() -> Vec<String> {
    RoleGate::teacher_or_admin().allowed().to_vec()
}

/// Inline error box.
#[component]
fn ErrorAlert(message: String) -> Element {
    rsx! {
        div { class: "p-3 bg-red-500/10 border border-red-500/30 rounded-lg text-red-600 text-sm",
            "{message}"
        }
    }
}
