//! LMS admin front end entry point (web on wasm32, desktop elsewhere).

#![allow(non_snake_case)]

fn main() {
    dioxus::launch(lms_admin_client::ui::App);
}
