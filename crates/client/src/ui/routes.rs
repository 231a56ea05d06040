//! Application routing configuration.

use dioxus::prelude::*;

use super::views::{
    AiCreator, Assignments, Courses, Dashboard, DeckDetail, Decks, Login, Shell, Users,
};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login")]
    Login {},

    // Everything else requires a session
    #[layout(Shell)]
        #[route("/")]
        Dashboard {},
        #[route("/decks")]
        Decks {},
        #[route("/decks/:deck_id")]
        DeckDetail { deck_id: String },
        #[route("/decks/:deck_id/ai")]
        AiCreator { deck_id: String },
        #[route("/courses")]
        Courses {},
        #[route("/users")]
        Users {},
        #[route("/assignments")]
        Assignments {},
}
