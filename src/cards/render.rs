//! Pure projection of a [`ViewState`] into what the adapter draws.

use serde::Serialize;

use crate::{cards::view::ViewState, models::user::UserRecord};

pub const LOADING_TEXT: &str = "Loading...";
pub const CARDS_TITLE: &str = "Random Users";
const AVATAR_ALT: &str = "User";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    rename_all = "camelCase",
    rename_all_fields = "camelCase",
    tag = "screen",
    content = "data"
)]
pub enum CardsScreen {
    Loading { text: String },
    Error { message: String },
    Cards { title: String, cards: Vec<Card> },
}

/// One rendered user card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Identity of the card for the adapter's list diffing: the user's email.
    pub key: String,
    /// Cosmetic style slot, `card1` for the first position and so on.
    pub variant: String,
    pub image_url: String,
    pub image_alt: String,
    pub heading: String,
    pub email_line: String,
    pub location_line: String,
}

impl Card {
    fn new(user: &UserRecord, position: usize) -> Self {
        Self {
            key: user.email.clone(),
            variant: format!("card{position}"),
            image_url: user.avatar_url.clone(),
            image_alt: AVATAR_ALT.to_owned(),
            heading: user.display_name.clone(),
            email_line: format!("Email: {}", user.email),
            location_line: format!("Location: {}", user.location_label),
        }
    }
}

pub fn render(state: &ViewState) -> CardsScreen {
    match state {
        ViewState::Loading => CardsScreen::Loading {
            text: LOADING_TEXT.to_owned(),
        },
        ViewState::Error { message } => CardsScreen::Error {
            message: message.clone(),
        },
        ViewState::Ready { users } => CardsScreen::Cards {
            title: CARDS_TITLE.to_owned(),
            cards: users
                .iter()
                .enumerate()
                .map(|(index, user)| Card::new(user, index + 1))
                .collect(),
        },
    }
}
