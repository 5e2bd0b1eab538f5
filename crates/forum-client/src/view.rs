//! View-state projection
//!
//! A pure function of session presence: token present means the auth buttons
//! hide and the user-info panel shows, and the inverse when absent. The core
//! never touches a rendering surface; frontends read this value and reflect
//! it however they draw.

use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Whether a frontend surface should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

/// What the frontend should be showing for a given session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Login/register buttons
    pub auth_buttons: Visibility,
    /// Logged-in user panel (username + logout)
    pub user_info: Visibility,
    /// Login form modal
    pub login_modal: Visibility,
    /// Registration form modal
    pub register_modal: Visibility,
}

impl ViewState {
    /// Project the session onto the visible surfaces. Modals start hidden.
    pub fn for_session(session: &Session) -> Self {
        if session.is_authenticated() {
            Self {
                auth_buttons: Visibility::Hidden,
                user_info: Visibility::Visible,
                login_modal: Visibility::Hidden,
                register_modal: Visibility::Hidden,
            }
        } else {
            Self {
                auth_buttons: Visibility::Visible,
                user_info: Visibility::Hidden,
                login_modal: Visibility::Hidden,
                register_modal: Visibility::Hidden,
            }
        }
    }

    /// Open the login modal (closing the register modal if it was up).
    pub fn open_login_modal(mut self) -> Self {
        self.login_modal = Visibility::Visible;
        self.register_modal = Visibility::Hidden;
        self
    }

    /// Open the register modal (closing the login modal if it was up).
    pub fn open_register_modal(mut self) -> Self {
        self.register_modal = Visibility::Visible;
        self.login_modal = Visibility::Hidden;
        self
    }

    /// Dismiss any open modal.
    pub fn dismiss_modals(mut self) -> Self {
        self.login_modal = Visibility::Hidden;
        self.register_modal = Visibility::Hidden;
        self
    }
}
