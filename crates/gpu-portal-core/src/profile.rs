//! Editable copy of the signed-in user's details.

use crate::error::{Error, Result};
use crate::session::User;
use serde::{Deserialize, Serialize};

pub const PROFILE_SAVED_MESSAGE: &str = "Profile updated successfully";
pub const PROFILE_SAVE_FAILED_MESSAGE: &str = "Failed to update profile";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub organization: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl ProfileDraft {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            organization: user.organization.clone(),
            avatar: user.avatar.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("name must not be empty".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(Error::InvalidInput("email must not be empty".to_string()));
        }
        Ok(())
    }

    /// The user with this draft applied. Id and role are not editable.
    pub fn apply_to(&self, user: &User) -> Result<User> {
        self.validate()?;
        let avatar = self
            .avatar
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        Ok(User {
            id: user.id.clone(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            organization: self.organization.trim().to_string(),
            role: user.role.clone(),
            avatar,
        })
    }

    /// Letter shown in place of a missing avatar.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

/// Profile page state: view mode or an edit in progress.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileEditor {
    draft: ProfileDraft,
    editing: bool,
}

impl ProfileEditor {
    pub fn new(user: &User) -> Self {
        Self {
            draft: ProfileDraft::from_user(user),
            editing: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProfileDraft {
        &mut self.draft
    }

    /// Enter edit mode, or cancel and discard the draft.
    pub fn toggle_editing(&mut self, user: &User) {
        if self.editing {
            self.draft = ProfileDraft::from_user(user);
        }
        self.editing = !self.editing;
    }

    /// Leave edit mode after a successful save.
    pub fn saved(&mut self, user: &User) {
        self.draft = ProfileDraft::from_user(user);
        self.editing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;

    #[test]
    fn apply_keeps_id_and_role() {
        let user = mock::github_user();
        let mut draft = ProfileDraft::from_user(&user);
        draft.name = "  Octo Cat ".to_string();
        draft.avatar = Some(String::new());

        let updated = draft.apply_to(&user).expect("apply");

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.role, "developer");
        assert_eq!(updated.name, "Octo Cat");
        assert_eq!(updated.avatar, None);
    }

    #[test]
    fn blank_name_is_rejected() {
        let user = mock::login_user("a@b.c");
        let mut draft = ProfileDraft::from_user(&user);
        draft.name = " ".to_string();
        assert!(matches!(draft.apply_to(&user), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn cancelling_an_edit_discards_the_draft() {
        let user = mock::login_user("a@b.c");
        let mut editor = ProfileEditor::new(&user);

        editor.toggle_editing(&user);
        assert!(editor.is_editing());
        editor.draft_mut().organization = "Elsewhere".to_string();

        editor.toggle_editing(&user);
        assert!(!editor.is_editing());
        assert_eq!(editor.draft().organization, "Research Lab");
    }

    #[test]
    fn initial_is_uppercased() {
        let mut draft = ProfileDraft::default();
        assert_eq!(draft.initial(), None);
        draft.name = "ada".to_string();
        assert_eq!(draft.initial(), Some('A'));
    }
}
