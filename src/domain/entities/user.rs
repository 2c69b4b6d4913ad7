//! Session users and the connected-user roster

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{HeroId, UserId};

/// A user known to the session.
///
/// At most one user controls a given hero; the privileged flag marks the
/// game master, who can act for any hero but is never its owning controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub online: bool,
    pub privileged: bool,
    pub controls: Option<HeroId>,
}

impl SessionUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            online: true,
            privileged: false,
            controls: None,
        }
    }

    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    pub fn controlling(mut self, hero_id: HeroId) -> Self {
        self.controls = Some(hero_id);
        self
    }

    pub fn offline(mut self) -> Self {
        self.online = false;
        self
    }
}

/// The session roster: every user the session knows about, connected or not.
///
/// Shared session state owned by the host; operations receive it explicitly
/// rather than reading process-wide globals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    users: HashMap<UserId, SessionUser>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user record.
    pub fn upsert(&mut self, user: SessionUser) {
        self.users.insert(user.id, user);
    }

    pub fn get(&self, id: UserId) -> Option<&SessionUser> {
        self.users.get(&id)
    }

    pub fn set_online(&mut self, id: UserId, online: bool) {
        if let Some(user) = self.users.get_mut(&id) {
            user.online = online;
        }
    }

    pub fn users(&self) -> impl Iterator<Item = &SessionUser> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
