//! Authority resolution - who decides for a hero
//!
//! Pure and synchronous. The roster is passed in explicitly so the answer
//! is a function of visible session state and nothing else.

use crate::domain::entities::{Hero, Roster, SessionUser};

/// Resolves which connected user is authoritative for a hero's decisions.
pub struct AuthorityResolver;

impl AuthorityResolver {
    /// The connected, non-privileged user controlling the hero, if any.
    ///
    /// `None` does not drop the occurrence: it signals the caller that the
    /// triggering client should treat itself as the fallback authority. The
    /// game master is deliberately never the answer here, even when it
    /// controls the hero record, so player decisions stay with players.
    pub fn resolve<'r>(hero: &Hero, roster: &'r Roster) -> Option<&'r SessionUser> {
        roster
            .users()
            .find(|user| user.online && !user.privileged && user.controls == Some(hero.id))
    }
}
