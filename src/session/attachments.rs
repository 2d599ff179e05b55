//! Per-user hat tracking
//!
//! A user without an entry wears nothing. An entry exists only while a hat
//! actor is alive for that user, so there is at most one hat per user.

use crate::catalog::HatId;
use crate::runtime::ActorId;
use crate::world::UserId;
use std::collections::HashMap;

/// What a user currently wears
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HatState {
    NoHat,
    Wearing { hat: HatId, actor: ActorId },
}

impl HatState {
    pub fn hat(&self) -> Option<&HatId> {
        match self {
            HatState::NoHat => None,
            HatState::Wearing { hat, .. } => Some(hat),
        }
    }

    pub fn actor(&self) -> Option<ActorId> {
        match self {
            HatState::NoHat => None,
            HatState::Wearing { actor, .. } => Some(*actor),
        }
    }
}

/// A live hat actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WornHat {
    pub hat: HatId,
    pub actor: ActorId,
}

#[derive(Debug, Default)]
pub struct AttachmentTable {
    worn: HashMap<UserId, WornHat>,
}

impl AttachmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, user: &UserId) -> HatState {
        match self.worn.get(user) {
            Some(worn) => HatState::Wearing {
                hat: worn.hat.clone(),
                actor: worn.actor,
            },
            None => HatState::NoHat,
        }
    }

    /// Remove and return the user's hat; the caller destroys the actor
    pub fn take(&mut self, user: &UserId) -> Option<WornHat> {
        self.worn.remove(user)
    }

    /// Record a new hat. The previous one must already have been taken.
    pub fn record(&mut self, user: UserId, hat: HatId, actor: ActorId) {
        let displaced = self.worn.insert(user, WornHat { hat, actor });
        debug_assert!(displaced.is_none(), "previous hat of {user} was not taken first");
    }

    pub fn len(&self) -> usize {
        self.worn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worn.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &WornHat)> {
        self.worn.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_user_has_no_hat() {
        let table = AttachmentTable::new();
        assert_eq!(table.state(&UserId::new()), HatState::NoHat);
    }

    #[test]
    fn test_take_then_record() {
        let mut table = AttachmentTable::new();
        let user = UserId::new();
        let first = ActorId::new();
        table.record(user, HatId::from("cap"), first);
        assert_eq!(table.state(&user).actor(), Some(first));

        let worn = table.take(&user).unwrap();
        assert_eq!(worn.actor, first);
        assert!(table.take(&user).is_none());

        let second = ActorId::new();
        table.record(user, HatId::from("tophat"), second);
        assert_eq!(table.state(&user).hat(), Some(&HatId::from("tophat")));
        assert_eq!(table.len(), 1);
    }
}
