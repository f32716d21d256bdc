// 👤 Member Entity - Registry with signed-in status
//
// Member ids are 0-based insertion order and never change.
// "Login" is an id lookup that flips a flag, not a security boundary.

use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, LibraryResult};

// ============================================================================
// MEMBER ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Stable identity (0-based position in the registry)
    pub id: usize,

    /// Display name
    pub name: String,

    pub signed_in: bool,
}

impl Member {
    pub fn new(id: usize, name: String) -> Self {
        Member {
            id,
            name,
            signed_in: false,
        }
    }

    /// Account number shown to users (1-based)
    pub fn account(&self) -> usize {
        self.id + 1
    }
}

// ============================================================================
// MEMBER REGISTRY
// ============================================================================

/// Registry of all members, in registration order
#[derive(Debug, Clone, Default)]
pub struct MemberRegistry {
    members: Vec<Member>,
}

impl MemberRegistry {
    pub fn new() -> Self {
        MemberRegistry {
            members: Vec::new(),
        }
    }

    /// Register a member and return its id (the size before insertion)
    pub fn add_member(&mut self, name: String) -> usize {
        let id = self.members.len();
        self.members.push(Member::new(id, name));
        id
    }

    pub fn member(&self, id: usize) -> LibraryResult<&Member> {
        self.members.get(id).ok_or(LibraryError::UnknownMember(id))
    }

    fn member_mut(&mut self, id: usize) -> LibraryResult<&mut Member> {
        self.members.get_mut(id).ok_or(LibraryError::UnknownMember(id))
    }

    /// Display name of member `id`
    pub fn find_name(&self, id: usize) -> LibraryResult<&str> {
        self.member(id).map(|member| member.name.as_str())
    }

    pub fn login(&mut self, id: usize) -> LibraryResult<()> {
        self.member_mut(id)?.signed_in = true;
        Ok(())
    }

    pub fn logout(&mut self, id: usize) -> LibraryResult<()> {
        self.member_mut(id)?.signed_in = false;
        Ok(())
    }

    pub fn is_signed_in(&self, id: usize) -> LibraryResult<bool> {
        self.member(id).map(|member| member.signed_in)
    }

    /// Resolve a 1-based account number to a member id
    pub fn id_for_account(&self, account: i64) -> Option<usize> {
        if account < 1 {
            return None;
        }
        let id = usize::try_from(account - 1).ok()?;
        (id < self.members.len()).then_some(id)
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================
