use crate::domain_model::UserId;

/// Request to make `source_id` and `target_id` friends. Direction carries no
/// meaning once stored.
#[derive(Debug, Clone, Copy)]
pub struct FriendRequest {
    pub source_id: UserId,
    pub target_id: UserId,
}

/// Unordered pair of user ids in canonical (low, high) orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserPair(UserId, UserId);

impl UserPair {
    pub fn new(a: UserId, b: UserId) -> Self {
        if a < b { Self(a, b) } else { Self(b, a) }
    }

    pub fn low(&self) -> UserId {
        self.0
    }

    pub fn high(&self) -> UserId {
        self.1
    }

    /// The member of the pair that is not `id`, if `id` is a member at all.
    pub fn other(&self, id: UserId) -> Option<UserId> {
        if self.0 == id {
            Some(self.1)
        } else if self.1 == id {
            Some(self.0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_orientation_independent() {
        let ab = UserPair::new(UserId(3), UserId(1));
        let ba = UserPair::new(UserId(1), UserId(3));
        assert_eq!(ab, ba);
        assert_eq!(ab.low(), UserId(1));
        assert_eq!(ab.high(), UserId(3));
    }

    #[test]
    fn other_resolves_the_opposite_member() {
        let pair = UserPair::new(UserId(5), UserId(2));
        assert_eq!(pair.other(UserId(5)), Some(UserId(2)));
        assert_eq!(pair.other(UserId(2)), Some(UserId(5)));
        assert_eq!(pair.other(UserId(9)), None);
    }
}
