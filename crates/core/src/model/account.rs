use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

/// A registered learner.
///
/// `xp` is monotonically non-decreasing; the scorer only ever increments it.
/// `level` is stored here but derived elsewhere; nothing in this crate
/// changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub xp: u64,
    pub level: u32,
    pub badges: Vec<String>,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// A brand-new account with zero experience.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::generate(),
            email: email.into(),
            name: name.into(),
            password_hash: password_hash.into(),
            xp: 0,
            level: 1,
            badges: Vec::new(),
            language: "English".to_string(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn new_account_starts_at_level_one_with_no_xp() {
        let account = UserAccount::new("a@b.c", "Asha", "hash", fixed_now());
        assert_eq!(account.xp, 0);
        assert_eq!(account.level, 1);
        assert!(account.badges.is_empty());
        assert_eq!(account.language, "English");
    }
}
