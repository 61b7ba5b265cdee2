use std::collections::HashSet;
use std::str::FromStr;

use super::validation::normalize_email;

/// Lookup of accounts that may start a recovery.
pub trait AccountDirectory: Send + Sync {
    /// `email` is already normalized.
    fn contains(&self, email: &str, phone: &str) -> bool;
}

/// An `email:phone` pair registered for recovery.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccountRecord {
    email: String,
    phone: String,
}

impl AccountRecord {
    #[must_use]
    pub fn new(email: &str, phone: &str) -> Self {
        Self {
            email: normalize_email(email),
            phone: phone.trim().to_string(),
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }
}

impl FromStr for AccountRecord {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (email, phone) = value
            .rsplit_once(':')
            .ok_or_else(|| format!("invalid account '{value}', expected EMAIL:PHONE"))?;
        if email.trim().is_empty() || phone.trim().is_empty() {
            return Err(format!("invalid account '{value}', expected EMAIL:PHONE"));
        }
        Ok(Self::new(email, phone))
    }
}

/// In-memory directory built from a fixed list of accounts.
#[derive(Clone, Debug, Default)]
pub struct StaticAccountDirectory {
    accounts: HashSet<AccountRecord>,
}

impl StaticAccountDirectory {
    #[must_use]
    pub fn new(accounts: impl IntoIterator<Item = AccountRecord>) -> Self {
        Self {
            accounts: accounts.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountDirectory for StaticAccountDirectory {
    fn contains(&self, email: &str, phone: &str) -> bool {
        self.accounts.contains(&AccountRecord {
            email: email.to_string(),
            phone: phone.to_string(),
        })
    }
}
