//! Key/Value Credential Store
//!
//! Maps the session record onto five storage keys. Reads are all-or-nothing:
//! a record missing any required key, or holding a value that does not
//! parse, reads as "no session". Malformed records are left in place.

use platform::storage::KeyValueStorage;

use crate::application::config::StorageKeys;
use crate::domain::entity::identity::Identity;
use crate::domain::entity::session_record::SessionRecord;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{
    email::Email, session_token::SessionToken, subscription_tier::SubscriptionTier,
};
use crate::error::AuthResult;

/// Credential store over any key/value backend
#[derive(Debug)]
pub struct StorageCredentialStore<S> {
    storage: S,
    keys: StorageKeys,
}

impl<S: KeyValueStorage> StorageCredentialStore<S> {
    pub fn new(storage: S, keys: StorageKeys) -> Self {
        Self { storage, keys }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn decode(&self, values: Vec<Option<String>>) -> Option<SessionRecord> {
        let [token, email, tier, is_paid, name]: [Option<String>; 5] = values.try_into().ok()?;

        let present = [&token, &email, &tier, &is_paid]
            .iter()
            .filter(|v| v.is_some())
            .count();
        let (Some(token), Some(email), Some(tier), Some(is_paid)) = (token, email, tier, is_paid)
        else {
            if present > 0 {
                tracing::warn!(present, "Ignoring partial session record");
            }
            return None;
        };

        let parsed = (|| {
            let token = SessionToken::new(token)?;
            let email = Email::new(email).ok()?;
            let tier = SubscriptionTier::from_code(&tier)?;
            let is_paid = match is_paid.as_str() {
                "true" => true,
                "false" => false,
                _ => return None,
            };
            // The flag is redundant with the tier; disagreement is corruption
            if is_paid != tier.is_paid() {
                return None;
            }
            Some(SessionRecord::new(
                token,
                Identity::new(email, name.unwrap_or_default(), tier),
            ))
        })();

        if parsed.is_none() {
            tracing::warn!("Ignoring malformed session record");
        }
        parsed
    }
}

impl<S: KeyValueStorage> CredentialStore for StorageCredentialStore<S> {
    fn read(&self) -> AuthResult<Option<SessionRecord>> {
        let values = self.storage.get_many(&self.keys.all())?;
        Ok(self.decode(values))
    }

    fn write(&self, record: &SessionRecord) -> AuthResult<()> {
        let keys = &self.keys;
        self.storage.set_many(&[
            (keys.session_token.as_str(), record.session_token.as_str().to_string()),
            (keys.email.as_str(), record.email().to_string()),
            (keys.subscription_tier.as_str(), record.tier().code().to_string()),
            (keys.is_paid.as_str(), record.is_paid().to_string()),
            (keys.display_name.as_str(), record.identity.display_name.clone()),
        ])?;
        Ok(())
    }

    fn clear(&self) -> AuthResult<()> {
        self.storage.remove_many(&self.keys.all())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::storage::{FileStorage, MemoryStorage};

    fn record() -> SessionRecord {
        SessionRecord::new(
            SessionToken::new("s1").unwrap(),
            Identity::paid(Email::new("a@x.com").unwrap(), "A"),
        )
    }

    fn store_with(entries: &[(&str, &str)]) -> StorageCredentialStore<MemoryStorage> {
        StorageCredentialStore::new(
            MemoryStorage::with_entries(entries.iter().copied()),
            StorageKeys::default(),
        )
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let store = store_with(&[]);
        store.write(&record()).unwrap();

        assert_eq!(store.read().unwrap(), Some(record()));
        let snapshot = store.storage().snapshot();
        assert_eq!(snapshot["mandate_wizard_session"], "s1");
        assert_eq!(snapshot["mandate_wizard_email"], "a@x.com");
        assert_eq!(snapshot["subscription_status"], "paid");
        assert_eq!(snapshot["is_paid"], "true");
        assert_eq!(snapshot["user_name"], "A");
    }

    #[test]
    fn test_partial_record_reads_as_absent() {
        let store = store_with(&[
            ("mandate_wizard_session", "s1"),
            ("mandate_wizard_email", "a@x.com"),
        ]);
        assert_eq!(store.read().unwrap(), None);
        // not repaired
        assert_eq!(store.storage().snapshot().len(), 2);
    }

    #[test]
    fn test_malformed_values_read_as_absent() {
        let base = [
            ("mandate_wizard_session", "s1"),
            ("mandate_wizard_email", "a@x.com"),
            ("subscription_status", "paid"),
            ("is_paid", "true"),
        ];

        let mut unknown_tier = base;
        unknown_tier[2].1 = "gold";
        assert_eq!(store_with(&unknown_tier).read().unwrap(), None);

        let mut bad_flag = base;
        bad_flag[3].1 = "yes";
        assert_eq!(store_with(&bad_flag).read().unwrap(), None);

        let mut inconsistent = base;
        inconsistent[3].1 = "false";
        assert_eq!(store_with(&inconsistent).read().unwrap(), None);

        let mut bad_email = base;
        bad_email[1].1 = "not-an-email";
        assert_eq!(store_with(&bad_email).read().unwrap(), None);
    }

    #[test]
    fn test_missing_display_name_reads_as_empty() {
        let store = store_with(&[
            ("mandate_wizard_session", "s1"),
            ("mandate_wizard_email", "a@x.com"),
            ("subscription_status", "free"),
            ("is_paid", "false"),
        ]);
        let record = store.read().unwrap().unwrap();
        assert_eq!(record.identity.display_name, "");
        assert_eq!(record.tier(), SubscriptionTier::Free);
    }

    #[test]
    fn test_clear_removes_only_record_keys() {
        let store = store_with(&[("theme", "dark")]);
        store.write(&record()).unwrap();
        store.clear().unwrap();

        assert_eq!(store.read().unwrap(), None);
        assert_eq!(store.storage().snapshot().len(), 1);
    }

    #[test]
    fn test_file_backed_record_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        StorageCredentialStore::new(FileStorage::new(&path), StorageKeys::default())
            .write(&record())
            .unwrap();

        let reopened = StorageCredentialStore::new(FileStorage::new(&path), StorageKeys::default());
        assert_eq!(reopened.read().unwrap(), Some(record()));
    }
}
