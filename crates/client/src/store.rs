//! Replicated store interface and an in-process implementation.

use echoes_core::{Form, FormError, FormFields, FormId, Params, WalletId};
use std::sync::mpsc::{channel, Receiver, Sender};
use thiserror::Error;

/// Collection holding every form.
pub const FORMS: &str = "forms";

/// State pushed to subscribers whenever the store changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateState {
    /// Wallet the viewer is signed in with, if any.
    pub active_wallet: Option<WalletId>,
}

/// Why a store call failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown collection `{0}`")]
    UnknownCollection(String),
    #[error("rejected form: {0}")]
    Rejected(#[from] FormError),
    #[error("store is offline")]
    Offline,
}

/// The collaborative backend as the client sees it: a replicated collection
/// with create, snapshot and change notification.
pub trait ReplicatedStore {
    /// Request a new record. Acceptance shows up in a later snapshot.
    fn create(&mut self, collection: &str, fields: FormFields) -> Result<(), StoreError>;

    /// Full snapshot of a collection, or `None` before it is available.
    fn get_all(&self, collection: &str) -> Option<Vec<Form>>;

    /// Receive a state on every change.
    fn subscribe(&mut self) -> Receiver<UpdateState>;
}

/// Store kept in memory: sequential ids, the active wallet is stamped as creator.
#[derive(Debug)]
pub struct MemoryStore {
    params: Params,
    forms: Vec<Form>,
    next_id: u64,
    active_wallet: Option<WalletId>,
    subscribers: Vec<Sender<UpdateState>>,
    offline: bool,
}

impl MemoryStore {
    pub fn new(params: Params, active_wallet: Option<WalletId>) -> Self {
        Self {
            params,
            forms: Vec::new(),
            next_id: 1,
            active_wallet,
            subscribers: Vec::new(),
            offline: false,
        }
    }

    /// Insert forms made by other wallets (e.g. a saved population) and notify.
    pub fn seed<I>(&mut self, records: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = (FormFields, WalletId)>,
    {
        let mut count = 0;
        for (fields, creator) in records {
            self.insert(fields, creator)?;
            count += 1;
        }
        self.notify();
        Ok(count)
    }

    /// Drop writes on the floor, as a disconnected backend would.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// The state a subscriber would be sent now.
    pub fn state(&self) -> UpdateState {
        UpdateState {
            active_wallet: self.active_wallet.clone(),
        }
    }

    fn insert(&mut self, fields: FormFields, creator: WalletId) -> Result<FormId, StoreError> {
        fields.validate(&self.params)?;
        let id = FormId(self.next_id);
        self.next_id += 1;
        self.forms.push(Form {
            id,
            team: fields.team,
            x: fields.x,
            y: fields.y,
            z: fields.z,
            radius: fields.radius,
            creator,
        });
        Ok(id)
    }

    fn notify(&mut self) {
        let state = self.state();
        self.subscribers.retain(|tx| tx.send(state.clone()).is_ok());
    }
}

impl ReplicatedStore for MemoryStore {
    fn create(&mut self, collection: &str, fields: FormFields) -> Result<(), StoreError> {
        if collection != FORMS {
            return Err(StoreError::UnknownCollection(collection.to_string()));
        }
        if self.offline {
            return Err(StoreError::Offline);
        }
        let creator = self.active_wallet.clone().unwrap_or_default();
        let id = self.insert(fields, creator)?;
        log::debug!("Stored form {:?}: {:?}", id, fields);
        self.notify();
        Ok(())
    }

    fn get_all(&self, collection: &str) -> Option<Vec<Form>> {
        (collection == FORMS).then(|| self.forms.clone())
    }

    fn subscribe(&mut self) -> Receiver<UpdateState> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echoes_core::TeamId;

    fn fields(team: u32, radius: i64) -> FormFields {
        FormFields { team: TeamId(team), x: 1, y: 2, z: 3, radius }
    }

    #[test]
    fn create_stamps_identity_and_creator() {
        let mut store = MemoryStore::new(Params::default(), Some("0xme".into()));
        store.create(FORMS, fields(1, 10)).unwrap();
        store.create(FORMS, fields(2, 20)).unwrap();

        let forms = store.get_all(FORMS).unwrap();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[0].id, FormId(1));
        assert_eq!(forms[1].id, FormId(2));
        assert!(forms.iter().all(|f| f.creator == "0xme"));
        assert_eq!(forms[1].fields(), fields(2, 20));
    }

    #[test]
    fn subscribers_hear_every_write() {
        let mut store = MemoryStore::new(Params::default(), Some("0xme".into()));
        let rx = store.subscribe();
        store.create(FORMS, fields(0, 5)).unwrap();
        store.seed(vec![(fields(1, 5), "0xother".to_string())]).unwrap();
        let states: Vec<UpdateState> = rx.try_iter().collect();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].active_wallet.as_deref(), Some("0xme"));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut store = MemoryStore::new(Params::default(), None);
        drop(store.subscribe());
        store.create(FORMS, fields(0, 5)).unwrap();
        assert!(store.subscribers.is_empty());
    }

    #[test]
    fn invalid_writes_are_rejected() {
        let mut store = MemoryStore::new(Params::default(), None);
        assert!(matches!(
            store.create("shapes", fields(0, 5)),
            Err(StoreError::UnknownCollection(_))
        ));
        assert!(matches!(store.create(FORMS, fields(7, 5)), Err(StoreError::Rejected(_))));
        assert!(matches!(store.create(FORMS, fields(0, 500)), Err(StoreError::Rejected(_))));
        store.set_offline(true);
        assert!(matches!(store.create(FORMS, fields(0, 5)), Err(StoreError::Offline)));
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_collection_has_no_snapshot() {
        let store = MemoryStore::new(Params::default(), None);
        assert!(store.get_all("shapes").is_none());
        assert_eq!(store.get_all(FORMS), Some(Vec::new()));
    }
}
