//! The library store: catalog, roster and lending ledger behind one lock.

pub mod catalog;
pub mod ledger;
pub mod roster;

pub use catalog::Catalog;
pub use ledger::LendingLedger;
pub use roster::Roster;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    error::{AppError, AppResult},
    models::{Item, NewItem, NewPatron, Patron},
    storage::PersistenceCodec,
};

/// Joint state of the three components. Kept small and cheap to clone so
/// that mutations can be staged on a draft and discarded when the persist
/// step fails.
#[derive(Debug, Clone, Default)]
struct StoreState {
    catalog: Catalog,
    roster: Roster,
    ledger: LendingLedger,
}

impl StoreState {
    /// Rehydrate from loaded records. The ledger is a derived projection;
    /// rebuilding it also cross-checks availability flags against the
    /// patron borrowed-sets.
    fn from_records(items: Vec<Item>, patrons: Vec<Patron>) -> AppResult<Self> {
        let mut catalog = Catalog::new();
        for item in items {
            catalog.insert(item)?;
        }
        let mut roster = Roster::new();
        for patron in patrons {
            roster.insert(patron)?;
        }
        let ledger = LendingLedger::rebuild(&mut catalog, &roster)?;
        Ok(Self {
            catalog,
            roster,
            ledger,
        })
    }
}

/// Facade over the whole lending state.
///
/// All mutating operations run under a single write lock covering catalog,
/// roster and ledger jointly, and end with a synchronous persist. When the
/// persist fails, the in-memory transition is rolled back and the error
/// reported, so memory and disk never diverge. Read queries take the read
/// lock and only ever observe fully applied transitions.
pub struct LibraryStore {
    state: RwLock<StoreState>,
    codec: PersistenceCodec,
}

impl LibraryStore {
    /// Load the store from its record files, or start empty on first run.
    pub fn open(codec: PersistenceCodec) -> AppResult<Self> {
        let state = match codec.load()? {
            Some((items, patrons)) => StoreState::from_records(items, patrons)?,
            None => {
                tracing::info!("no existing records found, starting empty");
                StoreState::default()
            }
        };

        tracing::info!(
            items = state.catalog.len(),
            patrons = state.roster.len(),
            active_loans = state.ledger.active_count(),
            "library store loaded"
        );

        Ok(Self {
            state: RwLock::new(state),
            codec,
        })
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))
    }

    /// Run a mutation and persist the result as one unit.
    ///
    /// The mutation is applied to a draft copy; only after the codec has
    /// written both record streams is the draft published. Readers therefore
    /// see either the full pre-state or the full post-state.
    fn commit<T>(&self, mutate: impl FnOnce(&mut StoreState) -> AppResult<T>) -> AppResult<T> {
        let mut guard = self.write()?;
        let mut draft = guard.clone();
        let out = mutate(&mut draft)?;
        self.codec.save(&draft.catalog, &draft.roster)?;
        *guard = draft;
        Ok(out)
    }

    /// Add an item to the catalog.
    pub fn add_item(&self, new: NewItem) -> AppResult<Item> {
        self.commit(move |state| {
            let item = Item::new(new.id, new.title, new.author, new.genre);
            state.catalog.insert(item).map(|item| item.clone())
        })
    }

    /// Register a patron.
    pub fn add_patron(&self, new: NewPatron) -> AppResult<Patron> {
        self.commit(move |state| {
            let patron = Patron::new(new.id, new.name, new.contact);
            state.roster.insert(patron).map(|patron| patron.clone())
        })
    }

    /// Lend an item to a patron. Returns the item in its post-loan state.
    pub fn borrow(&self, patron_id: i32, item_id: i32) -> AppResult<Item> {
        self.commit(move |state| {
            let StoreState {
                catalog,
                roster,
                ledger,
            } = state;
            ledger.borrow(catalog, roster, patron_id, item_id)?;
            catalog
                .get(item_id)
                .cloned()
                .ok_or_else(|| AppError::Internal(format!("item {} lost during borrow", item_id)))
        })
    }

    /// Return a lent item. Returns the item in its post-return state.
    pub fn give_back(&self, patron_id: i32, item_id: i32) -> AppResult<Item> {
        self.commit(move |state| {
            let StoreState {
                catalog,
                roster,
                ledger,
            } = state;
            ledger.give_back(catalog, roster, patron_id, item_id)?;
            catalog
                .get(item_id)
                .cloned()
                .ok_or_else(|| AppError::Internal(format!("item {} lost during return", item_id)))
        })
    }

    pub fn item_by_id(&self, id: i32) -> AppResult<Item> {
        self.read()?
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::ItemNotFound(format!("id {}", id)))
    }

    pub fn item_by_title(&self, title: &str) -> AppResult<Item> {
        self.read()?
            .catalog
            .find_by_title(title)
            .cloned()
            .ok_or_else(|| AppError::ItemNotFound(format!("title '{}'", title)))
    }

    pub fn item_by_author(&self, author: &str) -> AppResult<Item> {
        self.read()?
            .catalog
            .find_by_author(author)
            .cloned()
            .ok_or_else(|| AppError::ItemNotFound(format!("author '{}'", author)))
    }

    pub fn patron_by_id(&self, id: i32) -> AppResult<Patron> {
        self.read()?
            .roster
            .get(id)
            .cloned()
            .ok_or(AppError::PatronNotFound(id))
    }

    /// All items, in catalog insertion order.
    pub fn list_items(&self) -> AppResult<Vec<Item>> {
        Ok(self.read()?.catalog.iter().cloned().collect())
    }

    /// All patrons, in roster insertion order.
    pub fn list_patrons(&self) -> AppResult<Vec<Patron>> {
        Ok(self.read()?.roster.iter().cloned().collect())
    }

    /// Items currently out on loan to a patron, in borrow order.
    pub fn loans_of(&self, patron_id: i32) -> AppResult<Vec<Item>> {
        let state = self.read()?;
        let patron = state
            .roster
            .get(patron_id)
            .ok_or(AppError::PatronNotFound(patron_id))?;
        Ok(patron
            .borrowed
            .iter()
            .filter_map(|&item_id| state.catalog.get(item_id))
            .cloned()
            .collect())
    }

    /// Does this patron currently hold this item?
    pub fn is_borrowed_by(&self, patron_id: i32, item_id: i32) -> AppResult<bool> {
        Ok(self.read()?.ledger.is_borrowed_by(patron_id, item_id))
    }
}

#[cfg(test)]
impl LibraryStore {
    /// Assert the cross-component invariants: every item is available
    /// exactly when it has no ledger entry and sits in no borrowed-set, and
    /// every ledger entry resolves to a roster patron holding that item.
    fn assert_consistent(&self) {
        let state = self.read().unwrap();
        for item in state.catalog.iter() {
            let holder = state.ledger.borrower_of(item.id);
            assert_eq!(item.available, holder.is_none(), "item {}", item.id);
            assert_eq!(item.borrower.is_some(), holder.is_some(), "item {}", item.id);
            let holders: Vec<i32> = state
                .roster
                .iter()
                .filter(|p| p.has_borrowed(item.id))
                .map(|p| p.id)
                .collect();
            match holder {
                Some(patron_id) => {
                    assert_eq!(holders, vec![patron_id], "item {}", item.id);
                    let patron = state.roster.get(patron_id).expect("ledger patron in roster");
                    assert_eq!(item.borrower.as_deref(), Some(patron.name.as_str()));
                }
                None => assert!(holders.is_empty(), "item {}", item.id),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> LibraryStore {
        let codec = PersistenceCodec::new(
            dir.path().join("items.txt"),
            dir.path().join("patrons.txt"),
        );
        LibraryStore::open(codec).unwrap()
    }

    fn new_item(id: i32, title: &str, author: &str, genre: &str) -> NewItem {
        NewItem {
            id,
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
        }
    }

    fn new_patron(id: i32, name: &str, contact: &str) -> NewPatron {
        NewPatron {
            id,
            name: name.into(),
            contact: contact.into(),
        }
    }

    fn seed(store: &LibraryStore) {
        store.add_item(new_item(1, "Dune", "Herbert", "SciFi")).unwrap();
        store.add_patron(new_patron(7, "Amy", "a@x.com")).unwrap();
    }

    #[test]
    fn test_borrow_scenario() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        seed(&store);

        let item = store.borrow(7, 1).unwrap();
        assert!(!item.available);
        assert_eq!(item.borrower.as_deref(), Some("Amy"));
        assert_eq!(store.patron_by_id(7).unwrap().borrowed, vec![1]);
        assert!(store.is_borrowed_by(7, 1).unwrap());

        let err = store.borrow(7, 1).unwrap_err();
        assert!(matches!(err, AppError::ItemUnavailable(1)));
        store.assert_consistent();
    }

    #[test]
    fn test_give_back_scenario_and_idempotence() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        seed(&store);
        store.borrow(7, 1).unwrap();

        let item = store.give_back(7, 1).unwrap();
        assert!(item.available);
        assert_eq!(item.borrower, None);
        assert!(store.patron_by_id(7).unwrap().borrowed.is_empty());

        // a second return of the same loan must fail
        let err = store.give_back(7, 1).unwrap_err();
        assert!(matches!(
            err,
            AppError::NotBorrowedByPatron {
                held_by_other: false,
                ..
            }
        ));
        store.assert_consistent();
    }

    #[test]
    fn test_give_back_by_wrong_patron_leaves_loan_untouched() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        seed(&store);
        store.add_patron(new_patron(8, "Bob", "b@x.com")).unwrap();
        store.borrow(7, 1).unwrap();

        let err = store.give_back(8, 1).unwrap_err();
        assert!(matches!(
            err,
            AppError::NotBorrowedByPatron {
                held_by_other: true,
                ..
            }
        ));
        assert!(store.is_borrowed_by(7, 1).unwrap());
        assert!(!store.item_by_id(1).unwrap().available);
        store.assert_consistent();
    }

    #[test]
    fn test_search_by_title_and_author() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        seed(&store);
        store
            .add_item(new_item(2, "Emma", "Austen", "Classic"))
            .unwrap();

        assert_eq!(store.item_by_title("dune").unwrap().id, 1);
        assert_eq!(store.item_by_author("AUSTEN").unwrap().id, 2);
        assert!(matches!(
            store.item_by_title("missing"),
            Err(AppError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir);
            seed(&store);
            store
                .add_item(new_item(2, "Emma", "Austen", "Classic"))
                .unwrap();
            store.add_patron(new_patron(8, "Bob", "b@x.com")).unwrap();
            store.borrow(7, 1).unwrap();
        }

        let store = open_store(&dir);
        store.assert_consistent();
        let ids: Vec<i32> = store.list_items().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.list_patrons().unwrap().len(), 2);
        assert!(store.is_borrowed_by(7, 1).unwrap());
        assert_eq!(store.patron_by_id(7).unwrap().borrowed, vec![1]);
        assert!(!store.item_by_id(1).unwrap().available);
        assert!(store.item_by_id(2).unwrap().available);
    }

    #[test]
    fn test_reopen_repairs_dangling_reference() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("items.txt"), "1,Dune,Herbert,SciFi,true,\n").unwrap();
        fs::write(dir.path().join("patrons.txt"), "7,Amy,a@x.com,42\n").unwrap();

        let store = open_store(&dir);
        assert!(store.patron_by_id(7).unwrap().borrowed.is_empty());
        store.assert_consistent();
    }

    #[test]
    fn test_open_rejects_disagreeing_records() {
        let dir = TempDir::new().unwrap();
        // flagged unavailable with no borrower anywhere
        fs::write(dir.path().join("items.txt"), "1,Dune,Herbert,SciFi,false,Amy\n").unwrap();
        fs::write(dir.path().join("patrons.txt"), "7,Amy,a@x.com\n").unwrap();

        let codec = PersistenceCodec::new(
            dir.path().join("items.txt"),
            dir.path().join("patrons.txt"),
        );
        assert!(matches!(
            LibraryStore::open(codec),
            Err(AppError::CorruptRecord { .. })
        ));
    }

    #[test]
    fn test_persist_failure_rolls_back() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        seed(&store);

        // a directory squatting on the items path makes the rename fail
        fs::remove_file(dir.path().join("items.txt")).unwrap();
        fs::create_dir(dir.path().join("items.txt")).unwrap();
        let err = store.borrow(7, 1).unwrap_err();
        assert!(matches!(err, AppError::PersistenceFailed(_)));

        // the in-memory transition was rolled back
        assert!(store.item_by_id(1).unwrap().available);
        assert!(store.patron_by_id(7).unwrap().borrowed.is_empty());
        assert!(!store.is_borrowed_by(7, 1).unwrap());
        store.assert_consistent();

        // and the store works again once the obstruction is gone
        fs::remove_dir(dir.path().join("items.txt")).unwrap();
        store.borrow(7, 1).unwrap();
        store.assert_consistent();
    }

    #[test]
    fn test_random_operation_interleaving_keeps_invariants() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        for id in 1..=4 {
            store
                .add_item(new_item(id, &format!("Title {}", id), "Author", "Genre"))
                .unwrap();
        }
        for id in 1..=3 {
            store
                .add_patron(new_patron(id, &format!("Patron {}", id), "p@x.com"))
                .unwrap();
        }

        // xorshift keeps the sequence deterministic; ids beyond the seeded
        // ranges exercise the not-found paths
        let mut rng: u64 = 0x9e37_79b9_7f4a_7c15;
        for _ in 0..500 {
            rng ^= rng << 13;
            rng ^= rng >> 7;
            rng ^= rng << 17;
            let patron_id = (rng % 5) as i32; // 0 and 4 are unknown
            let item_id = ((rng >> 8) % 6) as i32; // 0 and 5 are unknown
            let _ = if (rng >> 16) % 2 == 0 {
                store.borrow(patron_id, item_id)
            } else {
                store.give_back(patron_id, item_id)
            };
            store.assert_consistent();
        }
    }
}
