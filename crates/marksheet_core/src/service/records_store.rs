//! Records store: the single owner of trades, trainees, modules and marks.
//!
//! # Responsibility
//! - Provide typed create/update/delete/lookup operations over the four
//!   entity collections plus read-only users.
//! - Enforce referential-integrity guards before deletes.
//! - Derive mark totals and validate fields on every write.
//! - Persist every successful mutation before it becomes visible.
//!
//! # Invariants
//! - Ids are `max(existing ids, high-water mark) + 1` and never reused.
//! - A trade with dependent trainees or marks cannot be deleted.
//! - A trainee or module with dependent marks cannot be deleted.
//! - A failed operation leaves memory and durable storage unchanged.
//! - Bulk import replaces whole collections without guard checks; it is the
//!   restore path, not a CRUD path.

use crate::model::mark::{Mark, NewMark};
use crate::model::module::{Module, NewModule};
use crate::model::trade::{NewTrade, Trade};
use crate::model::trainee::{NewTrainee, Trainee};
use crate::model::user::User;
use crate::model::{MarkId, ModuleId, TradeId, TraineeId, UserId, ValidationError};
use crate::repo::collection_repo::{
    decode_collection, encode_collection, CollectionKey, CollectionRepository, RepoError,
};
use crate::seed;
use crate::service::transfer::{parse_import, CollectionImport, Snapshot, TransferError};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Entity collections owned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Trade,
    Trainee,
    Module,
    Mark,
}

impl EntityKind {
    pub fn plural(self) -> &'static str {
        match self {
            Self::Trade => "trades",
            Self::Trainee => "trainees",
            Self::Module => "modules",
            Self::Mark => "marks",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Trade => "trade",
            Self::Trainee => "trainee",
            Self::Module => "module",
            Self::Mark => "mark",
        };
        f.write_str(name)
    }
}

/// A delete rejected because other records still reference the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityViolation {
    /// Kind of the record the caller tried to delete.
    pub entity: EntityKind,
    pub id: u32,
    /// Collection holding the blocking references.
    pub dependents: EntityKind,
    pub count: usize,
}

impl Display for IntegrityViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot delete {} {}: {} dependent {} exist",
            self.entity,
            self.id,
            self.count,
            self.dependents.plural()
        )
    }
}

/// Errors from records store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Field validation failed; nothing was written.
    Validation(ValidationError),
    /// Update target does not exist.
    NotFound { entity: EntityKind, id: u32 },
    /// Delete blocked by a referential-integrity guard.
    Integrity(IntegrityViolation),
    /// Bulk transfer document is malformed or could not be produced;
    /// nothing was applied.
    Transfer(TransferError),
    /// Every id up to `u32::MAX` has been handed out for this collection.
    IdSpaceExhausted(EntityKind),
    /// Durable storage failure; in-memory state is unchanged.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Integrity(violation) => write!(f, "{violation}"),
            Self::Transfer(err) => write!(f, "{err}"),
            Self::IdSpaceExhausted(entity) => write!(f, "no {entity} ids left to assign"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Transfer(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<TransferError> for StoreError {
    fn from(value: TransferError) -> Self {
        Self::Transfer(value)
    }
}

/// Highest id ever assigned per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    pub trades: u32,
    pub trainees: u32,
    pub modules: u32,
    pub marks: u32,
}

impl IdCounters {
    pub fn get(&self, kind: EntityKind) -> u32 {
        match kind {
            EntityKind::Trade => self.trades,
            EntityKind::Trainee => self.trainees,
            EntityKind::Module => self.modules,
            EntityKind::Mark => self.marks,
        }
    }

    fn with(mut self, kind: EntityKind, value: u32) -> Self {
        let slot = match kind {
            EntityKind::Trade => &mut self.trades,
            EntityKind::Trainee => &mut self.trainees,
            EntityKind::Module => &mut self.modules,
            EntityKind::Mark => &mut self.marks,
        };
        *slot = value;
        self
    }

    /// Raises each counter to at least the largest id present.
    fn covering(
        self,
        trades: &[Trade],
        trainees: &[Trainee],
        modules: &[Module],
        marks: &[Mark],
    ) -> Self {
        Self {
            trades: self.trades.max(max_id(trades)),
            trainees: self.trainees.max(max_id(trainees)),
            modules: self.modules.max(max_id(modules)),
            marks: self.marks.max(max_id(marks)),
        }
    }
}

/// Whether absent collections start from the seed data set or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeedPolicy {
    Seed,
    Empty,
}

/// The records store.
///
/// Constructed explicitly from a repository and passed to whatever needs it.
/// Mutations take `&mut self`, so one read-guard-mutate-persist sequence
/// runs at a time.
pub struct RecordsStore<R: CollectionRepository> {
    repo: R,
    trades: Vec<Trade>,
    trainees: Vec<Trainee>,
    modules: Vec<Module>,
    marks: Vec<Mark>,
    users: Vec<User>,
    counters: IdCounters,
}

impl<R: CollectionRepository> RecordsStore<R> {
    /// Loads all collections, seeding any that were never persisted.
    ///
    /// Seeded collections are written back before returning.
    pub fn open(repo: R) -> StoreResult<Self> {
        Self::load(repo, SeedPolicy::Seed)
    }

    /// Loads all collections; absent ones start empty instead of seeded.
    pub fn open_empty(repo: R) -> StoreResult<Self> {
        Self::load(repo, SeedPolicy::Empty)
    }

    /// Releases the store and hands back its repository.
    pub fn into_repository(self) -> R {
        info!("event=store_close module=store status=ok");
        self.repo
    }

    fn load(repo: R, policy: SeedPolicy) -> StoreResult<Self> {
        let mut pending = Vec::new();
        let trades = load_or_seed(&repo, CollectionKey::Trades, policy, seed::trades, &mut pending)?;
        let trainees =
            load_or_seed(&repo, CollectionKey::Trainees, policy, seed::trainees, &mut pending)?;
        let modules =
            load_or_seed(&repo, CollectionKey::Modules, policy, seed::modules, &mut pending)?;
        let marks = load_or_seed(&repo, CollectionKey::Marks, policy, seed::marks, &mut pending)?;
        let users = load_or_seed(&repo, CollectionKey::Users, policy, seed::users, &mut pending)?;

        let stored_counters = match repo.load(CollectionKey::IdCounters)? {
            Some(payload) => decode_collection(CollectionKey::IdCounters, &payload)?,
            None => IdCounters::default(),
        };
        let seeded = pending.len();
        let counters = stored_counters.covering(&trades, &trainees, &modules, &marks);
        if counters != stored_counters || seeded > 0 {
            pending.push((CollectionKey::IdCounters, encode_collection(&counters)?));
        }

        if !pending.is_empty() {
            repo.save_all(&pending)?;
        }

        info!(
            "event=store_open module=store status=ok seeded={seeded} trades={} trainees={} modules={} marks={} users={}",
            trades.len(),
            trainees.len(),
            modules.len(),
            marks.len(),
            users.len()
        );

        Ok(Self {
            repo,
            trades,
            trainees,
            modules,
            marks,
            users,
            counters,
        })
    }

    // --- Trades ---

    /// Creates a trade and returns it with its assigned id.
    pub fn add_trade(&mut self, trade: NewTrade) -> StoreResult<Trade> {
        self.insert(|trade_id| trade.into_trade(trade_id))
    }

    /// Replaces the trade with the same id.
    pub fn update_trade(&mut self, trade: &Trade) -> StoreResult<Trade> {
        self.replace(trade.normalized()?)
    }

    /// Deletes a trade that no trainee or mark references.
    ///
    /// Returns `Ok(false)` when no trade has this id.
    pub fn delete_trade(&mut self, trade_id: TradeId) -> StoreResult<bool> {
        if self.trade_by_id(trade_id).is_none() {
            return Ok(false);
        }
        let trainees = self
            .trainees
            .iter()
            .filter(|trainee| trainee.trade_id == trade_id)
            .count();
        self.guard(EntityKind::Trade, trade_id, EntityKind::Trainee, trainees)?;
        let marks = self.marks.iter().filter(|mark| mark.trade_id == trade_id).count();
        self.guard(EntityKind::Trade, trade_id, EntityKind::Mark, marks)?;
        self.remove::<Trade>(trade_id)
    }

    // --- Trainees ---

    pub fn add_trainee(&mut self, trainee: NewTrainee) -> StoreResult<Trainee> {
        self.insert(|trainee_id| trainee.into_trainee(trainee_id))
    }

    pub fn update_trainee(&mut self, trainee: &Trainee) -> StoreResult<Trainee> {
        self.replace(trainee.normalized()?)
    }

    /// Deletes a trainee that no mark references.
    pub fn delete_trainee(&mut self, trainee_id: TraineeId) -> StoreResult<bool> {
        if self.trainee_by_id(trainee_id).is_none() {
            return Ok(false);
        }
        let marks = self
            .marks
            .iter()
            .filter(|mark| mark.trainee_id == trainee_id)
            .count();
        self.guard(EntityKind::Trainee, trainee_id, EntityKind::Mark, marks)?;
        self.remove::<Trainee>(trainee_id)
    }

    // --- Modules ---

    pub fn add_module(&mut self, module: NewModule) -> StoreResult<Module> {
        self.insert(|module_id| module.into_module(module_id))
    }

    pub fn update_module(&mut self, module: &Module) -> StoreResult<Module> {
        self.replace(module.normalized()?)
    }

    /// Deletes a module that no mark references.
    pub fn delete_module(&mut self, module_id: ModuleId) -> StoreResult<bool> {
        if self.module_by_id(module_id).is_none() {
            return Ok(false);
        }
        let marks = self
            .marks
            .iter()
            .filter(|mark| mark.module_id == module_id)
            .count();
        self.guard(EntityKind::Module, module_id, EntityKind::Mark, marks)?;
        self.remove::<Module>(module_id)
    }

    // --- Marks ---

    /// Records a mark. The total is derived unless the payload supplies one.
    pub fn add_mark(&mut self, mark: NewMark) -> StoreResult<Mark> {
        self.insert(|mark_id| mark.into_mark(mark_id))
    }

    /// Replaces a mark, always recomputing its total from the components.
    pub fn update_mark(&mut self, mark: &Mark) -> StoreResult<Mark> {
        self.replace(mark.recomputed()?)
    }

    /// Deletes a mark. Marks are leaves, so no guard applies.
    pub fn delete_mark(&mut self, mark_id: MarkId) -> StoreResult<bool> {
        self.remove::<Mark>(mark_id)
    }

    // --- Lookups ---

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn trainees(&self) -> &[Trainee] {
        &self.trainees
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// High-water marks used for id assignment.
    pub fn id_counters(&self) -> IdCounters {
        self.counters
    }

    pub fn trade_by_id(&self, trade_id: TradeId) -> Option<&Trade> {
        self.trades.iter().find(|trade| trade.trade_id == trade_id)
    }

    pub fn trainee_by_id(&self, trainee_id: TraineeId) -> Option<&Trainee> {
        self.trainees
            .iter()
            .find(|trainee| trainee.trainee_id == trainee_id)
    }

    pub fn module_by_id(&self, module_id: ModuleId) -> Option<&Module> {
        self.modules
            .iter()
            .find(|module| module.module_id == module_id)
    }

    pub fn mark_by_id(&self, mark_id: MarkId) -> Option<&Mark> {
        self.marks.iter().find(|mark| mark.mark_id == mark_id)
    }

    pub fn user_by_id(&self, user_id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.user_id == user_id)
    }

    /// Trainees enrolled in one trade, in collection order.
    pub fn trainees_by_trade(&self, trade_id: TradeId) -> Vec<Trainee> {
        self.trainees
            .iter()
            .filter(|trainee| trainee.trade_id == trade_id)
            .cloned()
            .collect()
    }

    pub fn marks_by_trainee(&self, trainee_id: TraineeId) -> Vec<Mark> {
        self.marks
            .iter()
            .filter(|mark| mark.trainee_id == trainee_id)
            .cloned()
            .collect()
    }

    pub fn marks_by_module(&self, module_id: ModuleId) -> Vec<Mark> {
        self.marks
            .iter()
            .filter(|mark| mark.module_id == module_id)
            .cloned()
            .collect()
    }

    // --- Bulk transfer ---

    /// Point-in-time copy of the four entity collections.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            trades: self.trades.clone(),
            trainees: self.trainees.clone(),
            modules: self.modules.clone(),
            marks: self.marks.clone(),
        }
    }

    /// Serializes the current snapshot as the export document.
    pub fn export_json(&self) -> StoreResult<String> {
        Ok(self.snapshot().to_json()?)
    }

    /// Replaces every collection present in `import`.
    ///
    /// This is the whole-system restore path. Guards are not evaluated and
    /// references are not checked against the rest of the store. Ids must
    /// be unique per collection and every record passes the CRUD field
    /// checks. Mark totals are recomputed. Replaced collections reset their
    /// high-water mark to their largest id.
    pub fn import(&mut self, import: CollectionImport) -> StoreResult<()> {
        let import = import.validated().map_err(|err| {
            warn!("event=store_import module=store status=rejected error_code=invalid_record");
            err
        })?;
        let mut counters = self.counters;
        let mut entries = Vec::new();
        if let Some(trades) = &import.trades {
            entries.push((CollectionKey::Trades, encode_collection(trades)?));
            counters.trades = max_id(trades);
        }
        if let Some(trainees) = &import.trainees {
            entries.push((CollectionKey::Trainees, encode_collection(trainees)?));
            counters.trainees = max_id(trainees);
        }
        if let Some(modules) = &import.modules {
            entries.push((CollectionKey::Modules, encode_collection(modules)?));
            counters.modules = max_id(modules);
        }
        if let Some(marks) = &import.marks {
            entries.push((CollectionKey::Marks, encode_collection(marks)?));
            counters.marks = max_id(marks);
        }
        if entries.is_empty() {
            info!("event=store_import module=store status=ok replaced=0");
            return Ok(());
        }
        let replaced = entries.len();
        entries.push((CollectionKey::IdCounters, encode_collection(&counters)?));
        self.repo.save_all(&entries)?;

        if let Some(trades) = import.trades {
            self.trades = trades;
        }
        if let Some(trainees) = import.trainees {
            self.trainees = trainees;
        }
        if let Some(modules) = import.modules {
            self.modules = modules;
        }
        if let Some(marks) = import.marks {
            self.marks = marks;
        }
        self.counters = counters;
        info!("event=store_import module=store status=ok replaced={replaced}");
        Ok(())
    }

    /// Parses an export document and imports it.
    ///
    /// A malformed document fails with `StoreError::Transfer` before anything
    /// is replaced.
    pub fn import_json(&mut self, document: &str) -> StoreResult<()> {
        let import = parse_import(document).map_err(|err| {
            warn!("event=store_import module=store status=rejected error_code=malformed_document");
            err
        })?;
        self.import(import)
    }

    /// Empties trades, trainees, modules and marks and resets their
    /// high-water marks. Users are untouched.
    pub fn clear_all(&mut self) -> StoreResult<()> {
        let counters = IdCounters::default();
        let empty: [Trade; 0] = [];
        self.repo.save_all(&[
            (CollectionKey::Trades, encode_collection(&empty)?),
            (CollectionKey::Trainees, encode_collection(&empty)?),
            (CollectionKey::Modules, encode_collection(&empty)?),
            (CollectionKey::Marks, encode_collection(&empty)?),
            (CollectionKey::IdCounters, encode_collection(&counters)?),
        ])?;
        self.trades.clear();
        self.trainees.clear();
        self.modules.clear();
        self.marks.clear();
        self.counters = counters;
        info!("event=store_clear module=store status=ok");
        Ok(())
    }

    // --- Internals ---

    fn guard(
        &self,
        entity: EntityKind,
        id: u32,
        dependents: EntityKind,
        count: usize,
    ) -> StoreResult<()> {
        if count == 0 {
            return Ok(());
        }
        warn!(
            "event=store_guard module=store status=rejected entity={entity} id={id} dependents={} count={count}",
            dependents.plural()
        );
        Err(StoreError::Integrity(IntegrityViolation {
            entity,
            id,
            dependents,
            count,
        }))
    }

    fn insert<T: StoredEntity>(
        &mut self,
        build: impl FnOnce(u32) -> Result<T, ValidationError>,
    ) -> StoreResult<T> {
        let current = T::collection(self);
        let id = max_id(current)
            .max(self.counters.get(T::KIND))
            .checked_add(1)
            .ok_or(StoreError::IdSpaceExhausted(T::KIND))?;
        let record = build(id)?;

        let mut next = current.to_vec();
        next.push(record.clone());
        let counters = self.counters.with(T::KIND, id);
        self.repo.save_all(&[
            (T::KEY, encode_collection(&next)?),
            (CollectionKey::IdCounters, encode_collection(&counters)?),
        ])?;

        *T::collection_mut(self) = next;
        self.counters = counters;
        log_mutation("add", T::KIND, id);
        Ok(record)
    }

    fn replace<T: StoredEntity>(&mut self, record: T) -> StoreResult<T> {
        let id = record.id();
        let current = T::collection(self);
        let index = current
            .iter()
            .position(|existing| existing.id() == id)
            .ok_or(StoreError::NotFound { entity: T::KIND, id })?;

        let mut next = current.to_vec();
        next[index] = record.clone();
        self.repo.save_all(&[(T::KEY, encode_collection(&next)?)])?;

        *T::collection_mut(self) = next;
        log_mutation("update", T::KIND, id);
        Ok(record)
    }

    fn remove<T: StoredEntity>(&mut self, id: u32) -> StoreResult<bool> {
        let current = T::collection(self);
        let Some(index) = current.iter().position(|existing| existing.id() == id) else {
            return Ok(false);
        };

        let mut next = current.to_vec();
        next.remove(index);
        self.repo.save_all(&[(T::KEY, encode_collection(&next)?)])?;

        *T::collection_mut(self) = next;
        log_mutation("delete", T::KIND, id);
        Ok(true)
    }
}

/// Binds an entity type to its collection slot inside the store.
trait StoredEntity: Clone + Serialize {
    const KIND: EntityKind;
    const KEY: CollectionKey;

    fn id(&self) -> u32;
    fn collection<R: CollectionRepository>(store: &RecordsStore<R>) -> &[Self];
    fn collection_mut<R: CollectionRepository>(store: &mut RecordsStore<R>) -> &mut Vec<Self>;
}

impl StoredEntity for Trade {
    const KIND: EntityKind = EntityKind::Trade;
    const KEY: CollectionKey = CollectionKey::Trades;

    fn id(&self) -> u32 {
        self.trade_id
    }
    fn collection<R: CollectionRepository>(store: &RecordsStore<R>) -> &[Self] {
        &store.trades
    }
    fn collection_mut<R: CollectionRepository>(store: &mut RecordsStore<R>) -> &mut Vec<Self> {
        &mut store.trades
    }
}

impl StoredEntity for Trainee {
    const KIND: EntityKind = EntityKind::Trainee;
    const KEY: CollectionKey = CollectionKey::Trainees;

    fn id(&self) -> u32 {
        self.trainee_id
    }
    fn collection<R: CollectionRepository>(store: &RecordsStore<R>) -> &[Self] {
        &store.trainees
    }
    fn collection_mut<R: CollectionRepository>(store: &mut RecordsStore<R>) -> &mut Vec<Self> {
        &mut store.trainees
    }
}

impl StoredEntity for Module {
    const KIND: EntityKind = EntityKind::Module;
    const KEY: CollectionKey = CollectionKey::Modules;

    fn id(&self) -> u32 {
        self.module_id
    }
    fn collection<R: CollectionRepository>(store: &RecordsStore<R>) -> &[Self] {
        &store.modules
    }
    fn collection_mut<R: CollectionRepository>(store: &mut RecordsStore<R>) -> &mut Vec<Self> {
        &mut store.modules
    }
}

impl StoredEntity for Mark {
    const KIND: EntityKind = EntityKind::Mark;
    const KEY: CollectionKey = CollectionKey::Marks;

    fn id(&self) -> u32 {
        self.mark_id
    }
    fn collection<R: CollectionRepository>(store: &RecordsStore<R>) -> &[Self] {
        &store.marks
    }
    fn collection_mut<R: CollectionRepository>(store: &mut RecordsStore<R>) -> &mut Vec<Self> {
        &mut store.marks
    }
}

fn max_id<T: StoredEntity>(records: &[T]) -> u32 {
    records.iter().map(StoredEntity::id).max().unwrap_or(0)
}

fn load_or_seed<T, R>(
    repo: &R,
    key: CollectionKey,
    policy: SeedPolicy,
    seed: fn() -> Vec<T>,
    pending: &mut Vec<(CollectionKey, String)>,
) -> StoreResult<Vec<T>>
where
    T: Serialize + DeserializeOwned,
    R: CollectionRepository,
{
    if let Some(payload) = repo.load(key)? {
        return Ok(decode_collection(key, &payload)?);
    }
    let records = match policy {
        SeedPolicy::Seed => seed(),
        SeedPolicy::Empty => Vec::new(),
    };
    pending.push((key, encode_collection(&records)?));
    Ok(records)
}

fn log_mutation(op: &'static str, entity: EntityKind, id: u32) {
    info!("event=store_mutation module=store status=ok op={op} entity={entity} id={id}");
}
