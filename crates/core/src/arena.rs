//! Shared ownership of registered inference requests.
//!
//! Once a request passes validation it is registered in a [`RequestArena`], which owns one
//! [`RequestRecord`] per request. Several downstream workers (retrieval, job submission,
//! export) may hold the same record at once, so the fields they contend on are synchronised:
//!
//! - the storage path is a `OnceLock`: the first successful setter wins, every later setter
//!   gets [`IgwError::StorageLocationConflict`]
//! - the retry counter is an `AtomicU32`
//! - job/payload identifiers and the state/status pair sit behind one `Mutex`
//!
//! The submitted content itself is immutable after registration. Once the job pipeline is done
//! with a request, [`RequestArena::remove`] hands the record to the persistence side and frees
//! its slot for reuse.

use crate::storage::require_storage_path;
use crate::{
    IgwError, IgwResult, InferenceRequest, InferenceRequestState, InferenceRequestStatus,
    RequestId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

/// Slot of a record inside its arena.
///
/// Slots are reused after removal; the generation keeps a handle to a removed record from
/// resolving to whichever record later occupies its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestHandle {
    index: usize,
    generation: u32,
}

impl RequestHandle {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Lifecycle fields owned by the job pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lifecycle {
    pub job_id: Option<String>,
    pub payload_id: Option<String>,
    pub state: InferenceRequestState,
    pub status: InferenceRequestStatus,
}

/// A registered request plus its concurrently-updated fields.
#[derive(Debug)]
pub struct RequestRecord {
    request: InferenceRequest,
    lifecycle: Mutex<Lifecycle>,
    storage_path: OnceLock<String>,
    try_count: AtomicU32,
}

impl RequestRecord {
    fn new(request: InferenceRequest) -> Self {
        let lifecycle = Lifecycle {
            job_id: request.job_id.clone(),
            payload_id: request.payload_id.clone(),
            state: request.state,
            status: request.status,
        };

        let storage_path = OnceLock::new();
        if let Some(path) = request.storage_path() {
            let _ = storage_path.set(path.to_string());
        }

        Self {
            try_count: AtomicU32::new(request.try_count),
            request,
            lifecycle: Mutex::new(lifecycle),
            storage_path,
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.request.request_id()
    }

    /// The request as registered.
    ///
    /// Lifecycle, storage and retry fields here are those at registration time; use
    /// [`RequestRecord::snapshot`] for current values.
    pub fn request(&self) -> &InferenceRequest {
        &self.request
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lock_lifecycle().clone()
    }

    /// Apply `update` to the lifecycle fields under the record's lock.
    pub fn update_lifecycle<F>(&self, update: F)
    where
        F: FnOnce(&mut Lifecycle),
    {
        let mut lifecycle = self.lock_lifecycle();
        update(&mut lifecycle);
    }

    /// Atomically assign the working-storage path.
    ///
    /// # Errors
    ///
    /// - [`IgwError::BlankStoragePath`] if `path` is blank.
    /// - [`IgwError::StorageLocationConflict`] if any caller already set a path.
    pub fn configure_storage_location(&self, path: impl Into<String>) -> IgwResult<()> {
        let path = path.into();
        require_storage_path(&path)?;

        self.storage_path.set(path).map_err(|_| {
            let existing = self.storage_path.get().cloned().unwrap_or_default();
            tracing::warn!(
                request_id = %self.request_id(),
                existing = %existing,
                "storage location already configured"
            );
            IgwError::StorageLocationConflict { existing }
        })
    }

    pub fn storage_path(&self) -> Option<&str> {
        self.storage_path.get().map(String::as_str)
    }

    pub fn try_count(&self) -> u32 {
        self.try_count.load(Ordering::SeqCst)
    }

    /// Record one more submission attempt and return the new count.
    pub fn increment_try_count(&self) -> u32 {
        self.try_count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current view of the request with every managed field filled in.
    pub fn snapshot(&self) -> InferenceRequest {
        let lifecycle = self.lifecycle();
        let mut snapshot = self.request.clone();
        snapshot.job_id = lifecycle.job_id;
        snapshot.payload_id = lifecycle.payload_id;
        snapshot.state = lifecycle.state;
        snapshot.status = lifecycle.status;
        snapshot.storage_path = self.storage_path.get().cloned();
        snapshot.try_count = self.try_count();
        snapshot
    }

    fn lock_lifecycle(&self) -> std::sync::MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    record: Option<Arc<RequestRecord>>,
}

#[derive(Debug, Default)]
struct ArenaSlots {
    slots: Vec<Slot>,
    free: Vec<usize>,
    by_id: HashMap<RequestId, RequestHandle>,
}

impl ArenaSlots {
    fn record(&self, handle: RequestHandle) -> Option<&Arc<RequestRecord>> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.record.as_ref())
    }
}

/// Owner of every registered request record.
#[derive(Debug, Default)]
pub struct RequestArena {
    slots: RwLock<ArenaSlots>,
}

impl RequestArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `request` and return its handle.
    ///
    /// # Errors
    ///
    /// Returns [`IgwError::DuplicateRequest`] if a request with the same identifier is
    /// already registered.
    pub fn insert(&self, request: InferenceRequest) -> IgwResult<RequestHandle> {
        let request_id = request.request_id();
        let mut arena = self.slots.write().unwrap_or_else(PoisonError::into_inner);

        if arena.by_id.contains_key(&request_id) {
            return Err(IgwError::DuplicateRequest(request_id));
        }

        let record = Some(Arc::new(RequestRecord::new(request)));
        let handle = match arena.free.pop() {
            Some(index) => {
                let slot = &mut arena.slots[index];
                slot.record = record;
                RequestHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                arena.slots.push(Slot {
                    generation: 0,
                    record,
                });
                RequestHandle {
                    index: arena.slots.len() - 1,
                    generation: 0,
                }
            }
        };
        arena.by_id.insert(request_id, handle);

        tracing::info!(
            request_id = %request_id,
            handle = handle.index(),
            "registered inference request"
        );
        Ok(handle)
    }

    pub fn get(&self, handle: RequestHandle) -> Option<Arc<RequestRecord>> {
        let arena = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        arena.record(handle).cloned()
    }

    pub fn handle_of(&self, request_id: &RequestId) -> Option<RequestHandle> {
        let arena = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        arena.by_id.get(request_id).copied()
    }

    /// Look up a record by request identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IgwError::UnknownRequest`] if nothing is registered under `request_id`.
    pub fn find(&self, request_id: &RequestId) -> IgwResult<Arc<RequestRecord>> {
        let arena = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        arena
            .by_id
            .get(request_id)
            .and_then(|handle| arena.record(*handle))
            .cloned()
            .ok_or(IgwError::UnknownRequest(*request_id))
    }

    /// Unregister a request and return its record.
    ///
    /// Workers already holding the record keep it; new lookups by id or handle miss.
    pub fn remove(&self, request_id: &RequestId) -> Option<Arc<RequestRecord>> {
        let mut arena = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let handle = arena.by_id.remove(request_id)?;

        let slot = arena.slots.get_mut(handle.index)?;
        let record = slot.record.take();
        slot.generation = slot.generation.wrapping_add(1);
        arena.free.push(handle.index);

        tracing::info!(
            request_id = %request_id,
            handle = handle.index(),
            "released inference request"
        );
        record
    }

    /// Number of registered requests.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_id
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn insert_and_lookup_by_handle_and_id() {
        let arena = RequestArena::new();
        let request = InferenceRequest::new("txn-1");
        let id = request.request_id();

        let handle = arena.insert(request).expect("insert");
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.handle_of(&id), Some(handle));
        assert_eq!(arena.get(handle).expect("record").request_id(), id);
        assert_eq!(arena.find(&id).expect("find").request().transaction_id, "txn-1");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let arena = RequestArena::new();
        let request = InferenceRequest::new("txn-1");
        arena.insert(request.clone()).expect("first insert");

        let err = arena.insert(request).expect_err("duplicate");
        assert!(matches!(err, IgwError::DuplicateRequest(_)));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let arena = RequestArena::new();
        let err = arena.find(&RequestId::new()).expect_err("unknown");
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);
    }

    #[test]
    fn concurrent_storage_configuration_has_exactly_one_winner() {
        let arena = RequestArena::new();
        let handle = arena.insert(InferenceRequest::new("txn-1")).expect("insert");
        let record = arena.get(handle).expect("record");

        let workers: Vec<_> = (0..8)
            .map(|i| {
                let record = Arc::clone(&record);
                thread::spawn(move || record.configure_storage_location(format!("/payloads/{i}")))
            })
            .collect();

        let results: Vec<_> = workers
            .into_iter()
            .map(|w| w.join().expect("worker panicked"))
            .collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);

        let stored = record.storage_path().expect("path set").to_string();
        for result in results.into_iter().filter_map(Result::err) {
            match result {
                IgwError::StorageLocationConflict { existing } => assert_eq!(existing, stored),
                other => panic!("expected StorageLocationConflict, got {other:?}"),
            }
        }
    }

    #[test]
    fn blank_storage_path_is_rejected_on_records() {
        let arena = RequestArena::new();
        let handle = arena.insert(InferenceRequest::new("txn-1")).expect("insert");
        let record = arena.get(handle).expect("record");

        assert!(matches!(
            record.configure_storage_location(" "),
            Err(IgwError::BlankStoragePath)
        ));
        assert!(record.storage_path().is_none());
    }

    #[test]
    fn concurrent_retries_are_all_counted() {
        let arena = RequestArena::new();
        let handle = arena.insert(InferenceRequest::new("txn-1")).expect("insert");
        let record = arena.get(handle).expect("record");

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let record = Arc::clone(&record);
                thread::spawn(move || {
                    for _ in 0..250 {
                        record.increment_try_count();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().expect("worker panicked");
        }

        assert_eq!(record.try_count(), 1000);
    }

    #[test]
    fn snapshot_reflects_current_managed_fields() {
        let arena = RequestArena::new();
        let handle = arena.insert(InferenceRequest::new("txn-1")).expect("insert");
        let record = arena.get(handle).expect("record");

        record.update_lifecycle(|lifecycle| {
            lifecycle.job_id = Some("job-1".into());
            lifecycle.payload_id = Some("payload-1".into());
            lifecycle.state = InferenceRequestState::Completed;
            lifecycle.status = InferenceRequestStatus::Success;
        });
        record
            .configure_storage_location("/payloads/txn-1")
            .expect("configure storage");
        record.increment_try_count();

        let snapshot = record.snapshot();
        assert_eq!(snapshot.job_id.as_deref(), Some("job-1"));
        assert_eq!(snapshot.payload_id.as_deref(), Some("payload-1"));
        assert_eq!(snapshot.state, InferenceRequestState::Completed);
        assert_eq!(snapshot.status, InferenceRequestStatus::Success);
        assert_eq!(snapshot.storage_path(), Some("/payloads/txn-1"));
        assert_eq!(snapshot.try_count, 1);
        assert_eq!(record.request().state, InferenceRequestState::Queued);
    }

    #[test]
    fn registration_keeps_existing_storage_path() {
        let mut request = InferenceRequest::new("txn-1");
        request
            .configure_storage_location("/payloads/restored")
            .expect("configure storage");

        let arena = RequestArena::new();
        let handle = arena.insert(request).expect("insert");
        let record = arena.get(handle).expect("record");

        assert_eq!(record.storage_path(), Some("/payloads/restored"));
        assert!(record.configure_storage_location("/payloads/new").is_err());
    }

    #[test]
    fn removed_requests_are_no_longer_found() {
        let arena = RequestArena::new();
        let request = InferenceRequest::new("txn-1");
        let id = request.request_id();
        let handle = arena.insert(request).expect("insert");
        let held = arena.get(handle).expect("record");

        let removed = arena.remove(&id).expect("removed");
        assert_eq!(removed.request_id(), id);
        assert!(arena.is_empty());
        assert!(arena.get(handle).is_none());
        assert!(arena.handle_of(&id).is_none());
        assert_eq!(
            arena.find(&id).expect_err("removed").kind(),
            crate::ErrorKind::NotFound
        );
        assert!(arena.remove(&id).is_none());

        // Workers holding the record keep working on it.
        held.increment_try_count();
        assert_eq!(removed.try_count(), 1);
    }

    #[test]
    fn freed_slots_are_reused_without_reviving_old_handles() {
        let arena = RequestArena::new();
        let first = InferenceRequest::new("txn-1");
        let first_id = first.request_id();
        let old_handle = arena.insert(first).expect("insert first");
        arena.remove(&first_id).expect("remove first");

        let second = InferenceRequest::new("txn-2");
        let second_id = second.request_id();
        let new_handle = arena.insert(second).expect("insert second");

        assert_eq!(new_handle.index(), old_handle.index());
        assert_ne!(new_handle, old_handle);
        assert!(arena.get(old_handle).is_none());
        assert_eq!(arena.get(new_handle).expect("record").request_id(), second_id);
        assert_eq!(arena.len(), 1);
    }
}
