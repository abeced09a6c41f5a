//! In-memory test doubles for the store and directory seams.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use dirsync_core::directory::{Directory, DirectorySession};
use dirsync_core::entry::DirectoryEntry;
use dirsync_core::error::{SyncError, SyncResult};
use dirsync_core::store::{StoreError, UserRecord, UserStore};

/// In-memory user store with scriptable failures and call counting.
#[derive(Default)]
pub(crate) struct MemoryStore {
    users: Mutex<HashMap<String, UserRecord>>,
    failing_saves: Mutex<HashSet<String>>,
    failing_lookups: Mutex<HashSet<String>>,
    find_calls: Mutex<u64>,
    save_calls: Mutex<u64>,
}

impl MemoryStore {
    /// Pre-populate an existing local account.
    pub(crate) fn seed(&self, username: &str, display_name: &str, email: &str) {
        let user = UserRecord {
            username: username.to_string(),
            display_name: display_name.to_string(),
            email: email.to_string(),
            password: None,
            groups: vec!["users".to_string()],
            active: true,
        };
        self.users.lock().unwrap().insert(username.to_string(), user);
    }

    /// Make `save` fail for the given username.
    pub(crate) fn fail_save_for(&self, username: &str) {
        self.failing_saves.lock().unwrap().insert(username.to_string());
    }

    /// Make `find_by_username` fail for the given username.
    pub(crate) fn fail_lookup_for(&self, username: &str) {
        self.failing_lookups
            .lock()
            .unwrap()
            .insert(username.to_string());
    }

    pub(crate) fn get(&self, username: &str) -> Option<UserRecord> {
        self.users.lock().unwrap().get(username).cloned()
    }

    pub(crate) fn find_calls(&self) -> u64 {
        *self.find_calls.lock().unwrap()
    }

    pub(crate) fn save_calls(&self) -> u64 {
        *self.save_calls.lock().unwrap()
    }

    /// Total store interactions, for asserting the store was never touched.
    pub(crate) fn total_calls(&self) -> u64 {
        self.find_calls() + self.save_calls()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        *self.find_calls.lock().unwrap() += 1;

        if self.failing_lookups.lock().unwrap().contains(username) {
            return Err(StoreError::lookup("backend unavailable"));
        }

        Ok(self.users.lock().unwrap().get(username).cloned())
    }

    async fn save(&self, user: &UserRecord) -> Result<(), StoreError> {
        *self.save_calls.lock().unwrap() += 1;

        if self.failing_saves.lock().unwrap().contains(&user.username) {
            return Err(StoreError::save("unique constraint violated"));
        }

        self.users
            .lock()
            .unwrap()
            .insert(user.username.clone(), user.clone());
        Ok(())
    }

    fn new_user(&self) -> UserRecord {
        UserRecord {
            groups: vec!["users".to_string()],
            active: true,
            ..UserRecord::default()
        }
    }
}

/// What a [`MockDirectory`] session should do at each pipeline stage.
pub(crate) enum DirectoryScript {
    FailConnect,
    FailBind,
    FailSearch,
    Serve(Vec<DirectoryEntry>),
}

/// Scriptable directory double tracking session release.
pub(crate) struct MockDirectory {
    script: DirectoryScript,
    closed: Arc<Mutex<u64>>,
}

impl MockDirectory {
    pub(crate) fn new(script: DirectoryScript) -> Self {
        Self {
            script,
            closed: Arc::new(Mutex::new(0)),
        }
    }

    /// How many sessions were explicitly closed.
    pub(crate) fn close_count(&self) -> u64 {
        *self.closed.lock().unwrap()
    }
}

#[async_trait]
impl Directory for MockDirectory {
    type Session = MockSession;

    async fn connect(&self) -> SyncResult<MockSession> {
        match &self.script {
            DirectoryScript::FailConnect => {
                Err(SyncError::connection_failed("no route to directory"))
            }
            DirectoryScript::FailBind => Ok(MockSession {
                bind_error: true,
                search_error: false,
                entries: Vec::new(),
                closed: self.closed.clone(),
            }),
            DirectoryScript::FailSearch => Ok(MockSession {
                bind_error: false,
                search_error: true,
                entries: Vec::new(),
                closed: self.closed.clone(),
            }),
            DirectoryScript::Serve(entries) => Ok(MockSession {
                bind_error: false,
                search_error: false,
                entries: entries.clone(),
                closed: self.closed.clone(),
            }),
        }
    }
}

pub(crate) struct MockSession {
    bind_error: bool,
    search_error: bool,
    entries: Vec<DirectoryEntry>,
    closed: Arc<Mutex<u64>>,
}

#[async_trait]
impl DirectorySession for MockSession {
    async fn bind(&mut self) -> SyncResult<()> {
        if self.bind_error {
            return Err(SyncError::bind_failed("invalid credentials"));
        }
        Ok(())
    }

    async fn search_users(&mut self) -> SyncResult<Vec<DirectoryEntry>> {
        if self.search_error {
            return Err(SyncError::search_failed("size limit exceeded"));
        }
        Ok(self.entries.clone())
    }

    async fn close(&mut self) {
        *self.closed.lock().unwrap() += 1;
    }
}
