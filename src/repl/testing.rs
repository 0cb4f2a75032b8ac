//! Testing infrastructure for REPL components
//!
//! Provides an in-memory profile backend and a capturing writer so view
//! models, commands and renderers can be exercised without a network or a
//! terminal, plus [`settle`] to wait for a view model's background work.

use crate::repl::models::{Gender, ProfilePage, ProfileRecord, SearchCriteria, UserAccount};
use crate::repl::services::http::{ApiError, ListQuery, ProfileApi};
use crate::repl::view_models::ListViewModel;
use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

/// Mock writer that captures output instead of writing to terminal
#[derive(Default)]
pub struct MockWriter {
    pub output: Vec<u8>,
}

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl MockWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_output(&self) -> String {
        String::from_utf8_lossy(&self.output).to_string()
    }
}

/// Build a persisted record for fixtures
pub fn record(id: i64, username: &str, age: i64, hometown: &str, gender: Gender) -> ProfileRecord {
    ProfileRecord {
        user: UserAccount {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            id: id + 100,
        },
        hometown: hometown.to_string(),
        age,
        gender,
        id,
    }
}

/// Calls received by [`FakeProfileApi`]
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    List(ListQuery),
    Create(ProfileRecord),
    Update(ProfileRecord),
    Delete(i64),
}

#[derive(Default)]
struct FakeState {
    records: Vec<ProfileRecord>,
    next_id: i64,
    calls: Vec<ApiCall>,
    fail_list: bool,
    fail_mutations: bool,
    list_delay: Option<Duration>,
}

/// In-memory backend honouring pagination and search like the real one
#[derive(Default)]
pub struct FakeProfileApi {
    state: Mutex<FakeState>,
}

impl FakeProfileApi {
    pub fn with_records(records: Vec<ProfileRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(FakeState {
                records,
                next_id,
                ..FakeState::default()
            }),
        }
    }

    /// `count` records named user1..userN, alternating genders
    pub fn seeded(count: i64) -> Self {
        let records = (1..=count)
            .map(|i| {
                let gender = if i % 2 == 0 { Gender::Female } else { Gender::Male };
                record(i, &format!("user{i}"), 20 + i, "Paris", gender)
            })
            .collect();
        Self::with_records(records)
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn list_calls(&self) -> Vec<ListQuery> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::List(query) => Some(query),
                _ => None,
            })
            .collect()
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.state.lock().unwrap().fail_list = fail;
    }

    /// Make every list call wait `delay` before answering
    pub fn set_list_delay(&self, delay: Duration) {
        self.state.lock().unwrap().list_delay = Some(delay);
    }

    pub fn set_fail_mutations(&self, fail: bool) {
        self.state.lock().unwrap().fail_mutations = fail;
    }

    pub fn records(&self) -> Vec<ProfileRecord> {
        self.state.lock().unwrap().records.clone()
    }
}

/// Process background events until the view model has nothing in flight
pub async fn settle(view_model: &mut ListViewModel) {
    loop {
        view_model.sync_with_cache();
        if !view_model.is_busy() {
            return;
        }
        match view_model.next_background_event().await {
            Some(event) => view_model.process_background_event(event),
            None => return,
        }
    }
}

fn matches_filter(record: &ProfileRecord, query: &ListQuery) -> bool {
    let Some((_, text)) = query.search_filter() else {
        return true;
    };
    let needle = text.trim().to_lowercase();
    match query.search_criteria {
        SearchCriteria::Username => record.user.username.to_lowercase().contains(&needle),
        SearchCriteria::Age => record.age.to_string() == needle,
        SearchCriteria::Hometown => record.hometown.to_lowercase().contains(&needle),
    }
}

#[async_trait]
impl ProfileApi for FakeProfileApi {
    async fn list_profiles(&self, query: &ListQuery) -> Result<ProfilePage, ApiError> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(ApiCall::List(query.clone()));
            state.list_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock().unwrap();
        if state.fail_list {
            return Err(ApiError::FetchUsers);
        }

        let matching: Vec<ProfileRecord> = state
            .records
            .iter()
            .filter(|r| matches_filter(r, query))
            .cloned()
            .collect();
        let size = query.page_size.max(1) as usize;
        let start = (query.page.max(1) as usize - 1) * size;
        let data = matching.iter().skip(start).take(size).cloned().collect();
        let count = matching.len() as u64;

        Ok(ProfilePage {
            data,
            count,
            num_pages: matching.len().div_ceil(size).max(1) as u32,
            current_page: query.page,
        })
    }

    async fn create_profile(&self, record: &ProfileRecord) -> Result<ProfileRecord, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::Create(record.clone()));
        if state.fail_mutations {
            return Err(ApiError::AddUser);
        }
        let mut created = record.clone();
        created.id = state.next_id;
        created.user.id = state.next_id + 100;
        state.next_id += 1;
        state.records.push(created.clone());
        Ok(created)
    }

    async fn update_profile(&self, record: &ProfileRecord) -> Result<ProfileRecord, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::Update(record.clone()));
        if state.fail_mutations {
            return Err(ApiError::UpdateUser);
        }
        match state.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(record.clone())
            }
            None => Err(ApiError::UpdateUser),
        }
    }

    async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::Delete(id));
        if state.fail_mutations {
            return Err(ApiError::DeleteUser);
        }
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        if state.records.len() == before {
            return Err(ApiError::DeleteUser);
        }
        Ok(())
    }
}
