//! In-memory store used by service tests

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{BookCopiesStore, LoansStore, Repository, RolesStore, UsersStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        book_copy::BookCopy,
        loan::{Loan, LoanChanges, NewLoan},
        role::{Role, RoleType},
        user::{NewUser, User, UserShort},
    },
};

#[derive(Debug, Clone)]
struct StoredLoan {
    id: i32,
    book_copy_id: i32,
    user_id: i32,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    pending: bool,
}

#[derive(Default)]
struct State {
    roles: Vec<Role>,
    users: BTreeMap<i32, User>,
    book_copies: BTreeMap<i32, BookCopy>,
    loans: BTreeMap<i32, StoredLoan>,
    next_user_id: i32,
    next_loan_id: i32,
    writes: usize,
}

impl State {
    fn resolve(&self, loan: &StoredLoan) -> Loan {
        let book_copy = self.book_copies[&loan.book_copy_id].clone();
        let user = UserShort::from(&self.users[&loan.user_id]);
        Loan {
            id: loan.id,
            book_copy,
            user,
            start_date: loan.start_date,
            end_date: loan.end_date,
            pending: loan.pending,
        }
    }
}

/// Shared fixture implementing every store trait over plain maps
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Store with the `USER` (id 1) and `ADMIN` (id 2) roles seeded
    pub fn seeded() -> Arc<Self> {
        let store = Self::default();
        {
            let mut state = store.lock();
            state.roles = vec![
                Role { id: 1, name: RoleType::User },
                Role { id: 2, name: RoleType::Admin },
            ];
            state.next_user_id = 1;
            state.next_loan_id = 1;
        }
        Arc::new(store)
    }

    pub fn repository(self: &Arc<Self>) -> Repository {
        Repository::from_stores(self.clone(), self.clone(), self.clone(), self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn clear_roles(&self) {
        self.lock().roles.clear();
    }

    pub fn add_book_copy(&self, id: i32, available: bool) {
        self.lock().book_copies.insert(
            id,
            BookCopy {
                id,
                available,
                is_deleted: false,
            },
        );
    }

    pub fn soft_delete_book_copy(&self, id: i32) {
        if let Some(copy) = self.lock().book_copies.get_mut(&id) {
            copy.is_deleted = true;
        }
    }

    pub fn add_user(&self, id: i32, email: &str) {
        let user = crate::models::user::sample_user(id, email);
        let mut state = self.lock();
        state.next_user_id = state.next_user_id.max(id + 1);
        state.users.insert(id, user);
    }

    pub fn soft_delete_user(&self, id: i32) {
        if let Some(user) = self.lock().users.get_mut(&id) {
            user.is_deleted = true;
        }
    }

    pub fn book_copy(&self, id: i32) -> Option<BookCopy> {
        self.lock().book_copies.get(&id).cloned()
    }

    pub fn loan_count(&self) -> usize {
        self.lock().loans.len()
    }

    pub fn writes(&self) -> usize {
        self.lock().writes
    }
}

#[async_trait]
impl RolesStore for MemoryStore {
    async fn find_by_name(&self, name: RoleType) -> AppResult<Option<Role>> {
        Ok(self.lock().roles.iter().find(|r| r.name == name).cloned())
    }
}

#[async_trait]
impl UsersStore for MemoryStore {
    async fn find_active(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .get(&id)
            .filter(|u| !u.is_deleted)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| !u.is_deleted && u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> AppResult<User> {
        let mut state = self.lock();
        if state.users.values().any(|u| u.email == user.email) {
            return Err(AppError::BadRequest(format!(
                "Key (email)=({}) already exists.",
                user.email
            )));
        }
        let role = state
            .roles
            .iter()
            .find(|r| r.id == user.role_id)
            .cloned()
            .ok_or_else(|| AppError::Internal("role foreign key violation".to_string()))?;

        let id = state.next_user_id;
        state.next_user_id += 1;
        state.writes += 1;

        let created = User {
            id,
            email: user.email.clone(),
            password: user.password_hash.clone(),
            name: user.name.clone(),
            last_name: user.last_name.clone(),
            role,
            is_deleted: false,
        };
        state.users.insert(id, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl BookCopiesStore for MemoryStore {
    async fn find_active(&self, id: i32) -> AppResult<Option<BookCopy>> {
        Ok(self
            .lock()
            .book_copies
            .get(&id)
            .filter(|c| !c.is_deleted)
            .cloned())
    }
}

#[async_trait]
impl LoansStore for MemoryStore {
    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Loan>> {
        let state = self.lock();
        Ok(state
            .loans
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|l| state.resolve(l))
            .collect())
    }

    async fn find(&self, id: i32) -> AppResult<Option<Loan>> {
        let state = self.lock();
        Ok(state.loans.get(&id).map(|l| state.resolve(l)))
    }

    async fn insert_claiming_copy(&self, loan: &NewLoan) -> AppResult<Loan> {
        let mut state = self.lock();
        match state.book_copies.get_mut(&loan.book_copy_id) {
            Some(copy) if copy.available && !copy.is_deleted => copy.available = false,
            _ => return Err(AppError::BadRequest("Book copy is not available".to_string())),
        }

        let id = state.next_loan_id;
        state.next_loan_id += 1;
        state.writes += 2;

        let stored = StoredLoan {
            id,
            book_copy_id: loan.book_copy_id,
            user_id: loan.user_id,
            start_date: loan.start_date,
            end_date: loan.end_date,
            pending: true,
        };
        let resolved = state.resolve(&stored);
        state.loans.insert(id, stored);
        Ok(resolved)
    }

    async fn update(&self, id: i32, changes: &LoanChanges) -> AppResult<Loan> {
        let mut state = self.lock();
        let loan = state
            .loans
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Loan not found".to_string()))?;
        loan.book_copy_id = changes.book_copy_id;
        loan.user_id = changes.user_id;
        loan.start_date = changes.start_date;
        loan.end_date = changes.end_date;
        let loan = loan.clone();
        state.writes += 1;
        Ok(state.resolve(&loan))
    }

    async fn mark_returned(&self, id: i32, book_copy_id: i32) -> AppResult<Loan> {
        let mut state = self.lock();
        let loan = match state.loans.get_mut(&id) {
            None => return Err(AppError::NotFound("Loan not found".to_string())),
            Some(loan) if !loan.pending => {
                return Err(AppError::BadRequest("Loan already returned".to_string()))
            }
            Some(loan) => {
                loan.pending = false;
                loan.clone()
            }
        };
        if let Some(copy) = state.book_copies.get_mut(&book_copy_id) {
            copy.available = true;
        }
        state.writes += 2;
        Ok(state.resolve(&loan))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut state = self.lock();
        let removed = state.loans.remove(&id).is_some();
        if removed {
            state.writes += 1;
        }
        Ok(removed)
    }
}
