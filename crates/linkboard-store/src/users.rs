use std::collections::HashMap;

use tracing::{info, warn};

use linkboard_types::models::User;

use crate::{Resource, Result, StoreError, Table};

#[derive(Default)]
struct UserTable {
    last_id: u32,
    by_login: HashMap<String, User>,
}

/// Registered accounts keyed by login. Users are never deleted.
#[derive(Default)]
pub struct UserStore {
    table: Table<UserTable>,
}

impl UserStore {
    pub fn new() -> Self {
        info!("User store created");
        Self::default()
    }

    /// Register a new login. The ID counter only advances on success, so a
    /// rejected duplicate never burns an ID.
    pub fn create_user(&self, login: &str, password: &str) -> Result<User> {
        let user = self.table.with_write(|table| {
            if table.by_login.contains_key(login) {
                warn!("create_user: login already exists: '{}'", login);
                return Err(StoreError::AlreadyExists);
            }

            table.last_id += 1;
            let user = User {
                id: table.last_id,
                username: login.to_string(),
                password: password.to_string(),
            };
            table.by_login.insert(login.to_string(), user.clone());
            Ok(user)
        })?;

        info!("create_user: created '{}' (id {})", user.username, user.id);
        Ok(user)
    }

    pub fn authorize(&self, login: &str, password: &str) -> Result<User> {
        let user = self.get(login)?;

        if user.password != password {
            warn!("authorize: invalid password for user '{}'", login);
            return Err(StoreError::WrongPassword);
        }

        info!("authorize: '{}' logged in", login);
        Ok(user)
    }

    pub fn get(&self, login: &str) -> Result<User> {
        self.table.with_read(|table| {
            table.by_login.get(login).cloned().ok_or_else(|| {
                warn!("get: no user '{}'", login);
                StoreError::NotFound(Resource::User)
            })
        })
    }
}
