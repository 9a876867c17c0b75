//! Session token storage
//!
//! Keeps the login token as JSON in `<config dir>/fitfusion/session.json`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::auth::dto::PublicUser;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: Option<PublicUser>,
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the platform config directory.
    pub fn new() -> Result<Self> {
        let dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(Self::at(dir.join("fitfusion").join("session.json")))
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// `None` when nobody is logged in.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)
            .context(format!("Failed to read session file: {:?}", self.path))?;
        let session = serde_json::from_str(&json)
            .context(format!("Failed to parse session file: {:?}", self.path))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        let json = serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        fs::write(&self.path, json).context(format!("Failed to write session file: {:?}", self.path))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Home,
    Users,
    Trainers,
    Workouts,
    Meals,
    Goals,
    Weather,
}

impl Route {
    pub fn is_protected(self) -> bool {
        !matches!(self, Route::Login | Route::Signup)
    }
}

/// Sends protected routes to `Login` when there is no token. The token is
/// not checked against the server.
pub struct RouteGuard;

impl RouteGuard {
    pub fn resolve(route: Route, session: Option<&Session>) -> Route {
        if route.is_protected() && session.is_none() {
            return Route::Login;
        }
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn create_test_store() -> (SessionStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::at(temp_dir.path().join("nested").join("session.json"));
        (store, temp_dir)
    }

    #[test]
    fn save_load_clear() {
        let (store, _dir) = create_test_store();
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.is_authenticated());

        let session = Session {
            token: "abc".into(),
            user: Some(PublicUser {
                id: Uuid::new_v4(),
                name: "Ana".into(),
                email: "ana@x.com".into(),
            }),
        };
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));
        assert!(store.is_authenticated());

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let (store, dir) = create_test_store();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("session.json"), "{not json").unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn guard_redirects_only_protected_routes() {
        let session = Session {
            token: "t".into(),
            user: None,
        };
        assert_eq!(RouteGuard::resolve(Route::Meals, None), Route::Login);
        assert_eq!(RouteGuard::resolve(Route::Signup, None), Route::Signup);
        assert_eq!(RouteGuard::resolve(Route::Meals, Some(&session)), Route::Meals);
        assert_eq!(RouteGuard::resolve(Route::Home, Some(&session)), Route::Home);
    }
}
