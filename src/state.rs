//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::db::Database;
use crate::error::Error;
use crate::pages::Pages;

/// What every handler needs: the data store and the page renderer.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Database,
    pub pages: Arc<Pages>,
}

impl AppState {
    pub fn new(db: Database) -> Result<Self, Error> {
        Ok(Self { db, pages: Arc::new(Pages::new()?) })
    }
}
