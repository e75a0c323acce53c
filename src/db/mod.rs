//! Data store access: connection pool, per-request sessions, entities and
//! migrations.
//!
//! Every handler works through exactly one [`Session`], a database
//! transaction scoped to the request. [`Session::finish`] commits it; a
//! session dropped without finishing (an early `?` return, a panic) is rolled
//! back, so the connection goes back to the pool on every path.
//!
//! sqlite allows one writer at a time, and two deferred transactions that
//! both read and then write deadlock on the upgrade. Sessions that write are
//! opened with [`Database::write_session`], which queues them behind a single
//! process-wide writer lock held until the session ends.

pub mod entity;
mod migration;

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::{
    ConnectOptions, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use migration::Migrator;

/// Handle to the data store. Cheap to clone; clones share one pool.
#[derive(Clone, Debug)]
pub struct Database {
    conn: DatabaseConnection,
    writer: Arc<Mutex<()>>,
}

impl Database {
    /// Opens a pool of up to `max_connections` connections to `url`.
    pub async fn connect(url: &str, max_connections: u32, sql_log: bool) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(url.to_owned());
        options
            .max_connections(max_connections)
            .connect_timeout(Duration::from_secs(8))
            .sqlx_logging(sql_log);
        let conn = sea_orm::Database::connect(options).await?;
        info!(max_connections, "database connected");
        Ok(Self::from_conn(conn))
    }

    /// A private in-memory sqlite store, already migrated.
    ///
    /// Each sqlite `:memory:` connection is its own database, so the pool is
    /// pinned to a single connection.
    pub async fn in_memory() -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Self::from_conn(sea_orm::Database::connect(options).await?);
        db.migrate().await?;
        Ok(db)
    }

    fn from_conn(conn: DatabaseConnection) -> Self {
        Self { conn, writer: Arc::new(Mutex::new(())) }
    }

    /// Applies every pending migration.
    pub async fn migrate(&self) -> Result<(), DbErr> {
        Migrator::up(&self.conn, None).await?;
        info!("database migrations applied");
        Ok(())
    }

    /// Opens a read session for one request.
    pub async fn session(&self) -> Result<Session, DbErr> {
        let tx = self.conn.begin().await?;
        debug!("session opened");
        Ok(Session { tx, writer: None })
    }

    /// Opens a session that writes. Waits until no other write session is
    /// open, so its reads and writes see a store no one else is changing.
    pub async fn write_session(&self) -> Result<Session, DbErr> {
        let writer = Arc::clone(&self.writer).lock_owned().await;
        let tx = self.conn.begin().await?;
        debug!("write session opened");
        Ok(Session { tx, writer: Some(writer) })
    }

    /// Round-trips to the store; used by the readiness probe.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.conn.ping().await
    }
}

/// A database transaction bound to one request.
///
/// Derefs to [`DatabaseTransaction`], so it is passed wherever sea-orm
/// expects a connection: `user::Entity::find_by_id(id).one(&*session)`.
#[derive(Debug)]
pub struct Session {
    // Dropped in declaration order: the rollback runs before the writer
    // lock is released.
    tx: DatabaseTransaction,
    writer: Option<OwnedMutexGuard<()>>,
}

impl Session {
    /// Commits the work done in this session.
    pub async fn finish(self) -> Result<(), DbErr> {
        let Self { tx, writer } = self;
        tx.commit().await?;
        drop(writer);
        debug!("session committed");
        Ok(())
    }
}

impl Deref for Session {
    type Target = DatabaseTransaction;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}
