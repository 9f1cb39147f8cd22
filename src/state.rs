use crate::db::{DbPool, OrmConn};

#[derive(Clone)]
pub struct AppState {
    /// sqlx pool, audit trail only.
    pub pool: DbPool,
    /// SeaORM connection, all catalog and inventory traffic.
    pub orm: OrmConn,
}

impl AppState {
    pub fn new(pool: DbPool, orm: OrmConn) -> Self {
        Self { pool, orm }
    }
}
