//! Diesel connection pooling for SQLite.

use diesel::SqliteConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sql_query;
use diesel::RunQueryDsl;

/// Shared r2d2 pool over SQLite connections.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
/// A single pooled connection.
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite ships with foreign keys off per connection.
#[derive(Debug, Clone, Copy)]
struct ForeignKeyEnforcement;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ForeignKeyEnforcement {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        sql_query("PRAGMA foreign_keys = ON;")
            .execute(conn)
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Build a connection pool for the given SQLite database path or URL.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, diesel::r2d2::PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .connection_customizer(Box::new(ForeignKeyEnforcement))
        .build(manager)
}
