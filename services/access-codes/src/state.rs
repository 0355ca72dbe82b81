use sea_orm::DatabaseConnection;

use crate::infra::db::DbAccessCodeRepository;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn code_repo(&self) -> DbAccessCodeRepository {
        DbAccessCodeRepository {
            db: self.db.clone(),
        }
    }
}
