use crate::domain_port::StoreError;
use sqlx::mysql::MySqlDatabaseError;

pub fn is_dup_key(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql_err) = db.try_downcast_ref::<MySqlDatabaseError>() {
            return mysql_err.number() == 1062; // ER_DUP_ENTRY
        }
    }

    false
}

pub fn is_missing_reference(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql_err) = db.try_downcast_ref::<MySqlDatabaseError>() {
            return mysql_err.number() == 1452; // ER_NO_REFERENCED_ROW_2
        }
    }

    false
}

pub fn store_error(err: sqlx::Error) -> StoreError {
    if is_dup_key(&err) {
        return StoreError::Duplicate;
    }
    if is_missing_reference(&err) {
        return StoreError::MissingReference;
    }
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        e => StoreError::Persistence(e.to_string()),
    }
}
