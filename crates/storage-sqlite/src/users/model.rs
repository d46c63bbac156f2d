//! Database model for users.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use tradeboard_core::users::User;

#[derive(Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub display_name: String,
    pub share_daily_returns: bool,
    pub share_full_portfolio: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            display_name: db.display_name,
            share_daily_returns: db.share_daily_returns,
            share_full_portfolio: db.share_full_portfolio,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
