//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! reach the domain.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::UserFields;

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub date_of_birth: NaiveDate,
}

/// Insertable and changeset struct carrying every writable column.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserWrite<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub username: &'a str,
    pub date_of_birth: NaiveDate,
}

impl<'a> From<&'a UserFields> for UserWrite<'a> {
    fn from(fields: &'a UserFields) -> Self {
        Self {
            first_name: fields.first_name(),
            last_name: fields.last_name(),
            username: fields.username(),
            date_of_birth: fields.date_of_birth(),
        }
    }
}
