//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly; regenerate them with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users.
    ///
    /// `username` carries the `users_username_key` unique constraint.
    users (id) {
        /// Serial primary key.
        id -> Int4,
        /// Given name (max 50 characters).
        first_name -> Varchar,
        /// Family name (max 50 characters).
        last_name -> Varchar,
        /// Unique handle (max 16 characters).
        username -> Varchar,
        /// Calendar date of birth.
        date_of_birth -> Date,
    }
}
