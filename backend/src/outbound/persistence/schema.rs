//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. `diesel print-schema`
//! against a migrated database regenerates them.

diesel::table! {
    /// Heroes and their scalar attributes.
    ///
    /// `hero_name` carries the `heroes_hero_name_key` unique constraint.
    heroes (id) {
        /// Serial primary key.
        id -> Int4,
        #[max_length = 120]
        name -> Varchar,
        #[max_length = 120]
        hero_name -> Varchar,
        birth_date -> Timestamptz,
        height -> Float8,
        weight -> Float8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Read-only superpower catalogue.
    superpowers (id) {
        id -> Int4,
        #[max_length = 50]
        name -> Varchar,
        #[max_length = 250]
        description -> Varchar,
    }
}

diesel::table! {
    /// Hero to superpower links. Rows cascade when their hero is deleted.
    hero_superpowers (hero_id, superpower_id) {
        hero_id -> Int4,
        superpower_id -> Int4,
    }
}

diesel::table! {
    /// Applied catalogue seeds, keyed by seed name.
    catalog_seed_runs (seed_key) {
        #[max_length = 64]
        seed_key -> Varchar,
        hero_count -> Int4,
        seeded_at -> Timestamptz,
    }
}

diesel::joinable!(hero_superpowers -> heroes (hero_id));
diesel::joinable!(hero_superpowers -> superpowers (superpower_id));

diesel::allow_tables_to_appear_in_same_query!(
    catalog_seed_runs,
    heroes,
    hero_superpowers,
    superpowers
);
