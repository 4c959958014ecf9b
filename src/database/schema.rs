// Database schema definitions
// The portal keeps every table in one SQLite schema file.

pub const INITIAL_SCHEMA: &str = include_str!("../../migrations/001_initial_schema.sql");
