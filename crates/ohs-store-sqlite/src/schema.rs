//! SQL schema for the compliance SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS employees (
    id          INTEGER PRIMARY KEY,
    full_name   TEXT NOT NULL,
    position    TEXT NOT NULL,
    section     TEXT,
    birth_date  TEXT,             -- YYYY-MM-DD
    address     TEXT
);

CREATE TABLE IF NOT EXISTS hazard_types (
    id                  INTEGER PRIMARY KEY,
    name                TEXT NOT NULL,
    periodicity_months  INTEGER NOT NULL DEFAULT 12 CHECK (periodicity_months > 0)
);

CREATE TABLE IF NOT EXISTS training_types (
    id                   INTEGER PRIMARY KEY,
    name                 TEXT NOT NULL,
    default_periodicity  INTEGER NOT NULL DEFAULT 12 CHECK (default_periodicity > 0)
);

-- periodicity_months is a per-employee snapshot; hazard catalog edits
-- overwrite it, training catalog defaults never do.
CREATE TABLE IF NOT EXISTS hazard_assignments (
    id                  INTEGER PRIMARY KEY,
    employee_id         INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    hazard_type_id      INTEGER NOT NULL REFERENCES hazard_types(id),
    periodicity_months  INTEGER NOT NULL CHECK (periodicity_months > 0),
    UNIQUE (employee_id, hazard_type_id)
);

CREATE TABLE IF NOT EXISTS training_assignments (
    id                  INTEGER PRIMARY KEY,
    employee_id         INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    training_type_id    INTEGER NOT NULL REFERENCES training_types(id),
    periodicity_months  INTEGER NOT NULL CHECK (periodicity_months > 0),
    UNIQUE (employee_id, training_type_id)
);

-- assignment_id points into hazard_assignments or training_assignments
-- depending on kind, so it carries no foreign key. Rows are removed
-- explicitly when their assignment goes.
CREATE TABLE IF NOT EXISTS compliance_records (
    id               INTEGER PRIMARY KEY,
    employee_id      INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    kind             TEXT NOT NULL CHECK (kind IN ('training', 'hazard')),
    assignment_id    INTEGER NOT NULL,
    last_date        TEXT,             -- YYYY-MM-DD
    document_number  TEXT,
    UNIQUE (employee_id, kind, assignment_id)
);

CREATE INDEX IF NOT EXISTS hazard_assignments_type_idx
    ON hazard_assignments(hazard_type_id);
CREATE INDEX IF NOT EXISTS training_assignments_employee_idx
    ON training_assignments(employee_id);
CREATE INDEX IF NOT EXISTS employees_position_idx ON employees(position);

PRAGMA user_version = 1;
";
