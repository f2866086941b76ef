//! Per-table database operations, each an `impl Database` block.

mod calendar_days;
mod notes;
