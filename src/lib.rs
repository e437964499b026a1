//! Purpose: Library crate backing the `botschema` CLI and integration tests.
//! Exports: `core` (descriptors, coercion, building, errors), `types`, `api`.
//! Role: Schema-driven decoding of bot protocol payloads into typed objects.
//! Invariants: Type descriptors are static data; building never mutates them.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
pub mod types;
