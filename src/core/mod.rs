// Schema-driven construction engine: descriptors, coercion, building, and errors.
pub mod builder;
pub mod error;
pub mod naming;
pub mod object;
pub mod registry;
pub mod scalar;
pub mod schema;
pub mod validate;
