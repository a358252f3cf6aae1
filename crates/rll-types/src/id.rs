//! Identifier rules shared by every entity kind.

use crate::error::TypeError;

/// Keys starting with this prefix belong to the index collections.
pub const RESERVED_PREFIX: char = '_';

/// Check that `id` can be used as an entity key.
///
/// Entity ids double as storage keys, so they must be non-empty and must not
/// collide with the index namespace.
pub fn validate_entity_id(field: &'static str, id: &str) -> Result<(), TypeError> {
    if id.is_empty() {
        return Err(TypeError::EmptyField { field });
    }
    if id.starts_with(RESERVED_PREFIX) {
        return Err(TypeError::ReservedId(id.to_string()));
    }
    Ok(())
}
