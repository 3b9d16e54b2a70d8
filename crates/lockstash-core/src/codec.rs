//! Record codec: vault state ↔ bytes
//!
//! The serialized form is self-describing, so a decoder needs no external
//! schema, and decoding is total: any input that is not a valid encoding is
//! rejected as corrupt. Callers never see these bytes; they exist only as
//! the plaintext inside the database envelope.

use crate::error::{DbError, DbResult};
use crate::model::State;

/// Serialize the state. Cannot fail for well-formed states.
pub fn encode(state: &State) -> DbResult<Vec<u8>> {
    serde_json::to_vec(state).map_err(|_| DbError::CorruptDatabase)
}

/// Deserialize a state produced by [`encode`].
pub fn decode(bytes: &[u8]) -> DbResult<State> {
    serde_json::from_slice(bytes).map_err(|_| DbError::CorruptDatabase)
}
