//! lockstash-core: the encrypted credential database engine
//!
//! A vault is a single file protected by a master password. Opening it
//! yields a [`State`] — named groups of [`LoginInfo`] records — and saving
//! rewrites the whole file under fresh key material:
//!
//! ```text
//! save: state ─codec─► plaintext ─AES-CFB(K)─► E
//!       (password, salt) ─Argon2id─► P;  P wraps K and L
//!       HMAC-SHA-512(L, salt ‖ plaintext) ─► tag
//!       file = version ‖ salt ‖ wrapped keys ‖ tag ‖ E
//! ```
//!
//! Loading runs the pipeline in reverse, with the MAC gating decoding, so a
//! stolen file stays confidential and every modification is detected. The
//! engine is synchronous, stateless between calls, and touches nothing but
//! the target file and the OS random source.

pub mod codec;
pub mod db;
pub mod error;
pub mod model;

pub use lockstash_crypto as crypto;

pub use db::{read_database, write_database};
pub use error::{DbError, DbResult};
pub use model::{LoginInfo, State};
