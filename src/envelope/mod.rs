//! Response envelope subsystem.
//!
//! # Data Flow
//! ```text
//! raw response bytes
//!     → codec.rs (decode Envelope<T>)
//!     → codes.rs (code → meaning)
//!     → OK: typed body
//!     → other code: ErrorEnvelope (business error)
//!     → undecodable: ErrorEnvelope from raw bytes, else the fallback
//! ```
//!
//! # Design Decisions
//! - Pure transforms; identical bytes always give identical results
//! - Exactly one code means success
//! - Decode failures never escape as raw serde errors

pub mod codec;
pub mod codes;
pub mod types;

pub use codec::{decode, decode_no_body, CodecError};
pub use codes::{CodeMeaning, ResponseCode, ResponseCodeTable, OK_CODE, SYSTEM_ERROR_CODE};
pub use types::{Envelope, ErrorEnvelope, NoBodyEnvelope, FALLBACK_MESSAGE};
