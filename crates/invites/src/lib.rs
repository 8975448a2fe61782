//! Invite codes.
//!
//! Registration is gated by a single-use code. This crate holds the record and
//! the deterministic consumability rule; the atomic 0 → 1 flip belongs to the
//! registry adapter.

pub mod invite;

pub use invite::{CODE_MAX_LEN, DEFAULT_TTL_DAYS, InviteCode, InviteRejection};
