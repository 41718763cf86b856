//! # Route Modules
//!
//! | Path | Module | Guarded |
//! |---|---|---|
//! | `/health/*` | [`health`] | no |
//! | `/v1/accounts` | [`accounts`] | yes |

pub mod accounts;
pub mod health;
