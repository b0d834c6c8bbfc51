//! Operation pipeline for the curio platform.
//!
//! Functions in this crate are the platform's inbound actions: each takes
//! the caller's auth context, a store handle, and a request payload,
//! enforces preconditions, performs the store writes, and — where an
//! action changes a user's statistics — triggers achievement
//! re-evaluation as a best-effort side effect. HTTP bindings live in the
//! routing layer; nothing here knows about transport.

pub mod achievements;
pub mod admin;
pub mod collections;
pub mod community;
pub mod config;
pub mod context;
pub mod folders;
pub mod moderation;
pub mod search;
pub mod wishlist;
