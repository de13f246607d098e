//! Chain Tests
//!
//! End-to-end tests of queries against collection folders through the
//! public `bibliophant` API:
//! - parse and position rules of the four roles
//! - result threading and all-or-nothing execution
//! - persistence of committed queries across sessions
//! - complete workflows over the default command set

mod common;

mod persistence;
mod properties;
mod workflows;
