#![deny(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone))]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(clippy::redundant_field_names)]
#![deny(clippy::needless_borrow)]
#![deny(clippy::manual_let_else)]
#![deny(clippy::unused_self)]
#![deny(clippy::unnecessary_wraps)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::print_stdout)]
#![deny(clippy::dbg_macro)]
#![deny(clippy::must_use_candidate)]
#![deny(clippy::len_without_is_empty)]
#![deny(clippy::wrong_self_convention)]
#![cfg_attr(not(test), no_std)]

//! Push-based reactive stream core.
//!
//! A [`Producer`](core::stage::Producer) is a deferred, re-subscribable source of signals. Subscribing
//! hands it a [`Consumer`](core::stage::Consumer), which guards the user handlers with a closed flag,
//! and yields the [`TeardownRegistry`](core::lifecycle::TeardownRegistry) that cancels the
//! subscription. Operators are built with [`Producer::lift`](core::stage::Producer::lift), which
//! keeps every upstream subscription of an operator chain under the caller's registry.

extern crate alloc;

pub mod core;
