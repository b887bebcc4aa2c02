//! contest-cache library
//!
//! A read-through cache over the clist.by contest listing. The binary is a
//! thin CLI over [`contests::ContestService`]; integration tests drive the
//! same modules.

pub mod cache;
pub mod cli;
pub mod config;
pub mod contests;
pub mod data;
pub mod display;
pub mod logging;
