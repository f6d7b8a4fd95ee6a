//! `mockall` doubles of the store capabilities, for handler tests.

pub mod repositories;
