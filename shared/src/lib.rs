pub mod auth;
pub mod error;
pub mod mail;
pub mod models;


// Test utilities - publicly exposed with test feature
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
