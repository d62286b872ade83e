//! Integration tests for fuel-scout

mod scrape_tests;
