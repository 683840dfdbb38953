//! `vitrine-api` — HTTP boundary for the checkout and stock core.

pub mod app;
