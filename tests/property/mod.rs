//! Property-based tests

mod cart_proptest;
mod filters_proptest;
mod router_proptest;
