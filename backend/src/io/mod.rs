//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain. Only a REST interface
//! exists; see [`rest`].

pub mod rest;
