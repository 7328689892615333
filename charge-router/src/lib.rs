//! EV charging route and ranking server.
//!
//! Answers: "Given where I am and what I care about, which charging
//! stations should I head for, and how far away are they by road graph?"

pub mod catalog;
pub mod domain;
pub mod error;
pub mod geodesy;
pub mod graph;
pub mod ranking;
pub mod scoring;
pub mod web;
