//! Transit itinerary server.
//!
//! Answers two questions over a public-transit timetable: "what can I
//! catch soon from here toward there?" and "what is the fastest way from
//! A to B leaving at T?"

pub mod domain;
pub mod planner;
pub mod timetable;
pub mod walkable;
pub mod web;
