// src/lib.rs

//! Internshala listing crawler library.
//!
//! Pages through internship and job listings, turns each listing card into a
//! normalized [`models::JobPost`], and stops once enough posts are collected.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
