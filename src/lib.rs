#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod link;
pub mod sch1;
