#![allow(dead_code)]

pub mod workspace;
