//! Game implementations.

pub mod morpion;
