//! Terminal output for the `plotz` binary. Nothing in here touches the stores.

pub mod print;
