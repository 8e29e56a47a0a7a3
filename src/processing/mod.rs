/*! Content processing

Contains structures and functions to aggregate and reshape already extracted data.
!*/
pub mod dedup;
pub mod split;
pub mod stats;
