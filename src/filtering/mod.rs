/*! Filtering utilities

Filters operate on sentence level.

Filters implement [filter::Filter], [filter::FilterMut] or both:
- [filter::Filter] is implemented for filters that do not have state (see [sentence::Length] for example)
- [filter::FilterMut] is implemented for filters that do have state (see [sentence::Unique]).
! */
mod filter;
pub mod sentence;

pub use filter::Filter;
pub use filter::FilterMut;
pub use sentence::Validity;
