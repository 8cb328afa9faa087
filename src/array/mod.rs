//! Virtual views over typed buffers.
//!
//! A [`Selector`] describes which logical positions of a backing array are
//! visible and in which order. An [`ArrayView`] pairs a shared buffer with a
//! selector, so ranges, gathers and broadcasts never copy values.

mod column;
mod selector;
mod view;

pub use column::ColumnArray;
pub use selector::Selector;
pub use view::ArrayView;
