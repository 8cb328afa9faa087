pub mod column;
pub mod stream;
