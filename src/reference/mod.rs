pub mod stream;

pub use stream::ReferenceStream;
