pub mod serializer;
pub use serializer::{Params, Placeholder, Rendered, Serializer};
