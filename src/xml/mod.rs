pub mod convert;
pub mod namespace;
pub mod record;

pub use convert::convert;
pub use namespace::{NamespaceBinding, NamespaceContext};
pub use record::{KeyStyle, NestedRecord, RecordValue};
