pub mod adapter;
pub mod locales;

pub use adapter::{FakeRsAdapter, FakerKind};
pub use locales::LocaleKey;
