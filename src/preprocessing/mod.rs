//! Feature preprocessing
//!
//! - [`OneHotEncoder`]: indicator encoding of categorical columns with an
//!   all-zero fallback for unseen categories
//! - [`ColumnTransformer`]: encoded categoricals followed by passthrough
//!   numericals, in a layout fixed at fit time

mod encoder;
mod pipeline;

pub use encoder::OneHotEncoder;
pub use pipeline::ColumnTransformer;
