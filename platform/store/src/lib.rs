//! Contracts shared between the product slices and their storage backends.
//!
//! Product crates declare the store traits they consume; this crate holds the
//! pieces every slice agrees on: the error taxonomy surfaced to screens, the
//! typed validation report produced by forms, and the object-store seam used
//! for profile images.

mod error;
mod objects;
mod validation;

pub use error::{FALLBACK_MESSAGE, StoreError, StoreResult};
pub use objects::{HEADSHOT_BUCKET, ObjectStore, headshot_object_path, object_path_from_url};
pub use validation::{FieldError, ValidationErrors};
