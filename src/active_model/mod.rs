//! Entity instance access for mutation commands.
//!
//! - **Value**: `ActiveValue`, a property value with its assignment state
//! - **Instance**: the `EntityInstance` capability and its plain-holder and
//!   change-tracking-proxy implementations
//!
//! # Examples
//!
//! ```no_run
//! use lifeguard_translate::{EntityInstance, PlainEntity, TrackedEntity};
//! use sea_query::Value;
//!
//! // Plain holder: every non-empty value is written
//! let order = PlainEntity::new("Order").with("CustomerId", Value::Int(Some(7)));
//! assert!(order.is_modified("CustomerId"));
//!
//! // Proxy: only explicitly assigned properties are written
//! let mut tracked = TrackedEntity::new("Order");
//! tracked.set("Note", Value::String(Some("rush".into())));
//! assert_eq!(tracked.modified_properties(), vec!["Note".to_string()]);
//! ```

pub mod instance;
pub mod value;

#[doc(inline)]
pub use instance::{EntityInstance, PlainEntity, TrackedEntity, TrackingKind};
#[doc(inline)]
pub use value::ActiveValue;
