//! Layout: taffy integration, node layout specs, hit testing, resize
//! notifications.

pub mod engine;
pub mod observer;
pub mod resolve;
pub mod spatial;

pub use engine::{GeometryQuery, LayoutEngine};
pub use observer::{ResizeHub, Subscription, ViewportEvent};
pub use resolve::{Direction, LayoutSpec, Length};
pub use spatial::SpatialMap;
