//! The slider core: index ownership, measurement, partitioning and
//! navigation for one carousel.

pub mod config;
pub mod index;
pub mod measure;
pub mod navigation;
pub mod orchestrator;
pub mod partition;
pub mod targets;
pub mod throttle;

pub use config::{
    ClassNames, ComponentProps, ConfigError, IndexCallback, ItemClickHandler, ItemsPerPage,
    ModalClassNames, SharedOptions, SliderProps, ThrottleConfig,
};
pub use index::{IndexController, OwnershipMode};
pub use measure::{AxisDimensionMeasurer, Dimensions};
pub use navigation::{
    BoundaryPolicy, IndexChange, NavButton, NavigationAction, NavigationRequest,
    NavigationTarget, NavigationTrigger, NavigationTriggers, DRAG_THRESHOLD,
};
pub use orchestrator::{SlideView, SliderOrchestrator, SliderView};
pub use partition::{partition_items, ChildPartitioner, ContentPartition, SlideItem};
pub use targets::AnimationTargetRegistry;
pub use throttle::Throttle;
