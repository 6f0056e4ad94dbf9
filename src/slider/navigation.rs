//! Navigation triggers, actions, and the boundary policy.
//!
//! A [`NavigationTrigger`] names the *source* of an index change (drag, wheel,
//! keyboard, ...). It travels unchanged from the input that caused a request
//! through [`IndexChange`] to callbacks and the rendered view, so a renderer can
//! pick an animation style per source.

use std::fmt;
use std::str::FromStr;

use super::config::ConfigError;

// ---------------------------------------------------------------------------
// NavigationTrigger
// ---------------------------------------------------------------------------

/// The input source behind an index-change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationTrigger {
    /// Pointer drag / swipe across the container.
    Drag,
    /// Mouse wheel.
    Wheel,
    /// Key binding.
    Keyboard,
    /// Previous/next button click.
    Button,
    /// Click on a slide (opens the lightbox).
    ItemClick,
    /// Called from code, or a prop change.
    Programmatic,
}

impl NavigationTrigger {
    /// Triggers that can be switched on and off through [`NavigationTriggers`].
    pub const CONFIGURABLE: [NavigationTrigger; 4] = [
        NavigationTrigger::Drag,
        NavigationTrigger::Wheel,
        NavigationTrigger::Keyboard,
        NavigationTrigger::Button,
    ];

    /// Lowercase name used in option strings.
    pub fn name(self) -> &'static str {
        match self {
            NavigationTrigger::Drag => "drag",
            NavigationTrigger::Wheel => "wheel",
            NavigationTrigger::Keyboard => "keyboard",
            NavigationTrigger::Button => "button",
            NavigationTrigger::ItemClick => "item-click",
            NavigationTrigger::Programmatic => "programmatic",
        }
    }

    fn bit(self) -> u8 {
        match self {
            NavigationTrigger::Drag => 1,
            NavigationTrigger::Wheel => 2,
            NavigationTrigger::Keyboard => 4,
            NavigationTrigger::Button => 8,
            NavigationTrigger::ItemClick | NavigationTrigger::Programmatic => 0,
        }
    }
}

impl fmt::Display for NavigationTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NavigationTrigger {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drag" | "swipe" => Ok(NavigationTrigger::Drag),
            "wheel" | "scroll" => Ok(NavigationTrigger::Wheel),
            "keyboard" | "key" | "keys" => Ok(NavigationTrigger::Keyboard),
            "button" | "buttons" => Ok(NavigationTrigger::Button),
            "item-click" | "click" => Ok(NavigationTrigger::ItemClick),
            "programmatic" => Ok(NavigationTrigger::Programmatic),
            other => Err(ConfigError::UnknownTrigger(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// NavigationTriggers
// ---------------------------------------------------------------------------

/// The set of input sources that are allowed to produce navigation requests.
///
/// Item clicks and programmatic changes are always allowed; only the
/// [`NavigationTrigger::CONFIGURABLE`] sources can be turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigationTriggers(u8);

impl NavigationTriggers {
    /// No configurable trigger enabled.
    pub const NONE: NavigationTriggers = NavigationTriggers(0);
    /// Every configurable trigger enabled.
    pub const ALL: NavigationTriggers = NavigationTriggers(1 | 2 | 4 | 8);

    /// Add a trigger (builder).
    pub fn with(mut self, trigger: NavigationTrigger) -> Self {
        self.0 |= trigger.bit();
        self
    }

    /// Remove a trigger (builder).
    pub fn without(mut self, trigger: NavigationTrigger) -> Self {
        self.0 &= !trigger.bit();
        self
    }

    /// Whether requests from `trigger` are honored.
    pub fn allows(self, trigger: NavigationTrigger) -> bool {
        match trigger {
            NavigationTrigger::ItemClick | NavigationTrigger::Programmatic => true,
            other => self.0 & other.bit() != 0,
        }
    }

    /// Whether no configurable trigger is enabled.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for NavigationTriggers {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for NavigationTriggers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = NavigationTrigger::CONFIGURABLE
            .iter()
            .filter(|t| self.allows(**t))
            .map(|t| t.name())
            .collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for NavigationTriggers {
    type Err = ConfigError;

    /// Parses `"all"`, `"none"`, or a comma separated list such as `"drag,wheel"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => return Ok(Self::ALL),
            "none" | "" => return Ok(Self::NONE),
            _ => {}
        }
        s.split(',')
            .map(str::parse::<NavigationTrigger>)
            .try_fold(Self::NONE, |set, trigger| Ok(set.with(trigger?)))
    }
}

// ---------------------------------------------------------------------------
// NavigationTarget
// ---------------------------------------------------------------------------

/// Where navigation input is listened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NavigationTarget {
    /// Pointer input must land inside the slider container; keys need focus.
    #[default]
    Container,
    /// All input reaching the slider counts, wherever it lands.
    Window,
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationTarget::Container => f.write_str("container"),
            NavigationTarget::Window => f.write_str("window"),
        }
    }
}

impl FromStr for NavigationTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "container" | "slider" => Ok(NavigationTarget::Container),
            "window" | "document" => Ok(NavigationTarget::Window),
            other => Err(ConfigError::UnknownTarget(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// NavigationAction / NavigationRequest
// ---------------------------------------------------------------------------

/// What a navigation request asks for, relative to the active index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationAction {
    /// Back by one page (`index - items_per_page`).
    Previous,
    /// Forward by one page (`index + items_per_page`).
    Next,
    First,
    Last,
    GoTo(usize),
}

/// A navigation action together with the input source that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigationRequest {
    pub action: NavigationAction,
    pub trigger: NavigationTrigger,
}

impl NavigationRequest {
    pub fn new(action: NavigationAction, trigger: NavigationTrigger) -> Self {
        Self { action, trigger }
    }
}

/// The payload handed to index-change callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexChange {
    /// The normalized requested index; `None` clears the selection.
    pub index: Option<usize>,
    pub trigger: NavigationTrigger,
}

// ---------------------------------------------------------------------------
// Pointer input
// ---------------------------------------------------------------------------

/// Cells a pressed pointer has to travel along the slide axis before the
/// gesture counts as a drag rather than a click.
pub const DRAG_THRESHOLD: i32 = 2;

/// The previous/next buttons flanking the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavButton {
    Previous,
    Next,
}

impl NavButton {
    /// The action a click on this button requests.
    pub fn action(self) -> NavigationAction {
        match self {
            NavButton::Previous => NavigationAction::Previous,
            NavButton::Next => NavigationAction::Next,
        }
    }

    /// Glyph drawn on the button.
    pub fn glyph(self) -> &'static str {
        match self {
            NavButton::Previous => "<",
            NavButton::Next => ">",
        }
    }
}

// ---------------------------------------------------------------------------
// BoundaryPolicy
// ---------------------------------------------------------------------------

/// What happens when navigation runs past the first or last slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryPolicy {
    /// Saturate at the first/last slide.
    #[default]
    Clamp,
    /// Saturate first; a further step while already at an end jumps to the
    /// opposite end.
    Wrap,
}

impl BoundaryPolicy {
    /// Apply the policy to a raw target computed from `current`.
    ///
    /// The result may still be out of range under `Clamp`; the index
    /// controller's normalization does the final clamping.
    pub fn resolve(self, current: usize, requested: isize, count: usize) -> isize {
        if count == 0 {
            return requested;
        }
        let last = (count - 1) as isize;
        let current = current as isize;
        match self {
            BoundaryPolicy::Clamp => requested,
            BoundaryPolicy::Wrap if requested > last && current >= last => 0,
            BoundaryPolicy::Wrap if requested < 0 && current <= 0 => last,
            BoundaryPolicy::Wrap => requested,
        }
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryPolicy::Clamp => f.write_str("clamp"),
            BoundaryPolicy::Wrap => f.write_str("wrap"),
        }
    }
}

impl FromStr for BoundaryPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" | "saturate" => Ok(BoundaryPolicy::Clamp),
            "wrap" | "loop" => Ok(BoundaryPolicy::Wrap),
            other => Err(ConfigError::UnknownBoundaryPolicy(other.to_owned())),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
