//! Plugins shipped with sheetloc and registered by
//! [`PluginRegistry::with_builtins`](super::PluginRegistry::with_builtins).

pub mod fallback;
pub mod non_breaking_space;
pub mod split;

use super::{Plugin, PluginRegistry};

pub use fallback::FallbackPlugin;
pub use non_breaking_space::NonBreakingSpacePlugin;
pub use split::SplitPlugin;

pub(crate) fn register_all(registry: &mut PluginRegistry) {
    registry.register(fallback::NAME, |options, meta| {
        FallbackPlugin::from_options(options, meta).map(|p| Box::new(p) as Box<dyn Plugin>)
    });
    registry.register(non_breaking_space::NAME, |options, _meta| {
        NonBreakingSpacePlugin::from_options(options).map(|p| Box::new(p) as Box<dyn Plugin>)
    });
    registry.register(split::NAME, |options, _meta| {
        SplitPlugin::from_options(options).map(|p| Box::new(p) as Box<dyn Plugin>)
    });
}
