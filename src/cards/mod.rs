//! The self-refreshing cards component: state owner, refresh policy, workers and rendering.

pub mod handle;
pub mod refresh;
pub mod render;
pub mod view;
pub(crate) mod workers;

#[cfg(test)]
pub(crate) mod test_support;
