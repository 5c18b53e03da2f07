//! Prime-order subgroups of the multiplicative group of integers modulo a
//! prime, in which the Decisional Diffie-Hellman assumption is believed to
//! hold.

mod element;
mod group;
mod hash;

pub use element::{GroupElement, Scalar};
pub use group::DdhGroup;
pub use hash::HashToGroup;
