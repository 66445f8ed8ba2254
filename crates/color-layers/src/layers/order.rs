//! Export ordering of layers.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::decompose::Layer;
use crate::api::SeparateError;

/// Rule for the sequence layers are presented and exported in.
///
/// Serialized with kebab-case names; the identifiers `largeToSmall`,
/// `smallToLarge` and `randomOrder` are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderingPolicy {
    /// Highest coverage first.
    #[default]
    #[serde(alias = "largeToSmall", alias = "descending")]
    LargestFirst,
    /// Lowest coverage first.
    #[serde(alias = "smallToLarge", alias = "ascending")]
    SmallestFirst,
    /// Uniformly random permutation.
    #[serde(alias = "randomOrder")]
    Random,
}

impl OrderingPolicy {
    /// Canonical kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderingPolicy::LargestFirst => "largest-first",
            OrderingPolicy::SmallestFirst => "smallest-first",
            OrderingPolicy::Random => "random",
        }
    }
}

impl fmt::Display for OrderingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderingPolicy {
    type Err = SeparateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "largest-first" | "largeToSmall" | "descending" => Ok(OrderingPolicy::LargestFirst),
            "smallest-first" | "smallToLarge" | "ascending" => Ok(OrderingPolicy::SmallestFirst),
            "random" | "randomOrder" => Ok(OrderingPolicy::Random),
            other => Err(SeparateError::InvalidArgument(format!(
                "unknown ordering policy '{}' (expected largest-first, smallest-first or random)",
                other
            ))),
        }
    }
}

/// Arrange layers according to `policy`.
///
/// The result is a permutation of `layers`: same elements, none duplicated
/// or dropped. Both sorted policies are stable, so layers with equal
/// coverage keep their input order.
///
/// [`OrderingPolicy::Random`] draws from `rng`; pass a seeded generator for
/// reproducible output. With `None` the thread-local generator is used.
///
/// # Example
///
/// ```
/// use color_layers::{decompose, order, OrderingPolicy, PixelBuffer, Rgba};
///
/// let red = Rgba::opaque(255, 0, 0);
/// let blue = Rgba::opaque(0, 0, 255);
/// let layers = decompose(&PixelBuffer::new(3, 1, vec![red, red, blue]).unwrap());
///
/// let ordered = order(&layers, OrderingPolicy::SmallestFirst, None);
/// assert_eq!(ordered[0].color(), blue);
/// ```
pub fn order<'a>(
    layers: &'a [Layer],
    policy: OrderingPolicy,
    rng: Option<&mut dyn RngCore>,
) -> Vec<&'a Layer> {
    let coverages: Vec<usize> = layers.iter().map(Layer::coverage).collect();
    permutation(&coverages, policy, rng)
        .into_iter()
        .map(|i| &layers[i])
        .collect()
}

/// Owned variant of [`order`].
pub fn order_layers(
    layers: Vec<Layer>,
    policy: OrderingPolicy,
    rng: Option<&mut dyn RngCore>,
) -> Vec<Layer> {
    let coverages: Vec<usize> = layers.iter().map(Layer::coverage).collect();
    let perm = permutation(&coverages, policy, rng);
    let mut slots: Vec<Option<Layer>> = layers.into_iter().map(Some).collect();
    perm.into_iter().filter_map(|i| slots[i].take()).collect()
}

/// Index permutation for the given coverages.
fn permutation(
    coverages: &[usize],
    policy: OrderingPolicy,
    rng: Option<&mut dyn RngCore>,
) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..coverages.len()).collect();
    match policy {
        OrderingPolicy::LargestFirst => perm.sort_by(|&a, &b| coverages[b].cmp(&coverages[a])),
        OrderingPolicy::SmallestFirst => perm.sort_by(|&a, &b| coverages[a].cmp(&coverages[b])),
        OrderingPolicy::Random => match rng {
            Some(rng) => perm.shuffle(rng),
            None => perm.shuffle(&mut rand::thread_rng()),
        },
    }
    perm
}
