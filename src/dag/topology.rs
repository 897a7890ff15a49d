// src/dag/topology.rs

use rand::Rng;

use crate::dag::fork_join::{self, ForkJoinParams};
use crate::dag::graph::TaskGraph;
use crate::dag::layered::{self, LayeredParams};
use crate::errors::Result;
use crate::types::TopologyKind;

/// A topology algorithm together with its shape parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Topology {
    Layered(LayeredParams),
    ForkJoin(ForkJoinParams),
}

impl Default for Topology {
    fn default() -> Self {
        Topology::Layered(LayeredParams::default())
    }
}

impl Topology {
    pub fn kind(&self) -> TopologyKind {
        match self {
            Topology::Layered(_) => TopologyKind::Layered,
            Topology::ForkJoin(_) => TopologyKind::ForkJoin,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Topology::Layered(p) => p.validate(),
            Topology::ForkJoin(p) => p.validate(),
        }
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TaskGraph> {
        match self {
            Topology::Layered(p) => layered::generate(rng, p),
            Topology::ForkJoin(p) => fork_join::generate(rng, p),
        }
    }
}
