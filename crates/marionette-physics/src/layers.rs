//! Collision layers
//!
//! Layers map onto rapier interaction groups: a collider is a member of
//! exactly one layer and queries filter by a mask of layers.

use rapier3d::prelude::{Group, InteractionGroups};
use serde::{Deserialize, Serialize};

/// Bit set of collision layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    /// Walkable world geometry
    pub const GROUND: LayerMask = LayerMask(1 << 0);
    /// The character's own body capsule
    pub const CHARACTER: LayerMask = LayerMask(1 << 1);
    /// Ragdoll bone colliders
    pub const RAGDOLL: LayerMask = LayerMask(1 << 2);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Check whether any layer is shared with `other`
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Combine two masks
    pub fn with(self, other: LayerMask) -> LayerMask {
        LayerMask(self.0 | other.0)
    }

    pub fn group(self) -> Group {
        Group::from_bits_truncate(self.0)
    }

    /// Layers a collider on this layer makes contact with. The character
    /// capsule and ragdoll bones overlap while switching modes, so they
    /// never touch each other.
    pub fn contact_filter(self) -> LayerMask {
        let mut filter = Self::ALL.0;
        if self.intersects(Self::RAGDOLL) {
            filter &= !Self::CHARACTER.0;
        }
        if self.intersects(Self::CHARACTER) {
            filter &= !Self::RAGDOLL.0;
        }
        LayerMask(filter)
    }

    /// Interaction groups for a collider living on this layer
    pub fn membership(self) -> InteractionGroups {
        InteractionGroups::new(self.group(), self.contact_filter().group())
    }

    /// Interaction groups for a query that only sees this mask
    pub fn query_groups(self) -> InteractionGroups {
        InteractionGroups::new(Group::ALL, self.group())
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::GROUND
    }
}
