//! Player abilities: unlock state and the shared charge pool.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::DEFAULT_CHARGES;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum AbilityKind {
    ShadowBlock,
    MirrorBlock,
    AbyssFlame,
    ShadowTp,
}

impl AbilityKind {
    /// Charges one use costs. Mirrors are the expensive one.
    pub const fn charge_cost(self) -> u32 {
        match self {
            AbilityKind::MirrorBlock => 2,
            _ => 1,
        }
    }
}

/// Which abilities are unlocked and how many charges remain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySet {
    unlocked: HashSet<AbilityKind>,
    charges: u32,
    pub max_charges: u32,
}

impl Default for AbilitySet {
    fn default() -> Self {
        Self {
            unlocked: HashSet::new(),
            charges: DEFAULT_CHARGES,
            max_charges: DEFAULT_CHARGES,
        }
    }
}

impl AbilitySet {
    pub fn with_charges(max_charges: u32) -> Self {
        Self {
            unlocked: HashSet::new(),
            charges: max_charges,
            max_charges,
        }
    }

    pub fn charges(&self) -> u32 {
        self.charges
    }

    pub fn is_unlocked(&self, kind: AbilityKind) -> bool {
        self.unlocked.contains(&kind)
    }

    /// Returns whether the ability was newly unlocked.
    pub fn unlock(&mut self, kind: AbilityKind) -> bool {
        self.unlocked.insert(kind)
    }

    pub fn lock(&mut self, kind: AbilityKind) {
        self.unlocked.remove(&kind);
    }

    /// Spend the charges one use of `kind` costs.
    pub fn try_spend(&mut self, kind: AbilityKind) -> Result<(), crate::world::AbilityError> {
        use crate::world::AbilityError;

        if !self.is_unlocked(kind) {
            return Err(AbilityError::Locked);
        }
        let cost = kind.charge_cost();
        if self.charges < cost {
            return Err(AbilityError::NoCharges {
                needed: cost,
                available: self.charges,
            });
        }
        self.charges -= cost;
        Ok(())
    }

    /// Refund the cost of one use, e.g. when a placed block is destroyed.
    pub fn refund(&mut self, kind: AbilityKind) {
        self.charges = (self.charges + kind.charge_cost()).min(self.max_charges);
    }

    /// Back to a full pool (death reset).
    pub fn reset_charges(&mut self) {
        self.charges = self.max_charges;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::AbilityError;

    #[test]
    fn locked_ability_cannot_spend() {
        let mut set = AbilitySet::default();
        assert_eq!(
            set.try_spend(AbilityKind::ShadowBlock),
            Err(AbilityError::Locked)
        );
    }

    #[test]
    fn mirror_costs_double() {
        let mut set = AbilitySet::with_charges(3);
        set.unlock(AbilityKind::ShadowBlock);
        set.unlock(AbilityKind::MirrorBlock);

        set.try_spend(AbilityKind::MirrorBlock).unwrap();
        assert_eq!(set.charges(), 1);
        assert_eq!(
            set.try_spend(AbilityKind::MirrorBlock),
            Err(AbilityError::NoCharges {
                needed: 2,
                available: 1
            })
        );
        set.try_spend(AbilityKind::ShadowBlock).unwrap();
        assert_eq!(set.charges(), 0);
    }

    #[test]
    fn refund_never_exceeds_max() {
        let mut set = AbilitySet::with_charges(2);
        set.unlock(AbilityKind::ShadowBlock);
        set.try_spend(AbilityKind::ShadowBlock).unwrap();
        set.refund(AbilityKind::ShadowBlock);
        set.refund(AbilityKind::ShadowBlock);
        assert_eq!(set.charges(), 2);
    }
}
