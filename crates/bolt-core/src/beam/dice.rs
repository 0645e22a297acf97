//! Damage dice and power formulas
//!
//! Catalog entries describe damage and accuracy as small data formulas of
//! the caster's power, evaluated when a bolt is configured.

use serde::{Deserialize, Serialize};

use crate::consts::AUTOMATIC_HIT;
use crate::rng::GameRng;

/// `num` dice of `size` sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DiceDef {
    pub num: i32,
    pub size: i32,
}

impl DiceDef {
    pub const fn new(num: i32, size: i32) -> Self {
        Self { num, size }
    }

    pub fn roll(&self, rng: &mut GameRng) -> i32 {
        rng.roll_dice(self.num, self.size)
    }

    pub const fn max(&self) -> i32 {
        if self.num <= 0 || self.size <= 0 {
            0
        } else {
            self.num * self.size
        }
    }
}

impl core::fmt::Display for DiceDef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}d{}", self.num, self.size)
    }
}

/// Spread `max_damage` over `num` dice, rounding the remainder randomly
pub fn calc_dice(num: i32, max_damage: i32, rng: &mut GameRng) -> DiceDef {
    if num <= 1 {
        DiceDef::new(1, max_damage)
    } else if max_damage <= num {
        DiceDef::new(max_damage, 1)
    } else {
        let extra = i32::from(rng.x_chance_in_y(max_damage % num, num));
        DiceDef::new(num, max_damage / num + extra)
    }
}

/// Damage as a function of power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DamageFormula {
    /// Leaves prior damage untouched
    #[default]
    None,
    /// `num` dice of `adder + power * mult_num / mult_denom`
    Dice {
        num: i32,
        adder: i32,
        mult_num: i32,
        mult_denom: i32,
    },
    /// [`calc_dice`] over a maximum of `adder + power * mult_num / mult_denom`
    CalcDice {
        num: i32,
        adder: i32,
        mult_num: i32,
        mult_denom: i32,
    },
}

impl DamageFormula {
    pub const fn dice(num: i32, adder: i32, mult_num: i32, mult_denom: i32) -> Self {
        DamageFormula::Dice {
            num,
            adder,
            mult_num,
            mult_denom,
        }
    }

    pub const fn calc(num: i32, adder: i32, mult_num: i32, mult_denom: i32) -> Self {
        DamageFormula::CalcDice {
            num,
            adder,
            mult_num,
            mult_denom,
        }
    }

    /// `None` when the formula leaves damage alone
    pub fn evaluate(&self, power: i32, rng: &mut GameRng) -> Option<DiceDef> {
        match *self {
            DamageFormula::None => None,
            DamageFormula::Dice {
                num,
                adder,
                mult_num,
                mult_denom,
            } => Some(DiceDef::new(num, adder + scale(power, mult_num, mult_denom))),
            DamageFormula::CalcDice {
                num,
                adder,
                mult_num,
                mult_denom,
            } => Some(calc_dice(
                num,
                adder + scale(power, mult_num, mult_denom),
                rng,
            )),
        }
    }
}

/// To-hit, or enchantment power for enchantments, as a function of power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToHitFormula {
    #[default]
    None,
    Linear {
        adder: i32,
        mult_num: i32,
        mult_denom: i32,
    },
}

impl ToHitFormula {
    pub const AUTOMATIC: ToHitFormula = ToHitFormula::flat(AUTOMATIC_HIT);

    pub const fn flat(value: i32) -> Self {
        ToHitFormula::Linear {
            adder: value,
            mult_num: 0,
            mult_denom: 1,
        }
    }

    pub const fn linear(adder: i32, mult_num: i32, mult_denom: i32) -> Self {
        ToHitFormula::Linear {
            adder,
            mult_num,
            mult_denom,
        }
    }

    pub fn evaluate(&self, power: i32) -> Option<i32> {
        match *self {
            ToHitFormula::None => None,
            ToHitFormula::Linear {
                adder,
                mult_num,
                mult_denom,
            } => Some(adder + scale(power, mult_num, mult_denom)),
        }
    }
}

fn scale(power: i32, mult_num: i32, mult_denom: i32) -> i32 {
    if mult_denom == 0 {
        0
    } else {
        power * mult_num / mult_denom
    }
}
