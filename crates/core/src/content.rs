//! Hardcoded content tables: enemy templates, letter item templates, and the letter
//! frequency table the identity registry stratifies by.
//! This module exists so generator and rules code can look content up by key.
//! It does not own per-run identity assignment; see `identity`.

use serde::{Deserialize, Serialize};

use crate::types::{Stat, StatusKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Rat,
    Bat,
    Newt,
    Beetle,
    Spider,
    Wolf,
    Ogre,
    Wraith,
    Golem,
    Wyrm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyTemplate {
    pub kind: EnemyKind,
    pub name: &'static str,
    pub health: i32,
    pub move_speed: u32,
    pub drop_tier: u8,
    pub is_boss: bool,
}

const ENEMIES: [EnemyTemplate; 10] = [
    EnemyTemplate { kind: EnemyKind::Rat, name: "rat", health: 1, move_speed: 1, drop_tier: 0, is_boss: false },
    EnemyTemplate { kind: EnemyKind::Bat, name: "bat", health: 1, move_speed: 2, drop_tier: 0, is_boss: false },
    EnemyTemplate { kind: EnemyKind::Newt, name: "newt", health: 2, move_speed: 1, drop_tier: 1, is_boss: false },
    EnemyTemplate { kind: EnemyKind::Beetle, name: "beetle", health: 3, move_speed: 1, drop_tier: 1, is_boss: false },
    EnemyTemplate { kind: EnemyKind::Spider, name: "spider", health: 2, move_speed: 2, drop_tier: 1, is_boss: false },
    EnemyTemplate { kind: EnemyKind::Wolf, name: "wolf", health: 4, move_speed: 2, drop_tier: 2, is_boss: false },
    EnemyTemplate { kind: EnemyKind::Ogre, name: "ogre", health: 6, move_speed: 1, drop_tier: 2, is_boss: false },
    EnemyTemplate { kind: EnemyKind::Wraith, name: "wraith", health: 4, move_speed: 1, drop_tier: 3, is_boss: false },
    EnemyTemplate { kind: EnemyKind::Golem, name: "golem", health: 8, move_speed: 1, drop_tier: 3, is_boss: false },
    EnemyTemplate { kind: EnemyKind::Wyrm, name: "wyrm", health: 9, move_speed: 1, drop_tier: 3, is_boss: true },
];

pub fn enemy_template(kind: EnemyKind) -> &'static EnemyTemplate {
    // ENEMIES is laid out in EnemyKind declaration order.
    &ENEMIES[kind as usize]
}

pub const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

pub fn is_vowel(letter: char) -> bool {
    VOWELS.contains(&letter)
}

/// Relative frequency of each consonant in English text, per mille.
pub const CONSONANT_FREQUENCIES: [(char, u32); 21] = [
    ('b', 15),
    ('c', 28),
    ('d', 43),
    ('f', 22),
    ('g', 20),
    ('h', 61),
    ('j', 2),
    ('k', 8),
    ('l', 40),
    ('m', 24),
    ('n', 67),
    ('p', 19),
    ('q', 1),
    ('r', 60),
    ('s', 63),
    ('t', 91),
    ('v', 10),
    ('w', 24),
    ('x', 2),
    ('y', 20),
    ('z', 1),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
}

impl Rarity {
    pub const ALL: [Rarity; 3] = [Rarity::Common, Rarity::Uncommon, Rarity::Rare];

    /// Corpse drop tiers 1..=3 map onto rarities; tier 0 drops vowels instead.
    pub fn from_drop_tier(tier: u8) -> Option<Rarity> {
        match tier {
            0 => None,
            1 => Some(Rarity::Common),
            2 => Some(Rarity::Uncommon),
            _ => Some(Rarity::Rare),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdibleEffect {
    /// Vowels: tasty, nothing else.
    Flavour,
    /// Permanent +1 to the item's stat affinity.
    Nourish,
    Phase,
    Boost(Stat),
    Clairvoyance,
    PetrifySelf,
    Regrow,
    IdentifyBody,
    ConfuseAdjacent,
    Shatter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpitEffect {
    /// Damage the target; the letter lands on the floor.
    Splat { damage: i32 },
    /// Damage the target; the letter dissolves.
    Acid { damage: i32 },
    Petrify,
    Confuse,
    PhaseOut,
    Decoy,
}

impl SpitEffect {
    pub fn lands(self) -> bool {
        matches!(self, SpitEffect::Splat { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemTemplate {
    pub name: &'static str,
    pub rarity: Rarity,
    pub affinity: Stat,
    pub edible: EdibleEffect,
    pub spit: SpitEffect,
}

const fn template(
    name: &'static str,
    rarity: Rarity,
    affinity: Stat,
    edible: EdibleEffect,
    spit: SpitEffect,
) -> ItemTemplate {
    ItemTemplate { name, rarity, affinity, edible, spit }
}

pub const ITEM_TEMPLATES: [ItemTemplate; 21] = [
    template("bitter root", Rarity::Common, Stat::Bile, EdibleEffect::Nourish, SpitEffect::Splat { damage: 1 }),
    template("sour gland", Rarity::Common, Stat::Bile, EdibleEffect::Boost(Stat::Bile), SpitEffect::Acid { damage: 2 }),
    template("grey moss", Rarity::Common, Stat::Tail, EdibleEffect::Phase, SpitEffect::Splat { damage: 1 }),
    template("dull pebble", Rarity::Common, Stat::Tail, EdibleEffect::PetrifySelf, SpitEffect::Petrify),
    template("tangle weed", Rarity::Common, Stat::Mind, EdibleEffect::ConfuseAdjacent, SpitEffect::Confuse),
    template("fern curl", Rarity::Common, Stat::Tong, EdibleEffect::Boost(Stat::Tong), SpitEffect::Splat { damage: 2 }),
    template("ash flake", Rarity::Common, Stat::Mind, EdibleEffect::Regrow, SpitEffect::Splat { damage: 1 }),
    template("glass shard", Rarity::Uncommon, Stat::Bile, EdibleEffect::Shatter, SpitEffect::Acid { damage: 3 }),
    template("wisp seed", Rarity::Uncommon, Stat::Mind, EdibleEffect::Phase, SpitEffect::PhaseOut),
    template("eye stalk", Rarity::Uncommon, Stat::Mind, EdibleEffect::Clairvoyance, SpitEffect::Splat { damage: 2 }),
    template("iron scale", Rarity::Uncommon, Stat::Tail, EdibleEffect::Boost(Stat::Tail), SpitEffect::Petrify),
    template("echo shell", Rarity::Uncommon, Stat::Tong, EdibleEffect::IdentifyBody, SpitEffect::Decoy),
    template("honey comb", Rarity::Uncommon, Stat::Tong, EdibleEffect::Nourish, SpitEffect::Confuse),
    template("ember husk", Rarity::Uncommon, Stat::Bile, EdibleEffect::Boost(Stat::Mind), SpitEffect::Acid { damage: 2 }),
    template("star fruit", Rarity::Rare, Stat::Tong, EdibleEffect::Clairvoyance, SpitEffect::PhaseOut),
    template("void pearl", Rarity::Rare, Stat::Mind, EdibleEffect::Phase, SpitEffect::Decoy),
    template("dragon tooth", Rarity::Rare, Stat::Bile, EdibleEffect::Shatter, SpitEffect::Acid { damage: 4 }),
    template("mirror eye", Rarity::Rare, Stat::Mind, EdibleEffect::IdentifyBody, SpitEffect::Petrify),
    template("thunder egg", Rarity::Rare, Stat::Tong, EdibleEffect::ConfuseAdjacent, SpitEffect::Splat { damage: 3 }),
    template("coil heart", Rarity::Rare, Stat::Tail, EdibleEffect::Boost(Stat::Tail), SpitEffect::Confuse),
    template("old bone", Rarity::Rare, Stat::Tail, EdibleEffect::Nourish, SpitEffect::Acid { damage: 3 }),
];

pub const VOWEL_SPIT: SpitEffect = SpitEffect::Splat { damage: 1 };

/// Base spit reach before the TONG bonus.
pub const BASE_SPIT_RANGE: i32 = 4;

/// Base durations before the MIND adjustment.
pub fn base_duration(status: StatusKind) -> i32 {
    match status {
        StatusKind::Phasing => 10,
        StatusKind::Petrified => 4,
        StatusKind::PhasedOut => 4,
        StatusKind::Boost(_) => 10,
        StatusKind::Ephemeral => 8,
    }
}

pub const CONFUSION_TURNS: i32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemy_table_matches_kind_order() {
        for template in ENEMIES {
            assert_eq!(enemy_template(template.kind).kind, template.kind);
        }
    }

    #[test]
    fn each_rarity_holds_a_third_of_the_templates() {
        for rarity in Rarity::ALL {
            let count = ITEM_TEMPLATES.iter().filter(|t| t.rarity == rarity).count();
            assert_eq!(count, 7, "{rarity:?}");
        }
        assert_eq!(ITEM_TEMPLATES.len(), CONSONANT_FREQUENCIES.len());
    }

    #[test]
    fn only_the_wyrm_is_a_boss() {
        let bosses: Vec<_> = ENEMIES.iter().filter(|t| t.is_boss).map(|t| t.kind).collect();
        assert_eq!(bosses, vec![EnemyKind::Wyrm]);
    }
}
