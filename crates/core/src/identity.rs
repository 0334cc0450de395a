//! Per-run letter identities.
//! This module exists to own the letter -> item template bijection and the shared
//! "identified" flag every instance of a letter consults.
//! It does not own item placement or effect resolution.

use std::collections::BTreeMap;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::content::{CONSONANT_FREQUENCIES, ITEM_TEMPLATES, ItemTemplate, Rarity, VOWELS};
use crate::error::GameError;
use crate::mapgen::seed::{mix_seed_stream, roll};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityKind {
    Vowel,
    Consonant { template: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub kind: IdentityKind,
    pub identified: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRegistry {
    entries: BTreeMap<char, Identity>,
}

impl IdentityRegistry {
    pub fn get(&self, letter: char) -> Result<&Identity, GameError> {
        self.entries.get(&letter).ok_or(GameError::MissingIdentity(letter))
    }

    /// The template behind a consonant; `None` for vowels.
    pub fn template(&self, letter: char) -> Result<Option<&'static ItemTemplate>, GameError> {
        match self.get(letter)?.kind {
            IdentityKind::Vowel => Ok(None),
            IdentityKind::Consonant { template } => ITEM_TEMPLATES
                .get(template)
                .map(Some)
                .ok_or(GameError::MissingIdentity(letter)),
        }
    }

    pub fn is_identified(&self, letter: char) -> bool {
        self.entries.get(&letter).is_some_and(|identity| identity.identified)
    }

    /// Returns true when this call revealed the letter.
    pub fn identify(&mut self, letter: char) -> Result<bool, GameError> {
        let identity = self.entries.get_mut(&letter).ok_or(GameError::MissingIdentity(letter))?;
        let newly = !identity.identified;
        identity.identified = true;
        Ok(newly)
    }

    /// Display name: the template name once identified, otherwise a placeholder.
    pub fn display_name(&self, letter: char) -> Result<String, GameError> {
        match self.template(letter)? {
            None => Ok(format!("vowel '{letter}'")),
            Some(template) if self.is_identified(letter) => Ok(template.name.to_string()),
            Some(_) => Ok(format!("unknown '{letter}'")),
        }
    }

    pub fn letters_of_rarity(&self, rarity: Rarity) -> Vec<char> {
        self.entries
            .iter()
            .filter_map(|(&letter, identity)| match identity.kind {
                IdentityKind::Consonant { template } => {
                    let matches = ITEM_TEMPLATES.get(template).is_some_and(|t| t.rarity == rarity);
                    matches.then_some(letter)
                }
                IdentityKind::Vowel => None,
            })
            .collect()
    }

    pub fn letters(&self) -> impl Iterator<Item = (char, &Identity)> {
        self.entries.iter().map(|(&letter, identity)| (letter, identity))
    }
}

/// Splits the frequency-weighted consonant pool into thirds: the most frequent letters
/// covering the first third of total weight are common, and so on.
pub fn frequency_tiers() -> BTreeMap<Rarity, Vec<char>> {
    let mut sorted = CONSONANT_FREQUENCIES.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let total: u32 = sorted.iter().map(|(_, weight)| weight).sum();

    let mut tiers: BTreeMap<Rarity, Vec<char>> = BTreeMap::new();
    let mut cumulative = 0_u32;
    for (letter, weight) in sorted {
        let rarity = if cumulative * 3 < total {
            Rarity::Common
        } else if cumulative * 3 < total * 2 {
            Rarity::Uncommon
        } else {
            Rarity::Rare
        };
        tiers.entry(rarity).or_default().push(letter);
        cumulative += weight;
    }
    tiers
}

pub fn generate_item_identities(run_seed: u64) -> IdentityRegistry {
    let mut rng = ChaCha8Rng::seed_from_u64(mix_seed_stream(run_seed, 0x1D));
    let mut pools = frequency_tiers();
    let mut assigned: BTreeMap<char, usize> = BTreeMap::new();
    let mut pending = Vec::new();

    for (index, template) in ITEM_TEMPLATES.iter().enumerate() {
        let pool = pools.entry(template.rarity).or_default();
        if pool.is_empty() {
            pending.push(index);
            continue;
        }
        let letter = pool.remove(roll(&mut rng, 0, pool.len() - 1));
        assigned.insert(letter, index);
    }

    let mut leftovers: Vec<char> = pools.into_values().flatten().collect();
    leftovers.sort_unstable();
    for index in pending {
        if leftovers.is_empty() {
            break;
        }
        let letter = leftovers.remove(roll(&mut rng, 0, leftovers.len() - 1));
        assigned.insert(letter, index);
    }

    let mut entries = BTreeMap::new();
    for vowel in VOWELS {
        entries.insert(vowel, Identity { kind: IdentityKind::Vowel, identified: true });
    }
    for (letter, template) in assigned {
        entries.insert(
            letter,
            Identity { kind: IdentityKind::Consonant { template }, identified: false },
        );
    }
    IdentityRegistry { entries }
}
