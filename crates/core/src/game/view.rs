//! Read-only queries for the presentation layer: cursor look, shown intents, and the
//! threat overlay. Nothing here mutates state.

use super::*;
use crate::game::pathfinding::reachable_within;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookInfo {
    pub tile: String,
    pub entities: Vec<String>,
}

impl Game {
    /// What the cursor shows at `pos`. Entities are only reported on visible cells.
    pub fn look(&self, pos: Pos) -> LookInfo {
        let map = &self.state.map;
        let known = map.is_visible(pos) || map.is_explored(pos) || map.is_mapped(pos);
        let tile = if known { map.tile_at(pos).def().name.to_string() } else { "unknown".to_string() };
        let mut entities = Vec::new();
        if map.is_visible(pos) {
            let mut actors: Vec<&Actor> =
                self.state.actors.values().filter(|actor| actor.pos == pos).collect();
            actors.sort_by_key(|actor| actor.id);
            entities.extend(actors.iter().map(|actor| format!("{} ({})", actor.name, actor.glyph())));
            let mut items: Vec<&Item> =
                self.state.items.values().filter(|item| item.pos == pos).collect();
            items.sort_by_key(|item| item.id);
            for item in items {
                let name = self
                    .state
                    .world
                    .identities
                    .display_name(item.letter)
                    .unwrap_or_else(|_| "?".to_string());
                entities.push(format!("'{}' {}", item.letter, name));
            }
        }
        LookInfo { tile, entities }
    }

    /// Planned enemy moves, shown only while the body spells a word.
    pub fn intents(&self) -> Vec<(EntityId, Pos, Vec<Intent>)> {
        if !self.state.word_mode {
            return Vec::new();
        }
        self.state
            .non_player_ids()
            .into_iter()
            .filter_map(|id| self.state.actors.get(id))
            .filter(|actor| !actor.intent.is_empty())
            .map(|actor| (actor.id, actor.pos, actor.intent.clone()))
            .collect()
    }

    /// Outside word mode: every cell a visible, awake enemy could step onto or strike
    /// next turn.
    pub fn threat_overlay(&self) -> BTreeSet<Pos> {
        let mut cells = BTreeSet::new();
        if self.state.word_mode {
            return cells;
        }
        let map = &self.state.map;
        for id in self.state.non_player_ids() {
            let Some(actor) = self.state.actors.get(id) else {
                continue;
            };
            let hunting = matches!(actor.ai, Some(AiMode::Hostile { awake: true, .. }));
            if !hunting || !map.is_visible(actor.pos) || actor.is_petrified() {
                continue;
            }
            if actor.has_status(StatusKind::PhasedOut) {
                continue;
            }
            let blocked = self.crowded_cells(id);
            for pos in reachable_within(map, &blocked, actor.pos, actor.move_speed) {
                cells.insert(pos);
                cells.extend(pos.neighbors8().into_iter().filter(|n| map.in_bounds(*n)));
            }
        }
        cells
    }
}
