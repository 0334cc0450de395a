//! Timed status effects: application, stacking, ticking, and expiry.
//! This module exists so every source of a status goes through the same merge rules.
//! It does not own what an effect does to movement or AI; those systems query the status.

use super::*;

/// Re-applying a status keeps the longer of the two timers.
pub(super) fn merge_duration(existing: u32, incoming: u32) -> u32 {
    existing.max(incoming)
}

/// MIND lengthens effects that help the caster and shortens ones that hurt them.
pub(super) fn scaled_duration(kind: StatusKind, mind: i32, harms_caster: bool) -> u32 {
    let base = content::base_duration(kind);
    let adjusted = if harms_caster { base - mind } else { base + mind };
    adjusted.max(1) as u32
}

impl Game {
    pub(super) fn apply_status(&mut self, target: EntityId, kind: StatusKind, duration: u32) {
        let Some(actor) = self.state.actors.get_mut(target) else {
            return;
        };
        let duration = match actor.statuses.iter_mut().find(|status| status.kind == kind) {
            Some(status) => {
                status.duration = merge_duration(status.duration, duration);
                status.duration
            }
            None => {
                actor.statuses.push(Status { kind, duration });
                duration
            }
        };
        let name = actor.name.clone();
        self.push_log(LogEvent::StatusApplied { target: name, status: kind, duration });
    }

    /// Extends an active status instead of merging; applies it fresh when absent.
    pub(super) fn strengthen_status(&mut self, target: EntityId, kind: StatusKind, amount: u32) {
        let extended = self
            .state
            .actors
            .get_mut(target)
            .and_then(|actor| actor.statuses.iter_mut().find(|status| status.kind == kind))
            .map(|status| {
                status.duration += amount;
                status.duration
            });
        match extended {
            Some(duration) => {
                let name = self.actor_name(target);
                self.push_log(LogEvent::StatusApplied { target: name, status: kind, duration });
            }
            None => self.apply_status(target, kind, amount),
        }
    }

    /// Counts every status down by one turn. Expired ephemeral actors leave the map.
    pub(super) fn tick_statuses(&mut self, target: EntityId) {
        let Some(actor) = self.state.actors.get_mut(target) else {
            return;
        };
        let mut expired = Vec::new();
        actor.statuses.retain_mut(|status| {
            status.duration = status.duration.saturating_sub(1);
            if status.duration == 0 {
                expired.push(status.kind);
                false
            } else {
                true
            }
        });
        let name = actor.name.clone();
        for kind in &expired {
            self.push_log(LogEvent::StatusExpired { target: name.clone(), status: *kind });
        }
        if expired.contains(&StatusKind::Ephemeral) {
            trace!(?target, "ephemeral actor dissipated");
            self.state.actors.remove(target);
        }
    }

    /// Duration for a status `caster` inflicts, scaled by the caster's MIND.
    pub(super) fn status_duration_from(&self, caster: EntityId, kind: StatusKind, target: EntityId) -> u32 {
        let mind = self.effective_stats(caster).mind;
        let harms_caster = caster == target && !kind.is_beneficial();
        scaled_duration(kind, mind, harms_caster)
    }
}
