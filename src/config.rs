//! Engine-wide tunables that are not per-entity state. Kept as an explicit,
//! constructed value rather than scattered hard-coded constants so callers
//! can run a table with house-rule baselines without recompiling.

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Floor every spawned entity's ability scores are clamped to
    /// (`World::spawn_entity` installs this via `AbilityBlock::apply_score_bounds`).
    pub default_score_min: i32,
    /// Ceiling every spawned entity's ability scores are clamped to.
    pub default_score_max: i32,
    /// Base walking speed, in feet, before any speed modifiers.
    pub base_walking_speed: i32,
    /// How many times damage dice are multiplied on a critical hit
    /// (`World::attack` threads this into `resolution::attack`/`dice::roll_damage`).
    pub critical_damage_multiplier: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_score_min: 1,
            default_score_max: 30,
            base_walking_speed: 30,
            critical_damage_multiplier: 2,
        }
    }
}
