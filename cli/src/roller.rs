use engine::{ActorRoller, Advancement};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic stand-in for the actor's roll dialogs.
pub struct SeededRoller {
    rng: ChaCha8Rng,
}

impl SeededRoller {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn die(&mut self, faces: i32) -> i32 {
        self.rng.gen_range(1..=faces.max(1))
    }
}

impl ActorRoller for SeededRoller {
    fn roll_hit_points(&mut self, advancement: &Advancement, level: u32) -> i32 {
        let faces = advancement.hit_die_value();
        if level == 0 { faces } else { self.die(faces) }
    }

    fn roll_shield_points(&mut self, advancement: &Advancement, level: u32) -> i32 {
        let faces = advancement.hit_die_value();
        if level == 0 {
            // first die is maxed, the rest are rolled
            let extra = advancement.first_level_extra_dice();
            (0..extra).fold(faces, |acc, _| acc.saturating_add(self.die(faces)))
        } else {
            self.die(faces)
        }
    }
}
