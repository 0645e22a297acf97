//! Tracer and real runs
//!
//! A tracer is the same traversal run against a [`ShadowWorld`]: every
//! roll and every simulated change happens, but nothing reaches the real
//! level and nothing is narrated. What it leaves behind is the exposure
//! tally on the bolt, which the player prompt and monster AI decide on.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bolt::{Bolt, DontStop, Thrower};
use super::catalog::{ZapCatalog, ZapType};
use super::dice::DiceDef;
use super::enchant::{nasty_beam, nice_beam};
use super::explosion::{ExplosionOptions, explosion};
use super::fire::{Traversal, fire_beam};
use super::flavour::Flavour;
use super::report::TraversalReport;
use crate::actor::{Actor, ActorFlags, ActorId, Attitude};
use crate::error::Result;
use crate::world::{Decision, Env, FirePrompt, MsgChannel, PromptKind, ShadowWorld, World};

/// Prediction from one tracer run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracerOutcome {
    /// Whether the caller should go ahead with the real cast
    pub proceed: bool,
    pub report: TraversalReport,
}

/// Result of a full player zap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZapOutcome {
    /// A confirmation prompt was declined; nothing was cast
    Cancelled { tracer: TraversalReport },
    Fired {
        tracer: Option<TraversalReport>,
        report: TraversalReport,
    },
}

impl ZapOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ZapOutcome::Cancelled { .. })
    }

    /// The real run, if there was one
    pub fn report(&self) -> Option<&TraversalReport> {
        match self {
            ZapOutcome::Cancelled { .. } => None,
            ZapOutcome::Fired { report, .. } => Some(report),
        }
    }
}

impl Traversal<'_, '_> {
    /// Count an actor the tracer would reach and ask about friendly fire
    ///
    /// Returns true when the caller cancelled, which stops the bolt.
    pub(crate) fn expose(&mut self, id: ActorId) -> bool {
        let Some(actor) = self.actor(id).cloned() else {
            return false;
        };
        if actor.is_invisible() && !self.bolt.can_see_invis {
            return false;
        }

        let tally = if actor.attitude.aligned_with(self.bolt.attitude) {
            &mut self.bolt.friend_info
        } else {
            &mut self.bolt.foe_info
        };
        tally.count += 1;
        tally.power += actor.hit_dice;

        if !self.bolt.thrower.is_player() {
            return false;
        }
        let harmless = self.bolt.flavour.strategy().is_harmless(self.bolt, &actor);
        if harmless {
            return false;
        }

        let prompt = if self.is_thrower(id) {
            if self.bolt.aimed_at_feet || self.bolt.dont_stop.player {
                return false;
            }
            FirePrompt {
                kind: PromptKind::SelfHit,
                text: String::from("That beam is likely to hit you. Continue anyway?"),
            }
        } else {
            match actor.attitude {
                Attitude::Hostile => return false,
                Attitude::Friendly if self.bolt.dont_stop.friend => return false,
                Attitude::Neutral if self.bolt.dont_stop.foe => return false,
                Attitude::Friendly => FirePrompt {
                    kind: PromptKind::Ally { name: actor.the_name() },
                    text: format!("Really fire through {}?", actor.the_name()),
                },
                Attitude::Neutral => FirePrompt {
                    kind: PromptKind::Neutral { name: actor.the_name() },
                    text: format!("Really fire at {}?", actor.the_name()),
                },
            }
        };

        match self.env.confirm(&prompt) {
            Decision::Proceed => {
                match prompt.kind {
                    PromptKind::SelfHit => self.bolt.dont_stop.player = true,
                    PromptKind::Ally { .. } => self.bolt.dont_stop.friend = true,
                    PromptKind::Neutral { .. } => self.bolt.dont_stop.foe = true,
                }
                false
            }
            Decision::Cancel => {
                debug!(actor = %id, "tracer cancelled at prompt");
                self.bolt.cancelled = true;
                true
            }
        }
    }

    /// Record whether an affected actor was hurt or helped
    pub(crate) fn tally_effect(&mut self, actor: &Actor) {
        let nasty = nasty_beam(actor, self.bolt);
        let nice = nice_beam(actor, self.bolt);
        let tally = if actor.attitude.aligned_with(self.bolt.attitude) {
            &mut self.bolt.friend_info
        } else {
            &mut self.bolt.foe_info
        };
        if nasty {
            tally.hurt += 1;
        }
        if nice {
            tally.helped += 1;
        }
    }
}

/// Predict a player's cast, asking about friendly fire along the way
pub fn player_tracer(bolt: &mut Bolt, world: &dyn World, env: &mut Env<'_>) -> TracerOutcome {
    bolt.is_tracer = true;
    bolt.thrower = Thrower::Player;
    bolt.attitude = Attitude::Friendly;
    bolt.foe_ratio = 100;
    bolt.reset_tally();
    bolt.dont_stop = DontStop::default();

    let mut shadow = ShadowWorld::new(world);
    let report = fire_beam(bolt, &mut shadow, env);
    bolt.is_tracer = false;

    TracerOutcome {
        proceed: !bolt.cancelled,
        report,
    }
}

/// Predict a monster's cast and decide whether it is worth it
///
/// With `explode_only` the effect is treated as an explosion centred on
/// the bolt's target instead of a projectile.
pub fn fire_tracer(
    monster: ActorId,
    bolt: &mut Bolt,
    world: &dyn World,
    env: &mut Env<'_>,
    explode_only: bool,
) -> TracerOutcome {
    let Some(caster) = world.actor(monster) else {
        return TracerOutcome {
            proceed: false,
            report: TraversalReport::default(),
        };
    };

    bolt.source = caster.pos;
    bolt.thrower = Thrower::Monster(monster);
    bolt.can_see_invis = caster.flags.contains(ActorFlags::SEE_INVISIBLE);
    bolt.smart_monster = caster.flags.contains(ActorFlags::SMART);
    bolt.attitude = caster.attitude;
    if bolt.foe_ratio == 0 {
        bolt.foe_ratio = if caster.flags.contains(ActorFlags::SUMMONED) && bolt.attitude.wont_attack() {
            env.options.summoned_foe_ratio
        } else {
            env.options.monster_foe_ratio
        };
    }

    bolt.is_tracer = true;
    bolt.reset_tally();
    bolt.dont_stop = DontStop::default();

    let mut shadow = ShadowWorld::new(world);
    let report = if explode_only {
        let options = ExplosionOptions {
            hole: false,
            explode_in_wall: false,
            stop_at_statues: true,
            stop_at_walls: true,
            affect_items: false,
        };
        explosion(bolt, &mut shadow, env, options)
    } else {
        fire_beam(bolt, &mut shadow, env)
    };
    bolt.is_tracer = false;

    let proceed = mons_should_fire(bolt);
    debug!(
        monster = %monster,
        foes = bolt.foe_info.count,
        foe_power = bolt.foe_info.power,
        friends = bolt.friend_info.count,
        friend_power = bolt.friend_info.power,
        foe_ratio = bolt.foe_ratio,
        proceed,
        "monster tracer"
    );
    TracerOutcome { proceed, report }
}

/// Whether a monster's tracer result justifies firing
pub fn mons_should_fire(bolt: &Bolt) -> bool {
    let foe = bolt.foe_info;
    let friend = bolt.friend_info;
    if foe.count == 0 {
        return false;
    }
    if friend.count == 0 || !bolt.smart_monster {
        return true;
    }
    let needed = (bolt.foe_ratio * (foe.power + friend.power) + 99) / 100;
    foe.power >= needed
}

/// Configure, trace and fire one zap for the player
///
/// Catalog problems are returned after the (no-op) bolt has been fired,
/// matching what the player would see: the zap simply does nothing.
pub fn zapping(
    catalog: &ZapCatalog,
    zap: ZapType,
    power: i32,
    bolt: &mut Bolt,
    world: &mut dyn World,
    env: &mut Env<'_>,
    needs_tracer: bool,
) -> Result<ZapOutcome> {
    if bolt.range <= 0 {
        bolt.range = env.options.default_range;
    }
    bolt.hit = 0;
    bolt.damage = DiceDef::new(0, 0);
    bolt.flavour = Flavour::Magic;
    bolt.ench_power = power;
    bolt.is_beam = false;

    let inaccurate = bolt
        .thrower
        .actor_id(&*world)
        .and_then(|id| world.actor(id))
        .is_some_and(|a| a.flags.contains(ActorFlags::INACCURATE));
    let configured = catalog.configure(zap, power, bolt, inaccurate, env.rng);

    // the preview rolls from a copy so the real fire replays its rolls
    let tracer = if needs_tracer {
        let mut preview_rng = env.rng.clone();
        let mut preview = Env::new(
            &mut preview_rng,
            &mut *env.narration,
            &mut *env.prompter,
            env.options,
        );
        let outcome = player_tracer(bolt, &*world, &mut preview);
        if !outcome.proceed {
            return Ok(ZapOutcome::Cancelled {
                tracer: outcome.report,
            });
        }
        Some(outcome.report)
    } else {
        None
    };

    if zap == ZapType::Lightning {
        env.narration.emit(MsgChannel::Sound, "You hear a mighty clap of thunder!");
    }
    if bolt.flavour == Flavour::Digging {
        bolt.aimed_at_spot = false;
    }

    let report = fire_beam(bolt, world, env);
    configured.map(|()| ZapOutcome::Fired { tracer, report })
}
