//! Clouds left behind by bolts and blasts

use super::explosion::ExplosionMap;
use super::fire::Traversal;
use super::flavour::{BoltTag, Flavour};
use super::report::RangeCost;
use crate::consts::{CLOUD_QUENCH_COST, MAX_EXPLOSION_RADIUS};
use crate::dungeon::{Cloud, CloudKind, Coord, Terrain};
use crate::world::MsgChannel;

impl Traversal<'_, '_> {
    fn put_cloud(&mut self, pos: Coord, kind: CloudKind, duration: i32) {
        let source = self.bolt.thrower.actor_id(&*self.world);
        self.world
            .place_cloud(pos, Cloud::new(kind, duration).with_source(source));
    }

    /// Steam where heat meets water or cold meets lava
    fn makes_steam(&self, terrain: Terrain) -> bool {
        let flavour = self.bolt.flavour;
        (terrain == Terrain::Lava && flavour == Flavour::Cold)
            || (terrain.is_watery() && flavour.is_fiery())
    }

    /// Interact with and leave clouds on a cell the bolt passes through
    pub(crate) fn place_path_clouds(&mut self, pos: Coord) -> RangeCost {
        if self.bolt.in_explosion_phase {
            self.place_explosion_clouds(pos);
            return RangeCost::NONE;
        }

        if let Some(cloud) = self.world.cloud_at(pos) {
            if self.bolt.flavour == Flavour::Polymorph {
                let kind = self
                    .env
                    .rng
                    .choose(&CloudKind::ALL)
                    .copied()
                    .unwrap_or(cloud.kind);
                self.world.place_cloud(pos, Cloud { kind, ..cloud });
                self.bolt.obvious_effect = true;
            }

            if self.bolt.is_enchantment() {
                return RangeCost::NONE;
            }

            let flavour = self.bolt.flavour;
            let quenched = (cloud.kind == CloudKind::Cold
                && matches!(flavour, Flavour::Fire | Flavour::Lava))
                || (cloud.kind == CloudKind::Fire && flavour == Flavour::Cold);
            if quenched {
                self.say(MsgChannel::Sound, "You hear a sizzling sound!");
                self.world.remove_cloud(pos);
                return RangeCost::Extra(CLOUD_QUENCH_COST);
            }
        }

        let terrain = self.world.terrain(pos);
        let steam = self.makes_steam(terrain);
        let flavour = self.bolt.flavour;
        let tag = self.bolt.tag;
        let size = self.bolt.damage.num * self.bolt.damage.size;
        let rng = &mut *self.env.rng;

        let placed = if tag == Some(BoltTag::BlastOfPoison) {
            Some((CloudKind::Poison, rng.random2(4) + 2))
        } else if steam {
            Some((CloudKind::Steam, 2 + rng.random2(5)))
        } else if terrain.is_watery() && flavour == Flavour::Cold && size > 35 {
            Some((CloudKind::Cold, size / 30 + 1))
        } else if tag == Some(BoltTag::GreatBlastOfCold) {
            Some((CloudKind::Cold, rng.random2(5) + 3))
        } else if tag == Some(BoltTag::BallOfSteam) {
            Some((CloudKind::Steam, rng.random2(5) + 2))
        } else if flavour == Flavour::Miasma {
            Some((CloudKind::Miasma, rng.random2(5) + 2))
        } else if tag == Some(BoltTag::PoisonGas) {
            Some((CloudKind::Poison, rng.random2(4) + 3))
        } else {
            None
        };

        if let Some((kind, duration)) = placed {
            self.put_cloud(pos, kind, duration);
        }
        RangeCost::NONE
    }

    /// Clouds a blast leaves on each cell it covers
    pub(crate) fn place_explosion_clouds(&mut self, pos: Coord) {
        if self.makes_steam(self.world.terrain(pos)) {
            let duration = 2 + self.env.rng.random2(5);
            self.put_cloud(pos, CloudKind::Steam, duration);
            return;
        }

        let power = self.bolt.ench_power;
        let rng = &mut *self.env.rng;
        let placed = match self.bolt.tag {
            Some(BoltTag::IceStorm) => Some((CloudKind::Cold, 2 + rng.random2avg(5, 2))),
            Some(BoltTag::StinkingCloud) => {
                let duration = 1 + rng.random2(4) + rng.random2(power / 50 + 1);
                Some((CloudKind::Stink, duration))
            }
            Some(BoltTag::GreatBlastOfFire) => {
                let mut duration = 1 + rng.random2(5) + rng.roll_dice(2, power / 5);
                if duration > 20 {
                    duration = 20 + rng.random2(4);
                }
                Some((CloudKind::Fire, duration))
            }
            _ => None,
        };
        if let Some((kind, duration)) = placed {
            self.put_cloud(pos, kind, duration);
        }
    }

    /// Scatter `size` cells of cloud around `centre`, nearest first
    ///
    /// Spreads like an explosion (walls stop it) and picks the first open
    /// cells in ring order. Each cell lasts `3 + 3 draws of random2(pow/4)`.
    pub(crate) fn big_cloud(
        &mut self,
        kind: CloudKind,
        centre: Coord,
        pow: i32,
        size: i32,
    ) -> Vec<Coord> {
        let wanted = size.max(0) as usize;
        let mut radius = 1;
        let cells = loop {
            let map = ExplosionMap::discover_with(&*self.world, centre, radius, |_| false);
            let open: Vec<Coord> = map
                .ring_order(false)
                .into_iter()
                .map(|offset| centre + offset)
                .filter(|c| !self.world.is_solid(*c))
                .take(wanted)
                .collect();
            if open.len() >= wanted || radius >= MAX_EXPLOSION_RADIUS {
                break open;
            }
            radius += 1;
        };

        for cell in &cells {
            let rng = &mut *self.env.rng;
            let duration = 3 + (0..3).map(|_| rng.random2(pow / 4)).sum::<i32>();
            self.put_cloud(*cell, kind, duration);
        }
        cells
    }
}
