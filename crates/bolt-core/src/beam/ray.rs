//! Discrete rays through the grid
//!
//! A ray is a stack of straight segments. Each segment is a line from an
//! integer origin along an integer delta; its k-th cell is the origin plus
//! `k * delta / major` rounded half away from zero on each axis, where the
//! major component is the larger of the two. Bounces and re-aims push a
//! new segment, and regressing past the start of a segment pops it, so a
//! ray can always be walked back exactly the way it came.

use serde::{Deserialize, Serialize};

use crate::consts::LOS_RADIUS;
use crate::dungeon::Coord;
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Segment {
    origin: Coord,
    delta: Coord,
    steps: i32,
}

impl Segment {
    fn major(&self) -> i32 {
        self.delta.x.abs().max(self.delta.y.abs())
    }

    fn pos_at(&self, k: i32) -> Coord {
        let m = self.major();
        if m == 0 {
            return self.origin;
        }
        self.origin
            + Coord::new(
                round_div(k * self.delta.x, m),
                round_div(k * self.delta.y, m),
            )
    }
}

/// `n / d` rounded half away from zero, for positive `d`
fn round_div(n: i32, d: i32) -> i32 {
    let q = (2 * n.abs() + d) / (2 * d);
    if n < 0 { -q } else { q }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ray {
    segments: Vec<Segment>,
}

impl Ray {
    /// A ray starting at `source`, aimed at `target`
    pub fn new(source: Coord, target: Coord) -> Self {
        Self {
            segments: vec![Segment {
                origin: source,
                delta: target - source,
                steps: 0,
            }],
        }
    }

    fn current(&self) -> &Segment {
        // `segments` is never empty: `regress` keeps the first segment
        &self.segments[self.segments.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Segment {
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    pub fn pos(&self) -> Coord {
        let seg = self.current();
        seg.pos_at(seg.steps)
    }

    /// Cell the next [`Ray::advance`] would move to
    pub fn peek(&self) -> Coord {
        let seg = self.current();
        seg.pos_at(seg.steps + 1)
    }

    /// Number of segments; greater than one once the ray has bounced or been re-aimed
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn advance(&mut self) {
        self.current_mut().steps += 1;
    }

    /// Advance, re-aiming first if the current line would miss a target
    /// that still lies ahead
    pub fn advance_through(&mut self, target: Coord) {
        let cur = self.pos();
        let seg = self.current();
        let dist = cur.distance(target);
        let ahead = {
            let to_target = target - cur;
            to_target.x * seg.delta.x + to_target.y * seg.delta.y > 0
        };
        if dist > 0 && ahead && seg.pos_at(seg.steps + dist) != target {
            self.segments.push(Segment {
                origin: cur,
                delta: target - cur,
                steps: 0,
            });
        }
        self.advance();
    }

    /// Step back one cell; returns false at the very start of the ray
    pub fn regress(&mut self) -> bool {
        loop {
            let seg = self.current_mut();
            if seg.steps > 0 {
                seg.steps -= 1;
                return true;
            }
            if self.segments.len() > 1 {
                self.segments.pop();
            } else {
                return false;
            }
        }
    }

    /// Step back while the current cell satisfies `pred`
    pub fn regress_while(&mut self, pred: impl Fn(Coord) -> bool) {
        while pred(self.pos()) {
            if !self.regress() {
                break;
            }
        }
    }

    /// Reflect off the obstruction at the next cell, then advance
    pub fn advance_and_bounce(&mut self, is_solid: impl Fn(Coord) -> bool) {
        let cur = self.pos();
        let step = self.peek() - cur;
        let mut delta = self.current().delta;

        if step.x == 0 || step.y == 0 {
            if step.x != 0 {
                delta.x = -delta.x;
            } else {
                delta.y = -delta.y;
            }
        } else {
            let side_x = is_solid(cur + Coord::new(step.x, 0));
            let side_y = is_solid(cur + Coord::new(0, step.y));
            match (side_x, side_y) {
                (true, false) => delta.x = -delta.x,
                (false, true) => delta.y = -delta.y,
                _ => delta = -delta,
            }
        }

        self.segments.push(Segment {
            origin: cur,
            delta,
            steps: 0,
        });
        self.advance();
    }
}

/// Whether `target` is visible from `source` within [`LOS_RADIUS`]
pub fn check_line_of_sight(source: Coord, target: Coord, world: &dyn World) -> bool {
    let dist = source.distance(target);
    if dist <= 1 {
        return true;
    }
    if dist > LOS_RADIUS {
        return false;
    }
    let mut ray = Ray::new(source, target);
    for _ in 1..dist {
        ray.advance();
        if world.terrain(ray.pos()).is_opaque() {
            return false;
        }
    }
    true
}
