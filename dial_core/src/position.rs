//! Discrete dial positions and movement planning.
//!
//! The dial has six equally spaced stations on a ring. Planning deliberately
//! reproduces the behavior of the deployed controllers: the signed delta is
//! `current - target` and the plan always walks `|delta|` stations in the
//! sign-derived direction. It never takes the shorter modular path around the
//! ring (0 -> 5 is five steps, not one). A possible latent inefficiency, but
//! it is the behavior the hardware was tuned and operated against.

use std::fmt;

/// Number of rest points on the dial ring.
pub const STATIONS: u8 = 6;

/// One of the six fixed rest points, always in `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Station(u8);

impl Station {
    /// Validate a raw station index from a collaborator.
    pub fn new(raw: u8) -> Option<Self> {
        (raw < STATIONS).then_some(Self(raw))
    }

    #[inline]
    pub const fn zero() -> Self {
        Self(0)
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Commanded rotation sense. `as_f64` gives the signed unit factor applied
/// to pulse power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Positive power; steps the believed station downward.
    Forward,
    /// Negative power; steps the believed station upward.
    Reverse,
}

impl Direction {
    /// Direction of a signed stations delta (`current - target`); `None`
    /// when already on target.
    pub fn from_delta(delta: i8) -> Option<Self> {
        match delta.signum() {
            1 => Some(Self::Forward),
            -1 => Some(Self::Reverse),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Reverse => -1.0,
        }
    }

    #[inline]
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }
}

/// How many power pulses advance the dial by one station.
///
/// The two deployed variants of this controller evolved with different pulse
/// sizing; both are supported as configuration, never hardcoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceGranularity {
    /// One pulse per station; each pulse is 1/6 of a revolution.
    FullStation,
    /// Two pulses per station; each pulse is 1/12 of a revolution.
    HalfStation,
}

impl SliceGranularity {
    #[inline]
    pub fn slices_per_station(self) -> u8 {
        match self {
            Self::FullStation => 1,
            Self::HalfStation => 2,
        }
    }

    /// Magnitude of the power fraction sent per pulse.
    #[inline]
    pub fn power_fraction(self) -> f64 {
        1.0 / f64::from(STATIONS * self.slices_per_station())
    }
}

/// Ephemeral plan for one move: issue `slices` pulses in `direction`.
///
/// `direction` is meaningless when `slices == 0`.
#[derive(Debug, Clone, Copy)]
pub struct MovementPlan {
    pub direction: Direction,
    pub slices: u8,
}

impl MovementPlan {
    /// Plan the rotation from `current` to `target`.
    pub fn between(current: Station, target: Station, granularity: SliceGranularity) -> Self {
        let delta = current.get() as i8 - target.get() as i8;
        match Direction::from_delta(delta) {
            None => Self {
                direction: Direction::Forward,
                slices: 0,
            },
            Some(direction) => Self {
                direction,
                slices: delta.unsigned_abs() * granularity.slices_per_station(),
            },
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slices == 0
    }
}

/// Best-effort estimate of the dial's discrete position.
///
/// There is no position sensor; the estimate is maintained in slice units on
/// the `6 * slices_per_station` ring and only ever assumes "this pulse
/// probably landed". See `apply_optimistic`.
#[derive(Debug, Clone, Copy)]
pub struct PositionEstimate {
    slices: i16,
    granularity: SliceGranularity,
}

impl PositionEstimate {
    /// Estimate pinned to a known station.
    pub fn at(station: Station, granularity: SliceGranularity) -> Self {
        Self {
            slices: i16::from(station.get()) * i16::from(granularity.slices_per_station()),
            granularity,
        }
    }

    /// The believed station. Mid-station slices (half-station mode) floor to
    /// the last fully reached station.
    pub fn station(&self) -> Station {
        let per = i16::from(self.granularity.slices_per_station());
        Station((self.slices / per) as u8)
    }

    /// Step the estimate one slice toward where the last pulse was headed.
    ///
    /// Called once per pulse attempt whether or not the attempt's call
    /// reported success: the transport can fail after the hardware already
    /// executed the motion, so the estimate assumes the pulse landed. This is
    /// the documented compensation for ambiguous partial failure, not a bug.
    pub fn apply_optimistic(&mut self, direction: Direction) {
        let ring = i16::from(STATIONS) * i16::from(self.granularity.slices_per_station());
        self.slices = (self.slices - i16::from(direction.as_i8())).rem_euclid(ring);
    }

    /// Pin the estimate to a station (plan exhaustion, homing completion).
    pub fn snap_to(&mut self, station: Station) {
        self.slices =
            i16::from(station.get()) * i16::from(self.granularity.slices_per_station());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_rejects_out_of_range() {
        assert!(Station::new(5).is_some());
        assert!(Station::new(6).is_none());
        assert!(Station::new(200).is_none());
    }

    #[test]
    fn power_fraction_per_granularity() {
        assert!((SliceGranularity::FullStation.power_fraction() - 1.0 / 6.0).abs() < 1e-12);
        assert!((SliceGranularity::HalfStation.power_fraction() - 1.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn plan_takes_the_long_way_from_zero_to_five() {
        let p = MovementPlan::between(
            Station::new(0).unwrap(),
            Station::new(5).unwrap(),
            SliceGranularity::FullStation,
        );
        assert_eq!(p.direction, Direction::Reverse);
        assert_eq!(p.slices, 5);
    }

    #[test]
    fn plan_doubles_slices_in_half_station_mode() {
        let p = MovementPlan::between(
            Station::new(2).unwrap(),
            Station::new(5).unwrap(),
            SliceGranularity::HalfStation,
        );
        assert_eq!(p.direction, Direction::Reverse);
        assert_eq!(p.slices, 6);
    }

    #[test]
    fn empty_plan_when_on_target() {
        let s = Station::new(3).unwrap();
        assert!(MovementPlan::between(s, s, SliceGranularity::FullStation).is_empty());
    }

    #[test]
    fn optimistic_updates_walk_the_plan_to_target() {
        let from = Station::new(4).unwrap();
        let to = Station::new(1).unwrap();
        let g = SliceGranularity::HalfStation;
        let plan = MovementPlan::between(from, to, g);
        let mut est = PositionEstimate::at(from, g);
        for _ in 0..plan.slices {
            est.apply_optimistic(plan.direction);
        }
        assert_eq!(est.station(), to);
    }

    #[test]
    fn estimate_wraps_on_the_ring() {
        let g = SliceGranularity::FullStation;
        let mut est = PositionEstimate::at(Station::zero(), g);
        // Forward from 0 wraps to 5.
        est.apply_optimistic(Direction::Forward);
        assert_eq!(est.station().get(), 5);
        est.apply_optimistic(Direction::Reverse);
        assert_eq!(est.station().get(), 0);
    }
}
