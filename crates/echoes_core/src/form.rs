//! Forms, teams and the cyclic hunt/flee relation.

use crate::params::{Params, INT_MAX};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wallet address identifying whoever created a form.
pub type WalletId = String;

/// Store-assigned identity of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormId(pub u64);

/// Team index in `[0, team_count)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl TeamId {
    /// Bucket index for this team.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The team this one grows towards.
    pub fn hunt(self, team_count: u32) -> TeamId {
        TeamId((self.0 + 1) % team_count)
    }

    /// The team this one shrinks away from.
    pub fn flee(self, team_count: u32) -> TeamId {
        TeamId((self.0 + 2) % team_count)
    }

    /// Reject teams outside `0..team_count`.
    pub fn check(self, team_count: u32) -> Result<Self, FormError> {
        if self.0 < team_count {
            Ok(self)
        } else {
            Err(FormError::TeamOutOfRange {
                team: self.0,
                team_count,
            })
        }
    }
}

/// Ways a form or a create payload can fall outside what the store represents.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("team {team} is outside 0..{team_count}")]
    TeamOutOfRange { team: u32, team_count: u32 },
    #[error("{axis} coordinate {value} is outside the store bounds")]
    CoordinateOutOfBounds { axis: char, value: i64 },
    #[error("radius {radius} is outside [{min}, {max}]")]
    RadiusOutOfRange { radius: i64, min: i64, max: i64 },
}

/// Payload of a create request. The store stamps identity and creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormFields {
    pub team: TeamId,
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub radius: i64,
}

impl FormFields {
    /// Convert a render-space placement into store fields, clamping and rounding each value.
    pub fn from_render(team: TeamId, position: Vec3, radius: f32, params: &Params) -> Self {
        Self {
            team,
            x: params.to_store(position.x),
            y: params.to_store(position.y),
            z: params.to_store(position.z),
            radius: params.store_radius(radius),
        }
    }

    /// Check team, coordinate bounds and radius range against `params`.
    pub fn validate(&self, params: &Params) -> Result<(), FormError> {
        self.team.check(params.team_count)?;
        for (axis, value) in [('x', self.x), ('y', self.y), ('z', self.z)] {
            if !(-INT_MAX..=INT_MAX).contains(&value) {
                return Err(FormError::CoordinateOutOfBounds { axis, value });
            }
        }
        let min = params.min_radius.round() as i64;
        let max = params.max_radius.round() as i64;
        if !(min..=max).contains(&self.radius) {
            return Err(FormError::RadiusOutOfRange {
                radius: self.radius,
                min,
                max,
            });
        }
        Ok(())
    }
}

/// A persisted sphere. Immutable once the store has accepted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    pub team: TeamId,
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub radius: i64,
    pub creator: WalletId,
}

impl Form {
    /// Center in render space.
    pub fn center(&self, params: &Params) -> Vec3 {
        Vec3::new(
            params.to_render(self.x),
            params.to_render(self.y),
            params.to_render(self.z),
        )
    }

    /// Radius in render units.
    pub fn radius(&self) -> f32 {
        self.radius as f32
    }

    /// The create payload this form was made from.
    pub fn fields(&self) -> FormFields {
        FormFields {
            team: self.team,
            x: self.x,
            y: self.y,
            z: self.z,
            radius: self.radius,
        }
    }

    /// Whether `wallet` created this form. Always false when signed out.
    pub fn is_created_by(&self, wallet: Option<&str>) -> bool {
        wallet.is_some_and(|w| w == self.creator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hunt_and_flee_are_cyclic() {
        assert_eq!(TeamId(0).hunt(3), TeamId(1));
        assert_eq!(TeamId(0).flee(3), TeamId(2));
        assert_eq!(TeamId(2).hunt(3), TeamId(0));
        assert_eq!(TeamId(2).flee(3), TeamId(1));
        // Hunting twice lands on the fled team.
        for t in 0..3 {
            let team = TeamId(t);
            assert_eq!(team.hunt(3).hunt(3), team.flee(3));
        }
    }

    #[test]
    fn team_check_rejects_out_of_range() {
        assert!(TeamId(2).check(3).is_ok());
        assert_eq!(
            TeamId(3).check(3),
            Err(FormError::TeamOutOfRange { team: 3, team_count: 3 })
        );
    }

    #[test]
    fn fields_from_render_round_trip_center() {
        let params = Params::default();
        let fields = FormFields::from_render(TeamId(1), Vec3::new(3.0, -4.0, 0.5), 26.6, &params);
        assert_eq!(fields.radius, 27);
        assert!(fields.validate(&params).is_ok());

        let form = Form {
            id: FormId(7),
            team: fields.team,
            x: fields.x,
            y: fields.y,
            z: fields.z,
            radius: fields.radius,
            creator: "0xabc".into(),
        };
        assert!((form.center(&params) - Vec3::new(3.0, -4.0, 0.5)).length() < 1e-3);
        assert_eq!(form.fields(), fields);
    }

    #[test]
    fn validate_reports_bad_radius_and_coordinates() {
        let params = Params::default();
        let mut fields = FormFields { team: TeamId(0), x: 0, y: 0, z: 0, radius: 0 };
        assert!(matches!(fields.validate(&params), Err(FormError::RadiusOutOfRange { .. })));
        fields.radius = 5;
        fields.y = INT_MAX + 1;
        assert_eq!(
            fields.validate(&params),
            Err(FormError::CoordinateOutOfBounds { axis: 'y', value: INT_MAX + 1 })
        );
    }

    #[test]
    fn creator_check_needs_a_wallet() {
        let form = Form {
            id: FormId(1),
            team: TeamId(0),
            x: 0,
            y: 0,
            z: 0,
            radius: 10,
            creator: "0xme".into(),
        };
        assert!(form.is_created_by(Some("0xme")));
        assert!(!form.is_created_by(Some("0xyou")));
        assert!(!form.is_created_by(None));
    }
}
