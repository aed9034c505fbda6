//! Team colors.
//!
//! Every team has two hues: `any` for forms made by other wallets, and a lighter
//! `own` hue for the viewer's forms and for the viewer's hint.

use echoes_core::{TeamId, Vec3};
use serde::{Deserialize, Serialize};
use shaping::Classification;

/// Marker color while hovering one of the viewer's own team's forms.
pub const MARKER_OWN_TEAM: u32 = 0x000000;

/// Per-team colors, as 0xRRGGBB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub any: Vec<u32>,
    pub own: Vec<u32>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            any: vec![0x3033d4, 0xb02940, 0xefa53b],
            own: vec![0x44ffff, 0xff44ff, 0xffff44],
        }
    }
}

impl Palette {
    /// Color for a team's forms created by someone else.
    pub fn any(&self, team: TeamId) -> Vec3 {
        pick(&self.any, team)
    }

    /// Color for a team's forms created by the viewer, and for its hint.
    pub fn own(&self, team: TeamId) -> Vec3 {
        pick(&self.own, team)
    }

    /// Color of a population instance.
    pub fn form(&self, team: TeamId, created_by_viewer: bool) -> Vec3 {
        if created_by_viewer {
            self.own(team)
        } else {
            self.any(team)
        }
    }

    /// Hint color: the viewer's hue, pulled toward the hunted team's hue while
    /// growing or the fled team's hue while shrinking.
    pub fn hint(&self, team: TeamId, team_count: u32, classification: Classification, amount: f32) -> Vec3 {
        let base = self.own(team);
        let toward = match classification {
            Classification::Growing => self.own(team.hunt(team_count)),
            Classification::Shrinking => self.own(team.flee(team_count)),
            Classification::Neutral => return base,
        };
        base.lerp(toward, amount.clamp(0.0, 1.0))
    }
}

fn pick(colors: &[u32], team: TeamId) -> Vec3 {
    if colors.is_empty() {
        return Vec3::ONE;
    }
    hex_to_rgb(colors[team.index() % colors.len()])
}

/// `0xRRGGBB` to linear-ish RGB in `[0, 1]`.
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}
