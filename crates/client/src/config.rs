//! Client configuration. Loaded from config.ron at startup.

use crate::palette::Palette;
use anyhow::{Context, Result};
use echoes_core::{Params, TeamId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persistent client settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Team to play; a random team when absent.
    #[serde(default)]
    pub team: Option<u32>,
    /// Wallet the viewer is signed in with.
    #[serde(default)]
    pub wallet: Option<String>,
    /// Wallets allowed to place forms instantly with the secondary button.
    #[serde(default)]
    pub spawn_admins: Vec<String>,
    /// Distance along the ray for instant placement when nothing is hit.
    #[serde(default = "default_spawn_distance")]
    pub spawn_distance: f32,
    /// Seconds a trace lingers if its form never shows up.
    #[serde(default = "default_trace_lifetime")]
    pub trace_lifetime_secs: f32,
    /// Viewport width in logical pixels.
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    /// Viewport height in logical pixels.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
    /// Random forms seeded into the demo store.
    #[serde(default = "default_seed_forms")]
    pub seed_forms: usize,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub palette: Palette,
}

fn default_spawn_distance() -> f32 {
    100.0
}
fn default_trace_lifetime() -> f32 {
    30.0
}
fn default_viewport_width() -> u32 {
    1280
}
fn default_viewport_height() -> u32 {
    720
}
fn default_seed_forms() -> usize {
    200
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            team: None,
            wallet: None,
            spawn_admins: Vec::new(),
            spawn_distance: default_spawn_distance(),
            trace_lifetime_secs: default_trace_lifetime(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            seed_forms: default_seed_forms(),
            params: Params::default(),
            palette: Palette::default(),
        }
    }
}

impl ClientConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Invalid config at {:?}: {:#}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Load and validate config from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&data)
    }

    /// Parse and validate RON config text.
    pub fn parse(data: &str) -> Result<Self> {
        let config: Self = ron::from_str(data).context("parsing client config")?;
        config.check()?;
        Ok(config)
    }

    /// Reject settings the client can't run with.
    pub fn check(&self) -> Result<()> {
        let p = &self.params;
        anyhow::ensure!(p.team_count > 0, "team_count must be positive");
        anyhow::ensure!(p.position_scale > 0.0, "position_scale must be positive");
        anyhow::ensure!(
            p.min_radius > 0.0 && p.min_radius <= p.max_radius,
            "radii must satisfy 0 < min_radius <= max_radius"
        );
        anyhow::ensure!(p.growth >= 1.0, "growth must be at least 1");
        if let Some(team) = self.team {
            anyhow::ensure!(team < p.team_count, "team {} is outside 0..{}", team, p.team_count);
        }
        Ok(())
    }

    /// The configured team, or a random one.
    pub fn pick_team<R: Rng>(&self, rng: &mut R) -> TeamId {
        match self.team {
            Some(team) => TeamId(team),
            None => TeamId(rng.gen_range(0..self.params.team_count)),
        }
    }

}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ClientConfig::parse("()").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn partial_params_keep_other_defaults() {
        let config = ClientConfig::parse("(team: Some(2), params: (growth: 2.0))").unwrap();
        assert_eq!(config.team, Some(2));
        assert_eq!(config.params.growth, 2.0);
        assert_eq!(config.params.shrink, 0.9);
        assert_eq!(config.params.hold_ms, 1000);
    }

    #[test]
    fn out_of_range_team_is_rejected() {
        assert!(ClientConfig::parse("(team: Some(3))").is_err());
        assert!(ClientConfig::parse("(params: (min_radius: 50.0, max_radius: 10.0))").is_err());
        assert!(ClientConfig::parse("not ron").is_err());
    }

    #[test]
    fn random_team_is_in_range() {
        let config = ClientConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(config.pick_team(&mut rng).0 < 3);
        }
        let fixed = ClientConfig { team: Some(1), ..Default::default() };
        assert_eq!(fixed.pick_team(&mut rng), TeamId(1));
    }

    #[test]
    fn config_round_trips_through_ron() {
        let config = ClientConfig {
            wallet: Some("0xme".into()),
            spawn_admins: vec!["0xadmin".into()],
            ..Default::default()
        };
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        assert_eq!(ClientConfig::parse(&text).unwrap(), config);
    }
}
