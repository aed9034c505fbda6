//! Per-team instance data for drawing the population.

use crate::palette::Palette;
use bytemuck::{Pod, Zeroable};
use echoes_core::{Mat4, Params, SphereSet, TeamId, Vec3};

/// Instance data for one form.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// Model matrix (4x4): unit sphere scaled by radius, then placed.
    pub model: [[f32; 4]; 4],
    /// Color tint
    pub color: [f32; 4],
}

impl InstanceData {
    /// Instance for a sphere of `radius` at `center`.
    pub fn new(center: Vec3, radius: f32, color: Vec3) -> Self {
        let model = Mat4::from_translation(center) * Mat4::from_scale(Vec3::splat(radius));
        Self {
            model: model.to_cols_array_2d(),
            color: color.extend(1.0).to_array(),
        }
    }
}

impl Default for InstanceData {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// All instances of one team, ready to upload as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceBatch {
    pub team: TeamId,
    pub instances: Vec<InstanceData>,
}

impl InstanceBatch {
    /// Raw instance buffer contents for upload.
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

/// Build one batch per team from a snapshot.
pub fn build_batches(
    set: &SphereSet,
    params: &Params,
    palette: &Palette,
    wallet: Option<&str>,
) -> Vec<InstanceBatch> {
    set.buckets()
        .map(|(team, forms)| InstanceBatch {
            team,
            instances: forms
                .iter()
                .map(|form| {
                    let color = palette.form(team, form.is_created_by(wallet));
                    InstanceData::new(form.center(params), form.radius(), color)
                })
                .collect(),
        })
        .collect()
}
