//! Traces: stand-ins drawn where a form was just committed, until the store's
//! snapshot brings the real form back or the trace times out.

use echoes_core::{FormFields, Lifetime, SphereSet, Vec3};
use hecs::{Entity, World};
use std::collections::HashMap;

/// Marker drawn where a form was just committed, until the form arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trace {
    pub position: Vec3,
    /// Drawn radius (slightly inside the committed one).
    pub radius: f32,
    /// What was sent to the store; used to recognise the real form.
    pub fields: FormFields,
}

/// ECS world holding live traces.
pub struct TraceWorld {
    world: World,
    lifetime: f32,
}

impl TraceWorld {
    pub fn new(lifetime_secs: f32) -> Self {
        Self {
            world: World::new(),
            lifetime: lifetime_secs,
        }
    }

    /// Spawn a trace that expires after the configured lifetime.
    pub fn spawn(&mut self, trace: Trace) -> Entity {
        self.world.spawn((trace, Lifetime::new(self.lifetime)))
    }

    /// Age every trace, despawning expired ones. Returns how many expired.
    pub fn tick(&mut self, dt: f32) -> usize {
        let mut expired: Vec<Entity> = Vec::new();
        for (entity, (_, lifetime)) in self.world.query_mut::<(&Trace, &mut Lifetime)>() {
            if lifetime.update(dt) {
                expired.push(entity);
            }
        }
        for e in &expired {
            self.world.despawn(*e).ok();
        }
        expired.len()
    }

    /// Remove traces whose form has arrived: a form created by `wallet` with the
    /// same fields. Each arrived form settles at most one trace.
    pub fn reconcile(&mut self, set: &SphereSet, wallet: Option<&str>) -> usize {
        if wallet.is_none() || self.world.is_empty() {
            return 0;
        }
        let mut arrived: HashMap<FormFields, usize> = HashMap::new();
        for form in set.iter().filter(|f| f.is_created_by(wallet)) {
            *arrived.entry(form.fields()).or_default() += 1;
        }

        let mut traces: Vec<(Entity, FormFields)> = self
            .world
            .query::<&Trace>()
            .iter()
            .map(|(e, t)| (e, t.fields))
            .collect();
        traces.sort_by_key(|(e, _)| e.id());

        let mut settled: Vec<Entity> = Vec::new();
        for (entity, fields) in traces {
            if let Some(count) = arrived.get_mut(&fields) {
                if *count > 0 {
                    *count -= 1;
                    settled.push(entity);
                }
            }
        }
        for e in &settled {
            self.world.despawn(*e).ok();
        }
        if !settled.is_empty() {
            log::debug!("Reconciled {} traces with arrived forms", settled.len());
        }
        settled.len()
    }

    /// Copy out every live trace.
    pub fn traces(&self) -> Vec<Trace> {
        self.world.query::<&Trace>().iter().map(|(_, t)| *t).collect()
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echoes_core::{Form, FormId, TeamId};

    fn fields(x: i64) -> FormFields {
        FormFields { team: TeamId(0), x, y: 0, z: 0, radius: 10 }
    }

    fn trace(x: i64) -> Trace {
        Trace { position: Vec3::ZERO, radius: 9.5, fields: fields(x) }
    }

    fn form(id: u64, fields: FormFields, creator: &str) -> Form {
        Form {
            id: FormId(id),
            team: fields.team,
            x: fields.x,
            y: fields.y,
            z: fields.z,
            radius: fields.radius,
            creator: creator.into(),
        }
    }

    #[test]
    fn traces_expire() {
        let mut world = TraceWorld::new(1.0);
        world.spawn(trace(1));
        assert_eq!(world.tick(0.5), 0);
        assert_eq!(world.tick(0.6), 1);
        assert!(world.is_empty());
    }

    #[test]
    fn arrived_forms_settle_matching_traces() {
        let mut world = TraceWorld::new(30.0);
        world.spawn(trace(1));
        world.spawn(trace(2));
        let set = SphereSet::rebuild(vec![form(1, fields(1), "0xme")], 3);
        assert_eq!(world.reconcile(&set, Some("0xme")), 1);
        let left = world.traces();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].fields, fields(2));
    }

    #[test]
    fn other_wallets_do_not_settle_traces() {
        let mut world = TraceWorld::new(30.0);
        world.spawn(trace(1));
        let set = SphereSet::rebuild(vec![form(1, fields(1), "0xother")], 3);
        assert_eq!(world.reconcile(&set, Some("0xme")), 0);
        assert_eq!(world.reconcile(&set, None), 0);
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn one_form_settles_one_trace() {
        let mut world = TraceWorld::new(30.0);
        world.spawn(trace(1));
        world.spawn(trace(1));
        let set = SphereSet::rebuild(vec![form(1, fields(1), "0xme")], 3);
        assert_eq!(world.reconcile(&set, Some("0xme")), 1);
        assert_eq!(world.len(), 1);
    }
}
