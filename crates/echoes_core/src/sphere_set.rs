//! Team-bucketed forms, rebuilt wholesale from every store snapshot.

use crate::form::{Form, FormError, TeamId};

/// Every valid form of a snapshot, grouped by team.
///
/// A set is never patched in place: each snapshot produces a new one, which the
/// owner swaps in as a whole so readers never observe a partially rebuilt set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SphereSet {
    buckets: Vec<Vec<Form>>,
}

impl SphereSet {
    /// An empty set with one bucket per team.
    pub fn new(team_count: u32) -> Self {
        Self {
            buckets: vec![Vec::new(); team_count as usize],
        }
    }

    /// Build a set from a snapshot. Forms with an out-of-range team are skipped
    /// and returned alongside the set.
    pub fn from_snapshot<I>(forms: I, team_count: u32) -> (Self, Vec<FormError>)
    where
        I: IntoIterator<Item = Form>,
    {
        let mut set = Self::new(team_count);
        let mut rejected = Vec::new();
        for form in forms {
            if let Err(e) = set.insert(form) {
                rejected.push(e);
            }
        }
        (set, rejected)
    }

    /// Build a set from a snapshot, logging any rejected forms.
    pub fn rebuild<I>(forms: I, team_count: u32) -> Self
    where
        I: IntoIterator<Item = Form>,
    {
        let (set, rejected) = Self::from_snapshot(forms, team_count);
        for e in &rejected {
            log::warn!("Dropping form from snapshot: {}", e);
        }
        set
    }

    /// Append a form to its team bucket.
    pub fn insert(&mut self, form: Form) -> Result<(), FormError> {
        let team = form.team.check(self.team_count())?;
        self.buckets[team.index()].push(form);
        Ok(())
    }

    /// Number of team buckets.
    pub fn team_count(&self) -> u32 {
        self.buckets.len() as u32
    }

    /// Forms of one team; empty for an unknown team.
    pub fn bucket(&self, team: TeamId) -> &[Form] {
        self.buckets.get(team.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every bucket with its team, in team order.
    pub fn buckets(&self) -> impl Iterator<Item = (TeamId, &[Form])> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(t, forms)| (TeamId(t as u32), forms.as_slice()))
    }

    /// All forms, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = &Form> {
        self.buckets.iter().flatten()
    }

    /// Total forms across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}
