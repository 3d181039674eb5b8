use super::models::{Member, SelectionEntry, SelectionSet};

/// Keeps the "select all" control consistent with the member checkboxes.
///
/// The aggregate control is derived state: it reads checked only when every
/// member is selected. A mixed set collapses to unchecked, matching the
/// binary checkbox in the dashboard's assignment page. The only time the
/// aggregate is authoritative over the members is when the user toggles it
/// directly, which broadcast-writes its new value to the whole set.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    set: SelectionSet,
    aggregate: bool,
}

impl Synchronizer {
    pub fn new(set: SelectionSet) -> Self {
        let aggregate = set.all_selected();
        Self { set, aggregate }
    }

    pub fn members(&self) -> &[Member] {
        &self.set.members
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn selected_count(&self) -> usize {
        self.set.selected_count()
    }

    pub fn aggregate_checked(&self) -> bool {
        self.aggregate
    }

    /// User toggled the aggregate control: flip it and write the new value
    /// to every member.
    pub fn toggle_aggregate(&mut self) {
        self.aggregate = !self.aggregate;
        self.set.set_all(self.aggregate);
    }

    /// User toggled one member: the members are authoritative, so the
    /// aggregate is recomputed. Checked iff every member is now selected;
    /// a mixed set shows as unchecked.
    pub fn toggle_member(&mut self, index: usize) {
        if self.set.toggle(index).is_some() {
            self.aggregate = self.set.all_selected();
        }
    }

    /// Full-set snapshot for the update endpoint.
    pub fn payload(&self) -> Vec<SelectionEntry> {
        self.set.payload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synchronizer(states: &[bool]) -> Synchronizer {
        let members = states
            .iter()
            .enumerate()
            .map(|(i, &selected)| {
                Member::new(i as u64 + 1, &format!("user{}", i + 1), "", selected)
            })
            .collect();
        Synchronizer::new(SelectionSet::new(members))
    }

    #[test]
    fn test_initial_aggregate_derived_from_members() {
        assert!(synchronizer(&[true, true]).aggregate_checked());
        assert!(!synchronizer(&[true, false]).aggregate_checked());
        assert!(!synchronizer(&[false, false]).aggregate_checked());
    }

    #[test]
    fn test_toggle_aggregate_broadcasts_to_all_members() {
        let mut sync = synchronizer(&[true, false, false]);

        // Mixed reads unchecked, so the first toggle selects everything.
        sync.toggle_aggregate();
        assert!(sync.aggregate_checked());
        assert!(sync.members().iter().all(|m| m.selected));

        sync.toggle_aggregate();
        assert!(!sync.aggregate_checked());
        assert!(sync.members().iter().all(|m| !m.selected));
    }

    #[test]
    fn test_member_toggle_recomputes_aggregate() {
        let mut sync = synchronizer(&[true, false]);
        assert!(!sync.aggregate_checked());

        sync.toggle_member(1);
        assert!(sync.aggregate_checked());

        sync.toggle_member(0);
        assert!(!sync.aggregate_checked());
    }

    #[test]
    fn test_mixed_collapses_to_unchecked() {
        let mut sync = synchronizer(&[true, true, true]);
        assert!(sync.aggregate_checked());

        sync.toggle_member(2);
        assert!(!sync.aggregate_checked());
        // The other members are untouched: no write-back from the aggregate.
        assert!(sync.members()[0].selected);
        assert!(sync.members()[1].selected);
    }

    #[test]
    fn test_member_toggle_out_of_bounds_is_ignored() {
        let mut sync = synchronizer(&[true, true]);
        sync.toggle_member(5);
        assert!(sync.aggregate_checked());
        assert_eq!(sync.selected_count(), 2);
    }

    #[test]
    fn test_payload_idempotent_without_intervening_toggles() {
        let sync = synchronizer(&[true, false, true]);
        assert_eq!(sync.payload(), sync.payload());
    }

    #[test]
    fn test_payload_reflects_current_selection() {
        let mut sync = synchronizer(&[false, false]);
        sync.toggle_aggregate();

        let payload = sync.payload();
        assert_eq!(payload.len(), 2);
        assert!(payload.iter().all(|e| e.selected));
        assert_eq!(payload[0].id, 1);
        assert_eq!(payload[1].id, 2);
    }
}
