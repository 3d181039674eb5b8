use serde::{Deserialize, Serialize};

/// One user row in the assignment view, as served by the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub selected: bool,
}

impl Member {
    pub fn new(id: u64, username: &str, email: &str, selected: bool) -> Self {
        Self {
            id,
            username: username.to_string(),
            email: email.to_string(),
            selected,
        }
    }
}

/// One entry of the submission payload sent to the update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionEntry {
    pub id: u64,
    pub selected: bool,
}

/// The ordered collection of members for the current view. Order follows
/// the server's presentation order and is never reordered locally, so
/// payload construction is deterministic.
#[derive(Debug, Clone)]
pub struct SelectionSet {
    pub members: Vec<Member>,
}

impl SelectionSet {
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn selected_count(&self) -> usize {
        self.members.iter().filter(|m| m.selected).count()
    }

    pub fn all_selected(&self) -> bool {
        !self.members.is_empty() && self.members.iter().all(|m| m.selected)
    }

    pub fn set_all(&mut self, selected: bool) {
        for member in &mut self.members {
            member.selected = selected;
        }
    }

    /// Flips one member's selection. Returns the new value, or None if the
    /// index is out of bounds.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let member = self.members.get_mut(index)?;
        member.selected = !member.selected;
        Some(member.selected)
    }

    /// Projects the full set into the submission payload, preserving order.
    /// Always the whole set, never a diff.
    pub fn payload(&self) -> Vec<SelectionEntry> {
        self.members
            .iter()
            .map(|m| SelectionEntry {
                id: m.id,
                selected: m.selected,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> SelectionSet {
        SelectionSet::new(vec![
            Member::new(1, "alice", "alice@example.com", true),
            Member::new(2, "bob", "bob@example.com", false),
            Member::new(3, "carol", "carol@example.com", true),
        ])
    }

    #[test]
    fn test_payload_is_order_preserving_projection() {
        let set = sample_set();
        let payload = set.payload();

        assert_eq!(
            payload,
            vec![
                SelectionEntry {
                    id: 1,
                    selected: true
                },
                SelectionEntry {
                    id: 2,
                    selected: false
                },
                SelectionEntry {
                    id: 3,
                    selected: true
                },
            ]
        );
    }

    #[test]
    fn test_payload_serializes_to_expected_json() {
        let set = sample_set();
        let json = serde_json::to_string(&set.payload()).unwrap();
        assert_eq!(
            json,
            r#"[{"id":1,"selected":true},{"id":2,"selected":false},{"id":3,"selected":true}]"#
        );
    }

    #[test]
    fn test_set_all_broadcasts_to_every_member() {
        let mut set = sample_set();

        set.set_all(true);
        assert!(set.members.iter().all(|m| m.selected));

        set.set_all(false);
        assert!(set.members.iter().all(|m| !m.selected));
    }

    #[test]
    fn test_toggle_flips_single_member() {
        let mut set = sample_set();

        assert_eq!(set.toggle(1), Some(true));
        assert!(set.members[1].selected);
        assert_eq!(set.toggle(1), Some(false));
        assert!(!set.members[1].selected);

        assert_eq!(set.toggle(99), None);
    }

    #[test]
    fn test_all_selected() {
        let mut set = sample_set();
        assert!(!set.all_selected());

        set.set_all(true);
        assert!(set.all_selected());

        let empty = SelectionSet::new(Vec::new());
        assert!(!empty.all_selected());
    }

    #[test]
    fn test_selected_count() {
        let set = sample_set();
        assert_eq!(set.selected_count(), 2);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_member_deserializes_from_server_row() {
        let member: Member =
            serde_json::from_str(r#"{"id":7,"username":"dave","email":"dave@example.com","selected":false}"#)
                .unwrap();
        assert_eq!(member.id, 7);
        assert_eq!(member.username, "dave");
        assert!(!member.selected);
    }
}
