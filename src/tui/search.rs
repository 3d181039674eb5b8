use crate::selection::models::Member;

/// Jump-to-match search over member usernames and emails. The Selection Set
/// itself is never filtered, so the select-all invariants and the full-set
/// payload are unaffected; matching only moves the cursor.
pub struct SearchState {
    pub search_mode: bool,
    pub search_query: String,
    pub search_matches: Vec<usize>,
    pub current_match_index: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            search_mode: false,
            search_query: String::new(),
            search_matches: Vec::new(),
            current_match_index: None,
        }
    }

    pub fn enter_search_mode(&mut self) {
        self.search_mode = true;
        self.search_query.clear();
        self.search_matches.clear();
        self.current_match_index = None;
    }

    pub fn cancel_search(&mut self) {
        self.search_mode = false;
        self.search_query.clear();
        self.search_matches.clear();
        self.current_match_index = None;
    }

    pub fn confirm_search(&mut self) -> Option<usize> {
        self.search_mode = false;
        if !self.search_matches.is_empty() {
            self.current_match_index = Some(0);
            Some(self.search_matches[0])
        } else {
            None
        }
    }

    pub fn insert_char(&mut self, c: char, members: &[Member]) {
        self.search_query.push(c);
        self.update_search_matches(members);
    }

    pub fn backspace(&mut self, members: &[Member]) {
        if !self.search_query.is_empty() {
            self.search_query.pop();
            self.update_search_matches(members);
        }
    }

    pub fn update_search_matches(&mut self, members: &[Member]) {
        self.search_matches.clear();
        self.current_match_index = None;

        if self.search_query.is_empty() {
            return;
        }

        let query_lower = self.search_query.to_lowercase();

        for (index, member) in members.iter().enumerate() {
            if member.username.to_lowercase().contains(&query_lower)
                || member.email.to_lowercase().contains(&query_lower)
            {
                self.search_matches.push(index);
            }
        }
    }

    pub fn next_match(&mut self) -> Option<usize> {
        if self.search_matches.is_empty() {
            return None;
        }

        if let Some(current_match) = self.current_match_index {
            let next_match = (current_match + 1) % self.search_matches.len();
            self.current_match_index = Some(next_match);
            Some(self.search_matches[next_match])
        } else {
            self.current_match_index = Some(0);
            Some(self.search_matches[0])
        }
    }

    pub fn previous_match(&mut self) -> Option<usize> {
        if self.search_matches.is_empty() {
            return None;
        }

        if let Some(current_match) = self.current_match_index {
            let prev_match = if current_match == 0 {
                self.search_matches.len() - 1
            } else {
                current_match - 1
            };
            self.current_match_index = Some(prev_match);
            Some(self.search_matches[prev_match])
        } else {
            let last_match = self.search_matches.len() - 1;
            self.current_match_index = Some(last_match);
            Some(self.search_matches[last_match])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_members() -> Vec<Member> {
        vec![
            Member::new(1, "alice", "alice@ops.example.com", true),
            Member::new(2, "bob", "bob@example.com", false),
            Member::new(3, "carol", "carol@ops.example.com", false),
            Member::new(4, "dave", "dave@example.com", true),
        ]
    }

    #[test]
    fn test_search_state_new() {
        let search_state = SearchState::new();
        assert!(!search_state.search_mode);
        assert!(search_state.search_query.is_empty());
        assert!(search_state.search_matches.is_empty());
        assert!(search_state.current_match_index.is_none());
    }

    #[test]
    fn test_matches_username_and_email() {
        let mut search_state = SearchState::new();
        let members = create_test_members();

        search_state.enter_search_mode();
        search_state.insert_char('o', &members);
        search_state.insert_char('p', &members);
        search_state.insert_char('s', &members);

        // "ops" only appears in the email domain of alice and carol.
        assert_eq!(search_state.search_query, "ops");
        assert_eq!(search_state.search_matches, vec![0, 2]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut search_state = SearchState::new();
        let members = create_test_members();

        search_state.enter_search_mode();
        search_state.insert_char('B', &members);
        search_state.insert_char('O', &members);
        search_state.insert_char('B', &members);

        assert_eq!(search_state.search_matches, vec![1]);
    }

    #[test]
    fn test_next_and_previous_match_wrap_around() {
        let mut search_state = SearchState::new();
        let members = create_test_members();

        search_state.enter_search_mode();
        // "a" matches alice, carol, dave.
        search_state.insert_char('a', &members);
        assert_eq!(search_state.search_matches, vec![0, 2, 3]);

        assert_eq!(search_state.next_match(), Some(0));
        assert_eq!(search_state.next_match(), Some(2));
        assert_eq!(search_state.next_match(), Some(3));
        assert_eq!(search_state.next_match(), Some(0)); // wraps

        assert_eq!(search_state.previous_match(), Some(3)); // wraps back
    }

    #[test]
    fn test_backspace_updates_matches() {
        let mut search_state = SearchState::new();
        let members = create_test_members();

        search_state.enter_search_mode();
        search_state.insert_char('b', &members);
        search_state.insert_char('o', &members);
        search_state.insert_char('x', &members);
        assert!(search_state.search_matches.is_empty());

        search_state.backspace(&members);
        assert_eq!(search_state.search_query, "bo");
        assert_eq!(search_state.search_matches, vec![1]);
    }

    #[test]
    fn test_confirm_search_jumps_to_first_match() {
        let mut search_state = SearchState::new();
        let members = create_test_members();

        search_state.enter_search_mode();
        search_state.insert_char('c', &members);

        let result = search_state.confirm_search();
        assert_eq!(result, Some(0)); // "alice" contains 'c'
        assert!(!search_state.search_mode);
        assert_eq!(search_state.current_match_index, Some(0));
    }

    #[test]
    fn test_cancel_search_clears_state() {
        let mut search_state = SearchState::new();
        let members = create_test_members();

        search_state.enter_search_mode();
        search_state.insert_char('b', &members);
        search_state.cancel_search();

        assert!(!search_state.search_mode);
        assert!(search_state.search_query.is_empty());
        assert!(search_state.search_matches.is_empty());
    }
}
