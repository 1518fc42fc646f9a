//! Keyword screen that keeps player queries read-only.
//!
//! This is a heuristic over whole words, not a Cypher parser: a keyword inside
//! a string literal or a backticked name is rejected too.

pub const MUTATION_KEYWORDS: [&str; 7] =
    ["CREATE", "DELETE", "SET", "REMOVE", "MERGE", "DETACH", "DROP"];

/// The first mutation keyword in `query`, matched case-insensitively as a whole word.
pub fn find_mutation_keyword(query: &str) -> Option<&'static str> {
    query
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .find_map(|word| {
            MUTATION_KEYWORDS
                .iter()
                .copied()
                .find(|keyword| word.eq_ignore_ascii_case(keyword))
        })
}

pub fn validate_read_only(query: &str) -> bool {
    find_mutation_keyword(query).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_queries_pass() {
        assert!(validate_read_only("MATCH (s:Suspect) RETURN s.name AS suspect"));
        assert!(validate_read_only(
            "MATCH (s:Suspect) WHERE s.created_at > 3 AND s.offset = 1 RETURN s"
        ));
        assert!(validate_read_only("MATCH (n:Dataset) RETURN n.settings"));
    }

    #[test]
    fn test_mutations_are_caught_in_any_case() {
        assert_eq!(
            find_mutation_keyword("MATCH (n) DETACH DELETE n RETURN n"),
            Some("DETACH")
        );
        assert_eq!(find_mutation_keyword("create (n:Suspect)"), Some("CREATE"));
        assert_eq!(find_mutation_keyword("MATCH (n) Set n.x = 1"), Some("SET"));
        assert_eq!(find_mutation_keyword("MATCH (n)\nREMOVE n.flag"), Some("REMOVE"));
        assert_eq!(find_mutation_keyword("MERGE(n:X)"), Some("MERGE"));
        assert_eq!(find_mutation_keyword("DROP INDEX foo"), Some("DROP"));
    }

    #[test]
    fn test_keyword_inside_string_literal_is_still_rejected() {
        assert!(!validate_read_only(
            "MATCH (s:Suspect) WHERE s.note = 'set up' RETURN s"
        ));
    }
}
