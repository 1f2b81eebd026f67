//! Built-in inspection rules
//!
//! | Id | Name | View | Severity |
//! |----|------|------|----------|
//! | M2A-ARM-001 | `LogMessageVariable` | activity | warning |
//! | M2A-WRM-001 | `ArgumentDirection` | workflow | error |
//! | M2A-PRM-001 | `ProjectDirectory` | project | info |

mod argument_prefix;
mod message_content;
mod path_characters;

pub use argument_prefix::{required_prefix, ArgumentPrefixCheck};
pub use message_content::MessageContentCheck;
pub use path_characters::PathCharacterCheck;

use crate::rule::Rule;

/// Get all built-in rules, activity rules first, then workflow and project rules
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        MessageContentCheck::default().into_rule(),
        ArgumentPrefixCheck.into_rule(),
        PathCharacterCheck::default().into_rule(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_unique() {
        let rules = builtin_rules();
        let ids: HashSet<_> = rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_builtin_rules_documented() {
        for rule in builtin_rules() {
            assert!(rule.description.is_some(), "{} has no description", rule.id);
        }
    }
}
