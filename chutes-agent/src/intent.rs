//! Declarative intent matching
//!
//! Chat text is mapped to API intents through a fixed table of regex
//! rules. The table is data; dispatching stays entirely outside the
//! request layer. First matching rule wins, top to bottom.

use regex::{Captures, Regex, RegexBuilder};

/// An API operation extracted from chat text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// List deployed chutes.
    ListChutes,
    /// Show one chute.
    GetChute {
        /// Chute identifier.
        id: String,
    },
    /// Deploy a new chute from an image.
    DeployChute {
        /// Name for the new chute.
        name: String,
        /// Image to deploy from.
        image: String,
    },
    /// Delete a chute.
    DeleteChute {
        /// Chute identifier.
        id: String,
    },
    /// List the cords of a chute.
    ListCords {
        /// Chute identifier.
        chute_id: String,
    },
    /// Invoke a cord on a chute.
    InvokeCord {
        /// Chute identifier.
        chute_id: String,
        /// Cord name.
        cord: String,
    },
    /// List available images.
    ListImages,
    /// Show one image.
    GetImage {
        /// Image identifier.
        id: String,
    },
    /// Show account balance and deposit details.
    Balance,
    /// Show the authenticated account.
    Whoami,
}

struct IntentRule {
    name: &'static str,
    pattern: Regex,
    build: fn(&Captures<'_>) -> Option<Intent>,
}

/// The intent-matching table.
pub struct IntentTable {
    rules: Vec<IntentRule>,
}

impl Default for IntentTable {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentTable {
    /// Compile the rule table.
    pub fn new() -> Self {
        let rules = vec![
            rule(
                "list-chutes",
                r"^(list|show)( my| all| the)? chutes$",
                |_| Some(Intent::ListChutes),
            ),
            rule(
                "get-chute",
                r"^(get|show|describe) chute (?P<id>[\w-]+)$",
                |caps| {
                    Some(Intent::GetChute {
                        id: caps.name("id")?.as_str().to_string(),
                    })
                },
            ),
            rule(
                "deploy-chute",
                r"^deploy( a)? chute (?P<name>[\w-]+) (?:from|using|with) image (?P<image>[\w./:-]+)$",
                |caps| {
                    Some(Intent::DeployChute {
                        name: caps.name("name")?.as_str().to_string(),
                        image: caps.name("image")?.as_str().to_string(),
                    })
                },
            ),
            rule(
                "delete-chute",
                r"^(delete|remove|tear down) chute (?P<id>[\w-]+)$",
                |caps| {
                    Some(Intent::DeleteChute {
                        id: caps.name("id")?.as_str().to_string(),
                    })
                },
            ),
            rule(
                "list-cords",
                r"^(list|show) cords (?:for|of|on) chute (?P<id>[\w-]+)$",
                |caps| {
                    Some(Intent::ListCords {
                        chute_id: caps.name("id")?.as_str().to_string(),
                    })
                },
            ),
            rule(
                "invoke-cord",
                r"^(invoke|call|run) (?P<cord>[\w-]+) on chute (?P<id>[\w-]+)$",
                |caps| {
                    Some(Intent::InvokeCord {
                        chute_id: caps.name("id")?.as_str().to_string(),
                        cord: caps.name("cord")?.as_str().to_string(),
                    })
                },
            ),
            rule(
                "list-images",
                r"^(list|show)( my| all| the)? images$",
                |_| Some(Intent::ListImages),
            ),
            rule(
                "get-image",
                r"^(get|show|describe) image (?P<id>[\w-]+)$",
                |caps| {
                    Some(Intent::GetImage {
                        id: caps.name("id")?.as_str().to_string(),
                    })
                },
            ),
            rule(
                "balance",
                r"^(balance|show balance|deposit info|how do i deposit)$",
                |_| Some(Intent::Balance),
            ),
            rule("whoami", r"^(whoami|who am i|my account)$", |_| {
                Some(Intent::Whoami)
            }),
        ];
        Self { rules }
    }

    /// Match `text` against the table, first hit wins.
    pub fn parse(&self, text: &str) -> Option<Intent> {
        let text = text.trim();
        self.rules
            .iter()
            .find_map(|rule| rule.pattern.captures(text).and_then(|caps| (rule.build)(&caps)))
    }

    /// Rule names, in match order. Useful for help output.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }
}

fn rule(
    name: &'static str,
    pattern: &str,
    build: fn(&Captures<'_>) -> Option<Intent>,
) -> IntentRule {
    // The table is static; a malformed pattern is a programming error
    // caught by the tests below.
    let pattern = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("invalid intent pattern {name}: {e}"));
    IntentRule {
        name,
        pattern,
        build,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_compiles() {
        let table = IntentTable::new();
        assert_eq!(table.rule_names().len(), 10);
    }

    #[test]
    fn test_list_and_get() {
        let table = IntentTable::new();
        assert_eq!(table.parse("list chutes"), Some(Intent::ListChutes));
        assert_eq!(table.parse("Show my chutes"), Some(Intent::ListChutes));
        assert_eq!(
            table.parse("get chute c1"),
            Some(Intent::GetChute { id: "c1".to_string() })
        );
        assert_eq!(table.parse("list all images"), Some(Intent::ListImages));
    }

    #[test]
    fn test_deploy_and_delete() {
        let table = IntentTable::new();
        assert_eq!(
            table.parse("deploy chute vision-demo from image parachutes/sdxl:latest"),
            Some(Intent::DeployChute {
                name: "vision-demo".to_string(),
                image: "parachutes/sdxl:latest".to_string(),
            })
        );
        assert_eq!(
            table.parse("tear down chute c1"),
            Some(Intent::DeleteChute { id: "c1".to_string() })
        );
    }

    #[test]
    fn test_cords() {
        let table = IntentTable::new();
        assert_eq!(
            table.parse("list cords for chute c1"),
            Some(Intent::ListCords { chute_id: "c1".to_string() })
        );
        assert_eq!(
            table.parse("run generate on chute c1"),
            Some(Intent::InvokeCord {
                chute_id: "c1".to_string(),
                cord: "generate".to_string(),
            })
        );
    }

    #[test]
    fn test_account() {
        let table = IntentTable::new();
        assert_eq!(table.parse("whoami"), Some(Intent::Whoami));
        assert_eq!(table.parse("balance"), Some(Intent::Balance));
    }

    #[test]
    fn test_unrelated_text_matches_nothing() {
        let table = IntentTable::new();
        assert_eq!(table.parse("what's the weather like"), None);
        assert_eq!(table.parse("deploy the kraken"), None);
        assert_eq!(table.parse(""), None);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let table = IntentTable::new();
        assert_eq!(table.parse("  list chutes  "), Some(Intent::ListChutes));
    }
}
