//! Bytecode target compatibility policy.
//!
//! Each supported bytecode target maps to the oldest toolkit release able to
//! emit it. Some targets were back-ported to a maintenance line after the next
//! major line already supported them, so a rule may name an alternate minimum
//! for the newer line and extra pre-release branches that also qualify.

use grove_util::errors::{GroveError, GroveResult};

use crate::version::Version;

/// One row of the compatibility matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityRule {
    /// Target names this rule answers for, canonical name first.
    pub targets: &'static [&'static str],
    /// Oldest release able to emit the target.
    pub min_version: Version,
    /// Oldest release of the next major line able to emit the target.
    pub min_version_alternate: Option<Version>,
    /// Pre-release lines between the two that also qualify, each from its own minimum.
    pub extra_branches: &'static [Version],
    /// First release that no longer accepts the target.
    pub dropped_in: Option<Version>,
    pub requires_indy_variant: bool,
}

impl CompatibilityRule {
    pub fn applies_to(&self, target: &str) -> bool {
        self.targets.contains(&target)
    }

    /// Whether `version` is new enough (and not too new) for this rule.
    pub fn is_satisfied_by(&self, version: &Version) -> bool {
        if let Some(ref dropped) = self.dropped_in {
            if version.at_least(dropped) {
                return false;
            }
        }

        let Some(ref alternate) = self.min_version_alternate else {
            return version.at_least(&self.min_version);
        };

        if version.major() > alternate.major() {
            return true;
        }
        if version.major() == alternate.major() {
            return version.at_least(alternate);
        }
        if let Some(branch) = self.extra_branches.iter().find(|b| b.same_line(version)) {
            return version.at_least(branch);
        }
        version.same_line(&self.min_version) && version.at_least(&self.min_version)
    }

    /// Human-readable minimum, as shown in errors and by `grove targets`.
    pub fn requirement(&self) -> String {
        match self.min_version_alternate {
            Some(ref alt) => format!(
                "{} or newer ({} or newer on the {}.x line)",
                self.min_version,
                alt,
                alt.major()
            ),
            None => format!("{} or newer", self.min_version),
        }
    }
}

const NO_BRANCHES: &[Version] = &[];
const GROOVY_5_FIRST: Version = Version::tagged(5, 0, 0, "alpha-1");

const fn rule(
    targets: &'static [&'static str],
    min_version: Version,
    min_version_alternate: Option<Version>,
    dropped_in: Option<Version>,
) -> CompatibilityRule {
    CompatibilityRule {
        targets,
        min_version,
        min_version_alternate,
        extra_branches: NO_BRANCHES,
        dropped_in,
        requires_indy_variant: false,
    }
}

/// The full matrix, ordered by target.
pub static RULES: &[CompatibilityRule] = &[
    rule(&["1.4", "4"], Version::new(0, 0, 0), None, None),
    rule(&["1.5", "5"], Version::new(0, 0, 0), None, Some(GROOVY_5_FIRST)),
    rule(&["1.6", "6"], Version::new(2, 1, 3), None, Some(GROOVY_5_FIRST)),
    rule(&["1.7", "7"], Version::new(2, 1, 3), None, Some(GROOVY_5_FIRST)),
    rule(&["1.8", "8"], Version::new(2, 3, 3), None, Some(GROOVY_5_FIRST)),
    CompatibilityRule {
        targets: &["9", "1.9"],
        min_version: Version::new(2, 5, 3),
        min_version_alternate: Some(Version::tagged(3, 0, 0, "alpha-2")),
        extra_branches: &[Version::tagged(2, 6, 0, "alpha-4")],
        dropped_in: Some(GROOVY_5_FIRST),
        requires_indy_variant: false,
    },
    CompatibilityRule {
        targets: &["9", "1.9"],
        min_version: Version::new(2, 5, 3),
        min_version_alternate: Some(Version::tagged(3, 0, 0, "alpha-4")),
        extra_branches: NO_BRANCHES,
        dropped_in: Some(GROOVY_5_FIRST),
        requires_indy_variant: true,
    },
    rule(&["10"], Version::new(2, 5, 3), Some(Version::tagged(3, 0, 0, "alpha-4")), Some(GROOVY_5_FIRST)),
    rule(&["11"], Version::new(2, 5, 3), Some(Version::tagged(3, 0, 0, "alpha-4")), None),
    rule(&["12"], Version::new(2, 5, 3), Some(Version::tagged(3, 0, 0, "alpha-4")), None),
    rule(&["13"], Version::new(2, 5, 7), Some(Version::tagged(3, 0, 0, "beta-1")), None),
    rule(&["14"], Version::tagged(3, 0, 0, "beta-2"), None, None),
    rule(&["15"], Version::new(3, 0, 3), None, None),
    rule(&["16"], Version::new(3, 0, 6), None, None),
    rule(&["17"], Version::new(3, 0, 8), Some(Version::tagged(4, 0, 0, "alpha-3")), None),
    rule(&["18"], Version::tagged(4, 0, 0, "beta-1"), None, None),
    rule(&["19"], Version::new(4, 0, 2), None, None),
    rule(&["20"], Version::new(4, 0, 6), None, None),
    rule(&["21"], Version::new(4, 0, 11), None, None),
    rule(&["22"], Version::new(4, 0, 16), Some(Version::tagged(5, 0, 0, "alpha-3")), None),
    rule(&["23"], Version::new(4, 0, 21), Some(Version::tagged(5, 0, 0, "alpha-8")), None),
    rule(&["24"], Version::new(4, 0, 24), Some(Version::tagged(5, 0, 0, "alpha-11")), None),
    rule(&["25"], Version::new(4, 0, 27), Some(Version::tagged(5, 0, 0, "alpha-13")), None),
];

/// Normalize a user-supplied target to the name the toolkit understands.
///
/// Old single-digit targets gain their `1.` prefix; `1.9` became plain `9`.
pub fn translate_target(target: &str) -> String {
    match target.trim() {
        "5" => "1.5".to_string(),
        "6" => "1.6".to_string(),
        "7" => "1.7".to_string(),
        "8" => "1.8".to_string(),
        "1.9" => "9".to_string(),
        other => other.to_string(),
    }
}

/// Find the rule for a target, preferring the indy branch for indy builds.
pub fn find_rule(target: &str, is_indy_variant: bool) -> Option<&'static CompatibilityRule> {
    let target = translate_target(target);
    let mut matching = RULES.iter().filter(|r| r.applies_to(&target));
    let exact = matching
        .clone()
        .find(|r| r.requires_indy_variant == is_indy_variant);
    exact.or_else(|| matching.find(|r| !r.requires_indy_variant))
}

/// Check that `version` can emit `target`.
///
/// Fails with [`GroveError::UnsupportedBytecodeTarget`] when no rule knows the
/// target or the detected release falls outside the rule's range.
pub fn verify(version: &Version, is_indy_variant: bool, target: &str) -> GroveResult<()> {
    let rule = find_rule(target, is_indy_variant).ok_or_else(|| {
        GroveError::UnsupportedBytecodeTarget {
            target: target.to_string(),
            message: "unrecognized bytecode target".to_string(),
        }
    })?;

    if rule.is_satisfied_by(version) {
        tracing::debug!("Groovy {version} can target bytecode {target}");
        return Ok(());
    }

    let message = match rule.dropped_in {
        Some(ref dropped) if version.at_least(dropped) => {
            format!("not accepted by Groovy {dropped} or newer, detected {version}")
        }
        _ => format!(
            "requires Groovy {}{}, detected {version}",
            rule.requirement(),
            if rule.requires_indy_variant { " with indy" } else { "" }
        ),
    };
    Err(GroveError::UnsupportedBytecodeTarget {
        target: target.to_string(),
        message,
    })
}
