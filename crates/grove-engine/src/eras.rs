//! Version-keyed call strategies.
//!
//! The toolkit's reflective API shifted across releases. Each shift is a row
//! in one of the tables below, and [`CallPlan::select`] resolves all of them
//! once per task so the task flows never compare versions themselves.

use grove_core::version::Version;

use crate::templates::TemplateLayout;

pub const GROOVY_1_5_2: Version = Version::new(1, 5, 2);
pub const GROOVY_1_6_0_RC2: Version = Version::tagged(1, 6, 0, "RC-2");
pub const GROOVY_1_6_0: Version = Version::new(1, 6, 0);
pub const GROOVY_1_6_2: Version = Version::new(1, 6, 2);
pub const GROOVY_1_8_2: Version = Version::new(1, 8, 2);
pub const GROOVY_1_8_3: Version = Version::new(1, 8, 3);
pub const GROOVY_1_9_0_BETA1: Version = Version::tagged(1, 9, 0, "beta-1");
pub const GROOVY_1_9_0_BETA3: Version = Version::tagged(1, 9, 0, "beta-3");
pub const GROOVY_2_0_0_BETA3: Version = Version::tagged(2, 0, 0, "beta-3");
pub const GROOVY_2_1_0_BETA1: Version = Version::tagged(2, 1, 0, "beta-1");
pub const GROOVY_2_5_0_ALPHA1: Version = Version::tagged(2, 5, 0, "alpha-1");
pub const GROOVY_2_5_7: Version = Version::new(2, 5, 7);
pub const GROOVY_2_6_0_ALPHA1: Version = Version::tagged(2, 6, 0, "alpha-1");
pub const GROOVY_3_0_0_BETA1: Version = Version::tagged(3, 0, 0, "beta-1");
pub const GROOVY_3_0_0_ALPHA4: Version = Version::tagged(3, 0, 0, "alpha-4");
pub const GROOVY_3_0_5: Version = Version::new(3, 0, 5);
pub const GROOVY_4_0_0_ALPHA1: Version = Version::tagged(4, 0, 0, "alpha-1");
pub const GROOVY_4_0_27: Version = Version::new(4, 0, 27);
pub const GROOVY_5_0_0_ALPHA1: Version = Version::tagged(5, 0, 0, "alpha-1");
pub const GROOVY_5_0_0_BETA1: Version = Version::tagged(5, 0, 0, "beta-1");

/// A contiguous span of versions starting at `since`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    since: Version,
    until: Option<Version>,
    inclusive: bool,
}

impl VersionRange {
    /// `since` and everything newer.
    pub const fn since(since: Version) -> Self {
        Self {
            since,
            until: None,
            inclusive: false,
        }
    }

    /// `since` up to but excluding `until`.
    pub const fn before(since: Version, until: Version) -> Self {
        Self {
            since,
            until: Some(until),
            inclusive: false,
        }
    }

    /// `since` up to and including `until`.
    pub const fn through(since: Version, until: Version) -> Self {
        Self {
            since,
            until: Some(until),
            inclusive: true,
        }
    }

    pub fn contains(&self, version: &Version) -> bool {
        if !version.at_least(&self.since) {
            return false;
        }
        match &self.until {
            None => true,
            Some(until) if self.inclusive => version <= until,
            Some(until) => version < until,
        }
    }
}

fn in_any(ranges: &[VersionRange], version: &Version) -> bool {
    ranges.iter().any(|r| r.contains(version))
}

/// A strategy and the version ranges it applies to.
#[derive(Debug)]
pub struct Era<T> {
    pub ranges: &'static [VersionRange],
    pub strategy: T,
}

/// The strategy of the first era containing `version`.
pub fn select<T: Copy>(eras: &[Era<T>], version: &Version) -> Option<T> {
    eras.iter()
        .find(|era| in_any(era.ranges, version))
        .map(|era| era.strategy)
}

/// Shape of the `CompilationUnit` constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitConstructor {
    /// `(CompilerConfiguration, CodeSource, GroovyClassLoader, GroovyClassLoader)`
    WithTransformLoader,
    /// `(CompilerConfiguration, CodeSource, GroovyClassLoader)`
    Basic,
}

/// Shape of the `GroovyDocTool` constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocToolConstructor {
    /// Source dirs, templates, links, language level and properties.
    WithLanguageLevel,
    /// Source dirs, templates, links and properties.
    WithProperties,
    /// A single source dir, templates and links.
    WithLinks,
    /// A single source dir and templates.
    Basic,
}

impl DocToolConstructor {
    pub fn arity(&self) -> usize {
        match self {
            Self::WithLanguageLevel => 8,
            Self::WithProperties => 7,
            Self::WithLinks => 5,
            Self::Basic => 4,
        }
    }

    /// Whether only the first source directory can be passed.
    pub fn single_source_dir(&self) -> bool {
        matches!(self, Self::WithLinks | Self::Basic)
    }
}

/// How doc inputs are registered with the doc tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocInput {
    /// One `add(List)` call.
    List,
    /// One `add(String)` call per source.
    PerSource,
}

static UNIT_CONSTRUCTORS: &[Era<UnitConstructor>] = &[Era {
    ranges: &[VersionRange::since(GROOVY_1_6_0)],
    strategy: UnitConstructor::WithTransformLoader,
}];

static DOC_TOOL_CONSTRUCTORS: &[Era<DocToolConstructor>] = &[
    Era {
        ranges: &[
            VersionRange::before(GROOVY_4_0_27, GROOVY_5_0_0_ALPHA1),
            VersionRange::since(GROOVY_5_0_0_BETA1),
        ],
        strategy: DocToolConstructor::WithLanguageLevel,
    },
    Era {
        ranges: &[VersionRange::since(GROOVY_1_6_0_RC2)],
        strategy: DocToolConstructor::WithProperties,
    },
    Era {
        ranges: &[VersionRange::since(GROOVY_1_5_2)],
        strategy: DocToolConstructor::WithLinks,
    },
];

static DOC_INPUTS: &[Era<DocInput>] = &[Era {
    ranges: &[VersionRange::since(GROOVY_1_6_0_RC2)],
    strategy: DocInput::List,
}];

static LINK_CLASSES: &[Era<&str>] = &[
    Era {
        ranges: &[VersionRange::since(GROOVY_1_6_0_RC2)],
        strategy: "org.codehaus.groovy.tools.groovydoc.LinkArgument",
    },
    Era {
        ranges: &[VersionRange::since(GROOVY_1_5_2)],
        strategy: "org.codehaus.groovy.ant.Groovydoc$LinkArgument",
    },
];

static TEMPLATE_LAYOUTS: &[Era<TemplateLayout>] = &[
    Era {
        ranges: &[VersionRange::since(GROOVY_1_6_2)],
        strategy: TemplateLayout::Modern,
    },
    Era {
        ranges: &[VersionRange::since(GROOVY_1_6_0)],
        strategy: TemplateLayout::Classic,
    },
    Era {
        ranges: &[VersionRange::since(GROOVY_1_6_0_RC2)],
        strategy: TemplateLayout::ReleaseCandidate,
    },
];

static PREVIEW_FEATURES: &[VersionRange] = &[
    VersionRange::before(GROOVY_2_5_7, GROOVY_2_6_0_ALPHA1),
    VersionRange::since(GROOVY_3_0_0_BETA1),
];

static SCRIPT_EXTENSIONS_BROKEN: VersionRange =
    VersionRange::through(GROOVY_1_9_0_BETA1, GROOVY_1_9_0_BETA3);

/// Every version-dependent choice a task makes, resolved for one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPlan {
    pub unit_constructor: UnitConstructor,
    pub doc_tool_constructor: DocToolConstructor,
    pub doc_input: DocInput,
    /// Class used for groovydoc links, if the version has one.
    pub link_class: Option<&'static str>,
    pub templates: TemplateLayout,
    pub config_script: bool,
    pub preview_features: bool,
    pub indy_requestable: bool,
    pub indy_by_default: bool,
    pub parameters: bool,
    pub parallel_parsing: bool,
    pub parallel_parsing_by_default: bool,
    pub stub_generation: bool,
    pub script_extensions: bool,
    pub doc_annotation: bool,
    pub doc_properties: bool,
}

impl CallPlan {
    pub fn select(version: &Version) -> Self {
        Self {
            unit_constructor: select(UNIT_CONSTRUCTORS, version).unwrap_or(UnitConstructor::Basic),
            doc_tool_constructor: select(DOC_TOOL_CONSTRUCTORS, version)
                .unwrap_or(DocToolConstructor::Basic),
            doc_input: select(DOC_INPUTS, version).unwrap_or(DocInput::PerSource),
            link_class: select(LINK_CLASSES, version),
            templates: select(TEMPLATE_LAYOUTS, version).unwrap_or(TemplateLayout::Legacy),
            config_script: version.at_least(&GROOVY_2_1_0_BETA1),
            preview_features: in_any(PREVIEW_FEATURES, version),
            indy_requestable: version.at_least(&GROOVY_2_0_0_BETA3),
            indy_by_default: version.at_least(&GROOVY_4_0_0_ALPHA1),
            parameters: version.at_least(&GROOVY_2_5_0_ALPHA1),
            parallel_parsing: version.at_least(&GROOVY_3_0_5),
            parallel_parsing_by_default: version.at_least(&GROOVY_4_0_0_ALPHA1),
            stub_generation: version.at_least(&GROOVY_1_8_2),
            script_extensions: version.at_least(&GROOVY_1_8_3)
                && !SCRIPT_EXTENSIONS_BROKEN.contains(version),
            doc_annotation: version.at_least(&GROOVY_3_0_0_ALPHA4),
            doc_properties: version.at_least(&GROOVY_1_6_0_RC2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_and_exclusive_bounds() {
        let half_open = VersionRange::before(Version::new(1, 0, 0), Version::new(2, 0, 0));
        assert!(half_open.contains(&Version::new(1, 0, 0)));
        assert!(!half_open.contains(&Version::new(2, 0, 0)));

        let closed = VersionRange::through(Version::new(1, 0, 0), Version::new(2, 0, 0));
        assert!(closed.contains(&Version::new(2, 0, 0)));
        assert!(!closed.contains(&Version::new(2, 0, 1)));
    }

    #[test]
    fn first_matching_era_wins() {
        assert_eq!(
            select(DOC_TOOL_CONSTRUCTORS, &Version::new(4, 0, 27)),
            Some(DocToolConstructor::WithLanguageLevel)
        );
        assert_eq!(
            select(DOC_TOOL_CONSTRUCTORS, &Version::new(4, 0, 26)),
            Some(DocToolConstructor::WithProperties)
        );
        assert_eq!(select(DOC_TOOL_CONSTRUCTORS, &Version::new(1, 5, 0)), None);
    }
}
