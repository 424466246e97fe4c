//! Default groovydoc template lists.
//!
//! The doc tool expects classpath resource names for its templates, and both
//! the directory layout and the set of top-level pages changed during the 1.6
//! release cycle.

const DOCGEN_BASE: &str = "org/codehaus/groovy/tools/";

/// Which generation of the bundled templates a toolkit ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateLayout {
    /// Before 1.6.0-RC-2.
    Legacy,
    /// 1.6.0-RC-2 up to 1.6.0.
    ReleaseCandidate,
    /// 1.6.0 and 1.6.1.
    Classic,
    /// 1.6.2 onwards, with camel-case directories.
    Modern,
}

impl TemplateLayout {
    fn base(&self) -> &'static str {
        match self {
            Self::Modern => "org/codehaus/groovy/tools/groovydoc/gstringTemplates/",
            _ => "org/codehaus/groovy/tools/groovydoc/gstring-templates/",
        }
    }

    fn dir(&self, modern: &str, classic: &str) -> String {
        match self {
            Self::Modern => format!("{}{modern}/", self.base()),
            _ => format!("{}{classic}/", self.base()),
        }
    }

    /// Top-level page templates.
    pub fn doc_templates(&self) -> Vec<String> {
        let dir = self.dir("topLevel", "top-level");
        let pages: &[&str] = match self {
            Self::Modern | Self::Classic => &[
                "index.html",
                "overview-frame.html",
                "allclasses-frame.html",
                "overview-summary.html",
                "help-doc.html",
                "index-all.html",
                "deprecated-list.html",
                "stylesheet.css",
                "inherit.gif",
            ],
            Self::ReleaseCandidate => &[
                "index.html",
                "overview-frame.html",
                "allclasses-frame.html",
                "overview-summary.html",
                "stylesheet.css",
                "inherit.gif",
            ],
            Self::Legacy => &[
                "index.html",
                "overview-frame.html",
                "allclasses-frame.html",
                "overview-summary.html",
                "stylesheet.css",
            ],
        };

        let mut templates: Vec<String> = pages.iter().map(|p| format!("{dir}{p}")).collect();
        if *self == Self::Modern {
            templates.push(format!("{DOCGEN_BASE}groovy.ico"));
        }
        templates
    }

    pub fn package_templates(&self) -> Vec<String> {
        let dir = self.dir("packageLevel", "package-level");
        vec![
            format!("{dir}package-frame.html"),
            format!("{dir}package-summary.html"),
        ]
    }

    pub fn class_templates(&self) -> Vec<String> {
        let dir = self.dir("classLevel", "class-level");
        vec![format!("{dir}classDocName.html")]
    }
}

#[cfg(test)]
mod tests {
    use super::TemplateLayout;

    #[test]
    fn modern_layout_adds_icon() {
        let docs = TemplateLayout::Modern.doc_templates();
        assert_eq!(docs.len(), 10);
        assert_eq!(docs.last().map(String::as_str), Some("org/codehaus/groovy/tools/groovy.ico"));
        assert!(docs[0].ends_with("gstringTemplates/topLevel/index.html"));
    }

    #[test]
    fn older_layouts_shrink() {
        assert_eq!(TemplateLayout::Classic.doc_templates().len(), 9);
        assert_eq!(TemplateLayout::ReleaseCandidate.doc_templates().len(), 6);
        assert_eq!(TemplateLayout::Legacy.doc_templates().len(), 5);
        assert_eq!(
            TemplateLayout::Legacy.class_templates(),
            vec!["org/codehaus/groovy/tools/groovydoc/gstring-templates/class-level/classDocName.html"]
        );
    }
}
