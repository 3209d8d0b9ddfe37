//! Typed access to the PEP 621 `[project]` table of a `pyproject.toml`.
//!
//! [`ProjectParser`] is a concrete [`Schema`] over the `[project]` table. It
//! extracts the core metadata keys, checks their types with path-qualified
//! messages, and folds the result into a [`ProjectMetadata`].
//!
//! ```rust
//! use typed_toml::project::ProjectParser;
//! use typed_toml::{loads, TomlDecoder};
//!
//! let doc = loads(
//!     "[project]\nname = \"spam\"\nversion = \"2020.0.0\"\nkeywords = [\"egg\", \"bacon\"]\n",
//!     &TomlDecoder::pure(),
//! )
//! .unwrap();
//!
//! let project = ProjectParser::new().parse_document(&doc).unwrap();
//! assert_eq!(project.name, "spam");
//! assert_eq!(project.keywords, vec!["bacon", "egg"]);
//! ```

use crate::{Error, Result, Schema, Table};
use indexmap::IndexMap;
use serde::Serialize;

/// Where users are sent when their `[project]` table is unusable.
pub const PEP621_DOCS: &str = "https://peps.python.org/pep-0621/";

/// One parsed key of the `[project]` table.
#[derive(Clone, Debug, PartialEq)]
pub enum ProjectField {
    Name(String),
    Description(String),
    Keywords(Vec<String>),
    Classifiers(Vec<String>),
    Urls(IndexMap<String, String>),
    Scripts(IndexMap<String, String>),
    GuiScripts(IndexMap<String, String>),
    EntryPoints(IndexMap<String, IndexMap<String, String>>),
    Dependencies(Vec<String>),
}

/// Project metadata with every recognized key converted.
///
/// Absent keys leave their field empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classifiers: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub urls: IndexMap<String, String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub scripts: IndexMap<String, String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub gui_scripts: IndexMap<String, String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub entry_points: IndexMap<String, IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl ProjectMetadata {
    fn apply(&mut self, field: ProjectField) {
        match field {
            ProjectField::Name(name) => self.name = name,
            ProjectField::Description(description) => self.description = Some(description),
            ProjectField::Keywords(keywords) => self.keywords = keywords,
            ProjectField::Classifiers(classifiers) => self.classifiers = classifiers,
            ProjectField::Urls(urls) => self.urls = urls,
            ProjectField::Scripts(scripts) => self.scripts = scripts,
            ProjectField::GuiScripts(scripts) => self.gui_scripts = scripts,
            ProjectField::EntryPoints(groups) => self.entry_points = groups,
            ProjectField::Dependencies(dependencies) => self.dependencies = dependencies,
        }
    }
}

/// Parser for the `[project]` table.
#[derive(Debug)]
pub struct ProjectParser {
    schema: Schema<ProjectField>,
}

impl Default for ProjectParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectParser {
    #[must_use]
    pub fn new() -> Self {
        let schema = Schema::new(["project"])
            .field("name", |f| f.str().map(ProjectField::Name))
            .field("description", |f| f.str().map(ProjectField::Description))
            .field("keywords", |f| f.string_set().map(ProjectField::Keywords))
            .field("classifiers", |f| f.string_set().map(ProjectField::Classifiers))
            .field("urls", |f| f.string_table().map(ProjectField::Urls))
            .field("scripts", |f| f.string_table().map(ProjectField::Scripts))
            .field("gui-scripts", |f| f.string_table().map(ProjectField::GuiScripts))
            .field("entry-points", |f| f.nested_string_tables().map(ProjectField::EntryPoints))
            .field("dependencies", |f| f.string_set().map(ProjectField::Dependencies));

        ProjectParser { schema }
    }

    /// The underlying schema.
    #[must_use]
    pub fn schema(&self) -> &Schema<ProjectField> {
        &self.schema
    }

    /// Parses the `[project]` table into its raw per-key results.
    pub fn parse_fields(&self, project: &Table) -> Result<IndexMap<String, ProjectField>> {
        self.schema.parse(project)
    }

    /// Parses the `[project]` table.
    ///
    /// # Errors
    ///
    /// Type errors from the individual keys, then [`Error::BadConfig`] when
    /// `name` is missing.
    pub fn parse(&self, project: &Table) -> Result<ProjectMetadata> {
        let fields = self.parse_fields(project)?;

        if !fields.contains_key("name") {
            return Err(Error::bad_config_with_docs(
                "The 'project.name' field must be provided.",
                format!("{}#name", PEP621_DOCS),
            ));
        }

        let mut metadata = ProjectMetadata::default();
        for (_, field) in fields {
            metadata.apply(field);
        }
        Ok(metadata)
    }

    /// Finds the `[project]` table of a whole document and parses it.
    pub fn parse_document(&self, document: &Table) -> Result<ProjectMetadata> {
        let project = document.get("project").ok_or_else(|| {
            Error::bad_config_with_docs(
                "The '[project]' table was not found.",
                PEP621_DOCS,
            )
        })?;
        crate::validate::assert_type(project, crate::ValueType::Table, self.schema.root())?;

        match project.detach().as_table() {
            Some(table) => self.parse(table),
            None => Err(Error::bad_config("The '[project]' table is not a table.")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{loads, TomlDecoder};

    const MINIMAL_CONFIG: &str = "[project]\nname = \"spam\"\nversion = \"2020.0.0\"";

    fn parse(config: &str) -> Result<ProjectMetadata> {
        let doc = loads(config, &TomlDecoder::pure())?;
        ProjectParser::new().parse_document(&doc)
    }

    fn with_minimal(extra: &str) -> String {
        format!("{}\n{}", MINIMAL_CONFIG, extra)
    }

    #[test]
    fn test_minimal() {
        let project = parse(MINIMAL_CONFIG).unwrap();
        assert_eq!(
            project,
            ProjectMetadata {
                name: "spam".to_string(),
                ..ProjectMetadata::default()
            }
        );
    }

    #[test]
    fn test_description() {
        let project =
            parse(&with_minimal("description = \"Lovely Spam! Wonderful Spam!\"")).unwrap();
        assert_eq!(
            project.description.as_deref(),
            Some("Lovely Spam! Wonderful Spam!")
        );
    }

    #[test]
    fn test_keywords_are_sorted() {
        let project = parse(&with_minimal(
            "keywords = [\"egg\", \"bacon\", \"sausage\", \"tomatoes\", \"Lobster Thermidor\"]",
        ))
        .unwrap();
        assert_eq!(
            project.keywords,
            vec!["Lobster Thermidor", "bacon", "egg", "sausage", "tomatoes"]
        );
    }

    #[test]
    fn test_classifiers() {
        let project = parse(&with_minimal(
            "classifiers = [\n  \"Development Status :: 4 - Beta\",\n  \"Programming Language :: Python\"\n]",
        ))
        .unwrap();
        assert_eq!(
            project.classifiers,
            vec![
                "Development Status :: 4 - Beta",
                "Programming Language :: Python"
            ]
        );
    }

    #[test]
    fn test_dependencies() {
        let project = parse(&with_minimal(
            "dependencies = [\n  \"httpx\",\n  \"gidgethub[httpx]>4.0.0\",\n  \"django>2.1; os_name != 'nt'\",\n  \"django>2.0; os_name == 'nt'\"\n]",
        ))
        .unwrap();
        assert_eq!(
            project.dependencies,
            vec![
                "django>2.0; os_name == 'nt'",
                "django>2.1; os_name != 'nt'",
                "gidgethub[httpx]>4.0.0",
                "httpx",
            ]
        );
    }

    #[test]
    fn test_urls_keep_document_order() {
        let project = parse(&with_minimal(
            "\n[project.urls]\nhomepage = \"example.com\"\ndocumentation = \"readthedocs.org\"\nrepository = \"github.com\"\nchangelog = \"github.com/me/spam/blob/master/CHANGELOG.md\"\n",
        ))
        .unwrap();
        let keys: Vec<_> = project.urls.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["homepage", "documentation", "repository", "changelog"]
        );
        assert_eq!(project.urls["repository"], "github.com");
    }

    #[test]
    fn test_unicode() {
        let project = parse(&with_minimal(
            "description = \"Factory ⸻ A code generator 🏭\"\nauthors = [{name = \"Łukasz Langa\"}]",
        ))
        .unwrap();
        assert_eq!(
            project.description.as_deref(),
            Some("Factory ⸻ A code generator 🏭")
        );
    }

    #[test]
    fn test_entry_points_and_scripts() {
        let project = parse(&with_minimal(
            "scripts = { spam-cli = \"spam:main_cli\" }\ngui-scripts = { spam-gui = \"spam:main_gui\" }\n\n[project.entry-points.\"spam.magical\"]\ntomatoes = \"spam:main_tomatoes\"\n",
        ))
        .unwrap();
        assert_eq!(project.scripts["spam-cli"], "spam:main_cli");
        assert_eq!(project.gui_scripts["spam-gui"], "spam:main_gui");
        assert_eq!(
            project.entry_points["spam.magical"]["tomatoes"],
            "spam:main_tomatoes"
        );
    }

    #[test]
    fn test_wrong_types() {
        let cases = [
            (
                "keywords = [1, 2, 3, 4, 5]",
                "Invalid type for 'project.keywords[0]': expected string, got integer",
            ),
            (
                "description = [1, 2, 3, 4, 5]",
                "Invalid type for 'project.description': expected string, got array",
            ),
            (
                "description = 12345",
                "Invalid type for 'project.description': expected string, got integer",
            ),
            (
                "classifiers = [1, 2, 3, 4, 5]",
                "Invalid type for 'project.classifiers[0]': expected string, got integer",
            ),
            (
                "dependencies = [1, 2, 3, 4, 5]",
                "Invalid type for 'project.dependencies[0]': expected string, got integer",
            ),
            (
                "urls = {foo = 1234}",
                "Invalid value type for 'project.urls.foo': expected string, got integer",
            ),
        ];

        for (extra, message) in cases {
            let err = parse(&with_minimal(extra)).unwrap_err();
            assert!(err.is_type_error(), "{}", extra);
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn test_missing_name_points_at_docs() {
        let err = parse("[project]\nversion = \"1.0\"").unwrap_err();
        assert!(matches!(err, Error::BadConfig { .. }));
        assert_eq!(
            err.documentation(),
            Some("https://peps.python.org/pep-0621/#name")
        );
    }

    #[test]
    fn test_missing_project_table() {
        let err = parse("[tool.spam]\nkey = 1").unwrap_err();
        assert_eq!(err.to_string(), "The '[project]' table was not found.");
    }

    #[test]
    fn test_project_must_be_table() {
        let err = parse("project = \"spam\"").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid type for 'project': expected table, got string"
        );
    }

    #[test]
    fn test_schema_declares_keys_in_order() {
        let parser = ProjectParser::new();
        let keys: Vec<_> = parser.schema().keys().collect();
        assert_eq!(
            keys,
            vec![
                "name",
                "description",
                "keywords",
                "classifiers",
                "urls",
                "scripts",
                "gui-scripts",
                "entry-points",
                "dependencies",
            ]
        );
    }
}
