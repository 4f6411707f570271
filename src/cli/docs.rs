//! Built-in language reference for the dataview CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Sources,
    Expressions,
    Functions,
    Fields,
    Output,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "syntax" | "query" | "queries" => Some(Self::Syntax),
            "sources" | "source" | "from" => Some(Self::Sources),
            "expressions" | "expression" | "operators" | "ops" => Some(Self::Expressions),
            "functions" | "function" | "fns" => Some(Self::Functions),
            "fields" | "field" | "file-fields" => Some(Self::Fields),
            "output" | "rendering" | "render" => Some(Self::Output),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r##"DATAVIEW DOCUMENTATION

Dataview queries select, filter, sort, and group markdown notes by their
frontmatter and file metadata, and render the result as markdown. Queries live
in ```dataview fenced blocks; single expressions live in inline `= expr` spans.

DOCUMENTATION CATEGORIES

  syntax            Query types and clause order
  sources           FROM: folders, tags, and their combinations
  expressions       Literals, comparisons, AND / OR, precedence
  functions         contains, length, lower, upper
  fields            file.* fields and frontmatter resolution
  output            Tables, lists, task lists, calendars, and errors

QUICK REFERENCE

  TABLE a, b AS "B"     Table with two columns
  LIST                  Bullet list of note names
  TASK                  Task items of matching notes
  CALENDAR              Notes bucketed by day
  FROM "folder"         Notes under a folder
  FROM "#tag"           Notes carrying a tag
  WHERE expr            Keep notes where expr is truthy
  SORT f DESC           Order rows
  GROUP BY f            One heading per distinct value
  LIMIT n               Keep the first n rows (or groups)

Run 'dataview doc <category>' for detailed documentation.
"##
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Sources) => Ok(SOURCES_DOC),
        Some(DocCategory::Expressions) => Ok(EXPRESSIONS_DOC),
        Some(DocCategory::Functions) => Ok(FUNCTIONS_DOC),
        Some(DocCategory::Fields) => Ok(FIELDS_DOC),
        Some(DocCategory::Output) => Ok(OUTPUT_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r##"SYNTAX - Query Types and Clause Order

QUERY SHAPE
  <TYPE> [fields] [FROM source] [WHERE expr] [GROUP BY field] [FLATTEN]
         [SORT field [ASC|DESC], ...] [LIMIT n]

    Clauses are optional but must appear in this order. Keywords are
    case-insensitive; field names are not.

QUERY TYPES
  TABLE field [AS alias], ...
    One row per note, one column per field. Headers are the alias, or the
    field expression as written. Headers must be unique.

    Example:
      TABLE title, status AS "State" WHERE status != "done"

  LIST
    One bullet per note showing the display field (file.name by default).

  TASK
    One entry per task item ("- [ ] text" / "- [x] text") in matching notes.

  CALENDAR
    Notes bucketed by the day of their calendar field (file.ctime by default).

    Constraints:
      - Only TABLE takes a field list
      - A trailing comma in the field list is a syntax error

FLATTEN
    Rows whose cells hold arrays expand into one row per element. Several
    array cells expand to every combination.

GROUP BY field
    Rows bucketed by the field's value; one ### heading per group,
    groups ordered by value, notes without a value under "(none)".

SORT field [ASC|DESC], ...
    Stable sort; the first clause is primary. Nulls sort last ascending and
    first descending.

LIMIT n
    Keep the first n rows, or the first n groups when grouped.
"##;

const SOURCES_DOC: &str = r##"SOURCES - Choosing Notes with FROM

FOLDERS
  FROM "projects/active"
    Notes in the folder or any folder beneath it. Matching is by path
    segment: "proj" does not match "projects".

TAGS
  FROM "#project"
    Notes tagged #project, or any nested tag such as #project/alpha. Tags come
    from the frontmatter "tags" field and from #tags in the note body.

COMBINATIONS
  FROM "#project" AND "work"
  FROM ("#a" OR "#b") AND "archive"
    AND binds tighter than OR; parentheses group.

    Constraints:
      - Without FROM every note is a candidate
"##;

const EXPRESSIONS_DOC: &str = r##"EXPRESSIONS - Values, Comparisons, and Logic

LITERALS
  "text"  'text'      Strings, with \" \' \\ \n \t escapes
  42  3.5             Integers and floats
  true  false  null   Case-insensitive
  [1, "a", true]      Arrays

FIELDS
  status              Frontmatter field
  project.owner       Nested frontmatter
  file.name           Built-in file field (see 'dataview doc fields')

COMPARISON OPERATORS
  =  !=  <  >  <=  >=

  Examples:
    priority >= 2
    status = "active"

  Constraints:
    - Integers and floats compare numerically (2 = 2.0)
    - Any other mix of types is unequal and unordered
    - Ordering against null is always false; null = null is true
    - Chains such as a < b < c are a syntax error

LOGICAL OPERATORS
  AND  OR
    Operands coerce by truthiness: null, false, 0, "" and [] are false.

PRECEDENCE (lowest first)
  OR, AND, comparisons. Parentheses override.

    a OR b AND c      is  a OR (b AND c)
"##;

const FUNCTIONS_DOC: &str = r##"FUNCTIONS - Built-in Calls

  contains(haystack, needle)
    Array membership, or substring test on strings.

    Example:
      WHERE contains(tags, "urgent")

  length(value)
    Number of array elements or characters in a string; 0 for anything else.

  lower(text)  upper(text)
    Case conversion. Non-strings pass through unchanged.

    Constraints:
      - Function names are case-insensitive
      - Unknown names and wrong argument counts are execution errors
"##;

const FIELDS_DOC: &str = r##"FIELDS - Resolution Order

FILE FIELDS
  file.name           Note title
  file.link           [[title]] wikilink
  file.path           Path of the note
  file.folder         Folder containing the note
  file.size           Content length in bytes
  file.ctime          Creation time
  file.mtime          Modification time
  file.tags           Tags from frontmatter and body

RESOLUTION
  1. file.* names are reserved and always mean the built-in value
  2. Frontmatter key with exactly this name
  3. Dotted path into nested frontmatter objects
  4. Note attributes: title, path, folder, content, created_at, updated_at
  5. Otherwise null

ALIASES
    --alias created=file.ctime makes "created" another name for file.ctime.
"##;

const OUTPUT_DOC: &str = r##"OUTPUT - Rendering Results

TABLE
  | title | status |
  | --- | --- |
  | A | active |

  Booleans render as ✓ / ✗, null as an empty cell, arrays comma-joined.
  Pipes in cells are escaped.

LIST
  - A
  - B

TASK
  - [ ] open item
    - [x] nested done item

CALENDAR
  ### 2024-01-31

  - A

EMPTY RESULTS
  _No results_        (_No tasks_ for TASK queries)

ERRORS
  A failing block renders as
    > [!error] Dataview: <message>
  and a failing inline span as
    `Dataview error: <message>`
  Other blocks in the document still render.
"##;
