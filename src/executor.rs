//! Query execution against a note corpus.
//!
//! The pipeline runs in a fixed order, each step a pure transformation of
//! the previous one:
//!
//! 1. FROM - folder prefix / tag match
//! 2. WHERE - keep notes whose condition is truthy
//! 3. rows - one per note (one per task for TASK queries)
//! 4. FLATTEN - array-valued cells expand into one row per element
//! 5. SORT - stable, composite, first clause primary
//! 6. GROUP BY - bucket rows by the grouping value, groups ordered by key
//! 7. LIMIT - truncate groups when grouping, rows otherwise
//!
//! Sorting before bucketing is equivalent to sorting inside each bucket,
//! because both the sort and the bucketing are stable.

use std::cmp::Ordering;

use serde::{Serialize, Serializer, ser::SerializeMap};
use tracing::debug;

use crate::{
    ast::{Direction, Query, QueryType, SortClause, Source},
    config::EngineConfig,
    error::Result,
    evaluator::Evaluator,
    fields::FieldResolver,
    note::Note,
    parser,
    tasks::{self, Task},
    value::Value,
};

/// One output row: column name to value, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    pub fn new(cells: Vec<(String, Value)>) -> Self {
        Row { cells }
    }

    /// First cell with the given column name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.cells.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn cells(&self) -> &[(String, Value)] {
        &self.cells
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultGroup {
    /// Grouping value; `None` for the single group of an ungrouped result
    pub key: Option<Value>,
    pub rows: Vec<Row>,
    /// Populated by TASK queries only
    pub tasks: Vec<Task>,
}

/// Structured result of a query, ready for [`crate::output::render`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub query_type: QueryType,
    /// TABLE headers; `[display]` for LIST, `[display, date]` for CALENDAR
    pub columns: Vec<String>,
    pub grouped: bool,
    pub groups: Vec<ResultGroup>,
}

impl ResultSet {
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }

    pub fn task_count(&self) -> usize {
        self.groups.iter().map(|g| g.tasks.len()).sum()
    }
}

struct WorkRow<'n> {
    note: &'n Note,
    cells: Vec<Value>,
    group: Value,
    task: Option<Task>,
}

/// Runs parsed queries. Holds no state between calls.
pub struct Executor<'c> {
    config: &'c EngineConfig,
    resolver: FieldResolver,
}

impl<'c> Executor<'c> {
    pub fn new(config: &'c EngineConfig) -> Self {
        Executor {
            config,
            resolver: config.resolver(),
        }
    }

    pub fn execute(&self, query: &Query, corpus: &[Note]) -> Result<ResultSet> {
        parser::validate(query)?;
        let evaluator = Evaluator::new(&self.resolver);

        let mut notes: Vec<&Note> = corpus
            .iter()
            .filter(|note| {
                query
                    .from_source
                    .as_ref()
                    .is_none_or(|source| source_matches(source, note))
            })
            .collect();
        debug!(corpus = corpus.len(), matched = notes.len(), "applied FROM");

        if let Some(condition) = &query.where_clause {
            let mut kept = Vec::with_capacity(notes.len());
            for note in notes {
                if evaluator.matches(condition, note)? {
                    kept.push(note);
                }
            }
            notes = kept;
            debug!(matched = notes.len(), "applied WHERE");
        }

        let columns = self.columns(query);
        let mut rows = self.build_rows(query, &notes, &evaluator)?;

        if query.flatten {
            rows = rows.into_iter().flat_map(flatten_row).collect();
            debug!(rows = rows.len(), "applied FLATTEN");
        }

        if !query.sort.is_empty() {
            let mut keyed: Vec<(Vec<Value>, WorkRow<'_>)> = rows
                .into_iter()
                .map(|row| (self.sort_keys(&query.sort, &columns, &row), row))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, &query.sort));
            rows = keyed.into_iter().map(|(_, row)| row).collect();
        }

        let grouped = query.group_by.is_some();
        let mut buckets: Vec<(Option<Value>, Vec<WorkRow<'_>>)> = if grouped {
            group_rows(rows)
        } else {
            vec![(None, rows)]
        };

        if let Some(limit) = query.limit {
            if grouped {
                buckets.truncate(limit);
            } else if let Some((_, rows)) = buckets.first_mut() {
                rows.truncate(limit);
            }
        }

        let groups: Vec<ResultGroup> = buckets
            .into_iter()
            .map(|(key, rows)| to_group(key, rows, &columns))
            .collect();
        let result = ResultSet {
            query_type: query.query_type,
            columns,
            grouped,
            groups,
        };
        debug!(
            query_type = %result.query_type,
            groups = result.groups.len(),
            rows = result.row_count(),
            tasks = result.task_count(),
            "query executed"
        );
        Ok(result)
    }

    fn columns(&self, query: &Query) -> Vec<String> {
        match query.query_type {
            QueryType::Table => query.fields.iter().map(|f| f.header()).collect(),
            QueryType::List => vec![self.config.list_display_field.clone()],
            QueryType::Calendar => vec![
                self.config.list_display_field.clone(),
                self.config.calendar_field.clone(),
            ],
            QueryType::Task => Vec::new(),
        }
    }

    fn build_rows<'n>(
        &self,
        query: &Query,
        notes: &[&'n Note],
        evaluator: &Evaluator<'_>,
    ) -> Result<Vec<WorkRow<'n>>> {
        let mut rows = Vec::with_capacity(notes.len());
        for &note in notes {
            let group = match &query.group_by {
                Some(field) => self.resolver.resolve(note, field),
                None => Value::Null,
            };

            match query.query_type {
                QueryType::Table => {
                    let cells = query
                        .fields
                        .iter()
                        .map(|field| evaluator.evaluate(&field.expression, note))
                        .collect::<std::result::Result<Vec<_>, _>>()?;
                    rows.push(WorkRow { note, cells, group, task: None });
                }
                QueryType::List => {
                    let cells = vec![self.resolver.resolve(note, &self.config.list_display_field)];
                    rows.push(WorkRow { note, cells, group, task: None });
                }
                QueryType::Calendar => {
                    let cells = vec![
                        self.resolver.resolve(note, &self.config.list_display_field),
                        self.resolver.resolve(note, &self.config.calendar_field),
                    ];
                    rows.push(WorkRow { note, cells, group, task: None });
                }
                QueryType::Task => {
                    rows.extend(tasks::extract(&note.content).into_iter().map(|task| WorkRow {
                        note,
                        cells: Vec::new(),
                        group: group.clone(),
                        task: Some(task),
                    }));
                }
            }
        }
        Ok(rows)
    }

    /// A sort field naming a column (header or alias) sorts by that cell, so
    /// flattened values sort element-wise; other names resolve on the note.
    fn sort_keys(&self, clauses: &[SortClause], columns: &[String], row: &WorkRow<'_>) -> Vec<Value> {
        clauses
            .iter()
            .map(|clause| {
                columns
                    .iter()
                    .position(|c| *c == clause.field)
                    .and_then(|i| row.cells.get(i).cloned())
                    .unwrap_or_else(|| self.resolver.resolve(row.note, &clause.field))
            })
            .collect()
    }
}

fn source_matches(source: &Source, note: &Note) -> bool {
    match source {
        Source::Folder(folder) => note.in_folder(folder),
        Source::Tag(tag) => note.has_tag(tag),
        Source::And(left, right) => source_matches(left, note) && source_matches(right, note),
        Source::Or(left, right) => source_matches(left, note) || source_matches(right, note),
    }
}

/// Cartesian expansion over every non-empty array cell, group key last.
fn flatten_row(row: WorkRow<'_>) -> Vec<WorkRow<'_>> {
    let WorkRow { note, cells, group, task } = row;
    let mut combos: Vec<Vec<Value>> = vec![Vec::with_capacity(cells.len() + 1)];

    for value in cells.into_iter().chain(std::iter::once(group)) {
        combos = match value {
            Value::Array(items) if !items.is_empty() => combos
                .into_iter()
                .flat_map(|combo| {
                    items.iter().map(move |item| {
                        let mut next = combo.clone();
                        next.push(item.clone());
                        next
                    })
                })
                .collect(),
            single => combos
                .into_iter()
                .map(|mut combo| {
                    combo.push(single.clone());
                    combo
                })
                .collect(),
        };
    }

    combos
        .into_iter()
        .map(|mut combo| {
            let group = combo.pop().unwrap_or(Value::Null);
            WorkRow {
                note,
                cells: combo,
                group,
                task: task.clone(),
            }
        })
        .collect()
}

fn group_rows(rows: Vec<WorkRow<'_>>) -> Vec<(Option<Value>, Vec<WorkRow<'_>>)> {
    let mut groups: Vec<(Value, Vec<WorkRow<'_>>)> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|(key, _)| key.loose_eq(&row.group)) {
            Some((_, members)) => members.push(row),
            None => groups.push((row.group.clone(), vec![row])),
        }
    }
    groups.sort_by(|(a, _), (b, _)| sort_cmp(a, b, Direction::Asc));
    groups.into_iter().map(|(key, rows)| (Some(key), rows)).collect()
}

fn to_group(key: Option<Value>, rows: Vec<WorkRow<'_>>, columns: &[String]) -> ResultGroup {
    let mut group = ResultGroup {
        key,
        rows: Vec::new(),
        tasks: Vec::new(),
    };
    for row in rows {
        match row.task {
            Some(task) => group.tasks.push(task),
            None => group.rows.push(Row::new(
                columns.iter().cloned().zip(row.cells).collect(),
            )),
        }
    }
    group
}

fn compare_keys(a: &[Value], b: &[Value], clauses: &[SortClause]) -> Ordering {
    a.iter()
        .zip(b)
        .zip(clauses)
        .map(|((x, y), clause)| sort_cmp(x, y, clause.direction))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Total order used by SORT and group ordering: values of different types
/// order by a fixed type rank, same-typed values by their natural order,
/// nulls last when ascending. Dates and strings are never cross-compared.
pub fn sort_cmp(a: &Value, b: &Value, direction: Direction) -> Ordering {
    let ordering = match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match type_rank(a).cmp(&type_rank(b)) {
            Ordering::Equal => a.compare(b).unwrap_or(Ordering::Equal),
            by_type => by_type,
        },
    };
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Boolean(_) => 0,
        Value::Integer(_) | Value::Float(_) => 1,
        Value::Date(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
        Value::Null => 6,
    }
}

/// Run a parsed query with the given configuration.
pub fn execute(query: &Query, corpus: &[Note], config: &EngineConfig) -> Result<ResultSet> {
    Executor::new(config).execute(query, corpus)
}
