//! Query grammar: renders [`Statement`] trees as SQL.

use tracing::debug;

use crate::dialect::{Dialect, GenericDialect, LockSupport};
use crate::error::{Result, TranslationError};
use crate::query::{
    Column, ConflictAction, Delete, Direction, Insert, Join, JoinKind, Lock, Operand, Operator, Order,
    Predicate, Query, SelectItem, Statement, TableRef, Truncate, Update, WhereClause,
};
use crate::value::SqlValue;

use super::{CompiledStatement, SqlWriter};

/// Compiles statements into SQL for one dialect.
///
/// Compilation is pure: the same statement always yields the same SQL and
/// parameters. The whole tree is validated before rendering starts.
pub trait QueryGrammar: Send + Sync {
    /// Returns the dialect this grammar targets.
    fn dialect(&self) -> &dyn Dialect;

    /// Compiles a statement.
    ///
    /// # Errors
    ///
    /// Returns a [`TranslationError`] when the statement references an
    /// unknown table or alias, has malformed rows, uses invalid identifiers
    /// or needs a feature the dialect lacks.
    fn compile(&self, statement: &Statement) -> Result<CompiledStatement> {
        validate(statement)?;
        let mut w = SqlWriter::new(self.dialect());
        match statement {
            Statement::Select(query) => self.compile_select(query, &mut w)?,
            Statement::Insert(insert) => self.compile_insert(insert, &mut w)?,
            Statement::Update(update) => self.compile_update(update, &mut w)?,
            Statement::Delete(delete) => self.compile_delete(delete, &mut w)?,
            Statement::Truncate(truncate) => self.compile_truncate(truncate, &mut w)?,
        }
        Ok(w.finish())
    }

    /// Renders a SELECT (also used for sub-queries).
    fn compile_select(&self, query: &Query, w: &mut SqlWriter<'_>) -> Result<()> {
        w.push("SELECT ");
        if query.distinct {
            w.push("DISTINCT ");
        }
        if query.columns.is_empty() {
            w.push("*");
        }
        for (i, item) in query.columns.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            self.write_select_item(item, w)?;
        }
        w.push(" FROM ");
        self.write_table(&query.table, w)?;
        for join in &query.joins {
            self.write_join(join, w)?;
        }
        self.write_conditions(" WHERE ", &query.wheres, w)?;
        if !query.groups.is_empty() {
            w.push(" GROUP BY ");
            for (i, column) in query.groups.iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                self.write_column(column, w)?;
            }
        }
        self.write_conditions(" HAVING ", &query.havings, w)?;
        self.write_orders(&query.orders, w)?;
        if let Some(limit) = query.limit {
            w.push(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = query.offset {
            w.push(&format!(" OFFSET {offset}"));
        }
        if let Some(lock) = self.lock_clause(query) {
            w.push(" ");
            w.push(&lock);
        }
        Ok(())
    }

    /// Renders an INSERT.
    fn compile_insert(&self, insert: &Insert, w: &mut SqlWriter<'_>) -> Result<()> {
        let dialect = self.dialect();
        if insert.replace && insert.on_conflict.is_some() {
            return Err(TranslationError::invalid_operation(
                "insert",
                &insert.table,
                "replace and conflict handling cannot be combined",
            ));
        }
        if insert.replace {
            if !dialect.supports_upsert_statement() {
                return Err(TranslationError::unsupported(
                    "replacing inserts",
                    dialect.name(),
                ));
            }
            w.push("UPSERT INTO ");
        } else {
            w.push("INSERT INTO ");
        }
        w.push_identifier(&insert.table, "insert")?;
        if insert.columns.is_empty() {
            w.push(" DEFAULT VALUES");
        } else {
            w.push(" (");
            w.push_identifier_list(&insert.columns, "insert")?;
            w.push(") VALUES ");
            for (i, row) in insert.rows.iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                w.push("(");
                for (j, value) in row.iter().enumerate() {
                    if j > 0 {
                        w.push(", ");
                    }
                    w.push_param(value.clone());
                }
                w.push(")");
            }
        }
        if let Some(conflict) = &insert.on_conflict {
            if !dialect.supports_upsert() {
                return Err(TranslationError::unsupported("ON CONFLICT", dialect.name()));
            }
            w.push(" ON CONFLICT");
            if !conflict.target.is_empty() {
                w.push(" (");
                w.push_identifier_list(&conflict.target, "on conflict")?;
                w.push(")");
            }
            match &conflict.action {
                ConflictAction::Update(columns) if !columns.is_empty() => {
                    if conflict.target.is_empty() {
                        return Err(TranslationError::invalid_operation(
                            "insert",
                            &insert.table,
                            "an updating conflict clause needs a target",
                        ));
                    }
                    w.push(" DO UPDATE SET ");
                    for (i, column) in columns.iter().enumerate() {
                        if i > 0 {
                            w.push(", ");
                        }
                        w.push_identifier(column, "on conflict")?;
                        w.push(" = excluded.");
                        w.push_identifier(column, "on conflict")?;
                    }
                }
                _ => w.push(" DO NOTHING"),
            }
        }
        self.write_returning(&insert.returning, w)
    }

    /// Renders an UPDATE.
    fn compile_update(&self, update: &Update, w: &mut SqlWriter<'_>) -> Result<()> {
        if update.assignments.is_empty() {
            return Err(TranslationError::invalid_operation(
                "update",
                &update.table.name,
                "no columns to update",
            ));
        }
        self.check_limited_mutation("UPDATE", !update.orders.is_empty(), update.limit)?;
        w.push("UPDATE ");
        self.write_table(&update.table, w)?;
        w.push(" SET ");
        for (i, (column, operand)) in update.assignments.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            // SET targets are never qualified.
            w.push_identifier(&Column::parse(column).name, "update")?;
            w.push(" = ");
            self.write_operand(operand, w)?;
        }
        let join_conditions = self.write_mutation_joins("UPDATE", " FROM ", &update.joins, w)?;
        self.write_joined_conditions(&join_conditions, &update.wheres, w)?;
        self.write_orders(&update.orders, w)?;
        if let Some(limit) = update.limit {
            w.push(&format!(" LIMIT {limit}"));
        }
        self.write_returning(&update.returning, w)
    }

    /// Renders a DELETE.
    fn compile_delete(&self, delete: &Delete, w: &mut SqlWriter<'_>) -> Result<()> {
        self.check_limited_mutation("DELETE", !delete.orders.is_empty(), delete.limit)?;
        w.push("DELETE FROM ");
        self.write_table(&delete.table, w)?;
        let join_conditions = self.write_mutation_joins("DELETE", " USING ", &delete.joins, w)?;
        self.write_joined_conditions(&join_conditions, &delete.wheres, w)?;
        self.write_orders(&delete.orders, w)?;
        if let Some(limit) = delete.limit {
            w.push(&format!(" LIMIT {limit}"));
        }
        self.write_returning(&delete.returning, w)
    }

    /// Renders a TRUNCATE.
    fn compile_truncate(&self, truncate: &Truncate, w: &mut SqlWriter<'_>) -> Result<()> {
        w.push("TRUNCATE TABLE ");
        w.push_identifier(&truncate.table, "truncate")?;
        w.push(" RESTART IDENTITY");
        if truncate.cascade {
            w.push(" CASCADE");
        }
        Ok(())
    }

    /// Returns the lock clause to emit for `query`, if any.
    ///
    /// Strengths the dialect lacks are substituted or dropped according to
    /// [`Dialect::lock_support`]; locks on aggregated results and raw locks
    /// that are not `FOR ...` clauses are dropped.
    fn lock_clause(&self, query: &Query) -> Option<String> {
        let lock = query.lock.as_ref()?;
        let dialect = self.dialect();
        if query.is_aggregated() {
            debug!(
                dialect = dialect.name(),
                table = %query.table.name,
                "Omitting row lock on aggregated query"
            );
            return None;
        }
        match lock {
            Lock::Raw(raw) => {
                let trimmed = raw.trim();
                if trimmed
                    .get(..4)
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case("FOR "))
                {
                    Some(String::from(trimmed))
                } else {
                    debug!(dialect = dialect.name(), lock = %raw, "Omitting unrecognised lock clause");
                    None
                }
            }
            Lock::Row { strength, wait } => {
                let mut clause = match dialect.lock_support(*strength) {
                    LockSupport::Native => String::from(strength.as_sql()),
                    LockSupport::Substitute(other) => {
                        debug!(
                            dialect = dialect.name(),
                            requested = strength.as_sql(),
                            emitted = other.as_sql(),
                            "Substituting lock strength"
                        );
                        String::from(other.as_sql())
                    }
                    LockSupport::Omit => {
                        debug!(
                            dialect = dialect.name(),
                            requested = strength.as_sql(),
                            "Omitting unsupported lock strength"
                        );
                        return None;
                    }
                };
                if let Some(modifier) = wait.as_sql() {
                    if dialect.supports_lock_wait(*wait) {
                        clause.push(' ');
                        clause.push_str(modifier);
                    } else {
                        debug!(dialect = dialect.name(), modifier, "Dropping lock wait policy");
                    }
                }
                Some(clause)
            }
        }
    }

    /// Renders a predicate.
    fn write_predicate(&self, predicate: &Predicate, w: &mut SqlWriter<'_>) -> Result<()> {
        match predicate {
            Predicate::Compare {
                column,
                op,
                operand,
            } => {
                self.write_column(column, w)?;
                match (op, operand) {
                    (Operator::Eq, Operand::Value(SqlValue::Null)) => w.push(" IS NULL"),
                    (Operator::NotEq, Operand::Value(SqlValue::Null)) => w.push(" IS NOT NULL"),
                    _ => {
                        w.push(" ");
                        w.push(op.as_sql());
                        w.push(" ");
                        self.write_operand(operand, w)?;
                    }
                }
            }
            Predicate::Null { column, negated } => {
                self.write_column(column, w)?;
                w.push(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Predicate::InList {
                column,
                values,
                negated,
            } => {
                if values.is_empty() {
                    w.push(if *negated { "1 = 1" } else { "0 = 1" });
                    return Ok(());
                }
                self.write_column(column, w)?;
                w.push(if *negated { " NOT IN (" } else { " IN (" });
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        w.push(", ");
                    }
                    w.push_param(value.clone());
                }
                w.push(")");
            }
            Predicate::InQuery {
                column,
                query,
                negated,
            } => {
                self.write_column(column, w)?;
                w.push(if *negated { " NOT IN (" } else { " IN (" });
                self.compile_select(query, w)?;
                w.push(")");
            }
            Predicate::Between {
                column,
                low,
                high,
                negated,
            } => {
                self.write_column(column, w)?;
                w.push(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                w.push_param(low.clone());
                w.push(" AND ");
                w.push_param(high.clone());
            }
            Predicate::Exists { query, negated } => {
                w.push(if *negated { "NOT EXISTS (" } else { "EXISTS (" });
                self.compile_select(query, w)?;
                w.push(")");
            }
            Predicate::JsonContains { column, value } => {
                self.write_json_contains(column, value, w)?;
            }
            Predicate::FullText { columns, term } => self.write_full_text(columns, term, w)?,
            Predicate::And(children) => self.write_group(children, "AND", "1 = 1", w)?,
            Predicate::Or(children) => self.write_group(children, "OR", "0 = 1", w)?,
            Predicate::Not(inner) => {
                w.push("NOT (");
                self.write_predicate(inner, w)?;
                w.push(")");
            }
            Predicate::Raw { sql, params } => w.push_raw(sql, params)?,
        }
        Ok(())
    }

    /// Renders a JSON containment test.
    fn write_json_contains(
        &self,
        column: &Column,
        value: &SqlValue,
        w: &mut SqlWriter<'_>,
    ) -> Result<()> {
        let _ = (column, value, w);
        Err(TranslationError::unsupported(
            "JSON containment",
            self.dialect().name(),
        ))
    }

    /// Renders a full-text match.
    fn write_full_text(&self, columns: &[Column], term: &str, w: &mut SqlWriter<'_>) -> Result<()> {
        let _ = (columns, term, w);
        Err(TranslationError::unsupported(
            "full-text search",
            self.dialect().name(),
        ))
    }

    /// Returns the expression used for random ordering.
    fn random_order(&self) -> &'static str {
        "RANDOM()"
    }

    /// Renders a possibly-qualified column.
    fn write_column(&self, column: &Column, w: &mut SqlWriter<'_>) -> Result<()> {
        w.push_identifier(&column.reference(), "column reference")
    }

    /// Renders the right-hand side of a comparison or assignment.
    fn write_operand(&self, operand: &Operand, w: &mut SqlWriter<'_>) -> Result<()> {
        match operand {
            Operand::Value(value) => {
                w.push_param(value.clone());
                Ok(())
            }
            Operand::Column(column) => self.write_column(column, w),
        }
    }

    /// Renders a table with its alias.
    fn write_table(&self, table: &TableRef, w: &mut SqlWriter<'_>) -> Result<()> {
        w.push_identifier(&table.name, "table reference")?;
        if let Some(alias) = &table.alias {
            w.push(" AS ");
            w.push_identifier(alias, "table alias")?;
        }
        Ok(())
    }

    /// Renders one select item.
    fn write_select_item(&self, item: &SelectItem, w: &mut SqlWriter<'_>) -> Result<()> {
        match item {
            SelectItem::All => w.push("*"),
            SelectItem::AllFrom(table) => {
                w.push_identifier(table, "select list")?;
                w.push(".*");
            }
            SelectItem::Column { column, alias } => {
                self.write_column(column, w)?;
                if let Some(alias) = alias {
                    w.push(" AS ");
                    w.push_identifier(alias, "select alias")?;
                }
            }
            SelectItem::Raw(expr) => w.push(expr),
        }
        Ok(())
    }

    /// Renders a SELECT join.
    fn write_join(&self, join: &Join, w: &mut SqlWriter<'_>) -> Result<()> {
        w.push(" ");
        w.push(join.kind.as_sql());
        w.push(" ");
        self.write_table(&join.table, w)?;
        match (&join.on, join.kind) {
            (Some(on), _) => {
                w.push(" ON ");
                self.write_predicate(on, w)
            }
            (None, JoinKind::Cross) => Ok(()),
            (None, _) => Err(TranslationError::invalid_operation(
                "join",
                &join.table.name,
                "join condition is missing",
            )),
        }
    }

    /// Renders a WHERE / HAVING list, keeping the caller's order.
    fn write_conditions(
        &self,
        keyword: &str,
        clauses: &[WhereClause],
        w: &mut SqlWriter<'_>,
    ) -> Result<()> {
        if clauses.is_empty() {
            return Ok(());
        }
        w.push(keyword);
        self.write_condition_list(clauses, w)
    }

    /// Renders the entries of a WHERE / HAVING list.
    fn write_condition_list(&self, clauses: &[WhereClause], w: &mut SqlWriter<'_>) -> Result<()> {
        for (i, clause) in clauses.iter().enumerate() {
            if i > 0 {
                w.push(" ");
                w.push(clause.conjunction.as_sql());
                w.push(" ");
            }
            self.write_predicate(&clause.predicate, w)?;
        }
        Ok(())
    }

    /// Renders ORDER BY.
    fn write_orders(&self, orders: &[Order], w: &mut SqlWriter<'_>) -> Result<()> {
        if orders.is_empty() {
            return Ok(());
        }
        w.push(" ORDER BY ");
        for (i, order) in orders.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            match order {
                Order::Column { column, direction } => {
                    self.write_column(column, w)?;
                    w.push(match direction {
                        Direction::Asc => " ASC",
                        Direction::Desc => " DESC",
                    });
                }
                Order::Random => w.push(self.random_order()),
                Order::Raw(expr) => w.push(expr),
            }
        }
        Ok(())
    }

    /// Renders RETURNING.
    fn write_returning(&self, columns: &[String], w: &mut SqlWriter<'_>) -> Result<()> {
        if columns.is_empty() {
            return Ok(());
        }
        if !self.dialect().supports_returning() {
            return Err(TranslationError::unsupported("RETURNING", self.dialect().name()));
        }
        w.push(" RETURNING ");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            if column == "*" {
                w.push("*");
            } else {
                w.push_identifier(column, "returning")?;
            }
        }
        Ok(())
    }

    /// Renders the joined tables of an UPDATE / DELETE and returns their
    /// conditions, which belong in the WHERE clause.
    fn write_mutation_joins<'q>(
        &self,
        statement: &'static str,
        keyword: &str,
        joins: &'q [Join],
        w: &mut SqlWriter<'_>,
    ) -> Result<Vec<&'q Predicate>> {
        if joins.is_empty() {
            return Ok(vec![]);
        }
        let dialect = self.dialect();
        if !dialect.supports_mutation_joins() {
            return Err(TranslationError::unsupported(
                format!("{statement} with joins"),
                dialect.name(),
            ));
        }
        if let Some(join) = joins
            .iter()
            .find(|j| !matches!(j.kind, JoinKind::Inner | JoinKind::Cross))
        {
            return Err(TranslationError::unsupported(
                format!("{} in {statement}", join.kind.as_sql()),
                dialect.name(),
            ));
        }
        w.push(keyword);
        for (i, join) in joins.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            self.write_table(&join.table, w)?;
        }
        Ok(joins.iter().filter_map(|j| j.on.as_ref()).collect())
    }

    /// Renders a WHERE clause made of join conditions followed by the
    /// caller's predicates, grouped so their AND/OR mix is preserved.
    fn write_joined_conditions(
        &self,
        join_conditions: &[&Predicate],
        wheres: &[WhereClause],
        w: &mut SqlWriter<'_>,
    ) -> Result<()> {
        if join_conditions.is_empty() {
            return self.write_conditions(" WHERE ", wheres, w);
        }
        w.push(" WHERE ");
        for (i, condition) in join_conditions.iter().enumerate() {
            if i > 0 {
                w.push(" AND ");
            }
            self.write_predicate(condition, w)?;
        }
        match wheres.len() {
            0 => {}
            1 => {
                w.push(" AND ");
                self.write_predicate(&wheres[0].predicate, w)?;
            }
            _ => {
                w.push(" AND (");
                self.write_condition_list(wheres, w)?;
                w.push(")");
            }
        }
        Ok(())
    }

    /// Rejects ORDER BY / LIMIT on mutations when the dialect lacks them.
    fn check_limited_mutation(
        &self,
        statement: &'static str,
        ordered: bool,
        limit: Option<u64>,
    ) -> Result<()> {
        let dialect = self.dialect();
        if (ordered || limit.is_some()) && !dialect.supports_limited_mutations() {
            return Err(TranslationError::unsupported(
                format!("ORDER BY / LIMIT on {statement}"),
                dialect.name(),
            ));
        }
        Ok(())
    }

    /// Renders an AND / OR group in parentheses.
    fn write_group(
        &self,
        children: &[Predicate],
        connective: &str,
        empty: &str,
        w: &mut SqlWriter<'_>,
    ) -> Result<()> {
        if children.is_empty() {
            w.push(empty);
            return Ok(());
        }
        w.push("(");
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                w.push(" ");
                w.push(connective);
                w.push(" ");
            }
            self.write_predicate(child, w)?;
        }
        w.push(")");
        Ok(())
    }
}

/// Validates a statement without rendering it.
fn validate(statement: &Statement) -> Result<()> {
    match statement {
        Statement::Select(query) => validate_query(query, &[]),
        Statement::Insert(insert) => validate_insert(insert),
        Statement::Update(update) => {
            let scope = scope_of(
                std::iter::once(&update.table).chain(update.joins.iter().map(|j| &j.table)),
                &[],
            );
            for (_, operand) in &update.assignments {
                if let Operand::Column(column) = operand {
                    check_column(column, &scope)?;
                }
            }
            validate_clauses(&update.joins, &update.wheres, &update.orders, &scope)
        }
        Statement::Delete(delete) => {
            let scope = scope_of(
                std::iter::once(&delete.table).chain(delete.joins.iter().map(|j| &j.table)),
                &[],
            );
            validate_clauses(&delete.joins, &delete.wheres, &delete.orders, &scope)
        }
        Statement::Truncate(_) => Ok(()),
    }
}

fn validate_insert(insert: &Insert) -> Result<()> {
    if insert.rows.is_empty() {
        return Err(TranslationError::EmptyInsert {
            table: insert.table.clone(),
        });
    }
    for (row, values) in insert.rows.iter().enumerate() {
        if values.len() != insert.columns.len() {
            return Err(TranslationError::ArityMismatch {
                table: insert.table.clone(),
                row,
                expected: insert.columns.len(),
                found: values.len(),
            });
        }
    }
    if insert.columns.is_empty() && insert.rows.len() > 1 {
        return Err(TranslationError::invalid_operation(
            "insert",
            &insert.table,
            "only one row can be inserted with default values",
        ));
    }
    Ok(())
}

fn validate_query(query: &Query, outer: &[String]) -> Result<()> {
    let scope = scope_of(
        std::iter::once(&query.table).chain(query.joins.iter().map(|j| &j.table)),
        outer,
    );
    for item in &query.columns {
        match item {
            SelectItem::Column { column, .. } => check_column(column, &scope)?,
            SelectItem::AllFrom(table) => {
                if !scope.iter().any(|s| s == table) {
                    return Err(TranslationError::UnknownTable {
                        table: table.clone(),
                        column: format!("{table}.*"),
                    });
                }
            }
            SelectItem::All | SelectItem::Raw(_) => {}
        }
    }
    for column in &query.groups {
        check_column(column, &scope)?;
    }
    for clause in &query.havings {
        check_predicate(&clause.predicate, &scope)?;
    }
    validate_clauses(&query.joins, &query.wheres, &query.orders, &scope)
}

fn validate_clauses(
    joins: &[Join],
    wheres: &[WhereClause],
    orders: &[Order],
    scope: &[String],
) -> Result<()> {
    for on in joins.iter().filter_map(|j| j.on.as_ref()) {
        check_predicate(on, scope)?;
    }
    for clause in wheres {
        check_predicate(&clause.predicate, scope)?;
    }
    for order in orders {
        if let Order::Column { column, .. } = order {
            check_column(column, scope)?;
        }
    }
    Ok(())
}

fn check_predicate(predicate: &Predicate, scope: &[String]) -> Result<()> {
    let mut columns = Vec::new();
    predicate.for_each_column(&mut |c| columns.push(c));
    columns.into_iter().try_for_each(|c| check_column(c, scope))?;
    let mut subqueries = Vec::new();
    predicate.for_each_subquery(&mut |q| subqueries.push(q));
    subqueries
        .into_iter()
        .try_for_each(|q| validate_query(q, scope))
}

fn check_column(column: &Column, scope: &[String]) -> Result<()> {
    match &column.table {
        Some(table) if !scope.iter().any(|s| s == table) => Err(TranslationError::UnknownTable {
            table: table.clone(),
            column: column.reference(),
        }),
        _ => Ok(()),
    }
}

/// Names visible to a statement: aliases, or table names (full and
/// unqualified) for tables without one, plus the enclosing scope.
fn scope_of<'t>(tables: impl Iterator<Item = &'t TableRef>, outer: &[String]) -> Vec<String> {
    let mut scope: Vec<String> = outer.to_vec();
    for table in tables {
        match &table.alias {
            Some(alias) => scope.push(alias.clone()),
            None => {
                scope.push(table.name.clone());
                if let Some((_, short)) = table.name.rsplit_once('.') {
                    scope.push(String::from(short));
                }
            }
        }
    }
    scope
}

/// ANSI grammar over [`GenericDialect`].
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericGrammar {
    dialect: GenericDialect,
}

impl GenericGrammar {
    /// Creates a new generic grammar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dialect: GenericDialect::new(),
        }
    }
}

impl QueryGrammar for GenericGrammar {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{col, LockStrength};

    fn compile(statement: impl Into<Statement>) -> Result<CompiledStatement> {
        GenericGrammar::new().compile(&statement.into())
    }

    #[test]
    fn select_with_alias_and_join() {
        let query = Query::table("users as u")
            .select(&["u.id", "o.total as amount"])
            .join("orders o", "u.id", "o.user_id")
            .where_clause(col("o.total").gt(10))
            .order_by_desc("o.total")
            .limit(5);
        let stmt = compile(query).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT \"u\".\"id\", \"o\".\"total\" AS \"amount\" FROM \"users\" AS \"u\" \
             INNER JOIN \"orders\" AS \"o\" ON \"u\".\"id\" = \"o\".\"user_id\" \
             WHERE \"o\".\"total\" > ? ORDER BY \"o\".\"total\" DESC LIMIT 5"
        );
        assert_eq!(stmt.params, vec![SqlValue::Int(10)]);
    }

    #[test]
    fn predicate_order_is_preserved() {
        let query = Query::table("t")
            .where_clause(col("b").eq(2))
            .or_where(col("a").eq(1).and(col("c").is_null()));
        let stmt = compile(query).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM \"t\" WHERE \"b\" = ? OR (\"a\" = ? AND \"c\" IS NULL)"
        );
        assert_eq!(stmt.params, vec![SqlValue::Int(2), SqlValue::Int(1)]);
    }

    #[test]
    fn eq_null_renders_is_null() {
        let stmt = compile(Query::table("t").where_clause(col("a").eq(SqlValue::Null))).unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM \"t\" WHERE \"a\" IS NULL");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn empty_in_lists_stay_valid() {
        let stmt = compile(
            Query::table("t")
                .where_clause(col("a").in_list(Vec::<i64>::new()))
                .where_clause(col("b").not_in_list(Vec::<i64>::new())),
        )
        .unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM \"t\" WHERE 0 = 1 AND 1 = 1");
    }

    #[test]
    fn unknown_alias_is_rejected() {
        let err = compile(Query::table("users as u").where_clause(col("x.id").eq(1))).unwrap_err();
        assert_eq!(
            err,
            TranslationError::UnknownTable {
                table: String::from("x"),
                column: String::from("x.id"),
            }
        );
    }

    #[test]
    fn correlated_subquery_sees_outer_scope() {
        let inner = Query::table("orders as o").where_clause(col("o.user_id").eq_col("u.id"));
        let query = Query::table("users as u").where_clause(Predicate::exists(inner));
        assert!(compile(query).is_ok());
    }

    #[test]
    fn insert_arity_checked() {
        let insert = Insert::into("users")
            .columns(&["a", "b"])
            .values(vec![SqlValue::Int(1)]);
        assert!(matches!(
            compile(insert),
            Err(TranslationError::ArityMismatch { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn empty_insert_rejected() {
        let insert = Insert::into("users").columns(&["a"]);
        assert!(matches!(compile(insert), Err(TranslationError::EmptyInsert { .. })));
    }

    #[test]
    fn generic_rejects_optional_features() {
        let insert = Insert::into("users")
            .columns(&["a"])
            .values(vec![SqlValue::Int(1)])
            .returning(&["id"]);
        assert!(matches!(compile(insert), Err(TranslationError::Unsupported { .. })));

        let update = Update::table("users").set("a", 1).order_by("id", Direction::Asc);
        assert!(matches!(compile(update), Err(TranslationError::Unsupported { .. })));
    }

    #[test]
    fn generic_lock_wait_dropped() {
        let query = Query::table("t").lock(Lock::with_strength(LockStrength::Update).nowait());
        assert_eq!(compile(query).unwrap().sql, "SELECT * FROM \"t\" FOR UPDATE");
    }

    #[test]
    fn raw_lock_must_be_for_clause() {
        let query = Query::table("t").lock(Lock::Raw(String::from("LOCK IN SHARE MODE")));
        assert_eq!(compile(query).unwrap().sql, "SELECT * FROM \"t\"");
    }

    #[test]
    fn default_truncate_restarts_identity() {
        let stmt = compile(Truncate::table("users").cascade()).unwrap();
        assert_eq!(stmt.sql, "TRUNCATE TABLE \"users\" RESTART IDENTITY CASCADE");
    }
}
