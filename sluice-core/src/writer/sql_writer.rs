use crate::{
    Arity, AsValue, Condition, Error, Fragment, Operator, Order, Ordered, Predicate,
    PredicateKind, Query, Result, Select, TableRef, Value, is_identifier, possibly_parenthesized,
    separated_by, split_placeholders, truncate_long, try_separated_by, writer::Context,
};

/// Token of the operators every dialect understands, `None` for the dialect specific ones.
pub fn generic_operator_token(operator: Operator) -> Option<&'static str> {
    Some(match operator {
        Operator::Eq => " = ",
        Operator::NotEq => " != ",
        Operator::Ge => " >= ",
        Operator::Gt => " > ",
        Operator::Le => " <= ",
        Operator::Lt => " < ",
        Operator::Like | Operator::LikePrefix | Operator::LikeSuffix => " LIKE ",
        Operator::In => " IN ",
        Operator::NotIn => " NOT IN ",
        Operator::IsNull => " IS NULL",
        Operator::IsNotNull => " IS NOT NULL",
        Operator::Raw | Operator::ILike | Operator::Regexp => return None,
    })
}

fn like_pattern(operator: Operator, value: &Value) -> Result<Value> {
    let text = String::try_from_value(value.clone())?;
    Ok(Value::Varchar(Some(match operator {
        Operator::LikePrefix => format!("{text}%"),
        Operator::LikeSuffix => format!("%{text}"),
        _ => format!("%{text}%"),
    })))
}

fn no_fields(statement: &str, table: &TableRef) -> Error {
    Error::msg(format!(
        "Cannot write {statement} for table `{}`: no fields",
        table.full_name()
    ))
}

fn bound(value: u64, clause: &str) -> Result<Value> {
    i64::try_from(value)
        .map(|v| Value::Int64(Some(v)))
        .map_err(|_| Error::msg(format!("{clause} {value} does not fit a signed 64 bit integer")))
}

/// Dialect printer converting conditions and statement descriptions into parameterized SQL.
///
/// Every method has a default matching the most common syntax, a dialect overrides only what
/// differs: identifier quoting, placeholders, operators, pagination and generated keys.
/// Statements are single line and carry no trailing semicolon.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Dialect name, used in error messages and as the registry key.
    fn name(&self) -> &'static str;

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &str,
        search: char,
        replace: &str,
    ) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(context, out, value, '"', "\"\"");
        out.push('"');
    }

    /// Quote every part of a qualified identifier, `*` stays bare.
    fn write_identifier(&self, context: &mut Context, out: &mut String, value: &str) {
        separated_by(
            out,
            value.split('.'),
            |out, v| {
                if v == "*" {
                    out.push('*');
                } else {
                    self.write_identifier_quoted(context, out, v);
                }
            },
            ".",
        );
    }

    /// Render a column, plain expressions are accepted only in the projection.
    fn write_field(&self, context: &mut Context, out: &mut String, field: &str) -> Result<()> {
        let field = field.trim();
        if is_identifier(field) {
            self.write_identifier(context, out, field);
        } else if context.fragment == Fragment::SqlSelect {
            out.push_str(field);
        } else {
            return Err(Error::msg(format!(
                "`{}` is not a valid column identifier",
                truncate_long!(field)
            )));
        }
        Ok(())
    }

    /// Render a table reference, the alias is declared only in the `FROM` clause.
    fn write_table_ref(&self, context: &mut Context, out: &mut String, value: &TableRef) {
        if !value.schema.is_empty() {
            self.write_identifier_quoted(context, out, &value.schema);
            out.push('.');
        }
        self.write_identifier_quoted(context, out, &value.name);
        if !value.alias.is_empty() && context.fragment == Fragment::SqlSelectFrom {
            out.push(' ');
            self.write_identifier_quoted(context, out, &value.alias);
        }
    }

    /// Placeholder for the value bound last, `context.counter` is its 1 based position.
    fn write_placeholder(&self, _context: &mut Context, out: &mut String) {
        out.push('?');
    }

    /// Bind a value: the placeholder and the argument are always written together.
    fn write_bind(&self, context: &mut Context, out: &mut String, value: Value) {
        context.bind(value);
        self.write_placeholder(context, out);
    }

    fn operator_token(&self, operator: Operator) -> Option<&'static str> {
        generic_operator_token(operator)
    }

    fn write_operator(
        &self,
        _context: &mut Context,
        out: &mut String,
        operator: Operator,
    ) -> Result<()> {
        let Some(token) = self.operator_token(operator) else {
            return Err(Error::msg(format!(
                "Operator {operator} is not supported by the {} dialect",
                self.name()
            )));
        };
        out.push_str(token);
        Ok(())
    }

    /// Render a predicate group, parenthesized when more than one child renders.
    ///
    /// `enclosed` tells that the group shares its parent with other predicates even when it is
    /// not parenthesized itself, raw fragments are then protected with their own parentheses.
    fn write_condition(
        &self,
        context: &mut Context,
        out: &mut String,
        condition: &Condition,
        enclosed: bool,
    ) -> Result<()> {
        let payload = condition.payload();
        if payload == 0 {
            return Ok(());
        }
        let parenthesized = payload > 1;
        possibly_parenthesized!(
            out,
            parenthesized,
            for (i, predicate) in condition
                .predicates()
                .iter()
                .filter(|v| v.has_payload())
                .enumerate()
            {
                if i > 0 {
                    out.push(' ');
                    out.push_str(&predicate.linkage().to_string());
                    out.push(' ');
                }
                self.write_predicate(context, out, predicate, parenthesized || enclosed)?;
            }
        );
        Ok(())
    }

    fn write_predicate(
        &self,
        context: &mut Context,
        out: &mut String,
        predicate: &Predicate,
        enclosed: bool,
    ) -> Result<()> {
        match predicate.kind() {
            PredicateKind::Leaf {
                field,
                operator,
                operands,
            } => self.write_leaf(context, out, field, *operator, operands),
            PredicateKind::Raw { sql, operands } => {
                possibly_parenthesized!(out, enclosed, self.write_raw(context, out, sql, operands)?);
                Ok(())
            }
            PredicateKind::Group(condition) => self.write_condition(context, out, condition, enclosed),
        }
    }

    fn write_leaf(
        &self,
        context: &mut Context,
        out: &mut String,
        field: &str,
        operator: Operator,
        operands: &[Value],
    ) -> Result<()> {
        if operands.is_empty() {
            match operator {
                Operator::In => {
                    out.push_str("1 = 0");
                    return Ok(());
                }
                Operator::NotIn => {
                    out.push_str("1 = 1");
                    return Ok(());
                }
                _ => {}
            }
        }
        self.write_field(context, out, field)?;
        self.write_operator(context, out, operator)?;
        match operator.arity() {
            Arity::None => {}
            Arity::One => {
                let [operand] = operands else {
                    return Err(Error::msg(format!(
                        "Operator {operator} on field `{field}` expects 1 operand, received {}",
                        operands.len()
                    )));
                };
                let value = if operator.is_like() {
                    like_pattern(operator, operand)?
                } else {
                    operand.clone()
                };
                self.write_bind(context, out, value);
            }
            Arity::Any => {
                out.push('(');
                separated_by(
                    out,
                    operands,
                    |out, v| self.write_bind(context, out, v.clone()),
                    ", ",
                );
                out.push(')');
            }
            Arity::Placeholders => {
                return Err(Error::msg(format!(
                    "Operator {operator} cannot be applied to field `{field}`"
                )));
            }
        }
        Ok(())
    }

    /// Emit a raw fragment verbatim, every `?` outside quoted literals binds the next operand.
    fn write_raw(
        &self,
        context: &mut Context,
        out: &mut String,
        sql: &str,
        operands: &[Value],
    ) -> Result<()> {
        let pieces = split_placeholders(sql.trim());
        if pieces.len() != operands.len() + 1 {
            return Err(Error::msg(format!(
                "Raw fragment `{}` has {} placeholders but received {} operands",
                truncate_long!(sql),
                pieces.len() - 1,
                operands.len()
            )));
        }
        let mut operands = operands.iter();
        for (i, piece) in pieces.into_iter().enumerate() {
            if i > 0 {
                if let Some(value) = operands.next() {
                    self.write_bind(context, out, value.clone());
                }
            }
            out.push_str(piece);
        }
        Ok(())
    }

    /// ` WHERE <condition>`, nothing when the condition renders nothing.
    fn write_where(
        &self,
        context: &mut Context,
        out: &mut String,
        condition: Option<&Condition>,
    ) -> Result<()> {
        let Some(condition) = condition.filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        out.push_str(" WHERE ");
        self.write_condition(context, out, condition, false)
    }

    fn write_order_by(
        &self,
        context: &mut Context,
        out: &mut String,
        order_by: &[Ordered],
    ) -> Result<()> {
        if order_by.is_empty() {
            return Ok(());
        }
        out.push_str(" ORDER BY ");
        try_separated_by(
            out,
            order_by,
            |out, v| {
                self.write_field(context, out, &v.field)?;
                out.push_str(match v.order {
                    Order::ASC => " ASC",
                    Order::DESC => " DESC",
                });
                Ok::<_, Error>(())
            },
            ", ",
        )
    }

    /// Clause making an `OFFSET` legal when the dialect requires a `LIMIT` before it.
    fn write_unbounded_limit(&self, _context: &mut Context, _out: &mut String) {}

    fn write_limit_offset(
        &self,
        context: &mut Context,
        out: &mut String,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<()> {
        match limit {
            Some(limit) => {
                out.push_str(" LIMIT ");
                self.write_bind(context, out, bound(limit, "LIMIT")?);
            }
            None if offset.is_some() => self.write_unbounded_limit(context, out),
            None => {}
        }
        if let Some(offset) = offset {
            out.push_str(" OFFSET ");
            self.write_bind(context, out, bound(offset, "OFFSET")?);
        }
        Ok(())
    }

    /// Whether `INSERT` can hand back the generated key with `RETURNING`.
    fn returns_generated_key(&self) -> bool {
        true
    }

    fn write_returning(
        &self,
        context: &mut Context,
        out: &mut String,
        returning: &[&str],
    ) -> Result<()> {
        if returning.is_empty() || !self.returns_generated_key() {
            return Ok(());
        }
        out.push_str(" RETURNING ");
        try_separated_by(
            out,
            returning,
            |out, v| self.write_field(context, out, v),
            ", ",
        )
    }

    /// Conflict clause of an upsert, `columns` are the non key columns to overwrite.
    fn write_upsert_fragment(
        &self,
        context: &mut Context,
        out: &mut String,
        primary_key: &[&str],
        columns: &[&str],
    ) -> Result<()> {
        out.push_str(" ON CONFLICT (");
        try_separated_by(
            out,
            primary_key,
            |out, v| self.write_field(context, out, v),
            ", ",
        )?;
        out.push(')');
        if columns.is_empty() {
            out.push_str(" DO NOTHING");
            return Ok(());
        }
        out.push_str(" DO UPDATE SET ");
        try_separated_by(
            out,
            columns,
            |out, v| {
                self.write_field(context, out, v)?;
                out.push_str(" = EXCLUDED.");
                self.write_field(context, out, v)
            },
            ", ",
        )
    }

    /// `SELECT` with projection, filter, ordering and pagination.
    fn render_select(&self, select: &Select) -> Result<Query> {
        let mut out = String::with_capacity(128 + select.fields.len() * 24);
        let mut context = Context::new(Fragment::SqlSelect);
        out.push_str("SELECT ");
        if select.distinct {
            out.push_str("DISTINCT ");
        }
        let fields: &[&str] = if select.fields.is_empty() {
            &["*"]
        } else {
            select.fields
        };
        try_separated_by(
            &mut out,
            fields,
            |out, v| self.write_field(&mut context, out, v),
            ", ",
        )?;
        out.push_str(" FROM ");
        self.write_table_ref(
            &mut context.switch_fragment(Fragment::SqlSelectFrom),
            &mut out,
            select.table,
        );
        self.write_where(
            &mut context.switch_fragment(Fragment::SqlSelectWhere),
            &mut out,
            select.condition,
        )?;
        self.write_order_by(
            &mut context.switch_fragment(Fragment::SqlSelectOrderBy),
            &mut out,
            select.order_by,
        )?;
        self.write_limit_offset(
            &mut context.switch_fragment(Fragment::SqlSelectLimit),
            &mut out,
            select.limit,
            select.offset,
        )?;
        Ok(into_query(self.name(), context, out))
    }

    /// `SELECT COUNT(*)` of the rows matching `condition`.
    fn render_count(&self, table: &TableRef, condition: Option<&Condition>) -> Result<Query> {
        self.render_select(&Select {
            fields: &["COUNT(*)"],
            condition,
            ..Select::new(table)
        })
    }

    fn render_insert(
        &self,
        table: &TableRef,
        values: &[(&str, Value)],
        returning: &[&str],
    ) -> Result<Query> {
        if values.is_empty() {
            return Err(no_fields("INSERT", table));
        }
        let mut out = String::with_capacity(64 + values.len() * 24);
        let mut context = Context::new(Fragment::SqlInsertInto);
        self.write_insert_values(&mut context, &mut out, table, values)?;
        self.write_returning(
            &mut context.switch_fragment(Fragment::SqlInsertIntoReturning),
            &mut out,
            returning,
        )?;
        Ok(into_query(self.name(), context, out))
    }

    /// `INSERT INTO table (columns) VALUES (...)`, shared by insert and upsert.
    fn write_insert_values(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        values: &[(&str, Value)],
    ) -> Result<()> {
        out.push_str("INSERT INTO ");
        self.write_table_ref(context, out, table);
        out.push_str(" (");
        try_separated_by(
            out,
            values,
            |out, (column, _)| self.write_field(context, out, column),
            ", ",
        )?;
        out.push_str(") VALUES (");
        let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
        separated_by(
            out,
            values,
            |out, (_, value)| self.write_bind(&mut context, out, value.clone()),
            ", ",
        );
        out.push(')');
        Ok(())
    }

    /// Multi row `INSERT` sharing one column list.
    fn render_insert_many(
        &self,
        table: &TableRef,
        columns: &[&str],
        rows: &[Vec<Value>],
    ) -> Result<Query> {
        if columns.is_empty() {
            return Err(no_fields("INSERT", table));
        }
        if rows.is_empty() {
            return Err(Error::msg(format!(
                "Cannot write INSERT for table `{}`: no rows",
                table.full_name()
            )));
        }
        if let Some(row) = rows.iter().find(|v| v.len() != columns.len()) {
            return Err(Error::msg(format!(
                "Cannot write INSERT for table `{}`: a row has {} values for {} columns",
                table.full_name(),
                row.len(),
                columns.len()
            )));
        }
        let mut out = String::with_capacity(64 + rows.len() * columns.len() * 8);
        let mut context = Context::new(Fragment::SqlInsertInto);
        out.push_str("INSERT INTO ");
        self.write_table_ref(&mut context, &mut out, table);
        out.push_str(" (");
        try_separated_by(
            &mut out,
            columns,
            |out, v| self.write_field(&mut context, out, v),
            ", ",
        )?;
        out.push_str(") VALUES ");
        {
            let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
            separated_by(
                &mut out,
                rows,
                |out, row| {
                    out.push('(');
                    separated_by(
                        out,
                        row,
                        |out, value| self.write_bind(&mut context, out, value.clone()),
                        ", ",
                    );
                    out.push(')');
                },
                ", ",
            );
        }
        Ok(into_query(self.name(), context, out))
    }

    /// `INSERT` that overwrites the non key columns when the primary key already exists.
    fn render_upsert(
        &self,
        table: &TableRef,
        values: &[(&str, Value)],
        primary_key: &[&str],
    ) -> Result<Query> {
        if values.is_empty() {
            return Err(no_fields("INSERT", table));
        }
        if primary_key.is_empty() {
            return Err(Error::msg(format!(
                "Cannot write an upsert for table `{}` without a primary key",
                table.full_name()
            )));
        }
        let mut out = String::with_capacity(96 + values.len() * 48);
        let mut context = Context::new(Fragment::SqlInsertInto);
        self.write_insert_values(&mut context, &mut out, table, values)?;
        let columns = values
            .iter()
            .map(|(column, _)| *column)
            .filter(|column| !primary_key.contains(column))
            .collect::<Vec<_>>();
        self.write_upsert_fragment(
            &mut context.switch_fragment(Fragment::SqlInsertIntoOnConflict),
            &mut out,
            primary_key,
            &columns,
        )?;
        Ok(into_query(self.name(), context, out))
    }

    fn render_update(
        &self,
        table: &TableRef,
        values: &[(&str, Value)],
        condition: Option<&Condition>,
    ) -> Result<Query> {
        if values.is_empty() {
            return Err(no_fields("UPDATE", table));
        }
        let mut out = String::with_capacity(64 + values.len() * 24);
        let mut context = Context::new(Fragment::SqlUpdate);
        out.push_str("UPDATE ");
        self.write_table_ref(&mut context, &mut out, table);
        out.push_str(" SET ");
        {
            let mut context = context.switch_fragment(Fragment::SqlUpdateSet);
            try_separated_by(
                &mut out,
                values,
                |out, (column, value)| {
                    self.write_field(&mut context, out, column)?;
                    out.push_str(" = ");
                    self.write_bind(&mut context, out, value.clone());
                    Ok::<_, Error>(())
                },
                ", ",
            )?;
        }
        self.write_where(
            &mut context.switch_fragment(Fragment::SqlUpdateWhere),
            &mut out,
            condition,
        )?;
        Ok(into_query(self.name(), context, out))
    }

    fn render_delete(&self, table: &TableRef, condition: Option<&Condition>) -> Result<Query> {
        let mut out = String::with_capacity(64);
        let mut context = Context::new(Fragment::SqlDeleteFrom);
        out.push_str("DELETE FROM ");
        self.write_table_ref(&mut context, &mut out, table);
        self.write_where(
            &mut context.switch_fragment(Fragment::SqlDeleteFromWhere),
            &mut out,
            condition,
        )?;
        Ok(into_query(self.name(), context, out))
    }
}

fn into_query(dialect: &str, context: Context, sql: String) -> Query {
    log::trace!(
        "[{dialect}] {} ({} arguments)",
        truncate_long!(sql),
        context.args.len()
    );
    context.into_query(sql)
}

/// Fallback generic SQL writer: `?` placeholders, double quoted identifiers.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
    fn name(&self) -> &'static str {
        "generic"
    }
}
