use super::*;

use relorm_core::stmt::{Delete, Direction, Insert, JoinKind, Select, Update};

impl Translator<'_> {
    pub(super) fn base_statement(&mut self, stmt: &Statement) -> Result<()> {
        match stmt {
            Statement::Select(stmt) => self.select(stmt),
            Statement::Insert(stmt) => self.insert(stmt),
            Statement::Update(stmt) => self.update(stmt),
            Statement::Delete(stmt) => self.delete(stmt),
            _ => self.base_ddl(stmt),
        }
    }

    fn select(&mut self, stmt: &Select) -> Result<()> {
        self.push("SELECT ");

        let join_fields = stmt.joins.iter().any(|join| !join.fields.is_empty());

        if stmt.fields.is_empty() {
            if join_fields {
                self.ident(&stmt.collection);
                self.push(".*");
            } else {
                self.push("*");
            }
        } else {
            self.comma(&stmt.fields, |t, field| t.expr(field))?;
        }

        for join in &stmt.joins {
            for field in &join.fields {
                self.push(", ");
                if field.table.is_some() {
                    self.column(field);
                } else {
                    self.ident(join.reference_name());
                    self.push(".");
                    self.ident(&field.name);
                }
            }
        }

        self.push(" FROM ");
        self.ident(&stmt.collection);

        for join in &stmt.joins {
            self.node(Node::Join(join))?;
        }

        if let Some(filter) = &stmt.filter {
            self.push(" WHERE ");
            self.expr(filter)?;
        }

        if !stmt.order_by.is_empty() {
            self.push(" ORDER BY ");
            self.comma(&stmt.order_by, |t, order_by| t.node(Node::OrderBy(order_by)))?;
        }

        let dialect = self.dialect;
        dialect.limit_offset(self, stmt.limit, stmt.offset);

        if !stmt.fetch_plan.is_empty() {
            self.push(" FETCHPLAN");
            for path in &stmt.fetch_plan {
                self.push(" ");
                self.push(path);
                self.push(":1");
            }
        }

        Ok(())
    }

    pub(super) fn base_join(&mut self, join: &Join) -> Result<()> {
        self.push(match join.kind {
            JoinKind::Left => " LEFT JOIN ",
            JoinKind::Inner => " INNER JOIN ",
        });
        self.ident(&join.collection);

        if let Some(alias) = &join.alias {
            self.push(" AS ");
            self.ident(alias);
        }

        if let Some(on) = &join.on {
            self.push(" ON ");
            self.expr(on)?;
        }

        Ok(())
    }

    pub(super) fn base_order_by(&mut self, order_by: &OrderBy) -> Result<()> {
        self.column(&order_by.column);
        self.push(match order_by.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        });
        Ok(())
    }

    fn insert(&mut self, stmt: &Insert) -> Result<()> {
        self.push("INSERT INTO ");
        self.ident(&stmt.collection);

        if stmt.columns.is_empty() {
            self.push(" DEFAULT VALUES");
        } else {
            self.push(" (");
            self.comma(&stmt.columns, |t, column| {
                t.ident(column);
                Ok(())
            })?;
            self.push(") VALUES (");
            self.comma(&stmt.values, |t, value| t.expr(value))?;
            self.push(")");
        }

        self.returning(&stmt.returning)
    }

    pub fn returning(&mut self, columns: &[String]) -> Result<()> {
        if columns.is_empty() {
            return Ok(());
        }

        self.push(" RETURNING ");
        self.comma(columns, |t, column| {
            t.ident(column);
            Ok(())
        })
    }

    fn update(&mut self, stmt: &Update) -> Result<()> {
        self.push("UPDATE ");
        self.ident(&stmt.collection);
        self.push(" SET ");
        self.comma(&stmt.assignments, |t, assignment| {
            t.ident(&assignment.column);
            t.push(" = ");
            t.expr(&assignment.value)
        })?;

        if let Some(filter) = &stmt.filter {
            self.push(" WHERE ");
            self.expr(filter)?;
        }

        Ok(())
    }

    fn delete(&mut self, stmt: &Delete) -> Result<()> {
        self.push("DELETE FROM ");
        self.ident(&stmt.collection);

        if let Some(filter) = &stmt.filter {
            self.push(" WHERE ");
            self.expr(filter)?;
        }

        Ok(())
    }
}
