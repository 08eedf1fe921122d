use super::*;

impl Translator<'_> {
    pub(super) fn base_ddl(&mut self, stmt: &Statement) -> Result<()> {
        match stmt {
            Statement::CreateCollection(stmt) => {
                self.push("CREATE TABLE ");
                if stmt.if_not_exists {
                    self.push("IF NOT EXISTS ");
                }
                self.ident(&stmt.name);
                self.push(" (");
                self.comma(&stmt.fields, |t, field| t.node(Node::FieldDef(field)))?;
                self.push(")");
            }
            Statement::DropCollection(stmt) => {
                self.push("DROP TABLE ");
                if stmt.if_exists {
                    self.push("IF EXISTS ");
                }
                self.ident(&stmt.name);
            }
            Statement::RenameCollection(stmt) => {
                self.push("ALTER TABLE ");
                self.ident(&stmt.from);
                self.push(" RENAME TO ");
                self.ident(&stmt.to);
            }
            Statement::CreateField(stmt) => {
                self.push("ALTER TABLE ");
                self.ident(&stmt.collection);
                self.push(" ADD COLUMN ");
                self.node(Node::FieldDef(&stmt.field))?;
            }
            Statement::DropField(stmt) => {
                self.push("ALTER TABLE ");
                self.ident(&stmt.collection);
                self.push(" DROP COLUMN ");
                self.ident(&stmt.name);
            }
            Statement::RenameField(stmt) => {
                self.push("ALTER TABLE ");
                self.ident(&stmt.collection);
                self.push(" RENAME COLUMN ");
                self.ident(&stmt.from);
                self.push(" TO ");
                self.ident(&stmt.to);
            }
            Statement::CreateIndex(stmt) => {
                self.push("CREATE ");
                if stmt.unique {
                    self.push("UNIQUE ");
                }
                self.push("INDEX IF NOT EXISTS ");
                self.ident(&stmt.name);
                self.push(" ON ");
                self.ident(&stmt.collection);
                self.push(" (");
                self.comma(&stmt.columns, |t, column| {
                    t.ident(column);
                    Ok(())
                })?;
                self.push(")");
            }
            Statement::DropIndex(stmt) => {
                self.push("DROP INDEX IF EXISTS ");
                self.ident(&stmt.name);
            }
            Statement::Select(_) | Statement::Insert(_) | Statement::Update(_) | Statement::Delete(_) => {
                return self.base_statement(stmt)
            }
        }

        Ok(())
    }

    pub(super) fn base_field_def(&mut self, field: &FieldDef) -> Result<()> {
        let ty = self.dialect.column_type(field)?;

        self.ident(&field.name);
        self.push(" ");
        self.push(&ty);

        for constraint in &field.constraints {
            self.node(Node::Constraint(constraint))?;
        }

        Ok(())
    }

    /// Each constraint writes its own leading space so that constraints a
    /// dialect has no keyword for leave no trace.
    pub(super) fn base_constraint(&mut self, constraint: &Constraint) -> Result<()> {
        match constraint {
            Constraint::PrimaryKey => self.push(" PRIMARY KEY"),
            Constraint::AutoIncrement => {
                if let Some(keyword) = self.dialect.auto_increment() {
                    self.push(" ");
                    self.push(keyword);
                }
            }
            Constraint::NotNull => self.push(" NOT NULL"),
            Constraint::Unique => self.push(" UNIQUE"),
            Constraint::Default(expr) => {
                self.push(" DEFAULT ");
                self.literal(expr)?;
            }
        }

        Ok(())
    }
}
