use std::ffi::c_int;

use crate::result::ResultCode;
use crate::statement::{Statement, StatementRef};
use crate::value::{DataType, ValueRef};

/// Non-owning view of the current result row of a stepped statement. Valid
/// until the statement is stepped, reset or finalized.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    stmt: StatementRef<'a>,
}

impl<'a> Row<'a> {
    pub fn new(stmt: StatementRef<'a>) -> Self {
        Self { stmt }
    }

    pub fn column_blob(&self, col: c_int) -> &'a [u8] {
        self.stmt.column_blob(col)
    }

    pub fn column_double(&self, col: c_int) -> f64 {
        self.stmt.column_double(col)
    }

    pub fn column_int(&self, col: c_int) -> c_int {
        self.stmt.column_int(col)
    }

    pub fn column_int64(&self, col: c_int) -> i64 {
        self.stmt.column_int64(col)
    }

    pub fn column_text(&self, col: c_int) -> &'a [u8] {
        self.stmt.column_text(col)
    }

    pub fn column_bytes(&self, col: c_int) -> c_int {
        self.stmt.column_bytes(col)
    }

    pub fn column_type(&self, col: c_int) -> DataType {
        self.stmt.column_type(col)
    }

    pub fn column_value(&self, col: c_int) -> ValueRef<'a> {
        self.stmt.column_value(col)
    }

    pub fn stmt(&self) -> StatementRef<'a> {
        self.stmt
    }
}

impl<'a> From<StatementRef<'a>> for Row<'a> {
    fn from(stmt: StatementRef<'a>) -> Self {
        Self::new(stmt)
    }
}

impl<'a> From<&'a Statement> for Row<'a> {
    fn from(stmt: &'a Statement) -> Self {
        Self::new(stmt.handle())
    }
}

/// Steps the statement until it stops producing rows, invoking the callback
/// once per row, and returns the terminating code (DONE or the error that
/// ended the loop). Never steps past an error.
pub fn for_each_row<'a, F>(stmt: impl Into<StatementRef<'a>>, mut f: F) -> ResultCode
where
    F: FnMut(Row<'_>),
{
    let stmt = stmt.into();
    let mut code = stmt.step();
    while code == ResultCode::ROW {
        f(Row::new(stmt));
        code = stmt.step();
    }
    code
}
