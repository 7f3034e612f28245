use std::ffi::{CStr, c_int};
use std::marker::PhantomData;

use crate::result::ResultCode;
use crate::userdata::{UserBlob, UserText};
use crate::value::{DataType, ValueRef};

/// Owning prepared-statement handle, produced by
/// [`crate::Connection::prepare`]. Finalized exactly once, at the latest
/// when dropped.
pub struct Statement {
    stmt: *mut libsqlite3_sys::sqlite3_stmt,
}

impl Statement {
    pub(crate) fn from_raw(stmt: *mut libsqlite3_sys::sqlite3_stmt) -> Self {
        Self { stmt }
    }

    pub fn handle(&self) -> StatementRef<'_> {
        StatementRef {
            stmt: self.stmt,
            _marker: PhantomData,
        }
    }

    /// Releases the statement. Safe to call more than once; the handle is
    /// inert afterwards. Also runs on drop, where the code is discarded.
    pub fn finalize(&mut self) -> ResultCode {
        let code = ResultCode::from_raw(unsafe { libsqlite3_sys::sqlite3_finalize(self.stmt) });
        self.stmt = std::ptr::null_mut();
        code
    }

    pub fn is_open(&self) -> bool {
        !self.stmt.is_null()
    }

    pub fn raw(&self) -> *mut libsqlite3_sys::sqlite3_stmt {
        self.stmt
    }

    /// Releases ownership of the native pointer without finalizing it.
    pub fn into_raw(mut self) -> *mut libsqlite3_sys::sqlite3_stmt {
        std::mem::replace(&mut self.stmt, std::ptr::null_mut())
    }

    pub fn bind_blob(&self, index: c_int, data: &UserBlob<'_>) -> ResultCode {
        self.handle().bind_blob(index, data)
    }

    pub fn bind_double(&self, index: c_int, value: f64) -> ResultCode {
        self.handle().bind_double(index, value)
    }

    pub fn bind_int(&self, index: c_int, value: c_int) -> ResultCode {
        self.handle().bind_int(index, value)
    }

    pub fn bind_int64(&self, index: c_int, value: i64) -> ResultCode {
        self.handle().bind_int64(index, value)
    }

    pub fn bind_null(&self, index: c_int) -> ResultCode {
        self.handle().bind_null(index)
    }

    pub fn bind_text(&self, index: c_int, text: &UserText<'_>) -> ResultCode {
        self.handle().bind_text(index, text)
    }

    pub fn column_blob(&self, col: c_int) -> &[u8] {
        self.handle().column_blob(col)
    }

    pub fn column_double(&self, col: c_int) -> f64 {
        self.handle().column_double(col)
    }

    pub fn column_int(&self, col: c_int) -> c_int {
        self.handle().column_int(col)
    }

    pub fn column_int64(&self, col: c_int) -> i64 {
        self.handle().column_int64(col)
    }

    pub fn column_text(&self, col: c_int) -> &[u8] {
        self.handle().column_text(col)
    }

    pub fn column_bytes(&self, col: c_int) -> c_int {
        self.handle().column_bytes(col)
    }

    pub fn column_type(&self, col: c_int) -> DataType {
        self.handle().column_type(col)
    }

    pub fn column_value(&self, col: c_int) -> ValueRef<'_> {
        self.handle().column_value(col)
    }

    pub fn step(&self) -> ResultCode {
        self.handle().step()
    }

    pub fn reset(&self) -> ResultCode {
        self.handle().reset()
    }

    pub fn clear_bindings(&self) -> ResultCode {
        self.handle().clear_bindings()
    }

    pub fn sql(&self) -> &str {
        self.handle().sql()
    }
}

impl Drop for Statement {
    fn drop(&mut self) {
        unsafe { libsqlite3_sys::sqlite3_finalize(self.stmt) };
    }
}

/// Borrowed statement handle. Carries every primitive operation as a 1:1
/// engine call; the owning handle and the helper types all delegate here.
#[derive(Clone, Copy)]
pub struct StatementRef<'a> {
    stmt: *mut libsqlite3_sys::sqlite3_stmt,
    _marker: PhantomData<&'a Statement>,
}

impl<'a> StatementRef<'a> {
    pub fn raw(self) -> *mut libsqlite3_sys::sqlite3_stmt {
        self.stmt
    }

    pub fn bind_blob(self, index: c_int, data: &UserBlob<'_>) -> ResultCode {
        ResultCode::from_raw(unsafe {
            libsqlite3_sys::sqlite3_bind_blob(
                self.stmt,
                index,
                data.data(),
                data.size_bytes(),
                data.destructor().as_sqlite(),
            )
        })
    }

    pub fn bind_double(self, index: c_int, value: f64) -> ResultCode {
        ResultCode::from_raw(unsafe { libsqlite3_sys::sqlite3_bind_double(self.stmt, index, value) })
    }

    pub fn bind_int(self, index: c_int, value: c_int) -> ResultCode {
        ResultCode::from_raw(unsafe { libsqlite3_sys::sqlite3_bind_int(self.stmt, index, value) })
    }

    pub fn bind_int64(self, index: c_int, value: i64) -> ResultCode {
        ResultCode::from_raw(unsafe { libsqlite3_sys::sqlite3_bind_int64(self.stmt, index, value) })
    }

    pub fn bind_null(self, index: c_int) -> ResultCode {
        ResultCode::from_raw(unsafe { libsqlite3_sys::sqlite3_bind_null(self.stmt, index) })
    }

    pub fn bind_text(self, index: c_int, text: &UserText<'_>) -> ResultCode {
        ResultCode::from_raw(unsafe {
            libsqlite3_sys::sqlite3_bind_text(
                self.stmt,
                index,
                text.data(),
                text.size_bytes(),
                text.destructor().as_sqlite(),
            )
        })
    }

    pub fn column_blob(self, col: c_int) -> &'a [u8] {
        let ptr = unsafe { libsqlite3_sys::sqlite3_column_blob(self.stmt, col) };
        let len = unsafe { libsqlite3_sys::sqlite3_column_bytes(self.stmt, col) };
        if ptr.is_null() || len <= 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len as usize) }
    }

    pub fn column_double(self, col: c_int) -> f64 {
        unsafe { libsqlite3_sys::sqlite3_column_double(self.stmt, col) }
    }

    pub fn column_int(self, col: c_int) -> c_int {
        unsafe { libsqlite3_sys::sqlite3_column_int(self.stmt, col) }
    }

    pub fn column_int64(self, col: c_int) -> i64 {
        unsafe { libsqlite3_sys::sqlite3_column_int64(self.stmt, col) }
    }

    /// UTF-8 bytes of the column's text form. The byte length is read after
    /// the text pointer because the text call may convert the value in
    /// place.
    pub fn column_text(self, col: c_int) -> &'a [u8] {
        let ptr = unsafe { libsqlite3_sys::sqlite3_column_text(self.stmt, col) };
        let len = unsafe { libsqlite3_sys::sqlite3_column_bytes(self.stmt, col) };
        if ptr.is_null() || len <= 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len as usize) }
    }

    pub fn column_bytes(self, col: c_int) -> c_int {
        unsafe { libsqlite3_sys::sqlite3_column_bytes(self.stmt, col) }
    }

    pub fn column_type(self, col: c_int) -> DataType {
        DataType::from_raw(unsafe { libsqlite3_sys::sqlite3_column_type(self.stmt, col) })
    }

    pub fn column_value(self, col: c_int) -> ValueRef<'a> {
        ValueRef::from_raw(unsafe { libsqlite3_sys::sqlite3_column_value(self.stmt, col) })
    }

    pub fn step(self) -> ResultCode {
        ResultCode::from_raw(unsafe { libsqlite3_sys::sqlite3_step(self.stmt) })
    }

    pub fn reset(self) -> ResultCode {
        ResultCode::from_raw(unsafe { libsqlite3_sys::sqlite3_reset(self.stmt) })
    }

    pub fn clear_bindings(self) -> ResultCode {
        ResultCode::from_raw(unsafe { libsqlite3_sys::sqlite3_clear_bindings(self.stmt) })
    }

    pub fn sql(self) -> &'a str {
        let ptr = unsafe { libsqlite3_sys::sqlite3_sql(self.stmt) };
        if ptr.is_null() {
            return "";
        }
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
    }
}

impl<'a> From<&'a Statement> for StatementRef<'a> {
    fn from(stmt: &'a Statement) -> Self {
        stmt.handle()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::connection::Connection;
    use crate::value::DataType;

    fn scratch() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE t (a, b, c)").unwrap();
        conn
    }

    #[test]
    fn bind_and_read_back_by_index() {
        let conn = scratch();
        let insert = conn.prepare("INSERT INTO t (a, b, c) VALUES (?1, ?2, ?3)").unwrap();
        assert_eq!(insert.bind_int(1, 7), ResultCode::OK);
        assert_eq!(insert.bind_double(2, 0.5), ResultCode::OK);
        assert_eq!(insert.bind_text(3, &UserText::new("seven")), ResultCode::OK);
        assert_eq!(insert.step(), ResultCode::DONE);

        let select = conn.prepare("SELECT a, b, c FROM t").unwrap();
        assert_eq!(select.step(), ResultCode::ROW);
        assert_eq!(select.column_int(0), 7);
        assert_eq!(select.column_double(1), 0.5);
        assert_eq!(select.column_text(2), b"seven");
        assert_eq!(select.column_bytes(2), 5);
        assert_eq!(select.column_type(0), DataType::Integer);
        assert_eq!(select.step(), ResultCode::DONE);
    }

    #[test]
    fn blob_and_null_primitives() {
        let conn = scratch();
        let insert = conn.prepare("INSERT INTO t (a, b) VALUES (?1, ?2)").unwrap();
        assert_eq!(insert.bind_blob(1, &UserBlob::new(&[1u8, 2, 3])), ResultCode::OK);
        assert_eq!(insert.bind_null(2), ResultCode::OK);
        assert_eq!(insert.step(), ResultCode::DONE);

        let select = conn.prepare("SELECT a, b FROM t").unwrap();
        assert_eq!(select.step(), ResultCode::ROW);
        assert_eq!(select.column_blob(0), &[1u8, 2, 3]);
        assert_eq!(select.column_type(1), DataType::Null);
    }

    #[test]
    fn reset_returns_to_ready() {
        let conn = scratch();
        conn.execute("INSERT INTO t (a) VALUES (1)").unwrap();

        let select = conn.prepare("SELECT a FROM t").unwrap();
        assert_eq!(select.step(), ResultCode::ROW);
        assert_eq!(select.step(), ResultCode::DONE);
        assert_eq!(select.reset(), ResultCode::OK);
        assert_eq!(select.step(), ResultCode::ROW);
    }

    #[test]
    fn clear_bindings_leaves_slots_null() {
        let conn = scratch();
        let insert = conn.prepare("INSERT INTO t (a) VALUES (?1)").unwrap();
        assert_eq!(insert.bind_int(1, 5), ResultCode::OK);
        assert_eq!(insert.step(), ResultCode::DONE);
        assert_eq!(insert.reset(), ResultCode::OK);
        assert_eq!(insert.clear_bindings(), ResultCode::OK);
        assert_eq!(insert.step(), ResultCode::DONE);

        let select = conn.prepare("SELECT count(*) FROM t WHERE a IS NULL").unwrap();
        assert_eq!(select.step(), ResultCode::ROW);
        assert_eq!(select.column_int(0), 1);
    }

    #[test]
    fn out_of_range_bind_reports_range() {
        let conn = scratch();
        let insert = conn.prepare("INSERT INTO t (a) VALUES (?1)").unwrap();
        assert_eq!(insert.bind_int(2, 1), ResultCode::RANGE);
    }

    #[test]
    fn finalize_is_idempotent_and_leaves_an_inert_handle() {
        let conn = scratch();
        let mut stmt = conn.prepare("SELECT 1").unwrap();
        assert!(stmt.is_open());
        assert_eq!(stmt.finalize(), ResultCode::OK);
        assert!(!stmt.is_open());
        assert!(stmt.raw().is_null());
        assert_eq!(stmt.finalize(), ResultCode::OK);
    }

    #[test]
    fn sql_text_is_preserved() {
        let conn = scratch();
        let stmt = conn.prepare("SELECT a FROM t").unwrap();
        assert_eq!(stmt.sql(), "SELECT a FROM t");
    }
}
