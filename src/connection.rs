use std::ffi::{CStr, CString, c_char, c_int};
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::result::{OpenFlags, ResultCode};
use crate::statement::Statement;
use crate::text::SqlStr;

/// Owning database connection handle. Closed exactly once, at the latest
/// when dropped.
#[derive(Debug)]
pub struct Connection {
    db: *mut libsqlite3_sys::sqlite3,
}

impl Connection {
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_flags(path, OpenFlags::READ_WRITE | OpenFlags::CREATE)
    }

    pub fn open_with_flags(path: &Path, flags: OpenFlags) -> Result<Self> {
        let c_path = CString::new(path.to_string_lossy().to_string())?;
        Self::open_raw(&c_path, flags)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open_raw(c":memory:", OpenFlags::READ_WRITE | OpenFlags::CREATE)
    }

    fn open_raw(path: &CStr, flags: OpenFlags) -> Result<Self> {
        let mut db: *mut libsqlite3_sys::sqlite3 = std::ptr::null_mut();
        let rc = unsafe { libsqlite3_sys::sqlite3_open_v2(path.as_ptr(), &mut db, flags.raw(), std::ptr::null()) };
        let code = ResultCode::from_raw(rc);
        if code.is_error() {
            // The partially opened handle still carries the diagnostic.
            let message = last_sqlite_error(db);
            unsafe { libsqlite3_sys::sqlite3_close(db) };
            return Err(Error::Sqlite { code, message });
        }
        debug!("opened database {}", path.to_string_lossy());
        Ok(Self { db })
    }

    pub fn prepare<'s>(&self, sql: impl Into<SqlStr<'s>>) -> Result<Statement> {
        let sql = sql.into();
        let mut stmt: *mut libsqlite3_sys::sqlite3_stmt = std::ptr::null_mut();
        let rc = unsafe {
            libsqlite3_sys::sqlite3_prepare_v2(self.db, sql.as_ptr(), sql.len_hint(), &mut stmt, std::ptr::null_mut())
        };
        let code = ResultCode::from_raw(rc);
        if code.is_error() {
            return Err(Error::Sqlite {
                code,
                message: self.last_error(),
            });
        }
        Ok(Statement::from_raw(stmt))
    }

    /// Prepares and steps a single statement, expecting it to run to
    /// completion without producing rows.
    pub fn execute<'s>(&self, sql: impl Into<SqlStr<'s>>) -> Result<()> {
        let stmt = self.prepare(sql)?;
        let code = stmt.step();
        if code == ResultCode::DONE {
            Ok(())
        } else {
            Err(Error::Sqlite {
                code,
                message: self.last_error(),
            })
        }
    }

    pub fn changes(&self) -> c_int {
        unsafe { libsqlite3_sys::sqlite3_changes(self.db) }
    }

    pub fn last_insert_rowid(&self) -> i64 {
        unsafe { libsqlite3_sys::sqlite3_last_insert_rowid(self.db) }
    }

    pub fn path(&self) -> Option<String> {
        let filename = unsafe { libsqlite3_sys::sqlite3_db_filename(self.db, std::ptr::null()) };
        if !filename.is_null() {
            let c_str = unsafe { CStr::from_ptr(filename.cast::<c_char>()) };
            return Some(c_str.to_string_lossy().to_string());
        }
        None
    }

    pub fn last_error(&self) -> String {
        last_sqlite_error(self.db)
    }

    pub fn error_code(&self) -> ResultCode {
        ResultCode::from_raw(unsafe { libsqlite3_sys::sqlite3_errcode(self.db) })
    }

    /// Orderly close. Reports BUSY and keeps the handle when dependent
    /// statements are still alive; nulls it on success. Safe to call more
    /// than once.
    pub fn close(&mut self) -> ResultCode {
        if self.db.is_null() {
            return ResultCode::OK;
        }
        let code = ResultCode::from_raw(unsafe { libsqlite3_sys::sqlite3_close(self.db) });
        if code == ResultCode::OK {
            self.db = std::ptr::null_mut();
        } else {
            debug!("close failed: {}", code);
        }
        code
    }

    pub fn is_open(&self) -> bool {
        !self.db.is_null()
    }

    pub fn raw(&self) -> *mut libsqlite3_sys::sqlite3 {
        self.db
    }
}

// `sqlite3_close_v2` lives in the linked SQLite C library but is omitted from
// the libsqlite3-sys bindings (dropped alongside the api_routines table), so we
// declare the binding for it directly here.
unsafe extern "C" {
    fn sqlite3_close_v2(db: *mut libsqlite3_sys::sqlite3) -> c_int;
}

impl Drop for Connection {
    fn drop(&mut self) {
        // Zombie-mode close: succeeds even with unfinalized statements, the
        // engine defers the actual teardown until they are gone.
        unsafe { sqlite3_close_v2(self.db) };
    }
}

fn last_sqlite_error(db: *mut libsqlite3_sys::sqlite3) -> String {
    let message = unsafe { libsqlite3_sys::sqlite3_errmsg(db) };
    let c_str = unsafe { CStr::from_ptr(message) };
    c_str.to_string_lossy().into_owned()
}
