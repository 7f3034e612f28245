use std::ffi::{CStr, c_int};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Status code produced by every engine call. Extended codes share the
/// integer space with the primary codes; the primary code is the low byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultCode(c_int);

impl ResultCode {
    pub const OK: Self = Self(libsqlite3_sys::SQLITE_OK);
    pub const ERROR: Self = Self(libsqlite3_sys::SQLITE_ERROR);
    pub const INTERNAL: Self = Self(libsqlite3_sys::SQLITE_INTERNAL);
    pub const PERM: Self = Self(libsqlite3_sys::SQLITE_PERM);
    pub const ABORT: Self = Self(libsqlite3_sys::SQLITE_ABORT);
    pub const BUSY: Self = Self(libsqlite3_sys::SQLITE_BUSY);
    pub const LOCKED: Self = Self(libsqlite3_sys::SQLITE_LOCKED);
    pub const NOMEM: Self = Self(libsqlite3_sys::SQLITE_NOMEM);
    pub const READONLY: Self = Self(libsqlite3_sys::SQLITE_READONLY);
    pub const INTERRUPT: Self = Self(libsqlite3_sys::SQLITE_INTERRUPT);
    pub const IOERR: Self = Self(libsqlite3_sys::SQLITE_IOERR);
    pub const CORRUPT: Self = Self(libsqlite3_sys::SQLITE_CORRUPT);
    pub const NOTFOUND: Self = Self(libsqlite3_sys::SQLITE_NOTFOUND);
    pub const FULL: Self = Self(libsqlite3_sys::SQLITE_FULL);
    pub const CANTOPEN: Self = Self(libsqlite3_sys::SQLITE_CANTOPEN);
    pub const PROTOCOL: Self = Self(libsqlite3_sys::SQLITE_PROTOCOL);
    pub const EMPTY: Self = Self(libsqlite3_sys::SQLITE_EMPTY);
    pub const SCHEMA: Self = Self(libsqlite3_sys::SQLITE_SCHEMA);
    pub const TOOBIG: Self = Self(libsqlite3_sys::SQLITE_TOOBIG);
    pub const CONSTRAINT: Self = Self(libsqlite3_sys::SQLITE_CONSTRAINT);
    pub const MISMATCH: Self = Self(libsqlite3_sys::SQLITE_MISMATCH);
    pub const MISUSE: Self = Self(libsqlite3_sys::SQLITE_MISUSE);
    pub const NOLFS: Self = Self(libsqlite3_sys::SQLITE_NOLFS);
    pub const AUTH: Self = Self(libsqlite3_sys::SQLITE_AUTH);
    pub const FORMAT: Self = Self(libsqlite3_sys::SQLITE_FORMAT);
    pub const RANGE: Self = Self(libsqlite3_sys::SQLITE_RANGE);
    pub const NOTADB: Self = Self(libsqlite3_sys::SQLITE_NOTADB);
    pub const NOTICE: Self = Self(libsqlite3_sys::SQLITE_NOTICE);
    pub const WARNING: Self = Self(libsqlite3_sys::SQLITE_WARNING);
    pub const ROW: Self = Self(libsqlite3_sys::SQLITE_ROW);
    pub const DONE: Self = Self(libsqlite3_sys::SQLITE_DONE);

    pub const OK_LOAD_PERMANENTLY: Self = Self(libsqlite3_sys::SQLITE_OK_LOAD_PERMANENTLY);
    pub const ERROR_MISSING_COLLSEQ: Self = Self(libsqlite3_sys::SQLITE_ERROR_MISSING_COLLSEQ);
    pub const ERROR_RETRY: Self = Self(libsqlite3_sys::SQLITE_ERROR_RETRY);
    pub const ERROR_SNAPSHOT: Self = Self(libsqlite3_sys::SQLITE_ERROR_SNAPSHOT);
    pub const ABORT_ROLLBACK: Self = Self(libsqlite3_sys::SQLITE_ABORT_ROLLBACK);
    pub const BUSY_RECOVERY: Self = Self(libsqlite3_sys::SQLITE_BUSY_RECOVERY);
    pub const BUSY_SNAPSHOT: Self = Self(libsqlite3_sys::SQLITE_BUSY_SNAPSHOT);
    pub const LOCKED_SHAREDCACHE: Self = Self(libsqlite3_sys::SQLITE_LOCKED_SHAREDCACHE);
    pub const LOCKED_VTAB: Self = Self(libsqlite3_sys::SQLITE_LOCKED_VTAB);
    pub const READONLY_RECOVERY: Self = Self(libsqlite3_sys::SQLITE_READONLY_RECOVERY);
    pub const READONLY_CANTLOCK: Self = Self(libsqlite3_sys::SQLITE_READONLY_CANTLOCK);
    pub const READONLY_ROLLBACK: Self = Self(libsqlite3_sys::SQLITE_READONLY_ROLLBACK);
    pub const READONLY_DBMOVED: Self = Self(libsqlite3_sys::SQLITE_READONLY_DBMOVED);
    pub const READONLY_CANTINIT: Self = Self(libsqlite3_sys::SQLITE_READONLY_CANTINIT);
    pub const READONLY_DIRECTORY: Self = Self(libsqlite3_sys::SQLITE_READONLY_DIRECTORY);
    pub const IOERR_READ: Self = Self(libsqlite3_sys::SQLITE_IOERR_READ);
    pub const IOERR_SHORT_READ: Self = Self(libsqlite3_sys::SQLITE_IOERR_SHORT_READ);
    pub const IOERR_WRITE: Self = Self(libsqlite3_sys::SQLITE_IOERR_WRITE);
    pub const IOERR_FSYNC: Self = Self(libsqlite3_sys::SQLITE_IOERR_FSYNC);
    pub const IOERR_DIR_FSYNC: Self = Self(libsqlite3_sys::SQLITE_IOERR_DIR_FSYNC);
    pub const IOERR_TRUNCATE: Self = Self(libsqlite3_sys::SQLITE_IOERR_TRUNCATE);
    pub const IOERR_FSTAT: Self = Self(libsqlite3_sys::SQLITE_IOERR_FSTAT);
    pub const IOERR_UNLOCK: Self = Self(libsqlite3_sys::SQLITE_IOERR_UNLOCK);
    pub const IOERR_RDLOCK: Self = Self(libsqlite3_sys::SQLITE_IOERR_RDLOCK);
    pub const IOERR_DELETE: Self = Self(libsqlite3_sys::SQLITE_IOERR_DELETE);
    pub const IOERR_BLOCKED: Self = Self(libsqlite3_sys::SQLITE_IOERR_BLOCKED);
    pub const IOERR_NOMEM: Self = Self(libsqlite3_sys::SQLITE_IOERR_NOMEM);
    pub const IOERR_ACCESS: Self = Self(libsqlite3_sys::SQLITE_IOERR_ACCESS);
    pub const IOERR_CHECKRESERVEDLOCK: Self = Self(libsqlite3_sys::SQLITE_IOERR_CHECKRESERVEDLOCK);
    pub const IOERR_LOCK: Self = Self(libsqlite3_sys::SQLITE_IOERR_LOCK);
    pub const IOERR_CLOSE: Self = Self(libsqlite3_sys::SQLITE_IOERR_CLOSE);
    pub const IOERR_DIR_CLOSE: Self = Self(libsqlite3_sys::SQLITE_IOERR_DIR_CLOSE);
    pub const IOERR_SHMOPEN: Self = Self(libsqlite3_sys::SQLITE_IOERR_SHMOPEN);
    pub const IOERR_SHMSIZE: Self = Self(libsqlite3_sys::SQLITE_IOERR_SHMSIZE);
    pub const IOERR_SHMLOCK: Self = Self(libsqlite3_sys::SQLITE_IOERR_SHMLOCK);
    pub const IOERR_SHMMAP: Self = Self(libsqlite3_sys::SQLITE_IOERR_SHMMAP);
    pub const IOERR_SEEK: Self = Self(libsqlite3_sys::SQLITE_IOERR_SEEK);
    pub const IOERR_DELETE_NOENT: Self = Self(libsqlite3_sys::SQLITE_IOERR_DELETE_NOENT);
    pub const IOERR_MMAP: Self = Self(libsqlite3_sys::SQLITE_IOERR_MMAP);
    pub const IOERR_GETTEMPPATH: Self = Self(libsqlite3_sys::SQLITE_IOERR_GETTEMPPATH);
    pub const IOERR_CONVPATH: Self = Self(libsqlite3_sys::SQLITE_IOERR_CONVPATH);
    pub const CORRUPT_VTAB: Self = Self(libsqlite3_sys::SQLITE_CORRUPT_VTAB);
    pub const CORRUPT_SEQUENCE: Self = Self(libsqlite3_sys::SQLITE_CORRUPT_SEQUENCE);
    pub const CANTOPEN_CONVPATH: Self = Self(libsqlite3_sys::SQLITE_CANTOPEN_CONVPATH);
    pub const CANTOPEN_DIRTYWAL: Self = Self(libsqlite3_sys::SQLITE_CANTOPEN_DIRTYWAL);
    pub const CANTOPEN_FULLPATH: Self = Self(libsqlite3_sys::SQLITE_CANTOPEN_FULLPATH);
    pub const CANTOPEN_ISDIR: Self = Self(libsqlite3_sys::SQLITE_CANTOPEN_ISDIR);
    pub const CANTOPEN_NOTEMPDIR: Self = Self(libsqlite3_sys::SQLITE_CANTOPEN_NOTEMPDIR);
    pub const CONSTRAINT_CHECK: Self = Self(libsqlite3_sys::SQLITE_CONSTRAINT_CHECK);
    pub const CONSTRAINT_COMMITHOOK: Self = Self(libsqlite3_sys::SQLITE_CONSTRAINT_COMMITHOOK);
    pub const CONSTRAINT_FOREIGNKEY: Self = Self(libsqlite3_sys::SQLITE_CONSTRAINT_FOREIGNKEY);
    pub const CONSTRAINT_FUNCTION: Self = Self(libsqlite3_sys::SQLITE_CONSTRAINT_FUNCTION);
    pub const CONSTRAINT_TRIGGER: Self = Self(libsqlite3_sys::SQLITE_CONSTRAINT_TRIGGER);
    pub const CONSTRAINT_NOTNULL: Self = Self(libsqlite3_sys::SQLITE_CONSTRAINT_NOTNULL);
    pub const CONSTRAINT_PRIMARYKEY: Self = Self(libsqlite3_sys::SQLITE_CONSTRAINT_PRIMARYKEY);
    pub const CONSTRAINT_UNIQUE: Self = Self(libsqlite3_sys::SQLITE_CONSTRAINT_UNIQUE);
    pub const CONSTRAINT_VTAB: Self = Self(libsqlite3_sys::SQLITE_CONSTRAINT_VTAB);
    pub const CONSTRAINT_ROWID: Self = Self(libsqlite3_sys::SQLITE_CONSTRAINT_ROWID);
    pub const NOTICE_RECOVER_WAL: Self = Self(libsqlite3_sys::SQLITE_NOTICE_RECOVER_WAL);
    pub const NOTICE_RECOVER_ROLLBACK: Self = Self(libsqlite3_sys::SQLITE_NOTICE_RECOVER_ROLLBACK);
    pub const WARNING_AUTOINDEX: Self = Self(libsqlite3_sys::SQLITE_WARNING_AUTOINDEX);

    pub const fn from_raw(raw: c_int) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> c_int {
        self.0
    }

    /// Masks an extended code down to its primary code.
    pub const fn primary(self) -> Self {
        Self(self.0 & 0xff)
    }

    pub const fn is_error(self) -> bool {
        !matches!(
            self.0 & 0xff,
            libsqlite3_sys::SQLITE_OK | libsqlite3_sys::SQLITE_ROW | libsqlite3_sys::SQLITE_DONE
        )
    }

    /// English-language description of the code from the engine's static
    /// table. Unknown codes get the engine's own placeholder text.
    pub fn description(self) -> &'static str {
        let ptr = unsafe { libsqlite3_sys::sqlite3_errstr(self.0) };
        if ptr.is_null() {
            return "unknown error";
        }
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("unknown error")
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Open-mode bits for [`crate::Connection::open_with_flags`], combined with
/// bitwise OR. Invalid combinations are rejected by the engine at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenFlags(c_int);

impl OpenFlags {
    pub const READ_ONLY: Self = Self(libsqlite3_sys::SQLITE_OPEN_READONLY);
    pub const READ_WRITE: Self = Self(libsqlite3_sys::SQLITE_OPEN_READWRITE);
    pub const CREATE: Self = Self(libsqlite3_sys::SQLITE_OPEN_CREATE);
    pub const URI: Self = Self(libsqlite3_sys::SQLITE_OPEN_URI);
    pub const MEMORY: Self = Self(libsqlite3_sys::SQLITE_OPEN_MEMORY);
    pub const NO_MUTEX: Self = Self(libsqlite3_sys::SQLITE_OPEN_NOMUTEX);
    pub const FULL_MUTEX: Self = Self(libsqlite3_sys::SQLITE_OPEN_FULLMUTEX);
    pub const SHARED_CACHE: Self = Self(libsqlite3_sys::SQLITE_OPEN_SHAREDCACHE);
    pub const PRIVATE_CACHE: Self = Self(libsqlite3_sys::SQLITE_OPEN_PRIVATECACHE);
    pub const NO_FOLLOW: Self = Self(libsqlite3_sys::SQLITE_OPEN_NOFOLLOW);
    pub const EX_RES_CODE: Self = Self(libsqlite3_sys::SQLITE_OPEN_EXRESCODE);

    pub const fn from_raw(raw: c_int) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> c_int {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for OpenFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for OpenFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn raw_round_trip() {
        for code in [
            ResultCode::OK,
            ResultCode::ERROR,
            ResultCode::BUSY,
            ResultCode::ROW,
            ResultCode::DONE,
            ResultCode::IOERR_SHORT_READ,
            ResultCode::CONSTRAINT_UNIQUE,
            ResultCode::OK_LOAD_PERMANENTLY,
        ] {
            assert_eq!(ResultCode::from_raw(code.raw()), code);
        }
    }

    #[test]
    fn primary_masks_extended_codes() {
        assert_eq!(ResultCode::IOERR_READ.primary(), ResultCode::IOERR);
        assert_eq!(ResultCode::CONSTRAINT_NOTNULL.primary(), ResultCode::CONSTRAINT);
        assert_eq!(ResultCode::OK_LOAD_PERMANENTLY.primary(), ResultCode::OK);
        assert_eq!(ResultCode::ERROR.primary(), ResultCode::ERROR);
    }

    #[test]
    fn error_classification() {
        assert!(!ResultCode::OK.is_error());
        assert!(!ResultCode::ROW.is_error());
        assert!(!ResultCode::DONE.is_error());
        assert!(!ResultCode::OK_LOAD_PERMANENTLY.is_error());

        assert!(ResultCode::ERROR.is_error());
        assert!(ResultCode::BUSY.is_error());
        assert!(ResultCode::MISUSE.is_error());
        assert!(ResultCode::IOERR_READ.is_error());
        assert!(ResultCode::IOERR_SHMMAP.is_error());
        assert!(ResultCode::CONSTRAINT_UNIQUE.is_error());
        assert!(ResultCode::NOTICE.is_error());
    }

    #[test]
    fn descriptions_are_static_and_nonempty() {
        assert!(!ResultCode::OK.description().is_empty());
        assert!(!ResultCode::BUSY.description().is_empty());
        assert!(!ResultCode::from_raw(0x7fff_ffff).description().is_empty());
        assert_eq!(ResultCode::OK.to_string(), ResultCode::OK.description());
    }

    #[test]
    fn flags_combine_as_bitwise_or() {
        let flags = OpenFlags::READ_ONLY | OpenFlags::URI | OpenFlags::MEMORY;
        assert_eq!(
            flags.raw(),
            libsqlite3_sys::SQLITE_OPEN_READONLY | libsqlite3_sys::SQLITE_OPEN_URI | libsqlite3_sys::SQLITE_OPEN_MEMORY
        );
        assert!(flags.contains(OpenFlags::URI));
        assert!(!flags.contains(OpenFlags::CREATE));

        let mut assigned = OpenFlags::READ_WRITE;
        assigned |= OpenFlags::CREATE;
        assert_eq!(assigned, OpenFlags::READ_WRITE | OpenFlags::CREATE);
    }
}
