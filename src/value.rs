use std::ffi::c_int;
use std::marker::PhantomData;

/// Fundamental datatype of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Float,
    Text,
    Blob,
    Null,
}

impl DataType {
    pub(crate) fn from_raw(raw: c_int) -> Self {
        match raw {
            libsqlite3_sys::SQLITE_INTEGER => DataType::Integer,
            libsqlite3_sys::SQLITE_FLOAT => DataType::Float,
            libsqlite3_sys::SQLITE_TEXT => DataType::Text,
            libsqlite3_sys::SQLITE_BLOB => DataType::Blob,
            libsqlite3_sys::SQLITE_NULL => DataType::Null,
            _ => panic!("Invalid column type"),
        }
    }
}

/// Owning handle to an engine value, detached from any statement row.
/// Produced by [`ValueRef::dup`].
pub struct Value {
    value: *mut libsqlite3_sys::sqlite3_value,
}

impl Value {
    pub(crate) fn from_raw(value: *mut libsqlite3_sys::sqlite3_value) -> Self {
        Self { value }
    }

    pub fn handle(&self) -> ValueRef<'_> {
        ValueRef {
            value: self.value,
            _marker: PhantomData,
        }
    }

    /// Releases the value. Safe to call more than once; also runs on drop.
    pub fn free(&mut self) {
        unsafe { libsqlite3_sys::sqlite3_value_free(self.value) };
        self.value = std::ptr::null_mut();
    }

    pub fn is_open(&self) -> bool {
        !self.value.is_null()
    }

    pub fn raw(&self) -> *mut libsqlite3_sys::sqlite3_value {
        self.value
    }

    pub fn blob(&self) -> &[u8] {
        self.handle().blob()
    }

    pub fn double(&self) -> f64 {
        self.handle().double()
    }

    pub fn int(&self) -> c_int {
        self.handle().int()
    }

    pub fn int64(&self) -> i64 {
        self.handle().int64()
    }

    pub fn text(&self) -> &[u8] {
        self.handle().text()
    }

    pub fn bytes(&self) -> c_int {
        self.handle().bytes()
    }

    pub fn datatype(&self) -> DataType {
        self.handle().datatype()
    }

    pub fn dup(&self) -> Option<Value> {
        self.handle().dup()
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        unsafe { libsqlite3_sys::sqlite3_value_free(self.value) };
    }
}

/// Borrowed value still attached to the statement row that produced it;
/// must not outlive that row.
#[derive(Clone, Copy)]
pub struct ValueRef<'a> {
    value: *mut libsqlite3_sys::sqlite3_value,
    _marker: PhantomData<&'a Value>,
}

impl<'a> ValueRef<'a> {
    pub(crate) fn from_raw(value: *mut libsqlite3_sys::sqlite3_value) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn blob(self) -> &'a [u8] {
        let ptr = unsafe { libsqlite3_sys::sqlite3_value_blob(self.value) };
        let len = unsafe { libsqlite3_sys::sqlite3_value_bytes(self.value) };
        if ptr.is_null() || len <= 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len as usize) }
    }

    pub fn double(self) -> f64 {
        unsafe { libsqlite3_sys::sqlite3_value_double(self.value) }
    }

    pub fn int(self) -> c_int {
        unsafe { libsqlite3_sys::sqlite3_value_int(self.value) }
    }

    pub fn int64(self) -> i64 {
        unsafe { libsqlite3_sys::sqlite3_value_int64(self.value) }
    }

    /// UTF-8 bytes of the value's text form. Calling this may convert the
    /// stored value in place, which is why the byte length is read after.
    pub fn text(self) -> &'a [u8] {
        let ptr = unsafe { libsqlite3_sys::sqlite3_value_text(self.value) };
        let len = unsafe { libsqlite3_sys::sqlite3_value_bytes(self.value) };
        if ptr.is_null() || len <= 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len as usize) }
    }

    pub fn bytes(self) -> c_int {
        unsafe { libsqlite3_sys::sqlite3_value_bytes(self.value) }
    }

    pub fn datatype(self) -> DataType {
        DataType::from_raw(unsafe { libsqlite3_sys::sqlite3_value_type(self.value) })
    }

    /// Independent owned copy of the value; `None` when the engine cannot
    /// allocate one.
    pub fn dup(self) -> Option<Value> {
        let ptr = unsafe { libsqlite3_sys::sqlite3_value_dup(self.value) };
        if ptr.is_null() { None } else { Some(Value::from_raw(ptr)) }
    }

    pub fn raw(self) -> *mut libsqlite3_sys::sqlite3_value {
        self.value
    }
}
