use std::ffi::{CStr, c_char, c_int, c_void};
use std::marker::PhantomData;

use bytemuck::Pod;

/// Tells the engine whether bound data may still be aliased after the bind
/// call returns, or must be copied before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destructor {
    /// The data outlives every use of the statement; the engine keeps the
    /// pointer.
    Static,
    /// The engine copies the data before the bind call returns.
    #[default]
    Transient,
}

impl Destructor {
    pub(crate) fn as_sqlite(self) -> libsqlite3_sys::sqlite3_destructor_type {
        match self {
            Destructor::Static => libsqlite3_sys::SQLITE_STATIC(),
            Destructor::Transient => libsqlite3_sys::SQLITE_TRANSIENT(),
        }
    }
}

/// Caller-supplied binary data to bind: a non-owning byte span plus the
/// destructor policy the engine is told about.
#[derive(Debug, Clone, Copy)]
pub struct UserBlob<'a> {
    data: &'a [u8],
    destructor: Destructor,
}

impl<'a> UserBlob<'a> {
    pub fn new<T: Pod>(data: &'a [T]) -> Self {
        Self {
            data: bytemuck::cast_slice(data),
            destructor: Destructor::Transient,
        }
    }

    /// Static-policy blob. The engine may alias the pointer indefinitely,
    /// which is why the storage has to be immortal.
    pub fn from_static<T: Pod>(data: &'static [T]) -> UserBlob<'static> {
        UserBlob {
            data: bytemuck::cast_slice(data),
            destructor: Destructor::Static,
        }
    }

    pub fn data(&self) -> *const c_void {
        self.data.as_ptr().cast::<c_void>()
    }

    pub fn size_bytes(&self) -> c_int {
        self.data.len() as c_int
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }

    pub fn destructor(&self) -> Destructor {
        self.destructor
    }
}

/// Caller-supplied UTF-8 text to bind. A negative length defers the scan to
/// the engine, mirroring [`crate::SqlStr`].
#[derive(Debug, Clone, Copy)]
pub struct UserText<'a> {
    ptr: *const c_char,
    len: c_int,
    destructor: Destructor,
    _marker: PhantomData<&'a [u8]>,
}

impl<'a> UserText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            ptr: text.as_ptr().cast::<c_char>(),
            len: text.len() as c_int,
            destructor: Destructor::Transient,
            _marker: PhantomData,
        }
    }

    pub fn from_c_str(text: &'a CStr) -> Self {
        Self {
            ptr: text.as_ptr(),
            len: -1,
            destructor: Destructor::Transient,
            _marker: PhantomData,
        }
    }

    /// Static-policy text; same contract as [`UserBlob::from_static`].
    pub fn from_static(text: &'static str) -> UserText<'static> {
        UserText {
            ptr: text.as_ptr().cast::<c_char>(),
            len: text.len() as c_int,
            destructor: Destructor::Static,
            _marker: PhantomData,
        }
    }

    pub fn data(&self) -> *const c_char {
        self.ptr
    }

    pub fn size_bytes(&self) -> c_int {
        self.len
    }

    pub fn destructor(&self) -> Destructor {
        self.destructor
    }
}

/// Binds as SQL NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Null;

/// Binds nothing and reports success, deliberately leaving the slot unbound
/// so the engine's own defaults or constraints take over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skip;

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn blob_spans_elements_byte_for_byte() {
        let data: Vec<u16> = vec![1, 2, 3];
        let blob = UserBlob::new(&data);
        assert_eq!(blob.size_bytes(), 6);
        assert_eq!(blob.destructor(), Destructor::Transient);
        assert_eq!(blob.bytes().len(), 6);
    }

    #[test]
    fn static_blob_carries_static_policy() {
        static DATA: [u8; 4] = [1, 2, 3, 4];
        let blob = UserBlob::from_static(&DATA);
        assert_eq!(blob.destructor(), Destructor::Static);
        assert_eq!(blob.size_bytes(), 4);
    }

    #[test]
    fn text_lengths() {
        assert_eq!(UserText::new("hello").size_bytes(), 5);
        assert_eq!(UserText::from_c_str(c"hello").size_bytes(), -1);
        assert_eq!(UserText::from_static("hi").destructor(), Destructor::Static);
    }
}
