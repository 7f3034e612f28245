use std::ffi::{CStr, c_int};

use bytemuck::Pod;

use crate::result::ResultCode;
use crate::statement::StatementRef;
use crate::userdata::{Null, Skip, UserBlob, UserText};

/// One bind slot of a statement: a borrowed statement plus the 1-based slot
/// index. Valid while the statement is alive and unreset.
#[derive(Clone, Copy)]
pub struct Parameter<'a> {
    stmt: StatementRef<'a>,
    index: c_int,
}

impl<'a> Parameter<'a> {
    pub fn new(stmt: StatementRef<'a>, index: c_int) -> Self {
        Self { stmt, index }
    }

    pub fn bind_blob(self, data: &UserBlob<'_>) -> ResultCode {
        self.stmt.bind_blob(self.index, data)
    }

    pub fn bind_double(self, value: f64) -> ResultCode {
        self.stmt.bind_double(self.index, value)
    }

    pub fn bind_int(self, value: c_int) -> ResultCode {
        self.stmt.bind_int(self.index, value)
    }

    pub fn bind_int64(self, value: i64) -> ResultCode {
        self.stmt.bind_int64(self.index, value)
    }

    pub fn bind_null(self) -> ResultCode {
        self.stmt.bind_null(self.index)
    }

    pub fn bind_text(self, text: &UserText<'_>) -> ResultCode {
        self.stmt.bind_text(self.index, text)
    }

    pub fn stmt(&self) -> StatementRef<'a> {
        self.stmt
    }

    pub fn index(&self) -> c_int {
        self.index
    }
}

/// Maps a value's static type onto the matching bind primitive. One impl
/// per bindable type; supporting a new type is one new impl, existing ones
/// stay untouched.
pub trait Bind {
    fn bind(&self, p: Parameter<'_>) -> ResultCode;
}

impl<T: Bind + ?Sized> Bind for &T {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        (**self).bind(p)
    }
}

impl Bind for UserBlob<'_> {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_blob(self)
    }
}

impl Bind for UserText<'_> {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_text(self)
    }
}

impl Bind for Null {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_null()
    }
}

impl Bind for Skip {
    fn bind(&self, _p: Parameter<'_>) -> ResultCode {
        ResultCode::OK
    }
}

impl Bind for f64 {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_double(*self)
    }
}

impl Bind for f32 {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_double(f64::from(*self))
    }
}

impl Bind for i8 {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_int(c_int::from(*self))
    }
}

impl Bind for i16 {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_int(c_int::from(*self))
    }
}

impl Bind for i32 {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_int(*self)
    }
}

impl Bind for i64 {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_int64(*self)
    }
}

impl Bind for isize {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_int64(*self as i64)
    }
}

impl Bind for u8 {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_int(c_int::from(*self))
    }
}

impl Bind for u16 {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_int(c_int::from(*self))
    }
}

// Unsigned values wider than the engine's 32-bit primitive widen to the
// 64-bit one so the top bit is kept as value, not sign.
impl Bind for u32 {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_int64(i64::from(*self))
    }
}

// Stored by bit pattern; values above i64::MAX read back unchanged through
// the matching column trait.
impl Bind for u64 {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_int64(*self as i64)
    }
}

impl Bind for usize {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_int64(*self as i64)
    }
}

impl Bind for bool {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_int(c_int::from(*self))
    }
}

impl Bind for char {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        let mut buf = [0u8; 4];
        p.bind_text(&UserText::new(self.encode_utf8(&mut buf)))
    }
}

impl Bind for str {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_text(&UserText::new(self))
    }
}

impl Bind for String {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        self.as_str().bind(p)
    }
}

impl Bind for CStr {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_text(&UserText::from_c_str(self))
    }
}

impl<T: Pod> Bind for [T] {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        p.bind_blob(&UserBlob::new(self))
    }
}

impl<T: Pod, const N: usize> Bind for [T; N] {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        self.as_slice().bind(p)
    }
}

impl<T: Pod> Bind for Vec<T> {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        self.as_slice().bind(p)
    }
}

impl<T: Bind> Bind for Option<T> {
    fn bind(&self, p: Parameter<'_>) -> ResultCode {
        match self {
            Some(value) => value.bind(p),
            None => p.bind_null(),
        }
    }
}

/// Outcome of a bind pass: the last code and the 1-based index of the last
/// slot attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOutcome {
    pub code: ResultCode,
    pub index: c_int,
}

/// Applies the bind traits across a statement's parameter slots in order,
/// latching the first error and the index it occurred at.
pub struct Binder<'a> {
    stmt: StatementRef<'a>,
    code: ResultCode,
    index: c_int,
}

impl<'a> Binder<'a> {
    pub fn new(stmt: impl Into<StatementRef<'a>>) -> Self {
        Self {
            stmt: stmt.into(),
            code: ResultCode::OK,
            index: 0,
        }
    }

    /// Streaming form: binds one value at the next slot, unless an earlier
    /// bind already failed.
    pub fn push<T: Bind + ?Sized>(&mut self, value: &T) -> &mut Self {
        if !self.code.is_error() {
            self.index += 1;
            self.code = value.bind(Parameter::new(self.stmt, self.index));
        }
        self
    }

    /// Applies a whole value list left to right with the same short-circuit
    /// rule as [`Binder::push`].
    pub fn bind<L: BindList>(&mut self, values: L) -> BindOutcome {
        values.bind_all(self);
        self.outcome()
    }

    pub fn outcome(&self) -> BindOutcome {
        BindOutcome {
            code: self.code,
            index: self.index,
        }
    }

    pub fn code(&self) -> ResultCode {
        self.code
    }

    pub fn index(&self) -> c_int {
        self.index
    }

    pub fn stmt(&self) -> StatementRef<'a> {
        self.stmt
    }
}

/// Heterogeneous list of bindable values, applied left to right.
pub trait BindList {
    fn bind_all(&self, binder: &mut Binder<'_>);
}

impl BindList for () {
    fn bind_all(&self, _binder: &mut Binder<'_>) {}
}

macro_rules! bind_list_tuple {
    ($($value:ident : $index:tt),+) => {
        impl<$($value: Bind),+> BindList for ($($value,)+) {
            fn bind_all(&self, binder: &mut Binder<'_>) {
                $(binder.push(&self.$index);)+
            }
        }
    };
}

bind_list_tuple!(A: 0);
bind_list_tuple!(A: 0, B: 1);
bind_list_tuple!(A: 0, B: 1, C: 2);
bind_list_tuple!(A: 0, B: 1, C: 2, D: 3);
bind_list_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
bind_list_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
bind_list_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
bind_list_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
bind_list_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8);
bind_list_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9);
bind_list_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10);
bind_list_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11);
bind_list_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11, M: 12);
bind_list_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11, M: 12, N: 13);
bind_list_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11, M: 12, N: 13, O: 14);
bind_list_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11, M: 12, N: 13, O: 14, P: 15);

/// Binds a whole value list against a statement in one call.
pub fn bind<'a, L: BindList>(stmt: impl Into<StatementRef<'a>>, values: L) -> BindOutcome {
    Binder::new(stmt).bind(values)
}
