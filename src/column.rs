use std::ffi::c_int;

use bytemuck::Pod;

use crate::row::Row;
use crate::userdata::Null;
use crate::value::{DataType, ValueRef};

/// Maps an engine-typed column value back onto a requested static type. One
/// impl per extractable type, mirroring the bind side. Extraction itself
/// cannot fail at the API level; only bind and step can.
pub trait Column: Sized {
    fn from_value(value: ValueRef<'_>) -> Self;
}

// Narrower integer widths truncate the stored value, no range check.
impl Column for i8 {
    fn from_value(value: ValueRef<'_>) -> Self {
        value.int() as i8
    }
}

impl Column for i16 {
    fn from_value(value: ValueRef<'_>) -> Self {
        value.int() as i16
    }
}

impl Column for i32 {
    fn from_value(value: ValueRef<'_>) -> Self {
        value.int()
    }
}

impl Column for i64 {
    fn from_value(value: ValueRef<'_>) -> Self {
        value.int64()
    }
}

impl Column for isize {
    fn from_value(value: ValueRef<'_>) -> Self {
        value.int64() as isize
    }
}

impl Column for u8 {
    fn from_value(value: ValueRef<'_>) -> Self {
        value.int() as u8
    }
}

impl Column for u16 {
    fn from_value(value: ValueRef<'_>) -> Self {
        value.int() as u16
    }
}

impl Column for u32 {
    fn from_value(value: ValueRef<'_>) -> Self {
        value.int64() as u32
    }
}

impl Column for u64 {
    fn from_value(value: ValueRef<'_>) -> Self {
        value.int64() as u64
    }
}

impl Column for usize {
    fn from_value(value: ValueRef<'_>) -> Self {
        value.int64() as usize
    }
}

impl Column for f64 {
    fn from_value(value: ValueRef<'_>) -> Self {
        value.double()
    }
}

impl Column for f32 {
    fn from_value(value: ValueRef<'_>) -> Self {
        value.double() as f32
    }
}

impl Column for bool {
    fn from_value(value: ValueRef<'_>) -> Self {
        value.int() != 0
    }
}

/// Reinterprets the first stored UTF-8 byte one-to-one as a character. This
/// is a deliberate byte-level narrowing, lossy for anything beyond 7-bit
/// ASCII, not a transcoding.
impl Column for char {
    fn from_value(value: ValueRef<'_>) -> Self {
        char::from(value.text().first().copied().unwrap_or(0))
    }
}

impl Column for String {
    fn from_value(value: ValueRef<'_>) -> Self {
        String::from_utf8_lossy(value.text()).into_owned()
    }
}

impl Column for Null {
    fn from_value(_value: ValueRef<'_>) -> Self {
        Null
    }
}

impl<T: Column> Column for Option<T> {
    fn from_value(value: ValueRef<'_>) -> Self {
        if value.datatype() == DataType::Null {
            None
        } else {
            Some(T::from_value(value))
        }
    }
}

/// Byte-for-byte copy of the stored blob into as many whole elements as its
/// byte length holds; a trailing partial element is dropped.
impl<T: Pod> Column for Vec<T> {
    fn from_value(value: ValueRef<'_>) -> Self {
        let bytes = value.blob();
        if size_of::<T>() == 0 {
            return Vec::new();
        }
        let count = bytes.len() / size_of::<T>();
        let mut out = vec![T::zeroed(); count];
        bytemuck::cast_slice_mut::<T, u8>(&mut out).copy_from_slice(&bytes[..count * size_of::<T>()]);
        out
    }
}

/// Copies at most the stored bytes into the array; missing trailing bytes
/// read as zero.
impl<T: Pod, const N: usize> Column for [T; N] {
    fn from_value(value: ValueRef<'_>) -> Self {
        let bytes = value.blob();
        let mut out = [T::zeroed(); N];
        let dst = bytemuck::cast_slice_mut::<T, u8>(out.as_mut_slice());
        let n = bytes.len().min(dst.len());
        dst[..n].copy_from_slice(&bytes[..n]);
        out
    }
}

/// Sequential read-side orchestrator over one result row: every extraction
/// consumes the next 0-based column ordinal.
pub struct Columner<'a> {
    row: Row<'a>,
    index: c_int,
}

impl<'a> Columner<'a> {
    pub fn new(row: impl Into<Row<'a>>) -> Self {
        Self {
            row: row.into(),
            index: -1,
        }
    }

    /// Extracts one value from the next column.
    pub fn get<T: Column>(&mut self) -> T {
        self.index += 1;
        T::from_value(self.row.column_value(self.index))
    }

    /// Extracts a tuple of values positionally, left to right.
    pub fn get_all<L: ColumnList>(&mut self) -> L {
        L::from_columner(self)
    }

    pub fn row(&self) -> Row<'a> {
        self.row
    }

    /// Ordinal of the last column read, `-1` before the first read.
    pub fn index(&self) -> c_int {
        self.index
    }
}

/// Tuple of column types extracted positionally from one row.
pub trait ColumnList: Sized {
    fn from_columner(columner: &mut Columner<'_>) -> Self;
}

macro_rules! column_list_tuple {
    ($($value:ident),+) => {
        impl<$($value: Column),+> ColumnList for ($($value,)+) {
            fn from_columner(columner: &mut Columner<'_>) -> Self {
                ($(columner.get::<$value>(),)+)
            }
        }
    };
}

column_list_tuple!(A);
column_list_tuple!(A, B);
column_list_tuple!(A, B, C);
column_list_tuple!(A, B, C, D);
column_list_tuple!(A, B, C, D, E);
column_list_tuple!(A, B, C, D, E, F);
column_list_tuple!(A, B, C, D, E, F, G);
column_list_tuple!(A, B, C, D, E, F, G, H);
column_list_tuple!(A, B, C, D, E, F, G, H, I);
column_list_tuple!(A, B, C, D, E, F, G, H, I, J);
column_list_tuple!(A, B, C, D, E, F, G, H, I, J, K);
column_list_tuple!(A, B, C, D, E, F, G, H, I, J, K, L);
column_list_tuple!(A, B, C, D, E, F, G, H, I, J, K, L, M);
column_list_tuple!(A, B, C, D, E, F, G, H, I, J, K, L, M, N);
column_list_tuple!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O);
column_list_tuple!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P);

/// Extracts a tuple of values from the current row in one call.
pub fn columns<'a, L: ColumnList>(row: impl Into<Row<'a>>) -> L {
    Columner::new(row).get_all()
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::connection::Connection;
    use crate::result::ResultCode;

    fn single_row(sql: &str) -> (Connection, crate::statement::Statement) {
        let conn = Connection::open_in_memory().unwrap();
        let stmt = conn.prepare(sql).unwrap();
        assert_eq!(stmt.step(), ResultCode::ROW);
        (conn, stmt)
    }

    #[test]
    fn tuple_extraction_matches_column_order() {
        let (_conn, stmt) = single_row("SELECT 1, 2.5, 'three'");
        let (a, b, c) = columns::<(i32, f64, String)>(&stmt);
        assert_eq!((a, b, c.as_str()), (1, 2.5, "three"));
    }

    #[test]
    fn sequential_gets_advance_the_ordinal() {
        let (_conn, stmt) = single_row("SELECT 10, 20, 30");
        let mut columner = Columner::new(&stmt);
        assert_eq!(columner.index(), -1);
        assert_eq!(columner.get::<i32>(), 10);
        assert_eq!(columner.get::<i64>(), 20);
        assert_eq!(columner.get::<i32>(), 30);
        assert_eq!(columner.index(), 2);
    }

    #[test]
    fn null_marker_consumes_a_slot() {
        let (_conn, stmt) = single_row("SELECT NULL, 7");
        let (_null, seven) = columns::<(Null, i32)>(&stmt);
        assert_eq!(seven, 7);
    }

    #[test]
    fn narrowing_truncates_silently() {
        let (_conn, stmt) = single_row("SELECT 65536, 300, -1");
        let mut columner = Columner::new(&stmt);
        assert_eq!(columner.get::<u16>(), 0);
        assert_eq!(columner.get::<u8>(), 44);
        assert_eq!(columner.get::<u32>(), u32::MAX);
    }

    #[test]
    fn char_takes_the_first_byte() {
        let (_conn, stmt) = single_row("SELECT 'abc'");
        assert_eq!(columns::<(char,)>(&stmt).0, 'a');

        // Multi-byte input narrows to its first UTF-8 byte.
        let (_conn, stmt) = single_row("SELECT '\u{e9}'");
        assert_eq!(columns::<(char,)>(&stmt).0, '\u{c3}');
    }

    #[test]
    fn empty_text_reads_as_nul_char() {
        let (_conn, stmt) = single_row("SELECT ''");
        assert_eq!(columns::<(char,)>(&stmt).0, '\0');
    }

    #[test]
    fn optional_extraction() {
        let (_conn, stmt) = single_row("SELECT NULL, 5");
        let (absent, present) = columns::<(Option<f64>, Option<i32>)>(&stmt);
        assert_eq!(absent, None);
        assert_eq!(present, Some(5));
    }

    #[test]
    fn pod_vector_takes_whole_elements() {
        let one = u32::from_ne_bytes([1, 0, 0, 0]);
        let two = u32::from_ne_bytes([2, 0, 0, 0]);

        let (_conn, stmt) = single_row("SELECT x'0100000002000000'");
        assert_eq!(columns::<(Vec<u32>,)>(&stmt).0, vec![one, two]);

        // Nine bytes hold two whole u32 elements; the ninth is dropped.
        let (_conn, stmt) = single_row("SELECT x'010000000200000003'");
        assert_eq!(columns::<(Vec<u32>,)>(&stmt).0, vec![one, two]);
    }

    #[test]
    fn short_blob_zero_fills_an_array() {
        let (_conn, stmt) = single_row("SELECT x'0102'");
        assert_eq!(columns::<([u8; 4],)>(&stmt).0, [1, 2, 0, 0]);
    }

    #[test]
    fn text_to_string_copies_the_bytes() {
        let (_conn, stmt) = single_row("SELECT 'caf\u{e9}'");
        assert_eq!(columns::<(String,)>(&stmt).0, "caf\u{e9}");
    }
}
