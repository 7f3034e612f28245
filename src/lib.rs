//! Typed wrapper around the sqlite3-sys C API
//! Prepared statements, typed parameter binding and typed column extraction
//! without manual handle, string length or destructor management

mod bind;
mod column;
mod connection;
mod error;
mod result;
mod row;
mod statement;
mod text;
mod transaction;
mod userdata;
mod value;

pub use bind::{Bind, BindList, BindOutcome, Binder, Parameter, bind};
pub use column::{Column, ColumnList, Columner, columns};
pub use connection::Connection;
pub use error::{Error, Result};
pub use result::{OpenFlags, ResultCode};
pub use row::{Row, for_each_row};
pub use statement::{Statement, StatementRef};
pub use text::SqlStr;
pub use transaction::{Transaction, TransactionBehavior};
pub use userdata::{Destructor, Null, Skip, UserBlob, UserText};
pub use value::{DataType, Value, ValueRef};
