//! Format writers
//!
//! Each writer turns a [`TabularData`](crate::table::TabularData) into the
//! bytes of one output format. Writers only fail when the container refuses
//! the data, such as a spreadsheet past its row limit.

pub mod csv;
pub mod json;
pub mod xlsx;
