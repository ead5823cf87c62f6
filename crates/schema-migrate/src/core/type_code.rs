//! JDBC-style integer type codes.
//!
//! Columns carry the type code reported by the source database's metadata
//! together with its native type name. Dialects map codes (plus size,
//! precision and scale) back to a type name of their own.

pub const BIT: i32 = -7;
pub const TINYINT: i32 = -6;
pub const SMALLINT: i32 = 5;
pub const INTEGER: i32 = 4;
pub const BIGINT: i32 = -5;
pub const FLOAT: i32 = 6;
pub const REAL: i32 = 7;
pub const DOUBLE: i32 = 8;
pub const NUMERIC: i32 = 2;
pub const DECIMAL: i32 = 3;
pub const CHAR: i32 = 1;
pub const VARCHAR: i32 = 12;
pub const LONGVARCHAR: i32 = -1;
pub const NCHAR: i32 = -15;
pub const NVARCHAR: i32 = -9;
pub const LONGNVARCHAR: i32 = -16;
pub const DATE: i32 = 91;
pub const TIME: i32 = 92;
pub const TIMESTAMP: i32 = 93;
pub const TIME_WITH_TIMEZONE: i32 = 2013;
pub const TIMESTAMP_WITH_TIMEZONE: i32 = 2014;
pub const BINARY: i32 = -2;
pub const VARBINARY: i32 = -3;
pub const LONGVARBINARY: i32 = -4;
pub const BOOLEAN: i32 = 16;
pub const BLOB: i32 = 2004;
pub const CLOB: i32 = 2005;
pub const NCLOB: i32 = 2011;
pub const SQLXML: i32 = 2009;
pub const NULL: i32 = 0;
pub const OTHER: i32 = 1111;

/// Symbolic name for a type code, used in diagnostics.
pub fn type_code_name(code: i32) -> Option<&'static str> {
    let name = match code {
        BIT => "BIT",
        TINYINT => "TINYINT",
        SMALLINT => "SMALLINT",
        INTEGER => "INTEGER",
        BIGINT => "BIGINT",
        FLOAT => "FLOAT",
        REAL => "REAL",
        DOUBLE => "DOUBLE",
        NUMERIC => "NUMERIC",
        DECIMAL => "DECIMAL",
        CHAR => "CHAR",
        VARCHAR => "VARCHAR",
        LONGVARCHAR => "LONGVARCHAR",
        NCHAR => "NCHAR",
        NVARCHAR => "NVARCHAR",
        LONGNVARCHAR => "LONGNVARCHAR",
        DATE => "DATE",
        TIME => "TIME",
        TIMESTAMP => "TIMESTAMP",
        TIME_WITH_TIMEZONE => "TIME_WITH_TIMEZONE",
        TIMESTAMP_WITH_TIMEZONE => "TIMESTAMP_WITH_TIMEZONE",
        BINARY => "BINARY",
        VARBINARY => "VARBINARY",
        LONGVARBINARY => "LONGVARBINARY",
        BOOLEAN => "BOOLEAN",
        BLOB => "BLOB",
        CLOB => "CLOB",
        NCLOB => "NCLOB",
        SQLXML => "SQLXML",
        NULL => "NULL",
        OTHER => "OTHER",
        _ => return None,
    };
    Some(name)
}

/// Type code for a symbolic name (case-insensitive), the inverse of [`type_code_name`].
pub fn type_code_for_name(name: &str) -> Option<i32> {
    const CODES: [i32; 31] = [
        BIT, TINYINT, SMALLINT, INTEGER, BIGINT, FLOAT, REAL, DOUBLE, NUMERIC, DECIMAL, CHAR,
        VARCHAR, LONGVARCHAR, NCHAR, NVARCHAR, LONGNVARCHAR, DATE, TIME, TIMESTAMP,
        TIME_WITH_TIMEZONE, TIMESTAMP_WITH_TIMEZONE, BINARY, VARBINARY, LONGVARBINARY, BOOLEAN,
        BLOB, CLOB, NCLOB, SQLXML, NULL, OTHER,
    ];
    let upper = name.trim().to_uppercase();
    CODES
        .into_iter()
        .find(|code| type_code_name(*code) == Some(upper.as_str()))
}
