//! Schema operations and column definitions.

mod column;
mod operation;

pub use column::{
    big_increments, big_integer, binary, boolean, char, custom, date, datetime, datetime_tz,
    decimal, double, enumeration, float, geography, geometry, increments, integer, ip_address,
    json, jsonb, long_text, mac_address, medium_text, small_integer, string, text, time, time_tz,
    timestamp, timestamp_tz, tiny_integer, uuid, year, ColumnBuilder, ColumnDefinition,
    ColumnType, DefaultValue, ForeignKeyAction,
};
pub use operation::{
    AddColumnOp, AddForeignKeyOp, AddIndexOp, ChangeColumnOp, ColumnChange, CreateTableOp,
    DropColumnOp, DropForeignKeyOp, DropIndexOp, DropTableOp, ForeignKeyDefinition, IndexType,
    Operation, RenameColumnOp, RenameIndexOp, RenameTableOp,
};
