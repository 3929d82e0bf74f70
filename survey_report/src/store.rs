use crate::table::{Row, Table};

/// An append-only tabular store of submitted surveys.
///
/// Implementations are handed to the code that needs them, there is no
/// global connection.
pub trait RowStore {
    type Error;

    /// Reads all the rows, in submission order.
    fn read(&self) -> Result<Table, Self::Error>;

    /// Appends one row at the end of the store and returns the updated table.
    fn append(&mut self, row: Row) -> Result<Table, Self::Error>;
}

/// A store kept in memory.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct MemoryStore {
    table: Table,
}

impl MemoryStore {
    pub fn new(table: Table) -> MemoryStore {
        MemoryStore { table }
    }
}

impl RowStore for MemoryStore {
    type Error = std::convert::Infallible;

    fn read(&self) -> Result<Table, Self::Error> {
        Ok(self.table.clone())
    }

    fn append(&mut self, row: Row) -> Result<Table, Self::Error> {
        self.table.push(row);
        Ok(self.table.clone())
    }
}
