//! Column schema for raw placement logs.
//!
//! The machines emit CSV with a fixed column layout and no usable header
//! names, so fields are addressed by position. The mapping lives here as an
//! explicit, injected object; the detector never sees raw columns.

use serde::{Deserialize, Serialize};
use smt_common::{Error, Result};

/// Fixed column positions and header layout of one log file.
///
/// Defaults match the standard machine export: two preamble rows (product
/// name in row 0, column 1), then data rows where column 1 is the part
/// number, 2 the description, 3 the board reference, 6 the batch number,
/// and 11 the result code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSchema {
    /// Preamble rows before the first data row.
    pub skip_rows: usize,

    /// Row of the product-name header cell (within the preamble).
    pub product_row: usize,

    /// Column of the product-name header cell.
    pub product_col: usize,

    /// Column of the catalog part number.
    pub part_number_col: usize,

    /// Column of the component description.
    pub description_col: usize,

    /// Column of the board reference (component position identity).
    pub reference_col: usize,

    /// Column of the material batch number.
    pub batch_number_col: usize,

    /// Column of the integer result code.
    pub result_col: usize,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            skip_rows: 2,
            product_row: 0,
            product_col: 1,
            part_number_col: 1,
            description_col: 2,
            reference_col: 3,
            batch_number_col: 6,
            result_col: 11,
        }
    }
}

impl ColumnSchema {
    /// Minimum number of columns a data row must have to be mappable.
    pub fn min_columns(&self) -> usize {
        1 + [
            self.part_number_col,
            self.description_col,
            self.reference_col,
            self.batch_number_col,
            self.result_col,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Validate schema semantics.
    ///
    /// The five data columns must be pairwise distinct; the product cell
    /// must sit inside the skipped preamble (or there is no preamble to
    /// read it from).
    pub fn validate(&self) -> Result<()> {
        let mut cols = [
            self.part_number_col,
            self.description_col,
            self.reference_col,
            self.batch_number_col,
            self.result_col,
        ];
        cols.sort_unstable();
        if cols.windows(2).any(|w| w[0] == w[1]) {
            return Err(Error::InvalidSchema(
                "data column positions must be pairwise distinct".into(),
            ));
        }
        if self.skip_rows > 0 && self.product_row >= self.skip_rows {
            return Err(Error::InvalidSchema(format!(
                "product_row {} lies outside the {} skipped preamble rows",
                self.product_row, self.skip_rows
            )));
        }
        Ok(())
    }
}
